//! Rules for moving Elestrals between the team, the storage boxes and the
//! bank.
//!
//! Every operation mutates the documents it is handed and reports which of
//! them changed; writing those documents back is the caller's job. Export and
//! import copy the record and leave the source in place. Release is the only
//! operation that removes anything.

use crate::core_api::{CoreError, Rejection};
use crate::gender::Gender;
use crate::model::{Bank, CreatureRecord, GameSave, PlayerData, SlotRef};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub save: bool,
    pub bank: bool,
}

impl Touched {
    pub const SAVE: Self = Self {
        save: true,
        bank: false,
    };
    pub const BANK: Self = Self {
        save: false,
        bank: true,
    };
    pub const BOTH: Self = Self {
        save: true,
        bank: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Exported { bank_index: usize },
    Imported { slot: SlotRef },
    Released,
    Renamed,
    GenderSet(Gender),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub touched: Touched,
    pub summary: String,
}

/// Copies the Elestral in `source` to the end of the bank.
pub fn export_to_bank(
    save: &GameSave,
    bank: &mut Bank,
    source: SlotRef,
) -> Result<Change, CoreError> {
    let slot = save.slot(source).ok_or_else(|| no_such_slot(source))?;
    let record = match slot {
        Some(record) if record.is_present() => record,
        _ => {
            return Err(CoreError::rejected(
                Rejection::EmptySource,
                format!("{source} is empty"),
            ));
        }
    };

    bank.elestrals.push(record.clone());
    Ok(Change {
        kind: ChangeKind::Exported {
            bank_index: bank.elestrals.len() - 1,
        },
        touched: Touched::BANK,
        summary: format!("{} has been exported to the bank!", record.name),
    })
}

/// First empty storage slot as `(box index, entry index)`, scanning boxes
/// then entries in ascending order.
pub fn first_available_slot(save: &GameSave) -> Option<(usize, usize)> {
    save.storage_boxes
        .iter()
        .enumerate()
        .find_map(|(box_index, storage_box)| {
            storage_box
                .entries
                .iter()
                .position(|entry| !entry.is_present())
                .map(|entry_index| (box_index, entry_index))
        })
}

/// Copies a bank entry into the first empty storage slot. The bank keeps its
/// copy.
pub fn import_from_bank(
    save: &mut GameSave,
    bank: &Bank,
    bank_index: usize,
) -> Result<Change, CoreError> {
    let record = bank_entry(bank, bank_index)?;
    if !record.is_present() {
        return Err(CoreError::rejected(
            Rejection::EmptySource,
            format!("bank position {} is empty", bank_index + 1),
        ));
    }
    let (box_index, entry_index) = first_available_slot(save).ok_or_else(|| {
        CoreError::rejected(
            Rejection::NoAvailableSlot,
            "no available slots in storage boxes",
        )
    })?;
    save.storage_boxes[box_index].entries[entry_index].character_data = Some(record.clone());

    Ok(Change {
        kind: ChangeKind::Imported {
            slot: SlotRef::Storage {
                box_index,
                entry_index,
            },
        },
        touched: Touched::BOTH,
        summary: format!(
            "{} has been imported to Storage Box {}!",
            record.name,
            box_index + 1
        ),
    })
}

/// Permanently removes a bank entry; later entries shift down by one.
pub fn release_from_bank(bank: &mut Bank, bank_index: usize) -> Result<Change, CoreError> {
    bank_entry(bank, bank_index)?;
    let released = bank.elestrals.remove(bank_index);
    Ok(Change {
        kind: ChangeKind::Released,
        touched: Touched::BANK,
        summary: format!("{} has been released.", released.name),
    })
}

pub fn rename_record(record: &mut CreatureRecord, new_name: &str) -> Result<(), CoreError> {
    if new_name.is_empty() {
        return Err(CoreError::rejected(
            Rejection::EmptyName,
            "name must not be empty",
        ));
    }
    record.name = new_name.to_string();
    Ok(())
}

pub fn rename_slot(
    save: &mut GameSave,
    slot: SlotRef,
    new_name: &str,
) -> Result<Change, CoreError> {
    let target = save.slot_mut(slot).ok_or_else(|| no_such_slot(slot))?;
    let record = match target {
        Some(record) if record.is_present() => record,
        _ => {
            return Err(CoreError::rejected(
                Rejection::EmptySource,
                format!("{slot} is empty"),
            ));
        }
    };
    renamed(record, new_name, Touched::SAVE)
}

pub fn rename_bank_entry(
    bank: &mut Bank,
    bank_index: usize,
    new_name: &str,
) -> Result<Change, CoreError> {
    let record = bank
        .elestrals
        .get_mut(bank_index)
        .ok_or_else(|| no_such_bank_entry(bank_index))?;
    renamed(record, new_name, Touched::BANK)
}

pub fn set_gender(player: &mut PlayerData, gender: Gender) -> Change {
    player.is_male_character = gender.is_male();
    Change {
        kind: ChangeKind::GenderSet(gender),
        touched: Touched::SAVE,
        summary: format!("gender set to {gender}"),
    }
}

fn renamed(
    record: &mut CreatureRecord,
    new_name: &str,
    touched: Touched,
) -> Result<Change, CoreError> {
    let old_name = record.name.clone();
    rename_record(record, new_name)?;
    Ok(Change {
        kind: ChangeKind::Renamed,
        touched,
        summary: format!("{old_name} renamed to {new_name}"),
    })
}

fn bank_entry(bank: &Bank, bank_index: usize) -> Result<&CreatureRecord, CoreError> {
    bank.elestrals
        .get(bank_index)
        .ok_or_else(|| no_such_bank_entry(bank_index))
}

fn no_such_bank_entry(bank_index: usize) -> CoreError {
    CoreError::rejected(
        Rejection::NoSuchBankEntry,
        format!("no Elestral at bank position {}", bank_index + 1),
    )
}

fn no_such_slot(slot: SlotRef) -> CoreError {
    CoreError::rejected(Rejection::NoSuchSlot, format!("{slot} does not exist"))
}
