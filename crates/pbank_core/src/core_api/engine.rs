use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::gender::Gender;
use crate::model::{Bank, GameSave, SlotRef};
use crate::store;
use crate::transfer::{self, Change, Touched};

use super::error::CoreError;
use super::types::{
    BankEntryView, CreatureView, PlayerView, Snapshot, StorageBoxView, StorageEntryView,
    TeamMemberView,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// An open game save paired with the bank vault. Each document remembers the
/// path it is written back to.
#[derive(Debug)]
pub struct Session {
    save_path: PathBuf,
    save: GameSave,
    bank_path: PathBuf,
    bank: Bank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameTarget {
    Slot(SlotRef),
    Bank(usize),
}

/// A user action. Bank positions are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Rename { target: RenameTarget, name: String },
    Export(SlotRef),
    Import(usize),
    Release(usize),
    SetGender(Gender),
}

#[derive(Debug, Clone)]
pub struct Applied {
    pub change: Change,
    pub snapshot: Snapshot,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Loads the save at `save_path` and the bank at `bank_path`. A missing
    /// bank starts empty; a missing or malformed save is an error.
    pub fn open(
        &self,
        save_path: impl Into<PathBuf>,
        bank_path: impl Into<PathBuf>,
    ) -> Result<Session, CoreError> {
        let save_path = save_path.into();
        let bank_path = bank_path.into();
        let save = store::game::load(&save_path)?;
        let bank = store::bank::load(&bank_path)?;
        info!(
            save = %save_path.display(),
            bank = %bank_path.display(),
            bank_len = bank.len(),
            "opened session"
        );
        Ok(self.open_documents(save_path, save, bank_path, bank))
    }

    pub fn open_documents(
        &self,
        save_path: impl Into<PathBuf>,
        save: GameSave,
        bank_path: impl Into<PathBuf>,
        bank: Bank,
    ) -> Session {
        Session {
            save_path: save_path.into(),
            save,
            bank_path: bank_path.into(),
            bank,
        }
    }
}

impl Session {
    pub fn save(&self) -> &GameSave {
        &self.save
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn bank_path(&self) -> &Path {
        &self.bank_path
    }

    /// Runs one transfer operation, writes back every document it touched
    /// and returns a view rebuilt from the new state.
    ///
    /// A rejected operation leaves both documents untouched. If the write
    /// fails the in-memory change is kept and the error is returned.
    pub fn apply(&mut self, intent: Intent) -> Result<Applied, CoreError> {
        debug!(?intent, "applying intent");
        let change = match intent {
            Intent::Rename {
                target: RenameTarget::Slot(slot),
                name,
            } => transfer::rename_slot(&mut self.save, slot, &name)?,
            Intent::Rename {
                target: RenameTarget::Bank(index),
                name,
            } => transfer::rename_bank_entry(&mut self.bank, index, &name)?,
            Intent::Export(slot) => transfer::export_to_bank(&self.save, &mut self.bank, slot)?,
            Intent::Import(index) => transfer::import_from_bank(&mut self.save, &self.bank, index)?,
            Intent::Release(index) => transfer::release_from_bank(&mut self.bank, index)?,
            Intent::SetGender(gender) => transfer::set_gender(&mut self.save.player, gender),
        };

        self.persist(change.touched)?;
        info!(summary = %change.summary, "applied change");
        Ok(Applied {
            change,
            snapshot: self.snapshot(),
        })
    }

    /// Writes the touched documents, game save first.
    pub fn persist(&mut self, touched: Touched) -> Result<(), CoreError> {
        if touched.save {
            store::game::save(&self.save_path, &mut self.save)?;
        }
        if touched.bank {
            store::bank::save(&self.bank_path, &self.bank).map_err(|e| {
                if touched.save {
                    CoreError::new(
                        e.code,
                        format!("game save was written but the bank was not: {}", e.message),
                    )
                } else {
                    e
                }
            })?;
        }
        Ok(())
    }

    /// Re-reads the game save from disk. On error the current document is
    /// kept as it was.
    pub fn reload(&mut self) -> Result<(), CoreError> {
        self.save = store::game::load(&self.save_path)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let player = &self.save.player;
        let team = (0..crate::model::TEAM_SIZE)
            .filter_map(|index| {
                let record = player.team_slot(index)?.as_ref()?;
                record.is_present().then(|| TeamMemberView {
                    slot: index + 1,
                    creature: CreatureView::from_record(record),
                })
            })
            .collect();

        let storage = self
            .save
            .storage_boxes
            .iter()
            .enumerate()
            .map(|(box_index, storage_box)| StorageBoxView {
                number: box_index + 1,
                capacity: storage_box.entries.len(),
                entries: storage_box
                    .entries
                    .iter()
                    .enumerate()
                    .filter_map(|(entry_index, entry)| {
                        let record = entry.character_data.as_ref()?;
                        record.is_present().then(|| StorageEntryView {
                            entry: entry_index + 1,
                            creature: CreatureView::from_record(record),
                        })
                    })
                    .collect(),
            })
            .collect();

        let bank = self
            .bank
            .elestrals
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_present())
            .map(|(index, record)| BankEntryView {
                index: index + 1,
                creature: CreatureView::from_record(record),
            })
            .collect();

        Snapshot {
            scene: self.save.current_scene_name.clone(),
            save_version: self.save.save_version.clone(),
            save_timestamp: self.save.save_timestamp.clone(),
            player: PlayerView::from_player(player),
            team,
            storage,
            bank,
            bank_len: self.bank.len(),
        }
    }
}
