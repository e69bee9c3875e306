//! Document schema for the game save, the bank vault and the tool settings.
//!
//! Field names follow the JSON written by the game and must not change. Every
//! struct carries an `extra` map so members this tool does not know about are
//! written back untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::gender::Gender;

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

pub const TEAM_SIZE: usize = 4;

pub const BASELINE_MAX_SP: i32 = 100;
pub const BASELINE_SP: i32 = 100;
pub const BASELINE_BOND_METER: i32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureId {
    #[serde(rename = "serializedVersion")]
    pub serialized_version: String,
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatStages {
    pub physical_attack: i32,
    pub astral_attack: i32,
    pub physical_defense: i32,
    pub astral_defense: i32,
    pub speed: i32,
    pub accuracy: i32,
    pub evasion: i32,
}

/// One Elestral. An empty `species` marks the record as an unused slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatureRecord {
    pub id: CreatureId,
    pub name: String,
    pub species: String,
    pub uses_stellar_material: bool,
    pub element: i32,
    pub sub_element: i32,
    pub health_base_stat: i32,
    pub physical_attack: i32,
    pub special_attack: i32,
    pub physical_defense: i32,
    pub special_defense: i32,
    pub speed: i32,
    #[serde(rename = "Ability0Name")]
    pub ability0_name: String,
    #[serde(rename = "Ability1Name")]
    pub ability1_name: String,
    #[serde(rename = "Ability2Name")]
    pub ability2_name: String,
    #[serde(rename = "Ability3Name")]
    pub ability3_name: String,
    pub empowered_ability_name: String,
    pub current_level: i32,
    pub health: i32,
    pub max_health: i32,
    pub is_active_in_combat: bool,
    pub is_dodge_enabled: bool,
    pub is_caster: bool,
    pub is_stellar: bool,
    pub team_slot: i32,
    pub ability_hit_index: i32,
    pub bond_meter: i32,
    #[serde(rename = "turnOrderUIIndex")]
    pub turn_order_ui_index: i32,
    pub selected_ability_index: i32,
    pub should_skip_turn: bool,
    pub last_dodge_time: f64,
    pub last_successful_dodge_time: f64,
    #[serde(rename = "CombatPos")]
    pub combat_pos: CombatPos,
    pub character_type: i32,
    pub stat_stages: StatStages,
    pub suppressed_slots: i32,
    pub slots_used_this_battle: i32,
    #[serde(rename = "IncomingDamageMultiplier")]
    pub incoming_damage_multiplier: f64,
    #[serde(rename = "OutgoingDamageMultiplier")]
    pub outgoing_damage_multiplier: f64,
    #[serde(rename = "MovesPerformedSinceLastSwap")]
    pub moves_performed_since_last_swap: i32,
    pub last_used_ability_slot: i32,
    pub has_used_empowered_ability: bool,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl CreatureRecord {
    pub fn is_present(&self) -> bool {
        !self.species.is_empty()
    }

    pub fn ability_names(&self) -> [&str; 4] {
        [
            &self.ability0_name,
            &self.ability1_name,
            &self.ability2_name,
            &self.ability3_name,
        ]
    }
}

/// A slot holds a creature only if it is non-null and has a species.
pub fn is_present(record: Option<&CreatureRecord>) -> bool {
    record.is_some_and(CreatureRecord::is_present)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SpiritElement")]
    pub spirit_element: i32,
    #[serde(rename = "isMaleCharacter")]
    pub is_male_character: bool,
    #[serde(rename = "Money")]
    pub money: i64,
    #[serde(rename = "FocusedSlot")]
    pub focused_slot: i32,
    #[serde(rename = "Character0")]
    pub character0: Option<CreatureRecord>,
    #[serde(rename = "Character1")]
    pub character1: Option<CreatureRecord>,
    #[serde(rename = "Character2")]
    pub character2: Option<CreatureRecord>,
    #[serde(rename = "Character3")]
    pub character3: Option<CreatureRecord>,
    #[serde(rename = "MaxCasterSP")]
    pub max_sp: i32,
    #[serde(rename = "CasterSP")]
    pub current_sp: i32,
    #[serde(rename = "BondMeter")]
    pub bond_meter: i32,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl PlayerData {
    pub fn gender(&self) -> Gender {
        Gender::from_is_male(self.is_male_character)
    }

    pub fn team_slot(&self, index: usize) -> Option<&Option<CreatureRecord>> {
        match index {
            0 => Some(&self.character0),
            1 => Some(&self.character1),
            2 => Some(&self.character2),
            3 => Some(&self.character3),
            _ => None,
        }
    }

    pub fn team_slot_mut(&mut self, index: usize) -> Option<&mut Option<CreatureRecord>> {
        match index {
            0 => Some(&mut self.character0),
            1 => Some(&mut self.character1),
            2 => Some(&mut self.character2),
            3 => Some(&mut self.character3),
            _ => None,
        }
    }

    /// Legacy saves carry no SP pool; give them the baseline before they are
    /// written. Returns whether anything changed.
    pub fn apply_resource_baseline(&mut self) -> bool {
        if self.max_sp != 0 {
            return false;
        }
        self.max_sp = BASELINE_MAX_SP;
        self.current_sp = BASELINE_SP;
        self.bond_meter = BASELINE_BOND_METER;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageEntry {
    #[serde(rename = "CharacterData")]
    pub character_data: Option<CreatureRecord>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl StorageEntry {
    pub fn is_present(&self) -> bool {
        is_present(self.character_data.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageBox {
    #[serde(deserialize_with = "null_as_default")]
    pub entries: Vec<StorageEntry>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveBoons {
    #[serde(rename = "ActiveBoonNames", deserialize_with = "null_as_default")]
    pub names: Vec<String>,
    #[serde(rename = "BoonUsageCounts", deserialize_with = "null_as_default")]
    pub usage_counts: Vec<i32>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSave {
    #[serde(rename = "activePlayerData")]
    pub player: PlayerData,
    #[serde(rename = "storageBoxes", deserialize_with = "null_as_default")]
    pub storage_boxes: Vec<StorageBox>,
    #[serde(rename = "gameFlags", deserialize_with = "null_as_default")]
    pub game_flags: Vec<String>,
    #[serde(rename = "activeBoons")]
    pub active_boons: ActiveBoons,
    #[serde(rename = "currentSceneName")]
    pub current_scene_name: String,
    #[serde(rename = "saveVersion")]
    pub save_version: String,
    #[serde(rename = "saveTimestamp")]
    pub save_timestamp: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl GameSave {
    /// Resolves a slot address. `None` means the address itself is out of
    /// range; `Some(&None)` is an existing but null slot.
    pub fn slot(&self, slot: SlotRef) -> Option<&Option<CreatureRecord>> {
        match slot {
            SlotRef::Team(index) => self.player.team_slot(index),
            SlotRef::Storage {
                box_index,
                entry_index,
            } => self
                .storage_boxes
                .get(box_index)?
                .entries
                .get(entry_index)
                .map(|entry| &entry.character_data),
        }
    }

    pub fn slot_mut(&mut self, slot: SlotRef) -> Option<&mut Option<CreatureRecord>> {
        match slot {
            SlotRef::Team(index) => self.player.team_slot_mut(index),
            SlotRef::Storage {
                box_index,
                entry_index,
            } => self
                .storage_boxes
                .get_mut(box_index)?
                .entries
                .get_mut(entry_index)
                .map(|entry| &mut entry.character_data),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bank {
    #[serde(deserialize_with = "null_as_default")]
    pub elestrals: Vec<CreatureRecord>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Bank {
    pub fn len(&self) -> usize {
        self.elestrals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elestrals.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "customSavePath")]
    pub custom_save_path: String,
}

impl Settings {
    pub fn custom_save_path(&self) -> Option<&str> {
        if self.custom_save_path.is_empty() {
            None
        } else {
            Some(&self.custom_save_path)
        }
    }
}

/// Positional address of a team or storage slot (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRef {
    Team(usize),
    Storage { box_index: usize, entry_index: usize },
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Team(index) => write!(f, "team slot {}", index + 1),
            Self::Storage {
                box_index,
                entry_index,
            } => write!(f, "storage box {} entry {}", box_index + 1, entry_index + 1),
        }
    }
}

// Saves written by older tools serialize empty lists as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
