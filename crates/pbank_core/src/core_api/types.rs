use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::gender::Gender;
use crate::model::{CreatureRecord, PlayerData};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureView {
    pub name: String,
    pub species: String,
    pub stellar: bool,
    pub element: Element,
    pub sub_element: Element,
    pub level: i32,
    pub health: i32,
    pub max_health: i32,
    pub physical_attack: i32,
    pub special_attack: i32,
    pub physical_defense: i32,
    pub special_defense: i32,
    pub speed: i32,
    pub abilities: [String; 4],
    pub empowered_ability: String,
}

impl CreatureView {
    pub fn from_record(record: &CreatureRecord) -> Self {
        Self {
            name: record.name.clone(),
            species: record.species.clone(),
            stellar: record.is_stellar,
            element: Element::from_code(record.element),
            sub_element: Element::from_code(record.sub_element),
            level: record.current_level,
            health: record.health,
            max_health: record.max_health,
            physical_attack: record.physical_attack,
            special_attack: record.special_attack,
            physical_defense: record.physical_defense,
            special_defense: record.special_defense,
            speed: record.speed,
            abilities: record.ability_names().map(str::to_string),
            empowered_ability: record.empowered_ability_name.clone(),
        }
    }
}

/// Slot numbers and indices in views are 1-based, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberView {
    pub slot: usize,
    pub creature: CreatureView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntryView {
    pub entry: usize,
    pub creature: CreatureView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBoxView {
    pub number: usize,
    pub capacity: usize,
    pub entries: Vec<StorageEntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntryView {
    pub index: usize,
    pub creature: CreatureView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub spirit_element: Element,
    pub gender: Gender,
    pub money: i64,
    pub sp: i32,
    pub max_sp: i32,
    pub bond_meter: i32,
}

impl PlayerView {
    pub fn from_player(player: &PlayerData) -> Self {
        Self {
            name: player.name.clone(),
            spirit_element: Element::from_code(player.spirit_element),
            gender: player.gender(),
            money: player.money,
            sp: player.current_sp,
            max_sp: player.max_sp,
            bond_meter: player.bond_meter,
        }
    }
}

/// Everything a front end needs to draw, derived from the current documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub scene: String,
    pub save_version: String,
    pub save_timestamp: String,
    pub player: PlayerView,
    pub team: Vec<TeamMemberView>,
    pub storage: Vec<StorageBoxView>,
    pub bank: Vec<BankEntryView>,
    pub bank_len: usize,
}
