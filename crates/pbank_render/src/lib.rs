use std::fmt::Write as _;

use pbank_core::core_api::{
    BankEntryView, CreatureView, PlayerView, Snapshot, StorageBoxView, TeamMemberView,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

const EMPTY_BANK_HINT: &str =
    "No Elestrals in bank. Export Elestrals from your team or storage to add them here.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SectionSelection {
    pub player: bool,
    pub team: bool,
    pub storage: bool,
    pub bank: bool,
}

impl SectionSelection {
    pub fn all() -> Self {
        Self {
            player: true,
            team: true,
            storage: true,
            bank: true,
        }
    }

    pub fn is_any_selected(&self) -> bool {
        self.player || self.team || self.storage || self.bank
    }

    /// An empty selection means "everything".
    pub fn or_all(self) -> Self {
        if self.is_any_selected() {
            self
        } else {
            Self::all()
        }
    }
}

pub fn render_text(snapshot: &Snapshot, sections: SectionSelection) -> String {
    let sections = sections.or_all();
    let mut blocks = Vec::new();
    if sections.player {
        blocks.push(render_player(&snapshot.player));
    }
    if sections.team {
        blocks.push(render_team(&snapshot.team));
    }
    if sections.storage {
        blocks.push(render_storage(&snapshot.storage));
    }
    if sections.bank {
        blocks.push(render_bank(&snapshot.bank, snapshot.bank_len));
    }
    blocks.join("\n")
}

pub fn render_player(player: &PlayerView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Player Info ===");
    let _ = writeln!(out, "Name: {}", player.name);
    let _ = writeln!(out, "Spirit Element: {}", player.spirit_element);
    let _ = writeln!(out, "Gender: {}", player.gender);
    let _ = writeln!(out, "Money: {}", player.money);
    let _ = writeln!(
        out,
        "SP: {}/{} | Bond Meter: {}",
        player.sp, player.max_sp, player.bond_meter
    );
    out
}

pub fn render_team(team: &[TeamMemberView]) -> String {
    let mut out = String::from("=== Team ===\n");
    if team.is_empty() {
        out.push_str("No Elestrals on the team.\n");
    }
    for member in team {
        out.push_str(&render_creature_card(
            &format!("[team:{}]", member.slot),
            &member.creature,
        ));
    }
    out
}

pub fn render_storage(boxes: &[StorageBoxView]) -> String {
    let mut out = String::from("=== Storage ===\n");
    for storage_box in boxes {
        let _ = writeln!(
            out,
            "--- Storage Box {} - {}/{} Elestrals ---",
            storage_box.number,
            storage_box.entries.len(),
            storage_box.capacity
        );
        for entry in &storage_box.entries {
            out.push_str(&render_creature_card(
                &format!("[box:{}:{}]", storage_box.number, entry.entry),
                &entry.creature,
            ));
        }
    }
    out
}

pub fn render_bank(bank: &[BankEntryView], bank_len: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Elestral Bank - {} Elestrals ===", bank_len);
    if bank.is_empty() {
        let _ = writeln!(out, "{EMPTY_BANK_HINT}");
    }
    for entry in bank {
        out.push_str(&render_creature_card(
            &format!("[bank:{}]", entry.index),
            &entry.creature,
        ));
    }
    out
}

/// Four-line card: name, identity/typing, stats, abilities.
pub fn render_creature_card(label: &str, creature: &CreatureView) -> String {
    let stellar = if creature.stellar { " (Stellar)" } else { "" };
    let [a0, a1, a2, a3] = &creature.abilities;
    let mut out = String::new();
    let _ = writeln!(out, "{label} {}", creature.name);
    let _ = writeln!(
        out,
        "    {}{} | {}/{} | Lvl {} | HP {}/{}",
        creature.species,
        stellar,
        creature.element,
        creature.sub_element,
        creature.level,
        creature.health,
        creature.max_health
    );
    let _ = writeln!(
        out,
        "    Atk {}/{} | Def {}/{} | Spd {}",
        creature.physical_attack,
        creature.special_attack,
        creature.physical_defense,
        creature.special_defense,
        creature.speed
    );
    let _ = writeln!(
        out,
        "    {a0}, {a1}, {a2}, {a3} | Emp: {}",
        creature.empowered_ability
    );
    out
}

pub fn render_json(snapshot: &Snapshot, sections: SectionSelection) -> JsonValue {
    let sections = sections.or_all();
    let mut out = JsonMap::new();

    if sections.player {
        out.insert("player".to_string(), player_to_json(snapshot));
    }
    if sections.team {
        out.insert(
            "team".to_string(),
            JsonValue::Array(
                snapshot
                    .team
                    .iter()
                    .map(|m| {
                        let mut value = creature_to_json(&m.creature);
                        value.insert("slot".to_string(), JsonValue::from(m.slot));
                        JsonValue::Object(value)
                    })
                    .collect(),
            ),
        );
    }
    if sections.storage {
        out.insert("storage".to_string(), storage_to_json(&snapshot.storage));
    }
    if sections.bank {
        out.insert(
            "bank".to_string(),
            JsonValue::Array(
                snapshot
                    .bank
                    .iter()
                    .map(|e| {
                        let mut value = creature_to_json(&e.creature);
                        value.insert("index".to_string(), JsonValue::from(e.index));
                        JsonValue::Object(value)
                    })
                    .collect(),
            ),
        );
    }

    JsonValue::Object(out)
}

fn player_to_json(snapshot: &Snapshot) -> JsonValue {
    let player = &snapshot.player;
    let mut m = JsonMap::new();
    m.insert("name".to_string(), JsonValue::String(player.name.clone()));
    m.insert(
        "spirit_element".to_string(),
        JsonValue::String(player.spirit_element.to_string()),
    );
    m.insert(
        "gender".to_string(),
        JsonValue::String(player.gender.to_string()),
    );
    m.insert("money".to_string(), JsonValue::from(player.money));
    m.insert("sp".to_string(), JsonValue::from(player.sp));
    m.insert("max_sp".to_string(), JsonValue::from(player.max_sp));
    m.insert("bond_meter".to_string(), JsonValue::from(player.bond_meter));
    m.insert("scene".to_string(), JsonValue::String(snapshot.scene.clone()));
    m.insert(
        "save_version".to_string(),
        JsonValue::String(snapshot.save_version.clone()),
    );
    m.insert(
        "save_timestamp".to_string(),
        JsonValue::String(snapshot.save_timestamp.clone()),
    );
    JsonValue::Object(m)
}

fn storage_to_json(boxes: &[StorageBoxView]) -> JsonValue {
    JsonValue::Array(
        boxes
            .iter()
            .map(|storage_box| {
                let mut m = JsonMap::new();
                m.insert("box".to_string(), JsonValue::from(storage_box.number));
                m.insert(
                    "capacity".to_string(),
                    JsonValue::from(storage_box.capacity),
                );
                m.insert(
                    "entries".to_string(),
                    JsonValue::Array(
                        storage_box
                            .entries
                            .iter()
                            .map(|entry| {
                                let mut value = creature_to_json(&entry.creature);
                                value.insert("entry".to_string(), JsonValue::from(entry.entry));
                                JsonValue::Object(value)
                            })
                            .collect(),
                    ),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn creature_to_json(c: &CreatureView) -> JsonMap<String, JsonValue> {
    let mut m = JsonMap::new();
    m.insert("name".to_string(), JsonValue::String(c.name.clone()));
    m.insert("species".to_string(), JsonValue::String(c.species.clone()));
    m.insert("stellar".to_string(), JsonValue::Bool(c.stellar));
    m.insert(
        "element".to_string(),
        JsonValue::String(c.element.to_string()),
    );
    m.insert(
        "sub_element".to_string(),
        JsonValue::String(c.sub_element.to_string()),
    );
    m.insert("level".to_string(), JsonValue::from(c.level));
    m.insert("health".to_string(), JsonValue::from(c.health));
    m.insert("max_health".to_string(), JsonValue::from(c.max_health));
    m.insert(
        "physical_attack".to_string(),
        JsonValue::from(c.physical_attack),
    );
    m.insert(
        "special_attack".to_string(),
        JsonValue::from(c.special_attack),
    );
    m.insert(
        "physical_defense".to_string(),
        JsonValue::from(c.physical_defense),
    );
    m.insert(
        "special_defense".to_string(),
        JsonValue::from(c.special_defense),
    );
    m.insert("speed".to_string(), JsonValue::from(c.speed));
    m.insert(
        "abilities".to_string(),
        JsonValue::Array(
            c.abilities
                .iter()
                .map(|a| JsonValue::String(a.clone()))
                .collect(),
        ),
    );
    m.insert(
        "empowered_ability".to_string(),
        JsonValue::String(c.empowered_ability.clone()),
    );
    m
}
