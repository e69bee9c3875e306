use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use pbank_core::core_api::CoreErrorCode;
use pbank_core::model::{Bank, Settings};
use pbank_core::store::{bank, game, settings};
use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_path(name: &str) -> PathBuf {
    workspace_root().join("tests/fixtures").join(name)
}

fn copy_fixture(name: &str, dir: &tempfile::TempDir) -> PathBuf {
    let dest = dir.path().join(name);
    fs::copy(fixture_path(name), &dest).expect("failed to copy fixture");
    dest
}

fn read_json(path: &PathBuf) -> Value {
    let bytes = fs::read(path).expect("failed to read json");
    serde_json::from_slice(&bytes).expect("file should hold valid json")
}

#[test]
fn game_save_roundtrips_without_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture("gamesave.json", &dir);

    let mut doc = game::load(&path).expect("failed to load fixture");
    let loaded = doc.clone();
    game::save(&path, &mut doc).expect("failed to save");
    let reloaded = game::load(&path).expect("failed to reload");

    assert_eq!(doc, loaded);
    assert_eq!(reloaded, loaded);
    assert_eq!(read_json(&path), read_json(&fixture_path("gamesave.json")));
}

#[test]
fn game_save_keeps_fields_it_does_not_model() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture("gamesave.json", &dir);

    let mut doc = game::load(&path).expect("failed to load fixture");
    assert_eq!(doc.extra.get("playtimeSeconds"), Some(&Value::from(5123)));
    game::save(&path, &mut doc).expect("failed to save");

    let written = read_json(&path);
    assert_eq!(written["playtimeSeconds"], Value::from(5123));
    assert_eq!(
        written["activePlayerData"]["Character0"]["CombatPos"]["z"],
        Value::from(-3.25)
    );
    assert_eq!(
        written["activePlayerData"]["Character1"]["statStages"]["physicalDefense"],
        Value::from(-1)
    );
    assert!(written["activePlayerData"]["Character2"].is_null());
}

#[test]
fn game_save_is_written_with_four_space_indent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture("gamesave.json", &dir);

    let mut doc = game::load(&path).expect("failed to load fixture");
    game::save(&path, &mut doc).expect("failed to save");

    let text = fs::read_to_string(&path).expect("read");
    assert!(text.starts_with("{\n    \"activePlayerData\": {\n        \"Name\": \"Rowan\""));
}

#[test]
fn legacy_save_gets_sp_baseline_on_first_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture("legacy_gamesave.json", &dir);

    let mut doc = game::load(&path).expect("failed to load legacy fixture");
    assert_eq!(doc.player.max_sp, 0);
    game::save(&path, &mut doc).expect("failed to save");

    assert_eq!(doc.player.max_sp, 100);
    assert_eq!(doc.player.current_sp, 100);
    assert_eq!(doc.player.bond_meter, 3);

    let reloaded = game::load(&path).expect("failed to reload");
    assert_eq!(reloaded, doc);
    let mut expected = read_json(&fixture_path("legacy_gamesave.json"));
    expected["activePlayerData"]["MaxCasterSP"] = Value::from(100);
    expected["activePlayerData"]["CasterSP"] = Value::from(100);
    expected["activePlayerData"]["BondMeter"] = Value::from(3);
    assert_eq!(read_json(&path), expected);
}

#[test]
fn existing_sp_pool_is_left_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture("gamesave.json", &dir);

    let mut doc = game::load(&path).expect("failed to load fixture");
    game::save(&path, &mut doc).expect("failed to save");

    assert_eq!(doc.player.max_sp, 120);
    assert_eq!(doc.player.current_sp, 80);
    assert_eq!(doc.player.bond_meter, 2);
}

#[test]
fn missing_game_save_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = game::load(dir.path().join("gamesave.json")).expect_err("missing save");
    assert_eq!(err.code, CoreErrorCode::NotFound);
}

#[test]
fn malformed_game_save_is_a_parse_error() {
    let err = game::load(fixture_path("malformed_gamesave.json")).expect_err("malformed save");
    assert_eq!(err.code, CoreErrorCode::Parse);

    let err = game::from_slice(br#"{"storageBoxes": "nope"}"#).expect_err("wrong type");
    assert_eq!(err.code, CoreErrorCode::Parse);
}

#[test]
fn null_lists_load_as_empty() {
    let doc = game::from_slice(br#"{"storageBoxes": null, "gameFlags": null}"#)
        .expect("null lists should load");
    assert!(doc.storage_boxes.is_empty());
    assert!(doc.game_flags.is_empty());
}

#[test]
fn missing_bank_and_settings_load_as_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");

    let vault = bank::load(dir.path().join(bank::FILE_NAME)).expect("missing bank is fine");
    assert_eq!(vault, Bank::default());
    let prefs =
        settings::load(dir.path().join(settings::FILE_NAME)).expect("missing settings is fine");
    assert_eq!(prefs, Settings::default());
    assert_eq!(prefs.custom_save_path(), None);
}

#[test]
fn bank_roundtrips_without_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture("bank.json", &dir);

    let vault = bank::load(&path).expect("failed to load bank");
    assert_eq!(vault.len(), 2);
    bank::save(&path, &vault).expect("failed to save bank");

    assert_eq!(bank::load(&path).expect("reload"), vault);
    assert_eq!(read_json(&path), read_json(&fixture_path("bank.json")));
}

#[test]
fn empty_bank_is_written_as_empty_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(bank::FILE_NAME);

    bank::save(&path, &Bank::default()).expect("save");

    assert_eq!(read_json(&path), serde_json::json!({ "elestrals": [] }));
}

#[test]
fn settings_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(settings::FILE_NAME);
    let prefs = Settings {
        custom_save_path: "/games/elestrals/gamesave.json".to_string(),
    };

    settings::save(&path, &prefs).expect("save");
    let loaded = settings::load(&path).expect("load");

    assert_eq!(loaded, prefs);
    assert_eq!(
        read_json(&path),
        serde_json::json!({ "customSavePath": "/games/elestrals/gamesave.json" })
    );
}

#[test]
fn malformed_bank_and_settings_are_parse_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bank_path = dir.path().join(bank::FILE_NAME);
    let settings_path = dir.path().join(settings::FILE_NAME);
    fs::write(&bank_path, "{ not json").expect("seed bank");
    fs::write(&settings_path, "[1, 2").expect("seed settings");

    assert_eq!(bank::load(&bank_path).expect_err("bank").code, CoreErrorCode::Parse);
    assert_eq!(
        settings::load(&settings_path).expect_err("settings").code,
        CoreErrorCode::Parse
    );
}

#[test]
fn backup_copies_save_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let save_path = copy_fixture("gamesave.json", &dir);
    let name = game::default_backup_name(NaiveDate::from_ymd_opt(2025, 3, 7).expect("date"));
    assert_eq!(name, "awakened_backup_2025_03_07.json");
    let dest = dir.path().join(name);

    let written = game::backup(&save_path, &dest).expect("backup");

    let original = fs::read(&save_path).expect("read save");
    assert_eq!(written, original.len() as u64);
    assert_eq!(fs::read(&dest).expect("read backup"), original);
}

#[test]
fn restore_replaces_save_only_with_valid_documents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let save_path = copy_fixture("gamesave.json", &dir);
    let legacy = copy_fixture("legacy_gamesave.json", &dir);
    let broken = copy_fixture("malformed_gamesave.json", &dir);
    let before = fs::read(&save_path).expect("read save");

    let err = game::restore(&broken, &save_path).expect_err("malformed source");
    assert_eq!(err.code, CoreErrorCode::Parse);
    assert_eq!(fs::read(&save_path).expect("read save"), before);

    let restored = game::restore(&legacy, &save_path).expect("restore");
    assert_eq!(restored.player.max_sp, 0);
    assert_eq!(
        fs::read(&save_path).expect("read save"),
        fs::read(&legacy).expect("read legacy")
    );
}
