use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_path(name: &str) -> PathBuf {
    workspace_root().join("tests/fixtures").join(name)
}

struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    fn new(with_bank: bool) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::copy(fixture_path("gamesave.json"), dir.path().join("gamesave.json"))
            .expect("copy save fixture");
        if with_bank {
            fs::copy(fixture_path("bank.json"), dir.path().join("pbank_store.json"))
                .expect("copy bank fixture");
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pbank"));
        cmd.arg("--save")
            .arg(self.path("gamesave.json"))
            .arg("--bank-file")
            .arg(self.path("pbank_store.json"))
            .arg("--settings-file")
            .arg(self.path(".pbank.json"))
            .args(args)
            .current_dir(self.dir.path());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("failed to run pbank CLI")
    }

    fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to run pbank CLI");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("write answer");
        child.wait_with_output().expect("wait for pbank CLI")
    }

    fn json(&self, name: &str) -> Value {
        read_json(&self.path(name))
    }
}

fn read_json(path: &Path) -> Value {
    let bytes = fs::read(path).expect("read json");
    serde_json::from_slice(&bytes).expect("valid json")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn show_prints_requested_sections() {
    let scratch = Scratch::new(true);
    let output = scratch.run(&["show", "--team"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("=== Team ===\n[team:1] Sparky\n"));
    assert!(!text.contains("=== Player Info ==="));
    assert!(!text.contains("Frostbite"));
}

#[test]
fn show_json_is_parseable() {
    let scratch = Scratch::new(true);
    let output = scratch.run(&["show", "--json", "--player", "--bank"]);
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(value["player"]["name"], Value::from("Rowan"));
    assert_eq!(value["bank"][1]["name"], Value::from("Solstice"));
    assert!(value.get("team").is_none());
}

#[test]
fn export_then_import_copies_through_the_bank() {
    let scratch = Scratch::new(false);

    let output = scratch.run(&["export", "team:1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Sparky has been exported to the bank!");
    assert_eq!(scratch.json("pbank_store.json")["elestrals"][0]["name"], "Sparky");

    let output = scratch.run(&["import", "1"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "Sparky has been imported to Storage Box 1!"
    );
    let save = scratch.json("gamesave.json");
    assert_eq!(save["storageBoxes"][0]["entries"][1]["CharacterData"]["name"], "Sparky");
    assert_eq!(save["activePlayerData"]["Character0"]["name"], "Sparky");
    assert_eq!(save["playtimeSeconds"], Value::from(5123));
}

#[test]
fn export_of_empty_slot_fails_without_writing() {
    let scratch = Scratch::new(false);
    let before = fs::read(scratch.path("gamesave.json")).expect("read save");

    let output = scratch.run(&["export", "team:3"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
    assert!(!scratch.path("pbank_store.json").exists());
    assert_eq!(fs::read(scratch.path("gamesave.json")).expect("read save"), before);
}

#[test]
fn malformed_slot_is_a_usage_error() {
    let scratch = Scratch::new(true);
    let output = scratch.run(&["export", "team:9"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn release_with_yes_removes_entry() {
    let scratch = Scratch::new(true);

    let output = scratch.run(&["release", "1", "--yes"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Frostbite has been released.");
    let vault = scratch.json("pbank_store.json");
    assert_eq!(vault["elestrals"].as_array().map(Vec::len), Some(1));
    assert_eq!(vault["elestrals"][0]["name"], "Solstice");
}

#[test]
fn declined_release_keeps_entry() {
    let scratch = Scratch::new(true);
    let before = fs::read(scratch.path("pbank_store.json")).expect("read bank");

    let output = scratch.run_with_input(&["release", "2"], "n\n");

    assert!(output.status.success());
    assert!(stdout(&output).contains("Release cancelled."));
    assert_eq!(fs::read(scratch.path("pbank_store.json")).expect("read bank"), before);
}

#[test]
fn confirmed_release_from_prompt() {
    let scratch = Scratch::new(true);

    let output = scratch.run_with_input(&["release", "2"], "y\n");

    assert!(output.status.success());
    assert!(stdout(&output).contains("Solstice has been released."));
}

#[test]
fn rename_bank_entry_and_team_slot() {
    let scratch = Scratch::new(true);

    let output = scratch.run(&["rename", "bank:1", "Icicle"]);
    assert!(output.status.success());
    assert_eq!(scratch.json("pbank_store.json")["elestrals"][0]["name"], "Icicle");

    let output = scratch.run(&["rename", "box:2:2", "Breeze"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Gale renamed to Breeze");
    assert_eq!(
        scratch.json("gamesave.json")["storageBoxes"][1]["entries"][1]["CharacterData"]["name"],
        "Breeze"
    );
}

#[test]
fn set_gender_rewrites_flag() {
    let scratch = Scratch::new(false);

    let output = scratch.run(&["set-gender", "female"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "gender set to Female");
    assert_eq!(
        scratch.json("gamesave.json")["activePlayerData"]["isMaleCharacter"],
        Value::Bool(false)
    );
}

#[test]
fn backup_and_restore_roundtrip() {
    let scratch = Scratch::new(false);
    let original = fs::read(scratch.path("gamesave.json")).expect("read save");
    let backup = scratch.path("backup.json");
    let backup_arg = backup.to_string_lossy().to_string();

    let output = scratch.run(&["backup", &backup_arg]);
    assert!(output.status.success());
    assert_eq!(fs::read(&backup).expect("read backup"), original);

    let output = scratch.run(&["rename", "team:1", "Cinder"]);
    assert!(output.status.success());
    assert_ne!(fs::read(scratch.path("gamesave.json")).expect("read save"), original);

    let output = scratch.run(&["restore", &backup_arg, "--yes"]);
    assert!(output.status.success());
    assert_eq!(fs::read(scratch.path("gamesave.json")).expect("read save"), original);
}

#[test]
fn backup_into_directory_uses_dated_name() {
    let scratch = Scratch::new(false);
    let dir_arg = scratch.dir.path().to_string_lossy().to_string();

    let output = scratch.run(&["backup", &dir_arg]);
    assert!(output.status.success());

    let names: Vec<String> = fs::read_dir(scratch.dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("awakened_backup_") && name.ends_with(".json"))
        .collect();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].len(), "awakened_backup_YYYY_MM_DD.json".len());
}

#[test]
fn set_save_path_is_used_when_save_is_omitted() {
    let scratch = Scratch::new(false);
    let save = fs::canonicalize(scratch.path("gamesave.json")).expect("canonical save path");

    let output = Command::new(env!("CARGO_BIN_EXE_pbank"))
        .arg("--bank-file")
        .arg(scratch.path("pbank_store.json"))
        .arg("--settings-file")
        .arg(scratch.path(".pbank.json"))
        .arg("set-save-path")
        .arg(&save)
        .output()
        .expect("failed to run pbank CLI");
    assert!(output.status.success());
    assert_eq!(
        scratch.json(".pbank.json")["customSavePath"],
        Value::from(save.to_string_lossy().to_string())
    );

    let output = Command::new(env!("CARGO_BIN_EXE_pbank"))
        .arg("--bank-file")
        .arg(scratch.path("pbank_store.json"))
        .arg("--settings-file")
        .arg(scratch.path(".pbank.json"))
        .arg("where")
        .output()
        .expect("failed to run pbank CLI");
    assert!(output.status.success());
    assert!(stdout(&output).contains(&format!("save={}", save.display())));
}

#[test]
fn relative_save_path_is_stored_absolute() {
    let scratch = Scratch::new(false);
    let elsewhere = tempfile::tempdir().expect("tempdir");
    let save = fs::canonicalize(scratch.path("gamesave.json")).expect("canonical save path");

    let output = Command::new(env!("CARGO_BIN_EXE_pbank"))
        .arg("--bank-file")
        .arg(scratch.path("pbank_store.json"))
        .arg("--settings-file")
        .arg(scratch.path(".pbank.json"))
        .args(["set-save-path", "gamesave.json"])
        .current_dir(scratch.dir.path())
        .output()
        .expect("failed to run pbank CLI");
    assert!(output.status.success());
    assert_eq!(
        scratch.json(".pbank.json")["customSavePath"],
        Value::from(save.to_string_lossy().to_string())
    );

    let output = Command::new(env!("CARGO_BIN_EXE_pbank"))
        .arg("--bank-file")
        .arg(scratch.path("pbank_store.json"))
        .arg("--settings-file")
        .arg(scratch.path(".pbank.json"))
        .arg("where")
        .current_dir(elsewhere.path())
        .output()
        .expect("failed to run pbank CLI");
    assert!(output.status.success());
    assert!(stdout(&output).contains(&format!("save={}", save.display())));
}

#[test]
fn set_save_path_rejects_malformed_saves() {
    let scratch = Scratch::new(false);
    let broken = fixture_path("malformed_gamesave.json");
    let broken_arg = broken.to_string_lossy().to_string();

    let output = scratch.run(&["set-save-path", &broken_arg]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!scratch.path(".pbank.json").exists());
}

#[cfg(unix)]
#[test]
fn launch_waits_for_game_exit() {
    let scratch = Scratch::new(false);

    let output = scratch.run(&["launch", "/bin/true"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Game exited"));
}

#[test]
fn launch_of_missing_executable_fails() {
    let scratch = Scratch::new(false);
    let missing = scratch.path("ElestralsAwakened.exe");
    let missing_arg = missing.to_string_lossy().to_string();

    let output = scratch.run(&["launch", &missing_arg]);

    assert_eq!(output.status.code(), Some(1));
}
