use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{parse_document, read_document, to_pretty_json, write_bytes};
use crate::core_api::{CoreError, CoreErrorCode};
use crate::model::GameSave;

const WHAT: &str = "game save";

/// Loads the game save. Unlike the bank and settings documents, a missing
/// file is an error here.
pub fn load(path: impl AsRef<Path>) -> Result<GameSave, CoreError> {
    let path = path.as_ref();
    read_document(path, WHAT)?.ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::NotFound,
            format!("game save not found: {}", path.display()),
        )
    })
}

pub fn from_slice(bytes: &[u8]) -> Result<GameSave, CoreError> {
    parse_document(bytes, WHAT)
}

pub fn to_vec(doc: &GameSave) -> Result<Vec<u8>, CoreError> {
    to_pretty_json(doc, WHAT)
}

/// Writes the whole document back to `path`, first giving legacy saves the
/// SP baseline. The baseline stays applied on `doc`.
pub fn save(path: impl AsRef<Path>, doc: &mut GameSave) -> Result<(), CoreError> {
    let path = path.as_ref();
    if doc.player.apply_resource_baseline() {
        info!(
            path = %path.display(),
            max_sp = doc.player.max_sp,
            "initialized SP pool on legacy save"
        );
    }
    let bytes = to_vec(doc)?;
    write_bytes(path, &bytes, WHAT)
}

pub fn default_backup_name(date: NaiveDate) -> String {
    format!("awakened_backup_{}.json", date.format("%Y_%m_%d"))
}

/// Copies the save file verbatim to `dest`.
pub fn backup(save_path: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64, CoreError> {
    let save_path = save_path.as_ref();
    let dest = dest.as_ref();
    let bytes = fs::read(save_path).map_err(|e| read_error(save_path, e))?;
    write_bytes(dest, &bytes, "backup")?;
    info!(from = %save_path.display(), to = %dest.display(), "backed up save");
    Ok(bytes.len() as u64)
}

/// Replaces the save file with `source`. The source must parse as a game
/// save; otherwise the current save is left alone.
pub fn restore(
    source: impl AsRef<Path>,
    save_path: impl AsRef<Path>,
) -> Result<GameSave, CoreError> {
    let source = source.as_ref();
    let save_path = save_path.as_ref();
    let bytes = fs::read(source).map_err(|e| read_error(source, e))?;
    let doc = from_slice(&bytes).inspect_err(|e| {
        warn!(source = %source.display(), "refusing to restore: {}", e.message);
    })?;
    write_bytes(save_path, &bytes, WHAT)?;
    info!(from = %source.display(), to = %save_path.display(), "restored save");
    Ok(doc)
}

fn read_error(path: &Path, e: io::Error) -> CoreError {
    let code = if e.kind() == io::ErrorKind::NotFound {
        CoreErrorCode::NotFound
    } else {
        CoreErrorCode::Io
    };
    CoreError::new(code, format!("failed to read {}: {e}", path.display()))
}
