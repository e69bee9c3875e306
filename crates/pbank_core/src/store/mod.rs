//! Load/save for the three JSON documents: the game save, the bank vault and
//! the tool settings.

pub mod atomic;
pub mod bank;
pub mod game;
pub mod settings;

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::core_api::{CoreError, CoreErrorCode};

const INDENT: &[u8] = b"    ";

/// Reads a document. A missing file is `Ok(None)`; the caller decides whether
/// that is an error.
fn read_document<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Option<T>, CoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {what} {}: {e}", path.display()),
            ));
        }
    };
    parse_document(&bytes, what).map(Some)
}

fn parse_document<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Parse,
            format!("failed to parse {what}: {e}"),
        )
    })
}

fn to_pretty_json<T: Serialize>(value: &T, what: &str) -> Result<Vec<u8>, CoreError> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Write,
            format!("failed to serialize {what}: {e}"),
        )
    })?;
    Ok(out)
}

fn write_document<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), CoreError> {
    let bytes = to_pretty_json(value, what)?;
    write_bytes(path, &bytes, what)
}

fn write_bytes(path: &Path, bytes: &[u8], what: &str) -> Result<(), CoreError> {
    atomic::write_atomic(path, bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Write,
            format!("failed to write {what} {}: {e}", path.display()),
        )
    })
}
