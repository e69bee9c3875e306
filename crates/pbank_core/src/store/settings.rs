use std::path::Path;

use super::{read_document, write_document};
use crate::core_api::CoreError;
use crate::model::Settings;

pub const FILE_NAME: &str = ".pbank.json";

const WHAT: &str = "settings";

pub fn load(path: impl AsRef<Path>) -> Result<Settings, CoreError> {
    Ok(read_document(path.as_ref(), WHAT)?.unwrap_or_default())
}

pub fn save(path: impl AsRef<Path>, settings: &Settings) -> Result<(), CoreError> {
    write_document(path.as_ref(), settings, WHAT)
}
