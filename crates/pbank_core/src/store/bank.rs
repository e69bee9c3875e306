use std::path::Path;

use tracing::debug;

use super::{read_document, write_document};
use crate::core_api::CoreError;
use crate::model::Bank;

pub const FILE_NAME: &str = "pbank_store.json";

const WHAT: &str = "bank";

/// Loads the bank vault; a missing file is an empty vault.
pub fn load(path: impl AsRef<Path>) -> Result<Bank, CoreError> {
    let path = path.as_ref();
    match read_document(path, WHAT)? {
        Some(bank) => Ok(bank),
        None => {
            debug!(path = %path.display(), "no bank file yet, starting empty");
            Ok(Bank::default())
        }
    }
}

pub fn save(path: impl AsRef<Path>, bank: &Bank) -> Result<(), CoreError> {
    write_document(path.as_ref(), bank, WHAT)
}
