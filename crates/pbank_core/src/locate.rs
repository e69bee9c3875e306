//! Where the documents and the game live on disk.

use std::env;
use std::path::{Path, PathBuf};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::model::Settings;
use crate::store;

const GAME_DIR: [&str; 3] = ["LocalLow", "DefaultCompany", "ElestralsAwakened-Playtest"];
const SAVE_FILE_NAME: &str = "gamesave.json";

/// Resolves the installed game executable, if one can be found.
pub trait GamePathResolver {
    fn resolve(&self) -> Option<PathBuf>;
}

/// A user-supplied executable path, accepted only if it exists.
#[derive(Debug, Clone, Default)]
pub struct CustomGamePath(pub Option<PathBuf>);

impl GamePathResolver for CustomGamePath {
    fn resolve(&self) -> Option<PathBuf> {
        self.0.as_ref().filter(|path| path.exists()).cloned()
    }
}

/// Directory of the running executable; the bank and settings files live
/// next to it.
pub fn tool_dir() -> Result<PathBuf, CoreError> {
    let exe = env::current_exe().map_err(|e| {
        CoreError::new(
            CoreErrorCode::Io,
            format!("failed to locate the running executable: {e}"),
        )
    })?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

pub fn bank_path(tool_dir: &Path) -> PathBuf {
    tool_dir.join(store::bank::FILE_NAME)
}

pub fn settings_path(tool_dir: &Path) -> PathBuf {
    tool_dir.join(store::settings::FILE_NAME)
}

/// The save to open when the user has not picked one: the custom path from
/// the settings if it exists, otherwise the platform default if it exists.
pub fn default_save_path(settings: &Settings) -> Option<PathBuf> {
    if let Some(custom) = settings.custom_save_path() {
        let custom = PathBuf::from(custom);
        if custom.exists() {
            return Some(custom);
        }
    }

    let home = dirs::home_dir()?;
    platform_save_path(&home).filter(|path| path.exists())
}

/// Platform save location under `home`, without checking that it exists.
pub fn platform_save_path(home: &Path) -> Option<PathBuf> {
    let app_data = if cfg!(target_os = "windows") {
        home.join("AppData")
    } else if cfg!(target_os = "macos") {
        home.join("Library/Application Support/CrossOver/Bottles/Steam")
            .join("drive_c/users/crossover/AppData")
    } else {
        return None;
    };
    Some(GAME_DIR.iter().fold(app_data, |path, part| path.join(part)).join(SAVE_FILE_NAME))
}
