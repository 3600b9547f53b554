use std::env;
use std::path::{Path, PathBuf};

/// Environment override for the store location.
pub const DATA_DIR_ENV: &str = "PALAVER_DATA_DIR";

pub const DB_FILE_NAME: &str = "history.db";

/// Directory holding the conversation database.
///
/// `$PALAVER_DATA_DIR` wins when set and non-empty; otherwise
/// `$HOME/.palaver`, falling back to the working directory when no home
/// directory is available.
#[must_use]
pub fn data_root() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    match env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => PathBuf::from(home).join(".palaver"),
        _ => PathBuf::from(".palaver"),
    }
}

#[must_use]
pub fn database_path(root: &Path) -> PathBuf {
    root.join(DB_FILE_NAME)
}
