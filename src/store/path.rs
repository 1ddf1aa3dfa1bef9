//! Store location resolution.
//!
//! One JSON file per mouse model, under a data directory that tests and
//! scripts can redirect with an environment variable.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GmpmError, Result};

/// Environment override for the profile data directory.
pub const DATA_DIR_ENV: &str = "GMPM_DATA_DIR";

/// Resolve the directory holding the per-model store files.
///
/// `$GMPM_DATA_DIR` wins when set; otherwise the platform data dir
/// (`~/.local/share/gmpm` on Linux).
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        let dir = PathBuf::from(dir);
        debug!(dir = %dir.display(), "Using data dir from environment");
        return Ok(dir);
    }

    dirs::data_dir()
        .map(|d| d.join("gmpm"))
        .ok_or_else(|| GmpmError::Other("Could not determine data directory".to_string()))
}

/// Path of the store file for a mouse model inside `dir`.
#[must_use]
pub fn store_path_in(dir: &Path, model: &str) -> PathBuf {
    dir.join(format!("{model}.json"))
}

/// Path of the store file for a mouse model in the resolved data dir.
pub fn store_path(model: &str) -> Result<PathBuf> {
    Ok(store_path_in(&data_dir()?, model))
}
