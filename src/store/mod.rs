//! Durable per-model profile store.
//!
//! Each mouse model owns one JSON file mapping profile names to their
//! captured settings, plus the name of the last profile applied to the
//! device. The file is read and written whole; writes go through a
//! temporary file and an atomic rename so a crash mid-write leaves either
//! the old store or the new one, never a parseable truncation.
//!
//! ```text
//! ~/.local/share/gmpm/
//! ├── g403.json
//! └── gpro.json
//! ```

mod path;

pub use path::{DATA_DIR_ENV, data_dir, store_path, store_path_in};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GmpmError, Result};
use crate::profile::Profile;

/// Name of the profile every fresh store starts with. Deleting the active
/// profile also resets the pointer to this name, whether or not such a
/// profile still exists.
pub const DEFAULT_PROFILE: &str = "default";

/// Full persisted state for one mouse model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    /// Name of the profile most recently applied to the device. May point
    /// at a deleted profile; readers must treat a dangling name as absent.
    pub last_active_profile: String,
    /// Profiles keyed by name. `BTreeMap` keeps keys in the lexicographic
    /// order used for listing and cycling.
    pub profiles: BTreeMap<String, Profile>,
}

impl StoreState {
    /// Fresh state holding a single profile, set active.
    #[must_use]
    pub fn bootstrap(profile: Profile) -> Self {
        let mut profiles = BTreeMap::new();
        let name = profile.name.clone();
        profiles.insert(name.clone(), profile);
        Self {
            last_active_profile: name,
            profiles,
        }
    }

    /// Look up a profile by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Insert or overwrite a profile under its own name.
    pub fn put(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Remove a profile, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        self.profiles.remove(name)
    }

    /// Profile names in lexicographic order.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when every profile has been deleted. The manager must tolerate
    /// this, not crash on it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Load the store for a model, bootstrapping on first run.
///
/// A missing, empty, or unparseable file is replaced by a fresh state built
/// from `bootstrap()` (a live capture of a `"default"` profile) and
/// persisted immediately. A valid file is returned as-is; re-running never
/// re-bootstraps or touches the active pointer.
pub fn load_or_bootstrap(
    store_file: &Path,
    bootstrap: impl FnOnce() -> Result<Profile>,
) -> Result<StoreState> {
    match std::fs::read_to_string(store_file) {
        Ok(contents) => match serde_json::from_str::<StoreState>(&contents) {
            Ok(state) => {
                debug!(
                    path = %store_file.display(),
                    profiles = state.len(),
                    "Loaded profile store"
                );
                Ok(state)
            }
            Err(e) => {
                warn!(
                    path = %store_file.display(),
                    error = %e,
                    "Store file is corrupt; re-bootstrapping from the device"
                );
                bootstrap_and_save(store_file, bootstrap)
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(
                path = %store_file.display(),
                "No store file; bootstrapping from the device"
            );
            bootstrap_and_save(store_file, bootstrap)
        }
        Err(e) => Err(e.into()),
    }
}

fn bootstrap_and_save(
    store_file: &Path,
    bootstrap: impl FnOnce() -> Result<Profile>,
) -> Result<StoreState> {
    let state = StoreState::bootstrap(bootstrap()?);
    save(store_file, &state)?;
    Ok(state)
}

/// Persist the full store state, atomically replacing the previous file.
///
/// The serialized JSON lands in a temp file in the destination directory
/// first and is renamed over the target, so readers only ever observe a
/// complete store.
pub fn save(store_file: &Path, state: &StoreState) -> Result<()> {
    let dir = store_file.parent().ok_or_else(|| GmpmError::Store {
        path: store_file.display().to_string(),
        reason: "store path has no parent directory".to_string(),
    })?;
    std::fs::create_dir_all(dir)?;

    let mut contents = serde_json::to_string_pretty(state).map_err(|e| GmpmError::Store {
        path: store_file.display().to_string(),
        reason: e.to_string(),
    })?;
    contents.push('\n');

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::fs::write(tmp.path(), &contents)?;
    tmp.persist(store_file).map_err(|e| GmpmError::Store {
        path: store_file.display().to_string(),
        reason: e.to_string(),
    })?;

    debug!(path = %store_file.display(), profiles = state.len(), "Saved profile store");
    Ok(())
}
