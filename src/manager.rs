//! Profile manager: one CLI intent per invocation, atomic against the store.
//!
//! The manager loads (or bootstraps) the per-model store, runs exactly one
//! transition, and persists before returning from every mutating intent.
//! There is no persistent in-between state: the process is `Idle` before and
//! after each operation.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::device::DeviceHandle;
use crate::error::{GmpmError, Result};
use crate::gateway::CommandGateway;
use crate::profile::{Profile, ProfileSource, apply};
use crate::store::{self, DEFAULT_PROFILE, StoreState};

/// Result of a `cycle` intent.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The next profile was applied and is now active.
    Applied { from: String, to: String },
    /// Fewer than two profiles exist; nothing was applied or persisted.
    TooFew {
        count: usize,
        /// The sole profile name, when exactly one exists. The user may have
        /// deleted `default`, so whatever name is there gets reported.
        sole: Option<String>,
    },
}

/// Orchestrates store, reader and applier for a single connected mouse.
pub struct Manager<'g> {
    gateway: &'g dyn CommandGateway,
    handle: DeviceHandle,
    store_file: PathBuf,
    state: StoreState,
}

impl<'g> Manager<'g> {
    /// Load the model's store, bootstrapping a live-captured `"default"`
    /// profile on first run (or after corruption).
    pub fn open(
        gateway: &'g dyn CommandGateway,
        handle: DeviceHandle,
        store_file: PathBuf,
    ) -> Result<Self> {
        let state = store::load_or_bootstrap(&store_file, || {
            info!(model = %handle.model, "Bootstrapping store from live device state");
            let snapshot = ProfileSource::Live(&handle).into_snapshot(gateway)?;
            Ok(Profile::new(DEFAULT_PROFILE.to_string(), snapshot))
        })?;

        Ok(Self {
            gateway,
            handle,
            store_file,
            state,
        })
    }

    /// The device this manager operates on.
    #[must_use]
    pub fn handle(&self) -> &DeviceHandle {
        &self.handle
    }

    /// Read-only view of the loaded store.
    #[must_use]
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Apply a stored profile to the mouse and mark it active.
    #[instrument(skip(self))]
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let profile = self.state.get(name).ok_or_else(|| self.not_found(name))?;
        apply::apply(self.gateway, &self.handle, &profile.snapshot)?;

        self.state.last_active_profile = name.to_string();
        self.persist()
    }

    /// Apply the profile after the active one in sorted name order.
    ///
    /// A stale or deleted active pointer restarts the cycle at the first
    /// sorted name rather than failing. With fewer than two profiles the
    /// intent is a no-op: no device commands, no store write.
    #[instrument(skip(self))]
    pub fn cycle(&mut self) -> Result<CycleOutcome> {
        if self.state.len() < 2 {
            let names = self.state.sorted_names();
            debug!(count = names.len(), "Cycle short-circuit");
            return Ok(CycleOutcome::TooFew {
                count: names.len(),
                sole: names.into_iter().next(),
            });
        }

        let names = self.state.sorted_names();
        let current = self.state.last_active_profile.clone();
        let next = names
            .iter()
            .position(|n| *n == current)
            .map_or_else(|| names[0].clone(), |idx| names[(idx + 1) % names.len()].clone());

        let profile = self
            .state
            .get(&next)
            .ok_or_else(|| self.not_found(&next))?;
        apply::apply(self.gateway, &self.handle, &profile.snapshot)?;

        self.state.last_active_profile.clone_from(&next);
        self.persist()?;

        Ok(CycleOutcome::Applied {
            from: current,
            to: next,
        })
    }

    /// Delete a stored profile.
    ///
    /// Deleting the active profile resets the pointer to the literal
    /// `"default"`, even when no profile of that name remains.
    #[instrument(skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.state.remove(name).is_none() {
            return Err(self.not_found(name));
        }
        if self.state.last_active_profile == name {
            self.state.last_active_profile = DEFAULT_PROFILE.to_string();
        }
        self.persist()
    }

    /// Stored profile names in display/cycling order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.state.sorted_names()
    }

    /// Capture the current mouse settings under a new name.
    ///
    /// The settings are already live on the device, so the new profile
    /// becomes the active one without an apply.
    #[instrument(skip(self))]
    pub fn create(&mut self, name: &str) -> Result<()> {
        if self.state.get(name).is_some() {
            return Err(GmpmError::ProfileExists {
                model: self.handle.model_display(),
                name: name.to_string(),
            });
        }

        let snapshot = ProfileSource::Live(&self.handle).into_snapshot(self.gateway)?;
        self.state.put(Profile::new(name.to_string(), snapshot));
        self.state.last_active_profile = name.to_string();
        self.persist()
    }

    /// Replace an existing profile's settings with the current mouse state.
    ///
    /// Never creates: updating an unknown name is a hard not-found.
    #[instrument(skip(self))]
    pub fn update(&mut self, name: &str) -> Result<()> {
        if self.state.get(name).is_none() {
            return Err(self.not_found(name));
        }

        let snapshot = ProfileSource::Live(&self.handle).into_snapshot(self.gateway)?;
        if let Some(profile) = self.state.profiles.get_mut(name) {
            profile.replace_snapshot(snapshot);
        }
        self.state.last_active_profile = name.to_string();
        self.persist()
    }

    /// Look up a profile for display.
    pub fn show(&self, name: &str) -> Result<&Profile> {
        self.state.get(name).ok_or_else(|| self.not_found(name))
    }

    fn persist(&self) -> Result<()> {
        store::save(&self.store_file, &self.state)
    }

    fn not_found(&self, name: &str) -> GmpmError {
        GmpmError::ProfileNotFound {
            model: self.handle.model_display(),
            name: name.to_string(),
        }
    }
}
