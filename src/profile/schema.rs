//! Snapshot and profile data types for persistence.
//!
//! These types define the structure of the per-model store file: a profile
//! name plus the captured device settings, in the JSON shape the store
//! serializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GmpmError, Result};

/// A captured set of mouse settings at one point in time.
///
/// Immutable once captured: `update` replaces the whole snapshot rather than
/// editing fields in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Polling rate in Hz.
    pub report_rate: u32,
    /// DPI per resolution slot; index is the device slot number and 0 marks
    /// an inactive slot.
    pub resolutions: Vec<u32>,
    /// Index into `resolutions` of the device's default slot.
    pub default_resolution: usize,
    /// One action token per physical button: a raw button function
    /// (`button 2`) or a macro token sequence (`+KEY_F13 -KEY_F13 t300`).
    pub buttons: Vec<String>,
    /// Per-LED configuration in slot order.
    pub leds: Vec<Led>,
}

impl Snapshot {
    /// DPI of the default resolution slot, bounds-checked.
    ///
    /// The index can only go stale through external edits to the store file,
    /// but an out-of-range apply must fail before any command is issued.
    pub fn default_dpi(&self) -> Result<u32> {
        self.resolutions
            .get(self.default_resolution)
            .copied()
            .ok_or(GmpmError::InvalidDefaultResolution {
                index: self.default_resolution,
                slots: self.resolutions.len(),
            })
    }
}

/// Configuration of a single LED slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    /// Lighting mode.
    pub mode: LedMode,
    /// 6-hex-digit color, when the mode carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Effect duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Brightness 0-255; `ratbagctl` omits it for some devices, which means
    /// maximum.
    #[serde(default = "max_brightness")]
    pub brightness: u8,
}

const fn max_brightness() -> u8 {
    255
}

/// LED lighting mode tokens as `ratbagctl` prints and accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    On,
    Off,
    Cycle,
    Breathing,
}

impl LedMode {
    /// The token `ratbagctl` uses for this mode.
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Cycle => "cycle",
            Self::Breathing => "breathing",
        }
    }

    /// Parse a mode token from device output.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            "cycle" => Some(Self::Cycle),
            "breathing" => Some(Self::Breathing),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A named, persisted snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name within a device model's store.
    pub name: String,
    /// When the profile was first created.
    pub created_at: DateTime<Utc>,
    /// When the profile's snapshot was last replaced.
    pub updated_at: DateTime<Utc>,
    /// The captured settings.
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

impl Profile {
    /// Create a new profile around a freshly captured snapshot.
    #[must_use]
    pub fn new(name: String, snapshot: Snapshot) -> Self {
        let now = Utc::now();
        Self {
            name,
            created_at: now,
            updated_at: now,
            snapshot,
        }
    }

    /// Replace the payload with a newer capture, keeping the creation time.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.updated_at = Utc::now();
    }
}
