//! Profile payloads: capture from the live mouse, apply back onto it.
//!
//! A [`Snapshot`] is a captured set of device settings (report rate, DPI
//! resolution slots, button assignments, LED configuration) at one point in
//! time; a [`Profile`] is a named, persisted snapshot. Snapshots are only
//! ever produced by [`capture`] against the connected mouse, never
//! hand-authored, and are replayed by [`apply`] as one deferred-commit
//! command batch.

pub mod apply;
pub mod capture;
mod schema;

pub use schema::{Led, LedMode, Profile, Snapshot};

use crate::device::DeviceHandle;
use crate::error::Result;
use crate::gateway::CommandGateway;

/// Where a profile's payload comes from.
///
/// Exactly two ways exist to obtain a snapshot, and the variant names them
/// instead of branching on an optional attribute bag.
pub enum ProfileSource<'a> {
    /// Capture the settings live from the connected mouse.
    Live(&'a DeviceHandle),
    /// Reuse an already-stored snapshot.
    Stored(Snapshot),
}

impl ProfileSource<'_> {
    /// Resolve the source into a concrete snapshot.
    pub fn into_snapshot(self, gateway: &dyn CommandGateway) -> Result<Snapshot> {
        match self {
            Self::Live(handle) => capture::capture(gateway, handle),
            Self::Stored(snapshot) => Ok(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;

    #[test]
    fn test_stored_source_passes_through_without_device_traffic() {
        let mock = MockGateway::new().with_rejecting_unmatched();
        let snapshot = Snapshot {
            report_rate: 500,
            resolutions: vec![800],
            default_resolution: 0,
            buttons: vec!["button 0".to_string()],
            leds: Vec::new(),
        };

        let resolved = ProfileSource::Stored(snapshot.clone())
            .into_snapshot(&mock)
            .unwrap();
        assert_eq!(resolved, snapshot);
        assert_eq!(mock.executed_count(), 0);
    }

    #[test]
    fn test_live_source_captures_from_the_device() {
        let mock = MockGateway::g403("test-mouse");
        let handle = DeviceHandle {
            alias: "test-mouse".to_string(),
            model: "g403".to_string(),
            button_count: 4,
        };

        let resolved = ProfileSource::Live(&handle).into_snapshot(&mock).unwrap();
        assert_eq!(resolved.report_rate, 1000);
        assert_eq!(resolved.resolutions, vec![400, 1600]);
    }
}
