//! Shared fixtures for integration tests.
#![allow(dead_code)] // Each test crate uses a subset of these helpers.

use std::path::{Path, PathBuf};

use gmpm::device::DeviceHandle;
use gmpm::profile::{Led, LedMode, Profile, Snapshot};
use gmpm::store::{self, StoreState};

/// The alias the fake/mock ratbagctl reports.
pub const ALIAS: &str = "testing-mouse";

/// Handle matching the `MockGateway::g403` fixture.
pub fn g403_handle() -> DeviceHandle {
    DeviceHandle {
        alias: ALIAS.to_string(),
        model: "g403".to_string(),
        button_count: 4,
    }
}

/// A distinguishable snapshot; `rate` makes profiles comparable.
pub fn snapshot(rate: u32) -> Snapshot {
    Snapshot {
        report_rate: rate,
        resolutions: vec![400, 1600],
        default_resolution: 1,
        buttons: vec!["button 0".to_string(), "+KEY_F13 -KEY_F13".to_string()],
        leds: vec![Led {
            mode: LedMode::Cycle,
            color: Some("000000".to_string()),
            duration: Some(10000),
            brightness: 255,
        }],
    }
}

/// A named profile around [`snapshot`].
pub fn profile(name: &str, rate: u32) -> Profile {
    Profile::new(name.to_string(), snapshot(rate))
}

/// Write a valid store file holding `names` with the given active pointer.
pub fn seed_store(store_file: &Path, names: &[&str], active: &str) {
    let mut state = StoreState {
        last_active_profile: active.to_string(),
        profiles: std::collections::BTreeMap::new(),
    };
    for (i, name) in names.iter().enumerate() {
        state.put(profile(name, 500 + u32::try_from(i).unwrap()));
    }
    store::save(store_file, &state).unwrap();
}

/// Reload a store file directly, failing the test on any bootstrap attempt.
pub fn read_store(store_file: &Path) -> StoreState {
    store::load_or_bootstrap(store_file, || panic!("store file should be valid")).unwrap()
}

/// Write a fake `ratbagctl` shell script into `dir` and return the dir.
///
/// The script answers the capture queries for a two-slot, two-button,
/// one-LED G403, accepts any `set` command silently, and rejects unknown
/// queries with a non-zero exit the way the real tool rejects an
/// out-of-range slot index.
#[cfg(unix)]
pub fn install_fake_ratbagctl(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
case "$*" in
  "list") echo "{ALIAS}:   Logitech G403 Prodigy Gaming Mouse" ;;
  "{ALIAS} name") echo "Logitech G403 Prodigy Gaming Mouse" ;;
  "{ALIAS} rate get") echo "1000" ;;
  "{ALIAS} button count") echo "2" ;;
  "{ALIAS} resolution 0 get") echo "0: 400dpi @ 1000Hz" ;;
  "{ALIAS} resolution 1 get") echo "1: 1600dpi @ 1000Hz (default)" ;;
  "{ALIAS} resolution default get") echo "1" ;;
  "{ALIAS} button 0 get") echo "Button: 0 is mapped to 'button 0'" ;;
  "{ALIAS} button 1 get") echo "Button: 1 is mapped to macro '↓F13 ↑F13'" ;;
  "{ALIAS} led 0 get") echo "LED: 0, depth: rgb, mode: cycle, color: 000000, duration: 10000, brightness: 255" ;;
  --nocommit\ *) : ;;
  *" set "*) : ;;
  *) echo "ratbagctl: unknown command: $*" >&2; exit 1 ;;
esac
"#
    );

    let path = dir.join("ratbagctl");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    dir.to_path_buf()
}
