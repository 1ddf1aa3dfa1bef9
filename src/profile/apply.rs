//! Profile applier: replay a snapshot onto the mouse.
//!
//! A snapshot serializes into an ordered `ratbagctl` batch in which every
//! command but the last carries `--nocommit`. Deferred commands accumulate
//! on the device and the final, unmodified command commits the whole batch
//! at once; reordering the steps or dropping the modifier anywhere else
//! degrades the switch into setting-by-setting application on the hardware.

use tracing::{debug, info, instrument};

use super::schema::Snapshot;
use crate::device::DeviceHandle;
use crate::error::{GmpmError, Result};
use crate::gateway::CommandGateway;

/// Modifier that stages a setting on the device without committing it.
const NOCOMMIT: &str = "--nocommit";

/// Token prefixes that mark a button assignment as a macro sequence.
/// `-`/`+` are release/press events, `KEY` a hold, `t` a wait.
const MACRO_PREFIXES: [&str; 4] = ["-", "+", "KEY", "t"];

/// True when a button token is a macro sequence rather than a raw button
/// function, and so needs the `macro` keyword on `action set`.
#[must_use]
pub fn is_macro_token(token: &str) -> bool {
    MACRO_PREFIXES.iter().any(|p| token.starts_with(p))
}

/// Serialize a snapshot into its ordered command batch.
///
/// Order is load-bearing:
/// 1. report rate,
/// 2. per-slot DPI in index order,
/// 3. default resolution index,
/// 4. absolute DPI of the default slot (the device tracks the active DPI
///    separately from the slot table),
/// 5. button actions in index order,
/// 6. LED settings in index order.
///
/// Fails fast if `default_resolution` no longer indexes a slot; no command
/// is worth issuing from a snapshot that cannot finish serializing.
pub fn command_batch(handle: &DeviceHandle, snapshot: &Snapshot) -> Result<Vec<String>> {
    let default_dpi = snapshot.default_dpi()?;
    let alias = &handle.alias;

    let mut commands = Vec::new();

    commands.push(format!(
        "ratbagctl {NOCOMMIT} {alias} rate set {}",
        snapshot.report_rate
    ));

    for (idx, dpi) in snapshot.resolutions.iter().enumerate() {
        commands.push(format!(
            "ratbagctl {NOCOMMIT} {alias} resolution {idx} dpi set {dpi}"
        ));
    }

    commands.push(format!(
        "ratbagctl {NOCOMMIT} {alias} resolution default set {}",
        snapshot.default_resolution
    ));
    commands.push(format!(
        "ratbagctl {NOCOMMIT} {alias} dpi set {default_dpi}"
    ));

    for (idx, button) in snapshot.buttons.iter().enumerate() {
        let mut cmd = format!("ratbagctl {NOCOMMIT} {alias} button {idx} action set");
        if is_macro_token(button) {
            cmd.push_str(" macro");
        }
        cmd.push(' ');
        cmd.push_str(button);
        commands.push(cmd);
    }

    for (idx, led) in snapshot.leds.iter().enumerate() {
        let mut cmd = format!(
            "ratbagctl {NOCOMMIT} {alias} led {idx} set mode {}",
            led.mode
        );
        if let Some(color) = &led.color {
            cmd.push_str(&format!(" color {color}"));
        }
        if let Some(duration) = led.duration {
            cmd.push_str(&format!(" duration {duration}"));
        }
        cmd.push_str(&format!(" brightness {}", led.brightness));
        commands.push(cmd);
    }

    // The final command goes out without the defer modifier, which commits
    // everything staged before it in one step.
    if let Some(last) = commands.pop() {
        commands.push(last.replace(&format!(" {NOCOMMIT} "), " "));
    }

    debug!(count = commands.len(), "Serialized apply batch");
    Ok(commands)
}

/// Push a snapshot onto the mouse.
///
/// Commands are issued strictly in batch order. The first gateway failure
/// aborts with [`GmpmError::PartialApply`] naming how many commands were
/// issued successfully; there is no rollback primitive on the device, but
/// deferred steps were never committed.
#[instrument(skip(gateway, snapshot), fields(alias = %handle.alias))]
pub fn apply(
    gateway: &dyn CommandGateway,
    handle: &DeviceHandle,
    snapshot: &Snapshot,
) -> Result<()> {
    let commands = command_batch(handle, snapshot)?;
    let total = commands.len();

    for (issued, command) in commands.iter().enumerate() {
        if let Err(err) = gateway.execute(command) {
            debug!(command, error = %err, "Apply batch failed mid-way");
            return Err(GmpmError::PartialApply { issued, total });
        }
    }

    info!(total, "Profile written to device");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::profile::schema::{Led, LedMode};

    fn test_handle() -> DeviceHandle {
        DeviceHandle {
            alias: "test-mouse".to_string(),
            model: "g403".to_string(),
            button_count: 2,
        }
    }

    fn test_snapshot() -> Snapshot {
        Snapshot {
            report_rate: 1000,
            resolutions: vec![400, 1600],
            default_resolution: 1,
            buttons: vec!["button 0".to_string(), "+KEY_F13 -KEY_F13".to_string()],
            leds: vec![
                Led {
                    mode: LedMode::Cycle,
                    color: Some("000000".to_string()),
                    duration: Some(10000),
                    brightness: 255,
                },
                Led {
                    mode: LedMode::On,
                    color: Some("ff0088".to_string()),
                    duration: None,
                    brightness: 128,
                },
            ],
        }
    }

    #[test]
    fn test_batch_order_and_text() {
        let batch = command_batch(&test_handle(), &test_snapshot()).unwrap();
        assert_eq!(
            batch,
            vec![
                "ratbagctl --nocommit test-mouse rate set 1000",
                "ratbagctl --nocommit test-mouse resolution 0 dpi set 400",
                "ratbagctl --nocommit test-mouse resolution 1 dpi set 1600",
                "ratbagctl --nocommit test-mouse resolution default set 1",
                "ratbagctl --nocommit test-mouse dpi set 1600",
                "ratbagctl --nocommit test-mouse button 0 action set button 0",
                "ratbagctl --nocommit test-mouse button 1 action set macro +KEY_F13 -KEY_F13",
                "ratbagctl --nocommit test-mouse led 0 set mode cycle color 000000 duration 10000 brightness 255",
                "ratbagctl test-mouse led 1 set mode on color ff0088 brightness 128",
            ]
        );
    }

    #[test]
    fn test_only_final_command_commits() {
        let batch = command_batch(&test_handle(), &test_snapshot()).unwrap();
        let (last, rest) = batch.split_last().unwrap();
        assert!(!last.contains(NOCOMMIT));
        for command in rest {
            assert!(command.contains(NOCOMMIT), "missing defer in {command}");
        }
    }

    #[test]
    fn test_macro_prefix_detection() {
        let mut snap = test_snapshot();
        snap.leds.clear();
        snap.buttons = vec![
            "KEY_A".to_string(),
            "t300".to_string(),
            "-KEY_B".to_string(),
            "button 4".to_string(),
        ];
        let handle = test_handle();

        let batch = command_batch(&handle, &snap).unwrap();
        assert!(batch[5].ends_with("action set macro KEY_A"));
        assert!(batch[6].ends_with("action set macro t300"));
        assert!(batch[7].ends_with("action set macro -KEY_B"));
        assert!(batch[8].ends_with("action set button 4"));
    }

    #[test]
    fn test_stale_default_index_fails_before_any_command() {
        let mut snap = test_snapshot();
        snap.default_resolution = 7;
        let mock = MockGateway::new();

        let err = apply(&mock, &test_handle(), &snap).unwrap_err();
        assert!(matches!(err, GmpmError::InvalidDefaultResolution { .. }));
        assert_eq!(mock.executed_count(), 0);
    }

    #[test]
    fn test_apply_issues_batch_in_order() {
        let mock = MockGateway::new();
        apply(&mock, &test_handle(), &test_snapshot()).unwrap();

        let expected = command_batch(&test_handle(), &test_snapshot()).unwrap();
        assert_eq!(mock.executed(), expected);
    }

    #[test]
    fn test_partial_apply_reports_issued_count() {
        let mock = MockGateway::new().fail_after_commands(3);
        let err = apply(&mock, &test_handle(), &test_snapshot()).unwrap_err();

        match err {
            GmpmError::PartialApply { issued, total } => {
                assert_eq!(issued, 3);
                assert_eq!(total, 9);
            }
            other => panic!("expected PartialApply, got {other:?}"),
        }
    }
}
