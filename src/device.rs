//! Device discovery and the handle passed to every component.
//!
//! Discovery runs once at startup; everything downstream receives an explicit
//! [`DeviceHandle`] rather than re-querying ambient state.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{GmpmError, Result};
use crate::gateway::CommandGateway;

/// First `ratbagctl list` line naming a Logitech G-family mouse,
/// e.g. `sleepy-puppy:  Logitech G403 Prodigy Gaming Mouse`.
static MOUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([a-z-]+):.*\b(G\d{3}|G Pro)\b").expect("mouse regex is valid")
});

/// Identity of the connected mouse, captured once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceHandle {
    /// The ratbagctl 'short name' of the mouse, ex. 'sleepy-puppy'.
    pub alias: String,
    /// Short model name used to key the profile store, ex. 'g403'.
    pub model: String,
    /// Number of physical buttons reported by the device.
    pub button_count: u8,
}

impl DeviceHandle {
    /// Model name in display form, ex. 'G403'.
    #[must_use]
    pub fn model_display(&self) -> String {
        self.model.to_uppercase()
    }

    /// Query the device's full marketing name, ex.
    /// 'Logitech G403 Prodigy Gaming Mouse'.
    pub fn full_name(&self, gateway: &dyn CommandGateway) -> Result<String> {
        let out = gateway.execute(&format!("ratbagctl {} name", self.alias))?;
        Ok(out.trim().to_string())
    }
}

/// Discover the connected mouse from `ratbagctl list` output.
///
/// Matches the first line naming a G-family device, then queries the button
/// count. No matching line is fatal: nothing downstream can run without an
/// alias and model.
pub fn discover(gateway: &dyn CommandGateway) -> Result<DeviceHandle> {
    let listing = gateway.execute("ratbagctl list")?;

    let captures = MOUSE_RE
        .captures(&listing)
        .ok_or(GmpmError::NoDeviceFound)?;

    let alias = captures[1].to_lowercase();
    // 'G Pro' becomes 'gpro' so the model can key a store filename.
    let model: String = captures[2]
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .concat();

    debug!(alias, model, "Matched mouse in ratbagctl listing");

    let count_cmd = format!("ratbagctl {alias} button count");
    let count_out = gateway.execute(&count_cmd)?;
    let button_count: u8 = count_out
        .trim()
        .parse()
        .map_err(|_| GmpmError::Parse {
            query: count_cmd,
            output: count_out.clone(),
        })?;

    let handle = DeviceHandle {
        alias,
        model,
        button_count,
    };
    info!(
        alias = %handle.alias,
        model = %handle.model,
        buttons = handle.button_count,
        "Discovered mouse"
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;

    #[test]
    fn test_discover_g403() {
        let mock = MockGateway::new()
            .respond(
                "ratbagctl list",
                "singing-gundi:  Logitech G403 Prodigy Gaming Mouse\n",
            )
            .respond("ratbagctl singing-gundi button count", "6\n");

        let handle = discover(&mock).unwrap();
        assert_eq!(handle.alias, "singing-gundi");
        assert_eq!(handle.model, "g403");
        assert_eq!(handle.button_count, 6);
        assert_eq!(handle.model_display(), "G403");
    }

    #[test]
    fn test_discover_g_pro_collapses_whitespace() {
        let mock = MockGateway::new()
            .respond("ratbagctl list", "warping-mole: Logitech G Pro Wireless\n")
            .respond("ratbagctl warping-mole button count", "8\n");

        let handle = discover(&mock).unwrap();
        assert_eq!(handle.model, "gpro");
    }

    #[test]
    fn test_discover_no_match_is_fatal() {
        let mock = MockGateway::new().respond("ratbagctl list", "no devices found\n");
        assert!(matches!(
            discover(&mock).unwrap_err(),
            GmpmError::NoDeviceFound
        ));
    }

    #[test]
    fn test_discover_bad_button_count_is_parse_error() {
        let mock = MockGateway::new()
            .respond("ratbagctl list", "quiet-cat: Logitech G502 HERO\n")
            .respond("ratbagctl quiet-cat button count", "many\n");

        assert!(matches!(
            discover(&mock).unwrap_err(),
            GmpmError::Parse { .. }
        ));
    }

    #[test]
    fn test_full_name() {
        let mock = MockGateway::g403("test-mouse");
        let handle = DeviceHandle {
            alias: "test-mouse".to_string(),
            model: "g403".to_string(),
            button_count: 4,
        };
        assert_eq!(
            handle.full_name(&mock).unwrap(),
            "Logitech G403 Prodigy Gaming Mouse"
        );
    }
}
