//! Best-effort human names for LED colors.
//!
//! `--show` annotates each LED's hex color with a readable name fetched from
//! The Color API. The lookup is cosmetic: any failure (offline, slow, shape
//! change) logs at debug level and the caller renders the bare hex instead.

use std::time::Duration;

use tracing::debug;

/// Upper bound on one lookup; rendering a profile must not stall on a slow
/// network.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Look up a human-readable name for a 6-hex-digit color.
///
/// Returns `None` on any failure.
#[must_use]
pub fn color_name(hex: &str) -> Option<String> {
    match fetch_name(hex) {
        Ok(name) => Some(name),
        Err(e) => {
            debug!(hex, error = %e, "Color name lookup failed");
            None
        }
    }
}

fn fetch_name(hex: &str) -> Result<String, Box<dyn std::error::Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .build()?;

    let body: serde_json::Value = client
        .get(format!("https://www.thecolorapi.com/id?hex={hex}"))
        .send()?
        .error_for_status()?
        .json()?;

    body.pointer("/name/value")
        .and_then(serde_json::Value::as_str)
        .map(str::to_lowercase)
        .ok_or_else(|| "no name in response".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Network-dependent; the contract worth pinning is that failure is
    // silent and success is usable, never a panic or an Err.
    #[test]
    fn test_lookup_degrades_silently() {
        if let Some(name) = color_name("ff0000") {
            assert!(!name.is_empty());
        }
    }
}
