//! Device state reader: snapshot the live mouse settings.
//!
//! One gateway query per setting, parsed with the same patterns `ratbagctl`
//! prints. Per-slot queries (resolutions, LEDs) have no count query; the
//! loop probes increasing indices until a response fails to match, and that
//! mismatch is the end-of-list sentinel, never an error. Required
//! single-value queries (rate, default resolution) are fatal on mismatch.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use super::schema::{Led, LedMode, Snapshot};
use crate::device::DeviceHandle;
use crate::error::{GmpmError, Result};
use crate::gateway::{CommandGateway, is_nonzero_exit};

/// `0: 400dpi @ 1000Hz`: one resolution slot.
static RESOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+:\s*(\d+)dpi").expect("resolution regex is valid"));

/// `Button: 2 is mapped to macro '↓F13 ↑F13'`: the quoted action token.
static BUTTON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(.*)'").expect("button regex is valid"));

/// `LED: 0, depth: rgb, mode: cycle, color: 000000, duration: 10000, brightness: 255`.
/// Color, duration and brightness are all optional in device output.
static LED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"LED: \d+, depth: rgb, mode: (on|off|cycle|breathing)(?:, color: ([0-9a-fA-F]{6}))?(?:, duration: (\d+))?(?:, brightness: (\d+))?",
    )
    .expect("led regex is valid")
});

/// Outcome of probing one optional slot.
///
/// `NoMatch` is the loop terminator, not a failure.
enum SlotProbe<T> {
    Match(T),
    NoMatch,
}

/// Capture a snapshot of the connected mouse's current settings.
#[instrument(skip(gateway), fields(alias = %handle.alias))]
pub fn capture(gateway: &dyn CommandGateway, handle: &DeviceHandle) -> Result<Snapshot> {
    let report_rate = capture_report_rate(gateway, handle)?;
    let resolutions = capture_resolutions(gateway, handle)?;
    let default_resolution = capture_default_resolution(gateway, handle)?;
    let buttons = capture_buttons(gateway, handle)?;
    let leds = capture_leds(gateway, handle)?;

    debug!(
        report_rate,
        slots = resolutions.len(),
        buttons = buttons.len(),
        leds = leds.len(),
        "Captured snapshot"
    );

    Ok(Snapshot {
        report_rate,
        resolutions,
        default_resolution,
        buttons,
        leds,
    })
}

fn capture_report_rate(gateway: &dyn CommandGateway, handle: &DeviceHandle) -> Result<u32> {
    let query = format!("ratbagctl {} rate get", handle.alias);
    let out = gateway.execute(&query)?;
    out.trim().parse().map_err(|_| GmpmError::Parse {
        query,
        output: out,
    })
}

fn capture_resolutions(gateway: &dyn CommandGateway, handle: &DeviceHandle) -> Result<Vec<u32>> {
    let mut resolutions = Vec::new();
    for idx in 0.. {
        let query = format!("ratbagctl {} resolution {idx} get", handle.alias);
        match probe(gateway, &query, |out| {
            RESOLUTION_RE
                .captures(out)
                .and_then(|c| c[1].parse::<u32>().ok())
        })? {
            SlotProbe::Match(dpi) => resolutions.push(dpi),
            SlotProbe::NoMatch => break,
        }
    }
    trace!(count = resolutions.len(), "Resolution slots enumerated");
    Ok(resolutions)
}

fn capture_default_resolution(
    gateway: &dyn CommandGateway,
    handle: &DeviceHandle,
) -> Result<usize> {
    // ratbagctl reports the default as a slot index, not a dpi value.
    let query = format!("ratbagctl {} resolution default get", handle.alias);
    let out = gateway.execute(&query)?;
    out.trim().parse().map_err(|_| GmpmError::Parse {
        query,
        output: out,
    })
}

fn capture_buttons(gateway: &dyn CommandGateway, handle: &DeviceHandle) -> Result<Vec<String>> {
    let mut buttons = Vec::with_capacity(handle.button_count as usize);
    for idx in 0..handle.button_count {
        let query = format!("ratbagctl {} button {idx} get", handle.alias);
        let out = gateway.execute(&query)?;
        let token = BUTTON_RE
            .captures(out.trim())
            .map(|c| c[1].to_string())
            .ok_or_else(|| GmpmError::Parse {
                query,
                output: out,
            })?;
        buttons.push(portable_macro(&token));
    }
    Ok(buttons)
}

/// Rewrite ratbagctl's keypress glyphs into the portable macro tokens the
/// `action set macro` subcommand accepts: `↕X` holds (bare `KEY_X`), `↓X`
/// presses (`+KEY_X`), `↑X` releases (`-KEY_X`). Waits are already textual
/// (`t300` = wait 300ms).
fn portable_macro(token: &str) -> String {
    token
        .replace('↕', "KEY_")
        .replace('↓', "+KEY_")
        .replace('↑', "-KEY_")
}

fn capture_leds(gateway: &dyn CommandGateway, handle: &DeviceHandle) -> Result<Vec<Led>> {
    let mut leds = Vec::new();
    for idx in 0.. {
        let query = format!("ratbagctl {} led {idx} get", handle.alias);
        match probe(gateway, &query, parse_led)? {
            SlotProbe::Match(led) => leds.push(led),
            SlotProbe::NoMatch => break,
        }
    }
    trace!(count = leds.len(), "LED slots enumerated");
    Ok(leds)
}

fn parse_led(out: &str) -> Option<Led> {
    let captures = LED_RE.captures(out)?;
    let mode = LedMode::from_token(&captures[1])?;
    let color = captures.get(2).map(|m| m.as_str().to_string());
    let duration = captures.get(3).and_then(|m| m.as_str().parse().ok());
    // Brightness does not always display out of ratbagctl; absent means max.
    let brightness = captures
        .get(4)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(255);
    Some(Led {
        mode,
        color,
        duration,
        brightness,
    })
}

/// Run one per-slot query and classify the response.
///
/// A response the parser rejects, or a non-zero tool exit (ratbagctl refuses
/// an out-of-range index), is `NoMatch`. Anything else (tool missing,
/// killed) propagates.
fn probe<T>(
    gateway: &dyn CommandGateway,
    query: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<SlotProbe<T>> {
    match gateway.execute(query) {
        Ok(out) => Ok(parse(&out).map_or(SlotProbe::NoMatch, SlotProbe::Match)),
        Err(err) if is_nonzero_exit(&err) => Ok(SlotProbe::NoMatch),
        Err(err) => Err(err),
    }
}
