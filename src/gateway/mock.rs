//! Mock gateway implementation for unit testing.
//!
//! This module provides a scripted gateway that records every executed
//! command and supports assertions for testing, so capture and apply logic
//! can be exercised without `ratbagctl` or a connected mouse.
//!
//! # Example
//!
//! ```rust,ignore
//! use gmpm::gateway::{CommandGateway, mock::MockGateway};
//!
//! let mock = MockGateway::new()
//!     .respond("ratbagctl test-mouse rate get", "1000\n");
//!
//! assert_eq!(mock.execute("ratbagctl test-mouse rate get").unwrap(), "1000\n");
//! mock.assert_executed(&["ratbagctl test-mouse rate get"]);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::trace;

use super::CommandGateway;
use crate::error::{GmpmError, Result};

/// What the mock does with a command it has no scripted response for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedBehavior {
    /// Return `Ok("")`, matching `ratbagctl` set-style commands, which print
    /// nothing. Slot probes terminate on the empty parse mismatch.
    #[default]
    EmptyOk,
    /// Return an `Execution` error with exit code 1, matching `ratbagctl`
    /// rejecting an out-of-range slot index.
    Reject,
}

/// Scripted gateway for testing without the external tool.
///
/// Records all executed commands for later assertion.
pub struct MockGateway {
    responses: HashMap<String, String>,
    unmatched: UnmatchedBehavior,
    log: Mutex<Vec<String>>,
    /// Fail with an `Execution` error once this many commands have run.
    fail_after: Option<usize>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Create an empty mock with the default unmatched behavior.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            unmatched: UnmatchedBehavior::default(),
            log: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    /// Script a response for an exact command string.
    #[must_use]
    pub fn respond(mut self, command: &str, output: &str) -> Self {
        self.responses
            .insert(command.to_string(), output.to_string());
        self
    }

    /// Reject unscripted commands with a non-zero exit instead of `Ok("")`.
    #[must_use]
    pub fn with_rejecting_unmatched(mut self) -> Self {
        self.unmatched = UnmatchedBehavior::Reject;
        self
    }

    /// Fail with an `Execution` error after `n` successful commands.
    #[must_use]
    pub fn fail_after_commands(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// A fully scripted two-slot, four-button, two-LED mouse.
    ///
    /// The shape mirrors a real `ratbagctl` session against a G403 and is the
    /// shared capture fixture for tests.
    #[must_use]
    pub fn g403(alias: &str) -> Self {
        Self::new()
            .respond(
                "ratbagctl list",
                &format!("{alias}:  Logitech G403 Prodigy Gaming Mouse\n"),
            )
            .respond(&format!("ratbagctl {alias} name"), "Logitech G403 Prodigy Gaming Mouse\n")
            .respond(&format!("ratbagctl {alias} rate get"), "1000\n")
            .respond(
                &format!("ratbagctl {alias} resolution 0 get"),
                "0: 400dpi @ 1000Hz\n",
            )
            .respond(
                &format!("ratbagctl {alias} resolution 1 get"),
                "1: 1600dpi @ 1000Hz (default)\n",
            )
            .respond(
                &format!("ratbagctl {alias} resolution 2 get"),
                "Resolution 2 does not exist\n",
            )
            .respond(&format!("ratbagctl {alias} resolution default get"), "1\n")
            .respond(&format!("ratbagctl {alias} button count"), "4\n")
            .respond(
                &format!("ratbagctl {alias} button 0 get"),
                "Button: 0 is mapped to 'button 0'\n",
            )
            .respond(
                &format!("ratbagctl {alias} button 1 get"),
                "Button: 1 is mapped to 'button 1'\n",
            )
            .respond(
                &format!("ratbagctl {alias} button 2 get"),
                "Button: 2 is mapped to macro '↓F13 ↑F13'\n",
            )
            .respond(
                &format!("ratbagctl {alias} button 3 get"),
                "Button: 3 is mapped to macro '↕VOLUMEUP t300'\n",
            )
            .respond(
                &format!("ratbagctl {alias} led 0 get"),
                "LED: 0, depth: rgb, mode: cycle, color: 000000, duration: 10000, brightness: 255\n",
            )
            .respond(
                &format!("ratbagctl {alias} led 1 get"),
                "LED: 1, depth: rgb, mode: on, color: ff0088, duration: 0\n",
            )
            .respond(
                &format!("ratbagctl {alias} led 2 get"),
                "LED 2 does not exist\n",
            )
    }

    /// Commands executed so far, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.log.lock().expect("mock log lock poisoned").clone()
    }

    /// Number of commands executed so far.
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.log.lock().expect("mock log lock poisoned").len()
    }

    /// Assert the exact sequence of executed commands.
    ///
    /// # Panics
    ///
    /// Panics with a readable diff if the sequences differ.
    pub fn assert_executed(&self, expected: &[&str]) {
        let actual = self.executed();
        assert_eq!(
            actual,
            expected.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "executed command log mismatch"
        );
    }
}

impl CommandGateway for MockGateway {
    fn execute(&self, command: &str) -> Result<String> {
        let mut log = self.log.lock().expect("mock log lock poisoned");

        if let Some(limit) = self.fail_after {
            if log.len() >= limit {
                return Err(GmpmError::Execution {
                    command: command.to_string(),
                    reason: "injected failure".to_string(),
                    exit_code: Some(1),
                });
            }
        }

        log.push(command.to_string());
        drop(log);

        trace!(command, "Mock gateway executing");

        match self.responses.get(command) {
            Some(output) => Ok(output.clone()),
            None => match self.unmatched {
                UnmatchedBehavior::EmptyOk => Ok(String::new()),
                UnmatchedBehavior::Reject => Err(GmpmError::Execution {
                    command: command.to_string(),
                    reason: "exit status 1".to_string(),
                    exit_code: Some(1),
                }),
            },
        }
    }
}
