//! Real subprocess gateway.
//!
//! Shells out to `ratbagctl` (or whatever tool the command names) and
//! returns its decoded standard output.

use std::process::Command;

use tracing::{debug, trace};

use super::CommandGateway;
use crate::error::{GmpmError, Result};

/// Gateway that runs each command as a blocking subprocess.
#[derive(Debug, Default, Clone, Copy)]
pub struct RatbagctlGateway;

impl RatbagctlGateway {
    /// Create a new subprocess gateway.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandGateway for RatbagctlGateway {
    fn execute(&self, command: &str) -> Result<String> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| GmpmError::Execution {
            command: command.to_string(),
            reason: "empty command".to_string(),
            exit_code: None,
        })?;

        trace!(command, "Executing device command");

        let output = Command::new(program)
            .args(parts)
            .output()
            .map_err(|e| GmpmError::Execution {
                command: command.to_string(),
                reason: e.to_string(),
                exit_code: None,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            debug!(
                command,
                code = ?output.status.code(),
                "Device command exited non-zero"
            );
            return Err(GmpmError::Execution {
                command: command.to_string(),
                reason: match output.status.code() {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".to_string(),
                },
                exit_code: output.status.code(),
            });
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::is_nonzero_exit;

    #[test]
    fn test_missing_tool_is_execution_error() {
        let gateway = RatbagctlGateway::new();
        let err = gateway
            .execute("definitely-not-a-real-tool-gmpm list")
            .unwrap_err();
        assert!(matches!(
            err,
            GmpmError::Execution {
                exit_code: None,
                ..
            }
        ));
        assert!(!is_nonzero_exit(&err));
    }

    #[test]
    fn test_empty_command_rejected() {
        let gateway = RatbagctlGateway::new();
        assert!(gateway.execute("   ").is_err());
    }

    #[test]
    fn test_stdout_returned_verbatim() {
        // `echo` is close enough to a device tool for the contract: stdout
        // comes back undecorated and untrimmed.
        let gateway = RatbagctlGateway::new();
        let out = gateway.execute("echo 1000").unwrap();
        assert_eq!(out, "1000\n");
    }

    #[test]
    fn test_nonzero_exit_carries_code() {
        let gateway = RatbagctlGateway::new();
        let err = gateway.execute("false").unwrap_err();
        assert!(is_nonzero_exit(&err));
    }
}
