//! Command gateway for the external `ratbagctl` tool.
//!
//! This module provides a trait-based abstraction over the real subprocess
//! gateway and a mock implementation, enabling testability without a
//! connected mouse (or `ratbagctl` itself).

pub mod mock;
mod ratbagctl;

pub use ratbagctl::RatbagctlGateway;

use crate::error::Result;

/// Boundary to the external device-control tool.
///
/// A command is a single textual `ratbagctl` invocation, e.g.
/// `"ratbagctl sleepy-puppy rate get"`. The gateway splits it on whitespace,
/// runs it, and hands back decoded standard output verbatim; it never
/// interprets the response.
///
/// # Implementation Notes
///
/// - Calls block until the subprocess exits; there is no timeout.
/// - A tool that cannot be spawned, dies on a signal, or exits non-zero
///   yields [`crate::error::GmpmError::Execution`]. The error carries the
///   exit code so per-slot probes can treat an out-of-range index (non-zero
///   exit) as end-of-list rather than a fault.
pub trait CommandGateway {
    /// Execute a single command and return its decoded standard output.
    fn execute(&self, command: &str) -> Result<String>;
}

/// Type alias for boxed trait object.
pub type BoxedGateway = Box<dyn CommandGateway>;

/// Returns true when an `Execution` error reports a normal non-zero exit.
///
/// Slot-probe loops use this to distinguish "the tool rejected this index"
/// from "the tool is missing or crashed".
pub fn is_nonzero_exit(err: &crate::error::GmpmError) -> bool {
    matches!(
        err,
        crate::error::GmpmError::Execution {
            exit_code: Some(code),
            ..
        } if *code != 0
    )
}
