//! Error types for mouse profile operations.

use thiserror::Error;

/// Primary error type for profile manager operations.
#[derive(Error, Debug)]
pub enum GmpmError {
    // Device discovery errors
    #[error("No supported Logitech G mouse found in `ratbagctl list` output")]
    NoDeviceFound,

    // Profile errors
    #[error("No stored {model} profile '{name}'")]
    ProfileNotFound { model: String, name: String },

    #[error("{model} profile '{name}' already exists")]
    ProfileExists { model: String, name: String },

    // Gateway errors
    #[error("Failed to run `{command}`: {reason}")]
    Execution {
        command: String,
        reason: String,
        /// Exit code when the tool ran but exited non-zero.
        exit_code: Option<i32>,
    },

    #[error("Unexpected response to `{query}`: {output:?}")]
    Parse { query: String, output: String },

    // Apply errors
    #[error("Profile apply stopped after {issued} of {total} commands")]
    PartialApply { issued: usize, total: usize },

    #[error("Default resolution index {index} is out of range: profile has {slots} slots")]
    InvalidDefaultResolution { index: usize, slots: usize },

    // Store errors
    #[error("Profile store error at {path}: {reason}")]
    Store { path: String, reason: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl GmpmError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound { .. } | Self::ProfileExists { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ProfileNotFound { .. } => {
                Some("See 'gmpm --list' for the saved profiles on this mouse")
            }
            Self::ProfileExists { .. } => Some("Overwrite it with 'gmpm <name> --update'"),
            Self::NoDeviceFound => Some("Ensure the mouse is connected and ratbagd is running"),
            Self::Execution { .. } => Some("Ensure ratbagctl is installed and on PATH"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using GmpmError.
pub type Result<T> = std::result::Result<T, GmpmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_recoverable() {
        let err = GmpmError::ProfileNotFound {
            model: "g403".to_string(),
            name: "hades".to_string(),
        };
        assert!(err.is_user_recoverable());
        assert!(err.suggestion().unwrap().contains("--list"));
    }

    #[test]
    fn test_exists_suggests_update() {
        let err = GmpmError::ProfileExists {
            model: "g403".to_string(),
            name: "default".to_string(),
        };
        assert!(err.is_user_recoverable());
        assert!(err.suggestion().unwrap().contains("--update"));
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        let err = GmpmError::Parse {
            query: "ratbagctl sleepy-puppy rate get".to_string(),
            output: "garbage".to_string(),
        };
        assert!(!err.is_user_recoverable());

        let err = GmpmError::PartialApply { issued: 3, total: 12 };
        assert!(!err.is_user_recoverable());
        assert_eq!(
            err.to_string(),
            "Profile apply stopped after 3 of 12 commands"
        );
    }
}
