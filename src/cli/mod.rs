//! CLI argument definitions and intent resolution.

use clap::Parser;

/// Profile manager for Logitech G gaming mice, built on ratbagctl.
///
/// Captures the connected mouse's settings (polling rate, DPI slots, button
/// macros, LEDs) as named profiles and replays them on demand.
#[derive(Parser, Debug)]
#[command(name = "gmpm", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// The name of the profile
    #[arg(value_name = "PROFILE_NAME", default_value = "default")]
    pub profile_name: String,

    /// Make <PROFILE_NAME> the active profile
    #[arg(long, short = 'a', group = "intent")]
    pub active: bool,

    /// Cycle (up) to the next stored profile, if one exists
    #[arg(long, short = 'c', group = "intent")]
    pub cycle: bool,

    /// Delete <PROFILE_NAME>
    #[arg(long, short = 'd', group = "intent")]
    pub delete: bool,

    /// List all saved profiles for the connected mouse
    #[arg(long, short = 'l', group = "intent")]
    pub list: bool,

    /// Create a new profile called <PROFILE_NAME> from the current settings
    #[arg(long, short = 'n', group = "intent")]
    pub new: bool,

    /// Show the saved settings for <PROFILE_NAME>
    #[arg(long, short = 's', group = "intent")]
    pub show: bool,

    /// Update <PROFILE_NAME> with the current mouse settings
    #[arg(long, short = 'u', group = "intent")]
    pub update: bool,

    /// JSON output for scripts and desktop integrations
    #[arg(long, env = "GMPM_JSON")]
    pub json: bool,

    /// Verbose output (repeat for more detail)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        default_value_t = false,
        default_missing_value = "true",
        num_args = 0..=1,
        require_equals = true,
    )]
    pub no_color: bool,
}

/// The single operation selected for this invocation.
///
/// The flags live in a clap group, so more than one is a usage error
/// rejected before anything runs; `None` means no flag was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Activate,
    Cycle,
    Delete,
    List,
    New,
    Show,
    Update,
}

impl Cli {
    /// Fold the intent flags into a single value for dispatch.
    #[must_use]
    pub fn intent(&self) -> Option<Intent> {
        if self.active {
            Some(Intent::Activate)
        } else if self.cycle {
            Some(Intent::Cycle)
        } else if self.delete {
            Some(Intent::Delete)
        } else if self.list {
            Some(Intent::List)
        } else if self.new {
            Some(Intent::New)
        } else if self.show {
            Some(Intent::Show)
        } else if self.update {
            Some(Intent::Update)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_profile_name_defaults() {
        let cli = Cli::try_parse_from(["gmpm", "--list"]).unwrap();
        assert_eq!(cli.profile_name, "default");
        assert_eq!(cli.intent(), Some(Intent::List));
    }

    #[test]
    fn test_named_intent() {
        let cli = Cli::try_parse_from(["gmpm", "hades", "--new"]).unwrap();
        assert_eq!(cli.profile_name, "hades");
        assert_eq!(cli.intent(), Some(Intent::New));
    }

    #[test]
    fn test_no_flags_is_no_intent() {
        let cli = Cli::try_parse_from(["gmpm"]).unwrap();
        assert_eq!(cli.intent(), None);
    }

    #[test]
    fn test_multiple_intent_flags_rejected() {
        // The group makes intents mutually exclusive; nothing can run, so
        // nothing can mutate the store.
        assert!(Cli::try_parse_from(["gmpm", "--new", "--delete"]).is_err());
        assert!(Cli::try_parse_from(["gmpm", "-a", "-c"]).is_err());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["gmpm", "fps", "-u", "-v", "-v"]).unwrap();
        assert_eq!(cli.intent(), Some(Intent::Update));
        assert_eq!(cli.verbose, 2);
    }
}
