//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "rest-timer")]
#[command(about = "A state-managed countdown engine for workout rest intervals")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Rest duration in seconds
    #[arg(short, long, default_value = "90")]
    pub duration: u64,

    /// Label for the rest period (e.g. an exercise name)
    #[arg(short, long)]
    pub label: Option<String>,

    /// Print state snapshots and events as JSON lines instead of log output
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["rest-timer"]).unwrap();
        assert_eq!(config.duration, 90);
        assert!(config.label.is_none());
        assert!(!config.json);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_flags() {
        let config =
            Config::try_parse_from(["rest-timer", "-d", "120", "-l", "Squat", "-v", "--json"])
                .unwrap();
        assert_eq!(config.duration, 120);
        assert_eq!(config.label.as_deref(), Some("Squat"));
        assert!(config.json);
        assert_eq!(config.log_level(), "debug");
    }
}
