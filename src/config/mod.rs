//! Runtime configuration.
//!
//! The command line is the only configuration surface. [`SyncConfig`] is the validated
//! form the binary runs with.

/// Source/replica root validation
pub mod validator;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::output::Verbosity;
use crate::schedule::Schedule;
use std::path::PathBuf;
use std::time::Duration;

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Directory mirrored from
    pub source: PathBuf,
    /// Directory mirrored to
    pub replica: PathBuf,
    /// Pause between cycles
    pub interval: Duration,
    /// File the log is appended to
    pub log_file: PathBuf,
    /// Optional cycle limit
    pub max_cycles: Option<u64>,
    /// Log verbosity
    pub verbosity: Verbosity,
}

impl SyncConfig {
    /// Build and validate the configuration from parsed arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the source and replica roots overlap
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        validator::validate_roots(&cli.source, &cli.replica)?;

        Ok(Self {
            source: cli.source,
            replica: cli.replica,
            interval: Duration::from_secs(cli.interval),
            log_file: cli.log_file,
            max_cycles: cli.max_cycles,
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
        })
    }

    /// Cycle schedule described by this configuration
    #[must_use]
    pub const fn schedule(&self) -> Schedule {
        Schedule::every(self.interval).with_max_cycles(self.max_cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli() {
        let cli = Cli::try_parse_from([
            "dirmirror",
            "/data/src",
            "/data/dst",
            "15",
            "/var/log/dirmirror.log",
            "--max-cycles",
            "2",
            "--verbose",
        ])
        .unwrap();

        let config = SyncConfig::from_cli(cli).unwrap();
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert_eq!(
            config.schedule(),
            Schedule {
                interval: Duration::from_secs(15),
                max_cycles: Some(2),
            }
        );
    }

    #[test]
    fn test_from_cli_rejects_nested_replica() {
        let cli =
            Cli::try_parse_from(["dirmirror", "/data/src", "/data/src/mirror", "1", "log.txt"])
                .unwrap();
        assert!(SyncConfig::from_cli(cli).is_err());
    }
}
