//! Command-line interface definitions for dirmirror.
//!
//! The CLI definition is shared between the main binary and build tools (like xtask)
//! for man page generation.
//!
//! Note: Field-level documentation doubles as clap help text.

#![allow(clippy::missing_docs_in_private_items)]

use clap::Parser;
use std::path::PathBuf;

/// Main CLI structure for dirmirror.
#[derive(Parser, Debug)]
#[command(
    name = "dirmirror",
    version = crate::VERSION,
    about = "Periodically mirror a source directory onto a replica",
    long_about = "Keeps a replica directory identical to a source directory. Every INTERVAL \
                  seconds, newer or missing files are copied to the replica and files absent \
                  from the source are removed from it."
)]
pub struct Cli {
    /// Path to the source directory
    pub source: PathBuf,

    /// Path to the replica directory
    pub replica: PathBuf,

    /// Synchronization interval in seconds
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Path to the log file
    pub log_file: PathBuf,

    /// Stop after this many cycles instead of running until terminated
    #[arg(long, value_name = "N", env = "DIRMIRROR_MAX_CYCLES",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub max_cycles: Option<u64>,

    /// Also log cycle summaries and skipped entries
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
