use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dirmirror::cli::Cli;
use dirmirror::config::SyncConfig;
use dirmirror::daemon::Daemon;
use dirmirror::fs::LocalFs;
use dirmirror::output::{self, TracingReporter};
use dirmirror::schedule::Shutdown;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = SyncConfig::from_cli(Cli::parse())?;
    output::init_logging(&config.log_file, config.verbosity)?;

    let shutdown = Shutdown::new();
    #[cfg(unix)]
    listen_for_signals(&shutdown)?;

    let mut daemon = Daemon::new(
        config.source.clone(),
        config.replica.clone(),
        LocalFs::new(),
        TracingReporter,
    );
    daemon.run(&config.schedule(), &shutdown)?;

    Ok(())
}

/// Trigger `shutdown` on SIGINT or SIGTERM.
#[cfg(unix)]
fn listen_for_signals(shutdown: &Shutdown) -> Result<()> {
    use anyhow::Context;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    let shutdown = shutdown.clone();

    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            tracing::info!("Received signal {signal}, stopping after the current cycle");
            shutdown.trigger();
        }
    });

    Ok(())
}
