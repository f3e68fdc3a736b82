//! Writes the `dirmirror.1` man page, into `man/` or the directory given as argument.

use anyhow::{Context, Result};
use clap::CommandFactory;
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

fn main() -> Result<()> {
    let out_dir = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("man"), PathBuf::from);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    let man_path = out_dir.join("dirmirror.1");
    let mut file = File::create(&man_path)
        .with_context(|| format!("Failed to create man page: {}", man_path.display()))?;
    clap_mangen::Man::new(dirmirror::cli::Cli::command()).render(&mut file)?;

    println!("Generated {}", man_path.display());
    Ok(())
}
