//! Log output
//!
//! The terminal UI owns stdout and stderr, so logs go to a file. Without a log
//! file no logger is installed and the `log` macros are no-ops.

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::OpenOptions;
use std::path::Path;

/// Install an `env_logger` appending to `path`. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to install logger")?;

    log::info!("Snake Arcade {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}
