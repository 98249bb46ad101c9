//! Log file setup
//!
//! The browser owns the terminal, so logs only ever go to the file named by
//! `--log-file`. Without it no subscriber is installed.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `--debug` is absent and `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

pub fn init(log_file: Option<&Path>, debug: bool) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter(debug))
        .try_init()
        .context("failed to install logger")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
