//! Tracing setup. The terminal is in raw mode, so logs go to a file.
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Context, Result};

pub const DEFAULT_FILTER: &str = "user_directory=info";

pub fn init(log_file: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .with_ctx(|| "build log filter".to_string())?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_ctx(|| format!("open log file {log_file}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .with_ctx(|| "install tracing subscriber".to_string())?;
    Ok(())
}
