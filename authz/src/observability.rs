//! tracing-subscriber initialization.
//!
//! Installs a `Registry` with an `EnvFilter` and a single `fmt` layer writing
//! to stderr, so stdout stays free for command output.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, ObservabilityConfig};

/// `RUST_LOG` wins over the configured level.
fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level '{}'", config.log_level)),
    }
}

/// Install the global `tracing` subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = Registry::default().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("failed to install tracing subscriber")
}
