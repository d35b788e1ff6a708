//! Authorization Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => anyhow::bail!("unsupported log format '{other}' (expected json or pretty)"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is not set (e.g. "info")
    pub log_level: String,

    /// Subscriber output format
    pub log_format: LogFormat,
}

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let log_format = match env::var("DATAELF_LOG_FORMAT") {
            Ok(v) => v.parse().context("DATAELF_LOG_FORMAT is invalid")?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            observability: ObservabilityConfig {
                log_level: env::var("DATAELF_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
                log_format,
            },
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            observability: ObservabilityConfig {
                log_level: "debug".into(),
                log_format: LogFormat::Pretty,
            },
        }
    }
}
