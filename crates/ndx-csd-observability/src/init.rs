// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for ndx-csd tools

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

/// Builds the `EnvFilter` for the given flags and configuration.
pub fn build_env_filter(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<EnvFilter> {
    if !config.is_valid_level() {
        return Err(anyhow!("Unknown log level '{}'", config.level));
    }
    let filter = debug_flags.to_filter_string(&config.level.to_lowercase());
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

/// Initialize console logging
///
/// Installs a global subscriber writing to stderr, as text or JSON per `config.format`.
/// Crates enabled in `debug_flags` log at debug level, everything else at `config.level`.
///
/// # Errors
/// Fails on an unknown level, or if a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(debug_flags, config)?;

    let console_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(env_filter)
            .boxed(),
    };

    Registry::default()
        .with(console_layer)
        .try_init()
        .context("Failed to install the global tracing subscriber")?;
    Ok(())
}

/// Initialize logging with default settings
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_logging(debug_flags, &LoggingConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_is_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            format: LogFormat::Text,
        };
        assert!(build_env_filter(&CrateDebugFlags::default(), &config).is_err());
    }

    #[test]
    fn test_filter_accepts_debug_flags() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        let config = LoggingConfig {
            level: "WARN".to_string(),
            format: LogFormat::Json,
        };
        assert!(build_env_filter(&flags, &config).is_ok());
    }
}
