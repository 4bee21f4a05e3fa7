// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Values are resolved in three tiers, later tiers winning:
//! 1. TOML file (base values, defaults for anything left out)
//! 2. Environment variables
//! 3. CLI arguments

use crate::{ConfigError, ConfigResult, CsdConfig, LogFormat};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = "ndx_csd.toml";
/// Environment variable pointing at a configuration file.
pub const CONFIG_PATH_ENV_VAR: &str = "NDX_CSD_CONFIG_PATH";

/// Find the configuration file
///
/// Search order:
/// 1. `NDX_CSD_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ndx_csd.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV_VAR) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV_VAR,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.extend(
            cwd.ancestors()
                .take(6)
                .map(|directory| directory.join(CONFIG_FILE_NAME)),
        );
    }

    if let Some(path) = search_paths.iter().find(|path| path.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV_VAR
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CsdConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CsdConfig = toml::from_str(&content)?;

    apply_overrides(&mut config, cli_args)?;
    Ok(config)
}

/// Like [`load_config`] with automatic discovery, but falls back to defaults when no
/// config file exists. Overrides still apply.
pub fn load_config_or_default(cli_args: Option<&HashMap<String, String>>) -> ConfigResult<CsdConfig> {
    match load_config(None, cli_args) {
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV_VAR).is_err() => {
            let mut config = CsdConfig::default();
            apply_overrides(&mut config, cli_args)?;
            Ok(config)
        }
        other => other,
    }
}

fn apply_overrides(
    config: &mut CsdConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<()> {
    apply_environment_overrides(config);
    match cli_args {
        Some(cli) => apply_cli_overrides(config, cli),
        None => Ok(()),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NDX_CSD_LOG_LEVEL` -> `logging.level`
/// - `NDX_CSD_EXPORT_DIR` -> `export.output_dir`
/// - `NDX_CSD_PARENT_PATH` -> `mapping.parent_path`
pub fn apply_environment_overrides(config: &mut CsdConfig) {
    if let Ok(value) = env::var("NDX_CSD_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("NDX_CSD_EXPORT_DIR") {
        config.export.output_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("NDX_CSD_PARENT_PATH") {
        config.mapping.parent_path = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognized keys: `log_level`, `log_format`, `output_dir`, `pretty`, `parent_path`.
/// A `pretty` value that is not a boolean is ignored.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` if `log_format` is neither `text` nor `json`
pub fn apply_cli_overrides(
    config: &mut CsdConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value
            .parse::<LogFormat>()
            .map_err(|reason| ConfigError::ValidationError(format!("log_format: {}", reason)))?;
    }
    if let Some(value) = cli_args.get("output_dir") {
        config.export.output_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("pretty") {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" => config.export.pretty = true,
            "false" | "0" | "no" => config.export.pretty = false,
            _ => {}
        }
    }
    if let Some(value) = cli_args.get("parent_path") {
        config.mapping.parent_path = value.clone();
    }
    Ok(())
}
