// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `ndx_csd.toml`. Every field has a default, so a
//! partial (or empty) file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `[logging]` section, the same type `init_logging` takes.
pub use ndx_csd_observability::{LogFormat, LoggingConfig, LOG_LEVELS};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CsdConfig {
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    pub mapping: MappingConfig,
}

/// Schema export
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the namespace and extension files are written to
    pub output_dir: PathBuf,
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./spec"),
            pretty: true,
        }
    }
}

/// Object mapping
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Group records are encoded under when the caller gives no parent
    pub parent_path: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            parent_path: "/processing/ecephys".to_string(),
        }
    }
}
