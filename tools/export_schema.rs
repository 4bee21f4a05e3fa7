// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Schema Export Tool

Writes the ndx-csd namespace and extension descriptions as JSON, for schema driven
tooling that rebuilds the CSD type.

Usage:
  cargo run --bin export_schema -- [--output-dir <dir>] [--compact] [--print] [--debug-<crate>]

Settings come from `ndx_csd.toml` (if found), `NDX_CSD_*` environment variables, then
the command line.
*/

use std::collections::HashMap;
use std::env;

use anyhow::{bail, Context, Result};
use ndx_csd::config::{load_config_or_default, validate_config};
use ndx_csd::observability::{debug_flags_help, init_logging, parse_debug_flags};
use ndx_csd::serialization::{export_extensions, export_namespace, write_schema_files};
use tracing::info;

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--output-dir <dir>] [--compact] [--print] [--log-level <level>]\n\n{}",
        program,
        debug_flags_help()
    )
}

/// Collects `--key value` style overrides for the config loader.
fn parse_overrides(args: &[String]) -> Result<(HashMap<String, String>, bool)> {
    let mut overrides = HashMap::new();
    let mut print = false;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output-dir" | "--log-level" | "--log-format" => {
                let value = iter
                    .next()
                    .with_context(|| format!("{} needs a value", arg))?;
                let key = arg.trim_start_matches("--").replace('-', "_");
                overrides.insert(key, value.clone());
            }
            "--compact" => {
                overrides.insert("pretty".to_string(), "false".to_string());
            }
            "--print" => print = true,
            other if other.starts_with("--debug-") => {}
            other => bail!("Unknown argument '{}'", other),
        }
    }
    Ok((overrides, print))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("export_schema");
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", usage(program));
        return Ok(());
    }

    let (overrides, print) = match parse_overrides(&args) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("❌ {}\n\n{}", error, usage(program));
            std::process::exit(2);
        }
    };

    let config =
        load_config_or_default(Some(&overrides)).context("Failed to load configuration")?;
    validate_config(&config)?;

    init_logging(&parse_debug_flags(), &config.logging)?;

    if print {
        let both = serde_json::json!({
            "namespace": export_namespace(),
            "extensions": export_extensions(),
        });
        println!("{}", serde_json::to_string_pretty(&both)?);
        return Ok(());
    }

    info!("Exporting schema to {}", config.export.output_dir.display());
    let written = write_schema_files(&config.export.output_dir, config.export.pretty)
        .with_context(|| format!("Failed to write {}", config.export.output_dir.display()))?;

    println!("📄 ndx-csd schema export");
    for path in &written {
        println!("   ✅ {}", path.display());
    }
    Ok(())
}
