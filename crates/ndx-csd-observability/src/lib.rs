// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ndx-csd-observability
//!
//! Logging setup shared by the ndx-csd tools, with per-crate debug flag support.
//!
//! Library crates only emit `tracing` events. Binaries call [`init_logging`] once,
//! with flags from [`parse_debug_flags`] and a [`LoggingConfig`].

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known ndx-csd crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ndx-csd",
    "ndx-csd-structures",
    "ndx-csd-serialization",
    "ndx-csd-config",
    "ndx-csd-observability",
];
