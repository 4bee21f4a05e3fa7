// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core crate for ndx-csd. Defines the CSD schema and the validated CSD container.
//!
//! - [`schema`] - static, introspectable description of every CSD field
//! - [`CsdRecord`] - the immutable container, validated against the schema when built
//! - [`CsdError`] - schema violations and malformed container errors

mod error;
pub mod record;
pub mod schema;

pub use error::{ContainerProblem, CsdError, CsdResult, Violation};
pub use record::{CsdRecord, CsdRecordBuilder, FieldMap, FieldValue};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
