// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Persistence for CSD records.
//!
//! - [`HierarchicalStore`] - the group / attribute / dataset store abstraction, with the
//!   serde backed [`MemoryStore`] as reference implementation
//! - [`CsdObjectMapper`] - encodes a [`CsdRecord`] into a store and decodes it back
//! - [`TypeRegistry`] - dispatches by `(namespace, neurodata_type)`
//! - [`export`] - writes the schema as NWB style namespace and extension JSON
//!
//! [`CsdRecord`]: ndx_csd_structures::CsdRecord

mod error;
pub mod export;
mod mapper;
mod registry;
pub mod store;

pub use error::{SerializationError, SerializationResult};
pub use export::{export_extensions, export_namespace, write_schema_files};
pub use mapper::{CsdObjectMapper, NAMESPACE_ATTRIBUTE, NEURODATA_TYPE_ATTRIBUTE};
pub use registry::{
    ConstructFn, DecodeFn, EncodeFn, NeurodataObject, TypeRegistration, TypeRegistry,
};
pub use store::{
    AttributeValue, DatasetValues, HierarchicalStore, MemoryStore, StoreDataset, StoreError,
};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
