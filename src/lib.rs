// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ndx-csd - Current Source Density analysis results
//!
//! A schema-validated container for current source density (CSD) results and an object
//! mapper that stores it in a hierarchical group / attribute / dataset store.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ndx-csd = "0.1"  # Default: observability + config
//! ```
//!
//! ## Feature Flags
//!
//! - **`observability`** (default): logging initialization and per-crate debug flags
//! - **`config`** (default): `ndx_csd.toml` loading with environment and CLI overrides
//!
//! ## Usage
//!
//! ```rust
//! use ndx_csd::prelude::*;
//! use ndx_csd::ndarray::{Array, Array3};
//!
//! let csd = CsdRecord::builder("csd")
//!     .description("CSD of 2D electrode array")
//!     .num_trials(50)
//!     .data(Array3::<f32>::zeros((101, 10, 3)))
//!     .time_from_event(Array::linspace(-1.0f32, 1.0, 101))
//!     .event_description("Stimulus onset")
//!     .electrodes_reference_frame("(0, 0) is the most posterior, most left electrode")
//!     .rel_electrode_locations_x(Array::linspace(0.0f32, 0.0045, 10))
//!     .rel_electrode_locations_y(Array::linspace(0.0f32, 0.001, 3))
//!     .build()?;
//!
//! let mut store = MemoryStore::new();
//! let path = CsdObjectMapper.encode(&csd, &mut store, "/processing/ecephys")?;
//! assert_eq!(store.list_datasets(&path)?.len(), 4);
//! assert_eq!(CsdObjectMapper.decode(&store, &path)?, csd);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: ndx-csd-structures                         │
//! │  (schema, CsdRecord, CsdError)                          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Persistence: ndx-csd-serialization                     │
//! │  (HierarchicalStore, object mapper, registry, export)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Tools: ndx-csd-config, ndx-csd-observability           │
//! │  (TOML config, logging)                                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use ndx_csd_structures as structures;

// Re-export persistence
pub use ndx_csd_serialization as serialization;

// Re-export infrastructure
#[cfg(feature = "observability")]
pub use ndx_csd_observability as observability;

#[cfg(feature = "config")]
pub use ndx_csd_config as config;

/// Array types used by the public API
pub use ndarray;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::structures::schema::{CSD_GROUP_SPEC, DATA_UNIT, LOCATION_UNIT, TIME_UNIT};
    pub use crate::structures::{
        ContainerProblem, CsdError, CsdRecord, CsdRecordBuilder, CsdResult, FieldMap,
        FieldValue, Violation,
    };

    pub use crate::serialization::{
        AttributeValue, CsdObjectMapper, HierarchicalStore, MemoryStore, NeurodataObject,
        SerializationError, StoreDataset, TypeRegistry,
    };
}
