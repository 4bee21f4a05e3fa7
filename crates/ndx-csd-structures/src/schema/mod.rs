// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Declarative schema definitions.
//!
//! The schema is plain static data. [`CSD_GROUP_SPEC`] describes every field of a
//! [`crate::CsdRecord`]: datatype, allowed ranks with dimension labels, optionality,
//! defaults and fixed unit strings.

mod csd;
mod types;

pub use csd::{
    dim, field, CSD_GROUP_SPEC, CSD_TYPE_NAME, DATA_UNIT, LOCATION_UNIT, NAMESPACE_NAME,
    NAMESPACE_SPEC, TIME_UNIT,
};
pub use types::{
    AttributeSpec, DatasetSpec, GroupSpec, IncludeSpec, NamespaceSpec, Quantity, SpecDType,
    SpecValue,
};
