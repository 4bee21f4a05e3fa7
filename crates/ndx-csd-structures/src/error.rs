// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Result type for CSD operations
pub type CsdResult<T> = Result<T, CsdError>;

/// Common error type for constructing and decoding CSD records.
///
/// Every variant names the field or store location at fault and the constraint it broke.
///
/// # Examples
/// ```
/// use ndx_csd_structures::{CsdError, Violation};
///
/// let error = CsdError::violation("num_trials", Violation::Negative { value: -3 });
/// assert!(error.is_schema_violation());
/// assert_eq!(error.to_string(), "Schema violation on 'num_trials': value -3 is negative");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsdError {
    /// A caller supplied field breaks a structural or type constraint
    #[error("Schema violation on '{field}': {violation}")]
    SchemaViolation { field: String, violation: Violation },

    /// A hierarchical store does not hold the expected layout
    #[error("Malformed container at '{location}': {problem}")]
    MalformedContainer {
        location: String,
        problem: ContainerProblem,
    },
}

impl CsdError {
    pub fn violation(field: impl Into<String>, violation: Violation) -> Self {
        CsdError::SchemaViolation {
            field: field.into(),
            violation,
        }
    }

    pub fn malformed(location: impl Into<String>, problem: ContainerProblem) -> Self {
        CsdError::MalformedContainer {
            location: location.into(),
            problem,
        }
    }

    pub fn is_schema_violation(&self) -> bool {
        matches!(self, CsdError::SchemaViolation { .. })
    }

    pub fn is_malformed_container(&self) -> bool {
        matches!(self, CsdError::MalformedContainer { .. })
    }

    /// The field (for schema violations) or store location (for malformed containers).
    pub fn subject(&self) -> &str {
        match self {
            CsdError::SchemaViolation { field, .. } => field,
            CsdError::MalformedContainer { location, .. } => location,
        }
    }
}

/// The specific constraint a field failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("required field is missing")]
    Missing,

    #[error("expected {expected}, got {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected rank {expected}, got rank {found}")]
    WrongRank { expected: String, found: usize },

    #[error("length {found} does not match data axis {axis} of length {expected}")]
    LengthMismatch {
        axis: usize,
        expected: usize,
        found: usize,
    },

    #[error("not permitted when data has rank {data_rank}")]
    NotPermittedForRank { data_rank: usize },

    #[error("value {value} is negative")]
    Negative { value: i64 },

    #[error("{reason}")]
    Invalid { reason: String },
}

/// The specific way a stored group deviates from the expected layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContainerProblem {
    #[error("group does not exist")]
    MissingGroup,

    #[error("required dataset is missing")]
    MissingDataset,

    #[error("required attribute '{name}' is missing")]
    MissingAttribute { name: String },

    #[error("stored dtype is {found}, expected {expected}")]
    WrongDType { expected: &'static str, found: String },

    #[error("stored rank is {found}, expected rank {expected}")]
    WrongRank { expected: String, found: usize },

    #[error("attribute '{name}' is stored as {found}, expected {expected}")]
    WrongAttributeType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unit is '{found}', expected '{expected}'")]
    UnitMismatch { expected: &'static str, found: String },

    #[error("group holds neurodata type '{found}'")]
    WrongNeurodataType { found: String },

    #[error("group belongs to namespace '{found}'")]
    WrongNamespace { found: String },

    #[error("store could not be read: {reason}")]
    Unreadable { reason: String },

    #[error("stored contents are invalid: {0}")]
    InvalidContents(Box<CsdError>),
}
