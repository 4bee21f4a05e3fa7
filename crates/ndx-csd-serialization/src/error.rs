// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ndx_csd_structures::CsdError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while writing records or schema files
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error(transparent)]
    Csd(#[from] CsdError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No type '{neurodata_type}' registered in namespace '{namespace}'")]
    UnknownType {
        namespace: String,
        neurodata_type: String,
    },
}

pub type SerializationResult<T> = Result<T, SerializationError>;
