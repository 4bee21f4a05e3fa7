// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Construction time checks, driven by [`CSD_GROUP_SPEC`].

use ndarray::{Array1, ArrayD, Ix1};

use super::{CsdRecord, CsdRecordBuilder};
use crate::schema::{field, DatasetSpec, CSD_GROUP_SPEC};
use crate::{CsdError, CsdResult, Violation};

pub(super) fn validate(builder: CsdRecordBuilder) -> CsdResult<CsdRecord> {
    let CsdRecordBuilder {
        name,
        description,
        num_trials,
        data,
        time_from_event,
        event_description,
        electrodes_reference_frame,
        rel_electrode_locations,
        actual_electrodes,
    } = builder;

    validate_name(&name)?;
    let description = require(field::DESCRIPTION, description)?;
    let num_trials = require(field::NUM_TRIALS, num_trials)?;
    let event_description = require(field::EVENT_DESCRIPTION, event_description)?;
    let electrodes_reference_frame =
        require(field::ELECTRODES_REFERENCE_FRAME, electrodes_reference_frame)?;

    let data = require(field::DATA, data)?;
    let data_spec = dataset_spec(field::DATA)?;
    let data_dims = data_spec.dims_for_rank(data.ndim()).ok_or_else(|| {
        CsdError::violation(
            field::DATA,
            Violation::WrongRank {
                expected: data_spec.describe_ranks(),
                found: data.ndim(),
            },
        )
    })?;

    let axes = DataAxes {
        shape: data.shape(),
        labels: data_dims,
    };

    let time_from_event = require(field::TIME_FROM_EVENT, time_from_event)?;
    let time_from_event = axes.check(field::TIME_FROM_EVENT, time_from_event)?;

    let [x, y, z] = rel_electrode_locations;
    let [name_x, name_y, name_z] = field::REL_ELECTRODE_LOCATIONS;
    let rel_electrode_locations_x = x.map(|x| axes.check(name_x, x)).transpose()?;
    let rel_electrode_locations_y = y.map(|y| axes.check(name_y, y)).transpose()?;
    let rel_electrode_locations_z = z.map(|z| axes.check(name_z, z)).transpose()?;

    Ok(CsdRecord {
        name,
        description,
        num_trials,
        data,
        time_from_event,
        event_description,
        electrodes_reference_frame,
        rel_electrode_locations_x,
        rel_electrode_locations_y,
        rel_electrode_locations_z,
        actual_electrodes,
    })
}

/// Shape of `data` together with the dimension labels of its rank.
struct DataAxes<'a> {
    shape: &'a [usize],
    labels: &'static [&'static str],
}

impl DataAxes<'_> {
    /// Checks a 1-D dataset that indexes one axis of `data`. The axis is found by
    /// matching the dataset's dimension label against the labels of `data`.
    fn check(&self, name: &str, array: ArrayD<f32>) -> CsdResult<Array1<f32>> {
        let spec = dataset_spec(name)?;
        let label = spec
            .dims_for_rank(array.ndim())
            .and_then(|labels| labels.first())
            .ok_or_else(|| {
                CsdError::violation(
                    name,
                    Violation::WrongRank {
                        expected: spec.describe_ranks(),
                        found: array.ndim(),
                    },
                )
            })?;

        let axis = self
            .labels
            .iter()
            .position(|data_label| data_label == label)
            .ok_or_else(|| {
                CsdError::violation(
                    name,
                    Violation::NotPermittedForRank {
                        data_rank: self.shape.len(),
                    },
                )
            })?;

        let expected = self.shape[axis];
        if array.len() != expected {
            return Err(CsdError::violation(
                name,
                Violation::LengthMismatch {
                    axis,
                    expected,
                    found: array.len(),
                },
            ));
        }

        array.into_dimensionality::<Ix1>().map_err(|e| {
            CsdError::violation(
                name,
                Violation::Invalid {
                    reason: e.to_string(),
                },
            )
        })
    }
}

fn dataset_spec(name: &str) -> CsdResult<&'static DatasetSpec> {
    CSD_GROUP_SPEC.dataset(name).ok_or_else(|| {
        CsdError::violation(
            name,
            Violation::Invalid {
                reason: format!("not declared by the {} schema", CSD_GROUP_SPEC.neurodata_type_def),
            },
        )
    })
}

fn require<T>(field: &str, value: Option<T>) -> CsdResult<T> {
    value.ok_or_else(|| CsdError::violation(field, Violation::Missing))
}

/// The name becomes a path segment in hierarchical stores.
fn validate_name(name: &str) -> CsdResult<()> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.contains('/') {
        "name must not contain '/'"
    } else {
        return Ok(());
    };
    Err(CsdError::violation(
        field::NAME,
        Violation::Invalid {
            reason: reason.to_string(),
        },
    ))
}
