// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ndarray::{Array, ArrayD, Dimension};

use super::{validation, CsdRecord};
use crate::CsdResult;

/// Collects the fields of a [`CsdRecord`] and validates them all at once in [`build`].
///
/// Required: `description`, `num_trials`, `data`, `time_from_event`, `event_description`,
/// `electrodes_reference_frame`. Everything else is optional; `actual_electrodes`
/// defaults to `false`.
///
/// Arrays of any dimensionality are accepted here. Their rank is checked by `build`.
///
/// [`build`]: CsdRecordBuilder::build
#[derive(Debug, Clone, Default)]
pub struct CsdRecordBuilder {
    pub(super) name: String,
    pub(super) description: Option<String>,
    pub(super) num_trials: Option<u64>,
    pub(super) data: Option<ArrayD<f32>>,
    pub(super) time_from_event: Option<ArrayD<f32>>,
    pub(super) event_description: Option<String>,
    pub(super) electrodes_reference_frame: Option<String>,
    /// x, y, z
    pub(super) rel_electrode_locations: [Option<ArrayD<f32>>; 3],
    pub(super) actual_electrodes: bool,
}

impl CsdRecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn num_trials(mut self, num_trials: u64) -> Self {
        self.num_trials = Some(num_trials);
        self
    }

    /// CSD values, time first, then up to three spatial axes.
    pub fn data<D: Dimension>(mut self, data: Array<f32, D>) -> Self {
        self.data = Some(data.into_dyn());
        self
    }

    pub fn time_from_event<D: Dimension>(mut self, time_from_event: Array<f32, D>) -> Self {
        self.time_from_event = Some(time_from_event.into_dyn());
        self
    }

    pub fn event_description(mut self, event_description: impl Into<String>) -> Self {
        self.event_description = Some(event_description.into());
        self
    }

    pub fn electrodes_reference_frame(mut self, reference_frame: impl Into<String>) -> Self {
        self.electrodes_reference_frame = Some(reference_frame.into());
        self
    }

    pub fn rel_electrode_locations_x<D: Dimension>(mut self, locations: Array<f32, D>) -> Self {
        self.rel_electrode_locations[0] = Some(locations.into_dyn());
        self
    }

    pub fn rel_electrode_locations_y<D: Dimension>(mut self, locations: Array<f32, D>) -> Self {
        self.rel_electrode_locations[1] = Some(locations.into_dyn());
        self
    }

    pub fn rel_electrode_locations_z<D: Dimension>(mut self, locations: Array<f32, D>) -> Self {
        self.rel_electrode_locations[2] = Some(locations.into_dyn());
        self
    }

    pub fn actual_electrodes(mut self, actual_electrodes: bool) -> Self {
        self.actual_electrodes = actual_electrodes;
        self
    }

    /// Validates every field and produces the record.
    ///
    /// Nothing is constructed if any check fails.
    pub fn build(self) -> CsdResult<CsdRecord> {
        validation::validate(self)
    }
}
