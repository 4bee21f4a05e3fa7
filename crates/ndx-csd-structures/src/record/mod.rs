// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The validated CSD container.

mod builder;
mod fields;
mod validation;

pub use builder::CsdRecordBuilder;
pub use fields::{FieldMap, FieldValue};

use ndarray::{Array, Array1, ArrayD, Dimension};

use crate::schema::{field, DATA_UNIT, LOCATION_UNIT, TIME_UNIT};
use crate::{CsdError, CsdResult, Violation};

/// Results of a current source density (CSD) analysis.
///
/// A record is fully validated when it is built and cannot be modified afterwards.
/// Units are not stored: they are fixed by the schema and returned by [`data_unit`],
/// [`time_unit`] and [`location_unit`].
///
/// # Example
/// ```
/// use ndarray::{Array, Array2};
/// use ndx_csd_structures::CsdRecord;
///
/// let csd = CsdRecord::builder("csd")
///     .description("CSD of linear probe")
///     .num_trials(50)
///     .data(Array2::<f32>::zeros((101, 32)))
///     .time_from_event(Array::linspace(-1.0f32, 1.0, 101))
///     .event_description("Stimulus onset")
///     .electrodes_reference_frame("0 is bottom of probe, +x is superior")
///     .rel_electrode_locations_x(Array::linspace(0.0f32, 0.002, 32))
///     .build()
///     .unwrap();
///
/// assert_eq!(csd.spatial_rank(), 1);
/// assert_eq!(csd.data_unit(), "volts/meters^2");
/// assert!(csd.rel_electrode_locations_y().is_none());
/// ```
///
/// [`data_unit`]: CsdRecord::data_unit
/// [`time_unit`]: CsdRecord::time_unit
/// [`location_unit`]: CsdRecord::location_unit
#[derive(Debug, Clone)]
pub struct CsdRecord {
    name: String,
    description: String,
    num_trials: u64,
    data: ArrayD<f32>,
    time_from_event: Array1<f32>,
    event_description: String,
    electrodes_reference_frame: String,
    rel_electrode_locations_x: Option<Array1<f32>>,
    rel_electrode_locations_y: Option<Array1<f32>>,
    rel_electrode_locations_z: Option<Array1<f32>>,
    actual_electrodes: bool,
}

impl CsdRecord {
    //region Constructors

    pub fn builder(name: impl Into<String>) -> CsdRecordBuilder {
        CsdRecordBuilder::new(name)
    }

    /// Builds a record from loosely typed field values.
    ///
    /// Used where fields arrive without static types, such as registry driven
    /// construction and decoding. Besides the checks of [`CsdRecordBuilder::build`] this
    /// rejects values of the wrong type, a negative `num_trials` and unknown field names.
    ///
    /// # Example
    /// ```
    /// use ndx_csd_structures::{CsdRecord, FieldMap, FieldValue};
    ///
    /// let mut fields = FieldMap::new();
    /// fields.insert("num_trials".into(), FieldValue::Int(-1));
    /// let error = CsdRecord::try_from_fields("csd", fields).unwrap_err();
    /// assert_eq!(error.subject(), "num_trials");
    /// ```
    pub fn try_from_fields(name: impl Into<String>, mut fields: FieldMap) -> CsdResult<CsdRecord> {
        let mut builder = CsdRecordBuilder::new(name);

        builder.description = take_text(&mut fields, field::DESCRIPTION)?;
        builder.num_trials = take_unsigned(&mut fields, field::NUM_TRIALS)?;
        builder.data = take_array(&mut fields, field::DATA)?;
        builder.time_from_event = take_array(&mut fields, field::TIME_FROM_EVENT)?;
        builder.event_description = take_text(&mut fields, field::EVENT_DESCRIPTION)?;
        builder.electrodes_reference_frame =
            take_text(&mut fields, field::ELECTRODES_REFERENCE_FRAME)?;
        for (slot, name) in builder
            .rel_electrode_locations
            .iter_mut()
            .zip(field::REL_ELECTRODE_LOCATIONS)
        {
            *slot = take_array(&mut fields, name)?;
        }
        if let Some(actual_electrodes) = take_bool(&mut fields, field::ACTUAL_ELECTRODES)? {
            builder.actual_electrodes = actual_electrodes;
        }

        if let Some(unknown) = fields.keys().next() {
            return Err(CsdError::violation(
                unknown.as_str(),
                Violation::Invalid {
                    reason: "not a field of CSD".to_string(),
                },
            ));
        }

        builder.build()
    }

    //endregion

    //region Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn num_trials(&self) -> u64 {
        self.num_trials
    }

    /// CSD values, shaped (time, x[, y[, z]]).
    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn time_from_event(&self) -> &Array1<f32> {
        &self.time_from_event
    }

    pub fn event_description(&self) -> &str {
        &self.event_description
    }

    pub fn electrodes_reference_frame(&self) -> &str {
        &self.electrodes_reference_frame
    }

    pub fn rel_electrode_locations_x(&self) -> Option<&Array1<f32>> {
        self.rel_electrode_locations_x.as_ref()
    }

    pub fn rel_electrode_locations_y(&self) -> Option<&Array1<f32>> {
        self.rel_electrode_locations_y.as_ref()
    }

    pub fn rel_electrode_locations_z(&self) -> Option<&Array1<f32>> {
        self.rel_electrode_locations_z.as_ref()
    }

    /// Coordinate arrays in axis order (x, y, z), paired with their field names.
    pub fn rel_electrode_locations(&self) -> [(&'static str, Option<&Array1<f32>>); 3] {
        let [x, y, z] = field::REL_ELECTRODE_LOCATIONS;
        [
            (x, self.rel_electrode_locations_x()),
            (y, self.rel_electrode_locations_y()),
            (z, self.rel_electrode_locations_z()),
        ]
    }

    pub fn actual_electrodes(&self) -> bool {
        self.actual_electrodes
    }

    /// Number of time samples (length of the first axis of `data`).
    pub fn num_times(&self) -> usize {
        self.time_from_event.len()
    }

    /// Number of spatial axes of `data` (1 to 3).
    pub fn spatial_rank(&self) -> usize {
        self.data.ndim() - 1
    }

    //endregion

    //region Units

    pub fn data_unit(&self) -> &'static str {
        DATA_UNIT
    }

    pub fn time_unit(&self) -> &'static str {
        TIME_UNIT
    }

    pub fn location_unit(&self) -> &'static str {
        LOCATION_UNIT
    }

    //endregion
}

/// Field-for-field equality. Array elements compare by value except that NaNs in the
/// same position are equal, so a record always equals itself.
impl PartialEq for CsdRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.num_trials == other.num_trials
            && arrays_equal(&self.data, &other.data)
            && arrays_equal(&self.time_from_event, &other.time_from_event)
            && self.event_description == other.event_description
            && self.electrodes_reference_frame == other.electrodes_reference_frame
            && optional_arrays_equal(
                &self.rel_electrode_locations_x,
                &other.rel_electrode_locations_x,
            )
            && optional_arrays_equal(
                &self.rel_electrode_locations_y,
                &other.rel_electrode_locations_y,
            )
            && optional_arrays_equal(
                &self.rel_electrode_locations_z,
                &other.rel_electrode_locations_z,
            )
            && self.actual_electrodes == other.actual_electrodes
    }
}

fn arrays_equal<D: Dimension>(a: &Array<f32, D>, b: &Array<f32, D>) -> bool {
    a.shape() == b.shape()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

fn optional_arrays_equal(a: &Option<Array1<f32>>, b: &Option<Array1<f32>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => arrays_equal(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn take_text(fields: &mut FieldMap, name: &str) -> CsdResult<Option<String>> {
    match fields.remove(name) {
        None => Ok(None),
        Some(FieldValue::Text(text)) => Ok(Some(text)),
        Some(other) => Err(wrong_type(name, "text", &other)),
    }
}

fn take_bool(fields: &mut FieldMap, name: &str) -> CsdResult<Option<bool>> {
    match fields.remove(name) {
        None => Ok(None),
        Some(FieldValue::Bool(flag)) => Ok(Some(flag)),
        Some(other) => Err(wrong_type(name, "bool", &other)),
    }
}

fn take_unsigned(fields: &mut FieldMap, name: &str) -> CsdResult<Option<u64>> {
    match fields.remove(name) {
        None => Ok(None),
        Some(FieldValue::UInt(value)) => Ok(Some(value)),
        Some(FieldValue::Int(value)) => u64::try_from(value)
            .map(Some)
            .map_err(|_| CsdError::violation(name, Violation::Negative { value })),
        Some(other) => Err(wrong_type(name, "unsigned integer", &other)),
    }
}

fn take_array(fields: &mut FieldMap, name: &str) -> CsdResult<Option<ArrayD<f32>>> {
    match fields.remove(name) {
        None => Ok(None),
        Some(FieldValue::Array(array)) => Ok(Some(array)),
        Some(other) => Err(wrong_type(name, "float32 array", &other)),
    }
}

fn wrong_type(name: &str, expected: &'static str, found: &FieldValue) -> CsdError {
    CsdError::violation(
        name,
        Violation::WrongType {
            expected,
            found: found.type_name(),
        },
    )
}
