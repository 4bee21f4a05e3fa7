// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Maps [`CsdRecord`]s onto a [`HierarchicalStore`] and back.
//!
//! Layout of an encoded record under `<parent>/<name>`:
//!
//! ```text
//! <name>/                         neurodata_type, namespace, description, num_trials,
//!                                 actual_electrodes, electrodes_reference_frame
//!   data                          float32, unit = "volts/meters^2"
//!   time_from_event               float32, unit = "seconds", event_description
//!   rel_electrode_locations_x/y/z float32, unit = "meters" (only when present)
//! ```
//!
//! Both directions walk [`CSD_GROUP_SPEC`], so the store layout always follows the schema.

use ndarray::ArrayViewD;
use ndx_csd_structures::schema::{
    field, AttributeSpec, DatasetSpec, SpecDType, CSD_GROUP_SPEC, CSD_TYPE_NAME, NAMESPACE_NAME,
};
use ndx_csd_structures::{ContainerProblem, CsdError, CsdRecord, CsdResult, FieldMap, FieldValue};
use tracing::{debug, warn};

use crate::error::SerializationResult;
use crate::store::{
    join_path, path_name, AttributeValue, HierarchicalStore, StoreDataset, StoreError,
};

/// Group attribute naming the neurodata type of an encoded record.
pub const NEURODATA_TYPE_ATTRIBUTE: &str = "neurodata_type";
/// Group attribute naming the namespace the neurodata type belongs to.
pub const NAMESPACE_ATTRIBUTE: &str = "namespace";

/// Stateless object mapper for the `CSD` type.
///
/// # Example
/// ```
/// use ndarray::{Array, Array2};
/// use ndx_csd_serialization::{CsdObjectMapper, HierarchicalStore, MemoryStore};
/// use ndx_csd_structures::CsdRecord;
///
/// let csd = CsdRecord::builder("csd")
///     .description("CSD of linear probe")
///     .num_trials(50)
///     .data(Array2::<f32>::zeros((101, 32)))
///     .time_from_event(Array::linspace(-1.0f32, 1.0, 101))
///     .event_description("Stimulus onset")
///     .electrodes_reference_frame("0 is bottom of probe, +x is superior")
///     .build()
///     .unwrap();
///
/// let mut store = MemoryStore::new();
/// let path = CsdObjectMapper.encode(&csd, &mut store, "/processing/ecephys").unwrap();
/// assert_eq!(path, "/processing/ecephys/csd");
/// assert_eq!(CsdObjectMapper.decode(&store, &path).unwrap(), csd);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsdObjectMapper;

impl CsdObjectMapper {
    /// Writes a record as a new group `<parent>/<name>` and returns the group path.
    pub fn encode(
        &self,
        record: &CsdRecord,
        store: &mut dyn HierarchicalStore,
        parent: &str,
    ) -> SerializationResult<String> {
        let group = join_path(parent, record.name());
        store.create_group(&group)?;

        store.set_attribute(&group, NEURODATA_TYPE_ATTRIBUTE, CSD_TYPE_NAME.into())?;
        store.set_attribute(&group, NAMESPACE_ATTRIBUTE, NAMESPACE_NAME.into())?;
        for attribute in CSD_GROUP_SPEC.attributes {
            if let Some(value) = record_attribute(record, attribute.name) {
                store.set_attribute(&group, attribute.name, value)?;
            }
        }

        let mut written = 0;
        for spec in CSD_GROUP_SPEC.datasets {
            let Some(array) = record_dataset(record, spec.name) else {
                continue;
            };
            write_dataset(store, &group, spec, array)?;
            let dataset_path = join_path(&group, spec.name);
            for attribute in spec.attributes.iter().filter(|a| a.value.is_none()) {
                if let Some(value) = record_attribute(record, attribute.name) {
                    store.set_attribute(&dataset_path, attribute.name, value)?;
                }
            }
            written += 1;
        }

        debug!(
            "Encoded CSD '{}' at {} with {} datasets",
            record.name(),
            group,
            written
        );
        Ok(group)
    }

    /// Reads the group at `group_path` back into a record.
    ///
    /// Any deviation from the `CSD` layout fails with [`CsdError::MalformedContainer`];
    /// a record is only returned once every field has been read and validated.
    pub fn decode(&self, store: &dyn HierarchicalStore, group_path: &str) -> CsdResult<CsdRecord> {
        let group = join_path("", group_path);
        if !store.has_group(&group) {
            return Err(CsdError::malformed(group, ContainerProblem::MissingGroup));
        }
        let name = path_name(&group).ok_or_else(|| {
            CsdError::malformed(
                group.as_str(),
                ContainerProblem::Unreadable {
                    reason: "the root group cannot hold a CSD".to_string(),
                },
            )
        })?;

        check_type_attribute(store, &group, NEURODATA_TYPE_ATTRIBUTE, CSD_TYPE_NAME, |found| {
            ContainerProblem::WrongNeurodataType { found }
        })?;
        check_type_attribute(store, &group, NAMESPACE_ATTRIBUTE, NAMESPACE_NAME, |found| {
            ContainerProblem::WrongNamespace { found }
        })?;

        let mut fields = FieldMap::new();
        for attribute in CSD_GROUP_SPEC.attributes {
            let stored = store
                .get_attribute(&group, attribute.name)
                .map_err(|error| unreadable(&group, error))?;
            if let Some(value) = attribute_field(&group, attribute, stored)? {
                fields.insert(attribute.name.to_string(), value);
            }
        }

        let misplaced = store
            .get_attribute(&group, field::EVENT_DESCRIPTION)
            .map_err(|error| unreadable(&group, error))?;
        if misplaced.is_some() {
            warn!(
                "Ignoring group level '{}' on {}; it is read from '{}'",
                field::EVENT_DESCRIPTION,
                group,
                field::TIME_FROM_EVENT
            );
        }

        for spec in CSD_GROUP_SPEC.datasets {
            read_dataset(store, &group, spec, &mut fields)?;
        }

        let record = CsdRecord::try_from_fields(name, fields).map_err(|error| {
            CsdError::malformed(
                group.as_str(),
                ContainerProblem::InvalidContents(Box::new(error)),
            )
        })?;
        debug!("Decoded CSD '{}' from {}", record.name(), group);
        Ok(record)
    }
}

//region Encoding

fn record_attribute(record: &CsdRecord, name: &str) -> Option<AttributeValue> {
    match name {
        field::DESCRIPTION => Some(record.description().into()),
        field::NUM_TRIALS => Some(AttributeValue::UInt(record.num_trials())),
        field::ACTUAL_ELECTRODES => Some(record.actual_electrodes().into()),
        field::ELECTRODES_REFERENCE_FRAME => Some(record.electrodes_reference_frame().into()),
        field::EVENT_DESCRIPTION => Some(record.event_description().into()),
        _ => None,
    }
}

fn record_dataset<'a>(record: &'a CsdRecord, name: &str) -> Option<ArrayViewD<'a, f32>> {
    match name {
        field::DATA => Some(record.data().view()),
        field::TIME_FROM_EVENT => Some(record.time_from_event().view().into_dyn()),
        _ => record
            .rel_electrode_locations()
            .into_iter()
            .find(|(field_name, _)| *field_name == name)
            .and_then(|(_, locations)| locations)
            .map(|locations| locations.view().into_dyn()),
    }
}

fn write_dataset(
    store: &mut dyn HierarchicalStore,
    group: &str,
    spec: &DatasetSpec,
    array: ArrayViewD<'_, f32>,
) -> Result<(), StoreError> {
    let mut dataset = StoreDataset::from_f32_array(array);
    if let Some(labels) = spec.dims_for_rank(dataset.rank()) {
        dataset = dataset.with_dims(labels.iter().copied())?;
    }
    store.create_dataset(group, spec.name, dataset)?;
    if let Some(unit) = spec.fixed_unit() {
        store.set_attribute(&join_path(group, spec.name), field::UNIT, unit.into())?;
    }
    Ok(())
}

//endregion

//region Decoding

fn unreadable(location: &str, error: StoreError) -> CsdError {
    CsdError::malformed(
        location,
        ContainerProblem::Unreadable {
            reason: error.to_string(),
        },
    )
}

/// Type identification attributes are optional, but must match when present.
fn check_type_attribute(
    store: &dyn HierarchicalStore,
    group: &str,
    name: &str,
    expected: &str,
    mismatch: fn(String) -> ContainerProblem,
) -> CsdResult<()> {
    let stored = store
        .get_attribute(group, name)
        .map_err(|error| unreadable(group, error))?;
    match stored {
        None => Ok(()),
        Some(AttributeValue::Text(found)) if found == expected => Ok(()),
        Some(AttributeValue::Text(found)) => Err(CsdError::malformed(group, mismatch(found))),
        Some(other) => Err(CsdError::malformed(
            group,
            ContainerProblem::WrongAttributeType {
                name: name.to_string(),
                expected: SpecDType::Text.as_str(),
                found: other.type_name(),
            },
        )),
    }
}

/// Converts a stored attribute into a field value, checking presence and type.
fn attribute_field(
    location: &str,
    spec: &AttributeSpec,
    stored: Option<AttributeValue>,
) -> CsdResult<Option<FieldValue>> {
    let Some(stored) = stored else {
        if spec.required {
            return Err(CsdError::malformed(
                location,
                ContainerProblem::MissingAttribute {
                    name: spec.name.to_string(),
                },
            ));
        }
        return Ok(None);
    };

    let value = match (spec.dtype, stored) {
        (SpecDType::Text, AttributeValue::Text(text)) => FieldValue::Text(text),
        (SpecDType::Bool, AttributeValue::Bool(flag)) => FieldValue::Bool(flag),
        (SpecDType::Uint64, AttributeValue::UInt(value)) => FieldValue::UInt(value),
        // Signed values are handed on so a negative count is reported by the record.
        (SpecDType::Uint64, AttributeValue::Int(value)) => FieldValue::Int(value),
        (dtype, other) => {
            return Err(CsdError::malformed(
                location,
                ContainerProblem::WrongAttributeType {
                    name: spec.name.to_string(),
                    expected: dtype.as_str(),
                    found: other.type_name(),
                },
            ))
        }
    };
    Ok(Some(value))
}

fn read_dataset(
    store: &dyn HierarchicalStore,
    group: &str,
    spec: &DatasetSpec,
    fields: &mut FieldMap,
) -> CsdResult<()> {
    let location = join_path(group, spec.name);
    let stored = store
        .get_dataset(group, spec.name)
        .map_err(|error| unreadable(&location, error))?;
    let Some(dataset) = stored else {
        if spec.is_required() {
            return Err(CsdError::malformed(location, ContainerProblem::MissingDataset));
        }
        return Ok(());
    };

    let found_dtype = dataset.values().dtype_name();
    if found_dtype != spec.dtype.as_str() {
        return Err(CsdError::malformed(
            location,
            ContainerProblem::WrongDType {
                expected: spec.dtype.as_str(),
                found: found_dtype.to_string(),
            },
        ));
    }
    if spec.dims_for_rank(dataset.rank()).is_none() {
        return Err(CsdError::malformed(
            location,
            ContainerProblem::WrongRank {
                expected: spec.describe_ranks(),
                found: dataset.rank(),
            },
        ));
    }
    if let Some(expected) = spec.fixed_unit() {
        check_unit(&location, &dataset, expected)?;
    }

    let array = dataset.to_f32_array().ok_or_else(|| {
        CsdError::malformed(
            location.as_str(),
            ContainerProblem::Unreadable {
                reason: "stored values do not fill the stored shape".to_string(),
            },
        )
    })?;
    fields.insert(spec.name.to_string(), FieldValue::Array(array));

    for attribute in spec.attributes.iter().filter(|a| a.value.is_none()) {
        let stored = dataset.attribute(attribute.name).cloned();
        if let Some(value) = attribute_field(&location, attribute, stored)? {
            fields.insert(attribute.name.to_string(), value);
        }
    }
    Ok(())
}

fn check_unit(location: &str, dataset: &StoreDataset, expected: &'static str) -> CsdResult<()> {
    match dataset.attribute(field::UNIT) {
        None => Err(CsdError::malformed(
            location,
            ContainerProblem::MissingAttribute {
                name: field::UNIT.to_string(),
            },
        )),
        Some(AttributeValue::Text(found)) if found == expected => Ok(()),
        Some(AttributeValue::Text(found)) => Err(CsdError::malformed(
            location,
            ContainerProblem::UnitMismatch {
                expected,
                found: found.clone(),
            },
        )),
        Some(other) => Err(CsdError::malformed(
            location,
            ContainerProblem::WrongAttributeType {
                name: field::UNIT.to_string(),
                expected: SpecDType::Text.as_str(),
                found: other.type_name(),
            },
        )),
    }
}

//endregion
