//! Tests for the CSD object mapper
//!
//! Encodes records into a `MemoryStore`, decodes them back, and checks how decoding
//! reports stores that do not follow the CSD layout.

use ndarray::{Array, Array1, ArrayD, Dimension, IxDyn};
use ndx_csd_serialization::{
    AttributeValue, CsdObjectMapper, DatasetValues, HierarchicalStore, MemoryStore,
    NeurodataObject, StoreDataset, TypeRegistry,
};
use ndx_csd_structures::{ContainerProblem, CsdError, CsdRecord, Violation};

const NUM_TIMES: usize = 101;
const PARENT: &str = "/processing/ecephys";

fn pseudo_random_data(shape: &[usize]) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(shape), |index| {
        let seed: usize = index.slice().iter().enumerate().map(|(i, v)| (i + 5) * v).sum();
        ((seed * 104_729) % 2000) as f32 / 1000.0 - 1.0
    })
}

fn locations(len: usize) -> Array1<f32> {
    Array::linspace(0.0f32, 0.002, len)
}

fn record_with_shape(shape: &[usize]) -> CsdRecord {
    let mut builder = CsdRecord::builder("csd")
        .description("CSD of electrode array")
        .num_trials(50)
        .data(pseudo_random_data(shape))
        .time_from_event(Array::linspace(-1.0f32, 1.0, shape[0]))
        .event_description("Stimulus onset")
        .electrodes_reference_frame("0 is bottom (most inferior) of probe, +x is superior")
        .actual_electrodes(true);
    builder = builder.rel_electrode_locations_x(locations(shape[1]));
    if shape.len() > 2 {
        builder = builder.rel_electrode_locations_y(locations(shape[2]));
    }
    if shape.len() > 3 {
        builder = builder.rel_electrode_locations_z(locations(shape[3]));
    }
    builder.build().unwrap()
}

fn encoded(record: &CsdRecord) -> (MemoryStore, String) {
    let mut store = MemoryStore::new();
    let path = CsdObjectMapper.encode(record, &mut store, PARENT).unwrap();
    (store, path)
}

/// Copies an encoded group, leaving out one dataset.
fn without_dataset(store: &MemoryStore, group: &str, skipped: &str) -> MemoryStore {
    let mut copy = MemoryStore::new();
    copy.create_group(group).unwrap();
    for name in [
        "neurodata_type",
        "namespace",
        "description",
        "num_trials",
        "actual_electrodes",
        "electrodes_reference_frame",
    ] {
        if let Some(value) = store.get_attribute(group, name).unwrap() {
            copy.set_attribute(group, name, value).unwrap();
        }
    }
    for name in store.list_datasets(group).unwrap() {
        if name != skipped {
            let dataset = store.get_dataset(group, &name).unwrap().unwrap();
            copy.create_dataset(group, &name, dataset).unwrap();
        }
    }
    copy
}

fn expect_malformed(result: Result<CsdRecord, CsdError>) -> (String, ContainerProblem) {
    match result {
        Err(CsdError::MalformedContainer { location, problem }) => (location, problem),
        other => panic!("expected a malformed container, got {:?}", other),
    }
}

/// Tests for the encoded layout
#[cfg(test)]
mod test_encode {
    use super::*;

    #[test]
    fn test_2d_array_writes_four_datasets() {
        let record = record_with_shape(&[NUM_TIMES, 10, 3]);
        assert!(record.rel_electrode_locations_z().is_none());

        let (store, path) = encoded(&record);
        assert_eq!(path, "/processing/ecephys/csd");
        assert_eq!(
            store.list_datasets(&path).unwrap(),
            vec![
                "data".to_string(),
                "rel_electrode_locations_x".to_string(),
                "rel_electrode_locations_y".to_string(),
                "time_from_event".to_string(),
            ]
        );
        assert!(store.list_groups(&path).unwrap().is_empty());
    }

    #[test]
    fn test_group_attributes() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let attribute = |name: &str| store.get_attribute(&path, name).unwrap();

        assert_eq!(
            attribute("description"),
            Some(AttributeValue::from("CSD of electrode array"))
        );
        assert_eq!(attribute("num_trials"), Some(AttributeValue::UInt(50)));
        assert_eq!(attribute("actual_electrodes"), Some(AttributeValue::Bool(true)));
        assert_eq!(attribute("neurodata_type"), Some(AttributeValue::from("CSD")));
        assert_eq!(attribute("namespace"), Some(AttributeValue::from("ndx-csd")));
        assert_eq!(attribute("event_description"), None);
    }

    #[test]
    fn test_event_description_lives_on_time_from_event() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let time = store.get_dataset(&path, "time_from_event").unwrap().unwrap();
        assert_eq!(
            time.attribute("event_description"),
            Some(&AttributeValue::Text("Stimulus onset".to_string()))
        );
        assert_eq!(time.attribute("unit"), Some(&AttributeValue::from("seconds")));
        assert_eq!(time.dims(), &["num_times".to_string()]);
    }

    #[test]
    fn test_data_dims_follow_rank() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 4, 3, 2]));
        let data = store.get_dataset(&path, "data").unwrap().unwrap();
        assert_eq!(data.shape(), &[NUM_TIMES, 4, 3, 2]);
        assert_eq!(
            data.dims(),
            &[
                "num_times".to_string(),
                "num_electrodes_x".to_string(),
                "num_electrodes_y".to_string(),
                "num_electrodes_z".to_string(),
            ]
        );
        let z = store.get_dataset(&path, "rel_electrode_locations_z").unwrap().unwrap();
        assert_eq!(z.attribute("unit"), Some(&AttributeValue::from("meters")));
    }
}

/// Tests for decode(encode(record)) == record
#[cfg(test)]
mod test_round_trip {
    use super::*;

    #[test]
    fn test_round_trip_every_rank() {
        for shape in [
            vec![NUM_TIMES, 32],
            vec![NUM_TIMES, 10, 3],
            vec![NUM_TIMES, 4, 3, 2],
        ] {
            let record = record_with_shape(&shape);
            let (store, path) = encoded(&record);
            let decoded = CsdObjectMapper.decode(&store, &path).unwrap();
            assert_eq!(decoded, record, "round trip failed for shape {:?}", shape);
        }
    }

    #[test]
    fn test_round_trip_without_optional_fields() {
        let record = CsdRecord::builder("bare")
            .description("no coordinates")
            .num_trials(0)
            .data(pseudo_random_data(&[5, 2]))
            .time_from_event(Array::linspace(0.0f32, 0.004, 5))
            .event_description("trigger")
            .electrodes_reference_frame("unknown")
            .build()
            .unwrap();
        let (store, path) = encoded(&record);
        assert_eq!(store.list_datasets(&path).unwrap().len(), 2);

        let decoded = CsdObjectMapper.decode(&store, &path).unwrap();
        assert_eq!(decoded, record);
        assert!(!decoded.actual_electrodes());
        assert!(decoded.rel_electrode_locations_x().is_none());
    }

    #[test]
    fn test_round_trip_through_json() {
        let record = record_with_shape(&[NUM_TIMES, 10, 3]);
        let (store, path) = encoded(&record);

        let json = store.to_json(false).unwrap();
        let restored = MemoryStore::from_json(&json).unwrap();
        assert_eq!(restored, store);
        assert_eq!(CsdObjectMapper.decode(&restored, &path).unwrap(), record);
    }

    #[test]
    fn test_round_trip_with_non_finite_values() {
        let mut data = pseudo_random_data(&[2, 2]);
        data[[0, 1]] = f32::NAN;
        data[[1, 0]] = f32::INFINITY;
        let record = CsdRecord::builder("csd_gaps")
            .description("interpolated CSD with gaps")
            .num_trials(3)
            .data(data)
            .time_from_event(Array::from(vec![f32::NEG_INFINITY, 0.0]))
            .event_description("Stimulus onset")
            .electrodes_reference_frame("0 is bottom of probe")
            .rel_electrode_locations_x(Array::from(vec![0.0f32, f32::NAN]))
            .build()
            .unwrap();
        assert_eq!(record, record.clone());

        let (store, path) = encoded(&record);
        assert_eq!(CsdObjectMapper.decode(&store, &path).unwrap(), record);

        let json = store.to_json(true).unwrap();
        let restored = MemoryStore::from_json(&json).unwrap();
        assert_eq!(restored, store);
        let decoded = CsdObjectMapper.decode(&restored, &path).unwrap();
        assert_eq!(decoded, record);
        assert!(decoded.data()[[0, 1]].is_nan());
        assert_eq!(decoded.data()[[1, 0]], f32::INFINITY);
    }

    #[test]
    fn test_registry_round_trip() {
        let registry = TypeRegistry::global();
        let record = record_with_shape(&[NUM_TIMES, 32]);
        let mut store = MemoryStore::new();
        let path = registry
            .encode(&NeurodataObject::from(record.clone()), &mut store, PARENT)
            .unwrap();

        let decoded = registry.decode_any(&store, &path).unwrap();
        assert_eq!(decoded.neurodata_type(), "CSD");
        assert_eq!(decoded.as_csd(), Some(&record));
    }
}

/// Tests for stores that do not follow the CSD layout
#[cfg(test)]
mod test_malformed {
    use super::*;

    #[test]
    fn test_missing_data() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let broken = without_dataset(&store, &path, "data");

        let (location, problem) = expect_malformed(CsdObjectMapper.decode(&broken, &path));
        assert_eq!(location, "/processing/ecephys/csd/data");
        assert_eq!(problem, ContainerProblem::MissingDataset);
    }

    #[test]
    fn test_missing_optional_dataset_is_fine() {
        let record = record_with_shape(&[NUM_TIMES, 32]);
        let (store, path) = encoded(&record);
        let copy = without_dataset(&store, &path, "rel_electrode_locations_x");
        let decoded = CsdObjectMapper.decode(&copy, &path).unwrap();
        assert!(decoded.rel_electrode_locations_x().is_none());
    }

    #[test]
    fn test_wrong_unit() {
        let (mut store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        store
            .set_attribute(&format!("{}/data", path), "unit", "volts".into())
            .unwrap();

        let (location, problem) = expect_malformed(CsdObjectMapper.decode(&store, &path));
        assert_eq!(location, "/processing/ecephys/csd/data");
        assert_eq!(
            problem,
            ContainerProblem::UnitMismatch {
                expected: "volts/meters^2",
                found: "volts".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_dtype() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let mut broken = without_dataset(&store, &path, "time_from_event");
        let mut time = StoreDataset::new(
            vec![NUM_TIMES],
            DatasetValues::Float64(vec![0.0; NUM_TIMES]),
        )
        .unwrap();
        time = time.with_dims(["num_times"]).unwrap();
        broken.create_dataset(&path, "time_from_event", time).unwrap();

        let (location, problem) = expect_malformed(CsdObjectMapper.decode(&broken, &path));
        assert_eq!(location, "/processing/ecephys/csd/time_from_event");
        assert_eq!(
            problem,
            ContainerProblem::WrongDType {
                expected: "float32",
                found: "float64".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_rank() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let mut broken = without_dataset(&store, &path, "data");
        let data = StoreDataset::from_f32_array(pseudo_random_data(&[NUM_TIMES]).view());
        broken.create_dataset(&path, "data", data).unwrap();

        let (_, problem) = expect_malformed(CsdObjectMapper.decode(&broken, &path));
        assert_eq!(
            problem,
            ContainerProblem::WrongRank {
                expected: "2, 3 or 4".to_string(),
                found: 1
            }
        );
    }

    #[test]
    fn test_missing_event_description() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let mut broken = without_dataset(&store, &path, "time_from_event");
        let time_values = Array::linspace(-1.0f32, 1.0, NUM_TIMES).into_dyn();
        let time = StoreDataset::from_f32_array(time_values.view());
        broken.create_dataset(&path, "time_from_event", time).unwrap();
        broken
            .set_attribute(&format!("{}/time_from_event", path), "unit", "seconds".into())
            .unwrap();
        // A group level copy does not count.
        broken
            .set_attribute(&path, "event_description", "Stimulus onset".into())
            .unwrap();

        let (location, problem) = expect_malformed(CsdObjectMapper.decode(&broken, &path));
        assert_eq!(location, "/processing/ecephys/csd/time_from_event");
        assert_eq!(
            problem,
            ContainerProblem::MissingAttribute {
                name: "event_description".to_string()
            }
        );
    }

    #[test]
    fn test_inconsistent_lengths_carry_the_violation() {
        let (store, path) = encoded(&record_with_shape(&[NUM_TIMES, 32]));
        let mut broken = without_dataset(&store, &path, "rel_electrode_locations_x");
        let x = StoreDataset::from_f32_array(locations(31).into_dyn().view());
        broken.create_dataset(&path, "rel_electrode_locations_x", x).unwrap();
        broken
            .set_attribute(
                &format!("{}/rel_electrode_locations_x", path),
                "unit",
                "meters".into(),
            )
            .unwrap();

        let (location, problem) = expect_malformed(CsdObjectMapper.decode(&broken, &path));
        assert_eq!(location, path);
        match problem {
            ContainerProblem::InvalidContents(inner) => assert_eq!(
                *inner,
                CsdError::violation(
                    "rel_electrode_locations_x",
                    Violation::LengthMismatch {
                        axis: 1,
                        expected: 32,
                        found: 31
                    }
                )
            ),
            other => panic!("unexpected problem: {}", other),
        }
    }

    #[test]
    fn test_decode_any_without_type_attribute() {
        let mut store = MemoryStore::new();
        store.create_group("/processing/ecephys/csd").unwrap();
        let error = TypeRegistry::global()
            .decode_any(&store, "/processing/ecephys/csd")
            .unwrap_err();
        assert_eq!(
            error,
            CsdError::malformed(
                "/processing/ecephys/csd",
                ContainerProblem::MissingAttribute {
                    name: "neurodata_type".to_string()
                }
            )
        );
    }
}

/// Tests for schema export
#[cfg(test)]
mod test_export {
    use super::*;
    use ndx_csd_serialization::{export_extensions, write_schema_files};

    #[test]
    fn test_extensions_list_datasets_with_units() {
        let extensions = export_extensions();
        let datasets = extensions["groups"][0]["datasets"].as_array().unwrap();
        let units: Vec<(String, String)> = datasets
            .iter()
            .map(|dataset| {
                let unit = dataset["attributes"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .find(|attribute| attribute["name"] == "unit")
                    .unwrap();
                (
                    dataset["name"].as_str().unwrap().to_string(),
                    unit["value"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            units,
            vec![
                ("data".to_string(), "volts/meters^2".to_string()),
                ("time_from_event".to_string(), "seconds".to_string()),
                ("rel_electrode_locations_x".to_string(), "meters".to_string()),
                ("rel_electrode_locations_y".to_string(), "meters".to_string()),
                ("rel_electrode_locations_z".to_string(), "meters".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("spec");
        let written = write_schema_files(&target, true).unwrap();
        assert_eq!(written.len(), 2);
        assert!(target.join("ndx-csd.namespace.json").is_file());

        let text = std::fs::read_to_string(target.join("ndx-csd.extensions.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, export_extensions());
    }
}
