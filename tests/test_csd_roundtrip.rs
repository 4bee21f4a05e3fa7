//! End-to-end tests through the umbrella crate
//!
//! Builds CSD records for a linear probe and a 2D array, stores them under a processing
//! module group, dumps the store to JSON on disk and reads everything back.

use ndx_csd::config::{load_config, validate_config};
use ndx_csd::ndarray::{Array, Array2, Array3};
use ndx_csd::prelude::*;
use std::collections::HashMap;
use std::fs;

fn linear_probe_csd() -> CsdRecord {
    let data = Array2::from_shape_fn((101, 32), |(t, x)| {
        ((t * 31 + x * 17) % 97) as f32 * 1.0e-3
    });
    CsdRecord::builder("csd")
        .description("CSD of linear probe")
        .num_trials(50)
        .data(data)
        .time_from_event(Array::linspace(-1.0f32, 1.0, 101))
        .event_description("Stimulus onset")
        .electrodes_reference_frame("0 is bottom (most inferior) of probe, +x is superior")
        .rel_electrode_locations_x(Array::linspace(0.0f32, 0.002, 32))
        .actual_electrodes(true)
        .build()
        .unwrap()
}

fn array_csd() -> CsdRecord {
    let data = Array3::from_shape_fn((101, 10, 3), |(t, x, y)| {
        (t as f32 - 50.0) * (x + y) as f32
    });
    CsdRecord::builder("csd_2d")
        .description("CSD of 2D electrode array")
        .num_trials(12)
        .data(data)
        .time_from_event(Array::linspace(-0.5f32, 0.5, 101))
        .event_description("Reward delivery")
        .electrodes_reference_frame("(0, 0) is the most posterior, most left electrode")
        .rel_electrode_locations_x(Array::linspace(0.0f32, 0.0045, 10))
        .rel_electrode_locations_y(Array::linspace(0.0f32, 0.001, 3))
        .build()
        .unwrap()
}

/// Tests for storing records under a processing module
#[cfg(test)]
mod test_processing_module {
    use super::*;

    #[test]
    fn test_store_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("session.json");
        let records = [linear_probe_csd(), array_csd()];

        let mut store = MemoryStore::new();
        store.create_group("/processing/ecephys").unwrap();
        store
            .set_attribute("/processing/ecephys", "description", "processed ecephys data".into())
            .unwrap();
        for record in &records {
            CsdObjectMapper
                .encode(record, &mut store, "/processing/ecephys")
                .unwrap();
        }
        fs::write(&file, store.to_json(true).unwrap()).unwrap();

        let read_back = MemoryStore::from_json(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(
            read_back.list_groups("/processing/ecephys").unwrap(),
            vec!["csd".to_string(), "csd_2d".to_string()]
        );
        for record in &records {
            let path = format!("/processing/ecephys/{}", record.name());
            let decoded = CsdObjectMapper.decode(&read_back, &path).unwrap();
            assert_eq!(&decoded, record);
        }
    }

    #[test]
    fn test_registry_finds_every_record() {
        let mut store = MemoryStore::new();
        let registry = TypeRegistry::global();
        for record in [linear_probe_csd(), array_csd()] {
            registry
                .encode(&NeurodataObject::from(record), &mut store, "/processing/ecephys")
                .unwrap();
        }

        let names: Vec<String> = store
            .list_groups("/processing/ecephys")
            .unwrap()
            .into_iter()
            .map(|name| {
                let object = registry
                    .decode_any(&store, &format!("/processing/ecephys/{}", name))
                    .unwrap();
                object.name().to_string()
            })
            .collect();
        assert_eq!(names, vec!["csd".to_string(), "csd_2d".to_string()]);
    }

    #[test]
    fn test_config_parent_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("ndx_csd.toml");
        fs::write(&config_path, "[mapping]\nparent_path = \"/analysis/csd\"\n").unwrap();

        let mut cli_args = HashMap::new();
        cli_args.insert("parent_path".to_string(), "/analysis/lfp".to_string());
        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        validate_config(&config).unwrap();

        let mut store = MemoryStore::new();
        let path = CsdObjectMapper
            .encode(&linear_probe_csd(), &mut store, &config.mapping.parent_path)
            .unwrap();
        assert_eq!(path, "/analysis/lfp/csd");
    }
}
