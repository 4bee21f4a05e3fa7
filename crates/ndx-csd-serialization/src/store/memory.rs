// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    join_path, path_segments, AttributeValue, HierarchicalStore, StoreDataset, StoreError,
};

/// One node of the in-memory tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoreGroup {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    groups: BTreeMap<String, StoreGroup>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    datasets: BTreeMap<String, StoreDataset>,
}

/// In-memory [`HierarchicalStore`].
///
/// The whole tree serializes with serde, so a store can be dumped to JSON and loaded
/// back without losing any value. NaN and infinities are written as the strings
/// `"NaN"`, `"Infinity"` and `"-Infinity"`.
///
/// # Example
/// ```
/// use ndx_csd_serialization::{HierarchicalStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.create_group("/processing/ecephys").unwrap();
/// store.set_attribute("/processing/ecephys", "description", "processed ecephys data".into()).unwrap();
///
/// let json = store.to_json(false).unwrap();
/// let restored = MemoryStore::from_json(&json).unwrap();
/// assert_eq!(store, restored);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    root: StoreGroup,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the whole tree to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn group(&self, path: &str) -> Option<&StoreGroup> {
        path_segments(path)
            .into_iter()
            .try_fold(&self.root, |group, segment| group.groups.get(segment))
    }

    fn group_mut(&mut self, path: &str) -> Option<&mut StoreGroup> {
        path_segments(path)
            .into_iter()
            .try_fold(&mut self.root, |group, segment| group.groups.get_mut(segment))
    }

    /// Resolves an attribute target: a group, or failing that, a dataset.
    fn attributes_of(&self, target: &str) -> Option<&BTreeMap<String, AttributeValue>> {
        if let Some(group) = self.group(target) {
            return Some(&group.attributes);
        }
        let (parent, name) = split_last(target)?;
        self.group(&parent)?
            .datasets
            .get(name)
            .map(StoreDataset::attributes)
    }

    fn attributes_of_mut(&mut self, target: &str) -> Option<&mut BTreeMap<String, AttributeValue>> {
        if self.group(target).is_some() {
            return self.group_mut(target).map(|group| &mut group.attributes);
        }
        let (parent, name) = split_last(target)?;
        self.group_mut(&parent)?
            .datasets
            .get_mut(name)
            .map(StoreDataset::attributes_mut)
    }
}

fn split_last(path: &str) -> Option<(String, &str)> {
    let mut segments = path_segments(path);
    let name = segments.pop()?;
    Some((segments.join("/"), name))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/')
}

impl HierarchicalStore for MemoryStore {
    fn create_group(&mut self, path: &str) -> Result<(), StoreError> {
        let segments = path_segments(path);
        let full_path = join_path("", path);
        if segments.is_empty() {
            return Err(StoreError::AlreadyExists(full_path));
        }

        let mut current = &mut self.root;
        for (index, segment) in segments.iter().enumerate() {
            let is_last = index + 1 == segments.len();
            let taken = current.datasets.contains_key(*segment)
                || (is_last && current.groups.contains_key(*segment));
            if taken {
                return Err(StoreError::AlreadyExists(full_path));
            }
            current = current.groups.entry(segment.to_string()).or_default();
        }
        Ok(())
    }

    fn has_group(&self, path: &str) -> bool {
        self.group(path).is_some()
    }

    fn set_attribute(
        &mut self,
        target: &str,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidPath(name.to_string()));
        }
        let attributes = self
            .attributes_of_mut(target)
            .ok_or_else(|| StoreError::NotFound(join_path("", target)))?;
        attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn get_attribute(&self, target: &str, name: &str) -> Result<Option<AttributeValue>, StoreError> {
        let attributes = self
            .attributes_of(target)
            .ok_or_else(|| StoreError::NotFound(join_path("", target)))?;
        Ok(attributes.get(name).cloned())
    }

    fn create_dataset(
        &mut self,
        group: &str,
        name: &str,
        dataset: StoreDataset,
    ) -> Result<(), StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidPath(join_path(group, name)));
        }
        let parent = self
            .group_mut(group)
            .ok_or_else(|| StoreError::NotFound(join_path("", group)))?;
        if parent.datasets.contains_key(name) || parent.groups.contains_key(name) {
            return Err(StoreError::AlreadyExists(join_path(group, name)));
        }
        parent.datasets.insert(name.to_string(), dataset);
        Ok(())
    }

    fn get_dataset(&self, group: &str, name: &str) -> Result<Option<StoreDataset>, StoreError> {
        let parent = self
            .group(group)
            .ok_or_else(|| StoreError::NotFound(join_path("", group)))?;
        Ok(parent.datasets.get(name).cloned())
    }

    fn list_datasets(&self, group: &str) -> Result<Vec<String>, StoreError> {
        let parent = self
            .group(group)
            .ok_or_else(|| StoreError::NotFound(join_path("", group)))?;
        Ok(parent.datasets.keys().cloned().collect())
    }

    fn list_groups(&self, group: &str) -> Result<Vec<String>, StoreError> {
        let parent = self
            .group(group)
            .ok_or_else(|| StoreError::NotFound(join_path("", group)))?;
        Ok(parent.groups.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DatasetValues;

    fn dataset(values: Vec<f32>) -> StoreDataset {
        StoreDataset::new(vec![values.len()], DatasetValues::Float32(values)).unwrap()
    }

    #[test]
    fn test_create_group_creates_parents() {
        let mut store = MemoryStore::new();
        store.create_group("/processing/ecephys").unwrap();
        assert!(store.has_group("/processing"));
        assert!(store.has_group("processing/ecephys"));
        assert_eq!(store.list_groups("/").unwrap(), vec!["processing".to_string()]);
    }

    #[test]
    fn test_create_group_twice_fails() {
        let mut store = MemoryStore::new();
        store.create_group("/a/b").unwrap();
        assert_eq!(
            store.create_group("a/b"),
            Err(StoreError::AlreadyExists("/a/b".to_string()))
        );
        assert!(store.create_group("/").is_err());
    }

    #[test]
    fn test_dataset_attributes() {
        let mut store = MemoryStore::new();
        store.create_group("/csd").unwrap();
        store.create_dataset("/csd", "time", dataset(vec![0.0, 0.5])).unwrap();
        store.set_attribute("/csd/time", "unit", "seconds".into()).unwrap();

        assert_eq!(
            store.get_attribute("/csd/time", "unit").unwrap(),
            Some(AttributeValue::Text("seconds".to_string()))
        );
        assert_eq!(store.get_attribute("/csd", "unit").unwrap(), None);
        let stored = store.get_dataset("/csd", "time").unwrap().unwrap();
        assert_eq!(stored.attribute("unit").and_then(AttributeValue::as_text), Some("seconds"));
    }

    #[test]
    fn test_missing_targets() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.set_attribute("/nowhere", "unit", "meters".into()),
            Err(StoreError::NotFound("/nowhere".to_string()))
        );
        assert!(store.get_dataset("/nowhere", "data").is_err());
        assert!(store.create_dataset("/nowhere", "data", dataset(vec![])).is_err());
        store.create_group("/csd").unwrap();
        assert_eq!(store.get_dataset("/csd", "data").unwrap(), None);
    }

    #[test]
    fn test_names_are_exclusive() {
        let mut store = MemoryStore::new();
        store.create_group("/csd/data").unwrap();
        assert!(store.create_dataset("/csd", "data", dataset(vec![1.0])).is_err());
        store.create_dataset("/csd", "time", dataset(vec![1.0])).unwrap();
        assert!(store.create_group("/csd/time").is_err());
        assert!(store.create_dataset("/csd", "time", dataset(vec![2.0])).is_err());
        assert!(store.create_dataset("/csd", "a/b", dataset(vec![2.0])).is_err());
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let mut store = MemoryStore::new();
        store.create_group("/csd").unwrap();
        store
            .create_dataset("/csd", "values", dataset(vec![0.1, -1.0e-7, 12_345.678, 1.0 / 3.0]))
            .unwrap();
        store.set_attribute("/csd", "num_trials", AttributeValue::UInt(u64::MAX)).unwrap();
        store.set_attribute("/csd", "flag", true.into()).unwrap();

        let restored = MemoryStore::from_json(&store.to_json(true).unwrap()).unwrap();
        assert_eq!(restored, store);
        assert_eq!(restored.list_datasets("/csd").unwrap(), vec!["values".to_string()]);
    }

    #[test]
    fn test_json_round_trip_keeps_non_finite_values() {
        let mut store = MemoryStore::new();
        store.create_group("/csd").unwrap();
        let values = vec![f32::NAN, 1.5, f32::INFINITY, f32::NEG_INFINITY];
        store.create_dataset("/csd", "values", dataset(values.clone())).unwrap();
        store.set_attribute("/csd", "rate", AttributeValue::Float(f64::INFINITY)).unwrap();

        let json = store.to_json(false).unwrap();
        assert!(!json.contains("null"));
        let restored = MemoryStore::from_json(&json).unwrap();
        assert_eq!(restored, store);

        let stored = restored.get_dataset("/csd", "values").unwrap().unwrap();
        match stored.values() {
            DatasetValues::Float32(restored_values) => {
                let bits: Vec<u32> = restored_values.iter().map(|v| v.to_bits()).collect();
                let expected: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
                assert_eq!(bits, expected);
            }
            other => panic!("unexpected dtype {}", other.dtype_name()),
        }
        assert_eq!(
            restored.get_attribute("/csd", "rate").unwrap(),
            Some(AttributeValue::Float(f64::INFINITY))
        );
    }
}
