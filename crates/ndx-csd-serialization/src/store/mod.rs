// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Generic hierarchical store abstraction.
//!
//! A store is a tree of named groups. Each group holds named scalar attributes and
//! named multi-dimensional datasets, and each dataset carries its own attributes.
//! Paths are `/` separated; the root group is `""` or `"/"`.

mod memory;
mod non_finite;

pub use memory::MemoryStore;

use std::collections::BTreeMap;

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No group or dataset at '{0}'")]
    NotFound(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("Invalid path '{0}'")]
    InvalidPath(String),

    #[error("Dataset shape {shape:?} holds {expected} values, got {found}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },

    #[error("Dataset has {rank} axes but {labels} dimension labels")]
    DimsMismatch { rank: usize, labels: usize },
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(#[serde(with = "non_finite::scalar")] f64),
}

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Text(_) => "text",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::UInt(_) => "unsigned integer",
            AttributeValue::Int(_) => "signed integer",
            AttributeValue::Float(_) => "float",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::UInt(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

/// Flat, row-major dataset contents tagged with their element type.
///
/// Equality is by value, with NaNs in the same position equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values")]
pub enum DatasetValues {
    #[serde(rename = "float32")]
    Float32(#[serde(with = "non_finite::seq")] Vec<f32>),
    #[serde(rename = "float64")]
    Float64(#[serde(with = "non_finite::seq")] Vec<f64>),
    #[serde(rename = "int64")]
    Int64(Vec<i64>),
}

impl DatasetValues {
    pub fn len(&self) -> usize {
        match self {
            DatasetValues::Float32(values) => values.len(),
            DatasetValues::Float64(values) => values.len(),
            DatasetValues::Int64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, as used in schema files.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            DatasetValues::Float32(_) => "float32",
            DatasetValues::Float64(_) => "float64",
            DatasetValues::Int64(_) => "int64",
        }
    }
}

impl PartialEq for DatasetValues {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DatasetValues::Float32(a), DatasetValues::Float32(b)) => non_finite::slices_equal(a, b),
            (DatasetValues::Float64(a), DatasetValues::Float64(b)) => non_finite::slices_equal(a, b),
            (DatasetValues::Int64(a), DatasetValues::Int64(b)) => a == b,
            _ => false,
        }
    }
}

/// A multi-dimensional dataset with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDataset {
    shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dims: Vec<String>,
    values: DatasetValues,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
}

impl StoreDataset {
    /// Creates a dataset, checking that the values fill the shape exactly.
    pub fn new(shape: Vec<usize>, values: DatasetValues) -> Result<Self, StoreError> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(StoreError::ShapeMismatch {
                shape,
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            shape,
            dims: Vec::new(),
            values,
            attributes: BTreeMap::new(),
        })
    }

    /// Copies a float32 array in logical (row-major) order.
    pub fn from_f32_array(array: ArrayViewD<'_, f32>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            dims: Vec::new(),
            values: DatasetValues::Float32(array.iter().copied().collect()),
            attributes: BTreeMap::new(),
        }
    }

    /// Attaches dimension labels, one per axis.
    pub fn with_dims<S: Into<String>>(
        mut self,
        dims: impl IntoIterator<Item = S>,
    ) -> Result<Self, StoreError> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if !dims.is_empty() && dims.len() != self.shape.len() {
            return Err(StoreError::DimsMismatch {
                rank: self.shape.len(),
                labels: dims.len(),
            });
        }
        self.dims = dims;
        Ok(self)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn values(&self) -> &DatasetValues {
        &self.values
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut BTreeMap<String, AttributeValue> {
        &mut self.attributes
    }

    /// Rebuilds an owned float32 array. `None` if the dataset holds another dtype or the
    /// stored values do not fill the stored shape.
    pub fn to_f32_array(&self) -> Option<ArrayD<f32>> {
        match &self.values {
            DatasetValues::Float32(values) => {
                ArrayD::from_shape_vec(IxDyn(&self.shape), values.clone()).ok()
            }
            _ => None,
        }
    }
}

/// Operations a hierarchical store must provide.
///
/// An attribute target is either a group path or a dataset path (`<group>/<dataset>`).
/// Implementations own their persistence; callers only borrow a store for the duration
/// of one operation.
pub trait HierarchicalStore {
    /// Creates a group, along with any missing parent groups. Fails if the group exists.
    fn create_group(&mut self, path: &str) -> Result<(), StoreError>;

    fn has_group(&self, path: &str) -> bool;

    /// Sets (or replaces) a scalar attribute on a group or dataset.
    fn set_attribute(
        &mut self,
        target: &str,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StoreError>;

    /// Reads an attribute. `Ok(None)` if the target exists but lacks the attribute.
    fn get_attribute(&self, target: &str, name: &str) -> Result<Option<AttributeValue>, StoreError>;

    /// Adds a dataset to an existing group. Fails if the name is taken.
    fn create_dataset(
        &mut self,
        group: &str,
        name: &str,
        dataset: StoreDataset,
    ) -> Result<(), StoreError>;

    /// Reads a dataset. `Ok(None)` if the group exists but holds no such dataset.
    fn get_dataset(&self, group: &str, name: &str) -> Result<Option<StoreDataset>, StoreError>;

    /// Names of the datasets directly inside a group, sorted.
    fn list_datasets(&self, group: &str) -> Result<Vec<String>, StoreError>;

    /// Names of the groups directly inside a group, sorted.
    fn list_groups(&self, group: &str) -> Result<Vec<String>, StoreError>;
}

/// Splits a path into its non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Joins a parent path and a child name into a normalized absolute path.
pub fn join_path(parent: &str, name: &str) -> String {
    let mut segments = path_segments(parent);
    segments.extend(path_segments(name));
    format!("/{}", segments.join("/"))
}

/// The last segment of a path, if it has one.
pub fn path_name(path: &str) -> Option<&str> {
    path_segments(path).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_join_path_normalizes() {
        assert_eq!(join_path("", "csd"), "/csd");
        assert_eq!(join_path("/processing/ecephys/", "csd"), "/processing/ecephys/csd");
        assert_eq!(join_path("processing//ecephys", "/csd/data"), "/processing/ecephys/csd/data");
        assert_eq!(path_name("/processing/ecephys/csd"), Some("csd"));
        assert_eq!(path_name("/"), None);
    }

    #[test]
    fn test_dataset_shape_must_match_values() {
        let result = StoreDataset::new(vec![2, 3], DatasetValues::Float32(vec![0.0; 5]));
        assert_eq!(
            result,
            Err(StoreError::ShapeMismatch {
                shape: vec![2, 3],
                expected: 6,
                found: 5
            })
        );
    }

    #[test]
    fn test_dataset_keeps_row_major_order() {
        let array = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        let transposed = array.t().to_owned();
        let dataset = StoreDataset::from_f32_array(transposed.view());
        assert_eq!(dataset.shape(), &[3, 2]);
        assert_eq!(
            dataset.values(),
            &DatasetValues::Float32(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0])
        );
        assert_eq!(dataset.to_f32_array(), Some(transposed));
    }

    #[test]
    fn test_dims_must_match_rank() {
        let dataset = StoreDataset::from_f32_array(array![1.0f32, 2.0].into_dyn().view());
        assert!(dataset.clone().with_dims(["num_times"]).is_ok());
        assert_eq!(
            dataset.with_dims(["a", "b"]),
            Err(StoreError::DimsMismatch { rank: 1, labels: 2 })
        );
    }
}
