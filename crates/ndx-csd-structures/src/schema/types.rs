// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Building blocks of a declarative neurodata schema.
//!
//! Everything here is `'static` data. A schema is assembled from these types as
//! constants and queried at runtime by both the validated containers and the
//! object mappers.

use std::fmt::{Display, Formatter};

/// Datatype of an attribute or dataset as declared by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecDType {
    /// UTF-8 text
    Text,
    /// Boolean flag
    Bool,
    /// Unsigned 64 bit integer
    Uint64,
    /// 32 bit IEEE float
    Float32,
}

impl SpecDType {
    /// Name of the datatype as it appears in exported schema files.
    pub const fn as_str(self) -> &'static str {
        match self {
            SpecDType::Text => "text",
            SpecDType::Bool => "bool",
            SpecDType::Uint64 => "uint64",
            SpecDType::Float32 => "float32",
        }
    }
}

impl Display for SpecDType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How many instances of a dataset a group may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Exactly one
    Required,
    /// Zero or one
    Optional,
}

impl Quantity {
    /// Quantity marker used in exported schema files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Quantity::Required => "1",
            Quantity::Optional => "?",
        }
    }
}

/// A literal value embedded in the schema, used for fixed and default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecValue {
    Text(&'static str),
    Bool(bool),
}

impl SpecValue {
    /// The datatype a value of this kind must be declared with.
    pub const fn dtype(self) -> SpecDType {
        match self {
            SpecValue::Text(_) => SpecDType::Text,
            SpecValue::Bool(_) => SpecDType::Bool,
        }
    }
}

/// A named scalar attribute on a group or dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub doc: &'static str,
    pub dtype: SpecDType,
    /// Fixed value. Callers can never supply or override it.
    pub value: Option<SpecValue>,
    /// Value used when the caller leaves the attribute unset.
    pub default_value: Option<SpecValue>,
    pub required: bool,
}

impl AttributeSpec {
    /// Returns the fixed text value of this attribute, if it has one.
    pub fn fixed_text(&self) -> Option<&'static str> {
        match self.value {
            Some(SpecValue::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// A named multi-dimensional dataset inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub doc: &'static str,
    pub dtype: SpecDType,
    /// Alternative dimension label lists. Each alternative declares one allowed rank.
    pub dims: &'static [&'static [&'static str]],
    pub quantity: Quantity,
    pub attributes: &'static [AttributeSpec],
}

impl DatasetSpec {
    /// All ranks this dataset may take, in declaration order.
    pub fn allowed_ranks(&self) -> Vec<usize> {
        self.dims.iter().map(|labels| labels.len()).collect()
    }

    /// The dimension labels for the given rank, or `None` if the rank is not allowed.
    pub fn dims_for_rank(&self, rank: usize) -> Option<&'static [&'static str]> {
        self.dims.iter().copied().find(|labels| labels.len() == rank)
    }

    /// Looks up an attribute of this dataset by name.
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// The fixed `unit` attribute value of this dataset, if it declares one.
    pub fn fixed_unit(&self) -> Option<&'static str> {
        self.attribute("unit").and_then(AttributeSpec::fixed_text)
    }

    pub fn is_required(&self) -> bool {
        self.quantity == Quantity::Required
    }

    /// Human readable list of the allowed ranks, e.g. `2, 3 or 4`.
    pub fn describe_ranks(&self) -> String {
        let ranks: Vec<String> = self.allowed_ranks().iter().map(|r| r.to_string()).collect();
        match ranks.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        }
    }
}

/// A group type definition: the unit that maps onto one container class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    /// Name of the type this spec defines
    pub neurodata_type_def: &'static str,
    /// Name of the type this spec extends
    pub neurodata_type_inc: &'static str,
    pub doc: &'static str,
    pub attributes: &'static [AttributeSpec],
    pub datasets: &'static [DatasetSpec],
}

impl GroupSpec {
    /// Looks up a dataset of this group by name.
    pub fn dataset(&self, name: &str) -> Option<&'static DatasetSpec> {
        self.datasets.iter().find(|dataset| dataset.name == name)
    }

    /// Looks up a group level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Checks the group definition for internal contradictions.
    ///
    /// Returns one message per defect. Meant for tests and debug assertions.
    pub fn check_consistency(&self) -> Vec<String> {
        let mut defects = Vec::new();

        push_duplicates(
            &mut defects,
            self.neurodata_type_def,
            self.attributes.iter().map(|a| a.name),
            "attribute",
        );
        push_duplicates(
            &mut defects,
            self.neurodata_type_def,
            self.datasets.iter().map(|d| d.name),
            "dataset",
        );
        for attribute in self.attributes {
            check_attribute(&mut defects, self.neurodata_type_def, attribute);
        }

        for dataset in self.datasets {
            if dataset.dims.is_empty() {
                defects.push(format!("dataset '{}' declares no dims", dataset.name));
            }
            let mut ranks = dataset.allowed_ranks();
            ranks.sort_unstable();
            if ranks.windows(2).any(|pair| pair[0] == pair[1]) {
                defects.push(format!(
                    "dataset '{}' declares the same rank more than once",
                    dataset.name
                ));
            }
            for labels in dataset.dims {
                push_duplicates(&mut defects, dataset.name, labels.iter().copied(), "dim label");
            }
            push_duplicates(
                &mut defects,
                dataset.name,
                dataset.attributes.iter().map(|a| a.name),
                "attribute",
            );
            for attribute in dataset.attributes {
                check_attribute(&mut defects, dataset.name, attribute);
            }
        }

        defects
    }
}

fn check_attribute(defects: &mut Vec<String>, owner: &str, attribute: &AttributeSpec) {
    for (kind, value) in [("fixed", attribute.value), ("default", attribute.default_value)] {
        if let Some(value) = value {
            if value.dtype() != attribute.dtype {
                defects.push(format!(
                    "{} value of '{}.{}' is {} but the attribute is declared {}",
                    kind,
                    owner,
                    attribute.name,
                    value.dtype(),
                    attribute.dtype
                ));
            }
        }
    }
    if attribute.value.is_some() && attribute.default_value.is_some() {
        defects.push(format!(
            "'{}.{}' declares both a fixed and a default value",
            owner, attribute.name
        ));
    }
}

fn push_duplicates<'a>(
    defects: &mut Vec<String>,
    owner: &str,
    names: impl Iterator<Item = &'a str>,
    kind: &str,
) {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if seen.contains(&name) {
            defects.push(format!("'{}' declares {} '{}' twice", owner, kind, name));
        } else {
            seen.push(name);
        }
    }
}

/// Reference to a type defined in another namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeSpec {
    pub namespace: &'static str,
    pub neurodata_type: &'static str,
}

/// Namespace metadata for a schema extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSpec {
    pub name: &'static str,
    pub version: &'static str,
    pub doc: &'static str,
    pub authors: &'static [&'static str],
    pub contacts: &'static [&'static str],
    pub includes: &'static [IncludeSpec],
}
