// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Schema export in the layout NWB schema tooling reads.
//!
//! Produces the namespace and extension descriptions of the `ndx-csd` namespace as JSON,
//! so a schema driven generator can rebuild the `CSD` type without this crate.

use std::fs;
use std::path::{Path, PathBuf};

use ndx_csd_structures::schema::{
    AttributeSpec, DatasetSpec, GroupSpec, NamespaceSpec, Quantity, SpecValue, CSD_GROUP_SPEC,
    NAMESPACE_SPEC,
};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::SerializationResult;

/// File name of the exported namespace description.
pub const NAMESPACE_FILE_NAME: &str = "ndx-csd.namespace.json";
/// File name of the exported type definitions.
pub const EXTENSIONS_FILE_NAME: &str = "ndx-csd.extensions.json";

/// Namespace description: metadata, included core types and the extension source file.
pub fn export_namespace() -> Value {
    namespace_json(&NAMESPACE_SPEC, EXTENSIONS_FILE_NAME)
}

/// Type definitions of the namespace.
pub fn export_extensions() -> Value {
    json!({ "groups": [group_json(&CSD_GROUP_SPEC)] })
}

/// Writes both schema files into `dir`, creating it if needed, and returns their paths.
pub fn write_schema_files(dir: impl AsRef<Path>, pretty: bool) -> SerializationResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(2);
    for (file_name, contents) in [
        (NAMESPACE_FILE_NAME, export_namespace()),
        (EXTENSIONS_FILE_NAME, export_extensions()),
    ] {
        let text = if pretty {
            serde_json::to_string_pretty(&contents)?
        } else {
            serde_json::to_string(&contents)?
        };
        let path = dir.join(file_name);
        fs::write(&path, text)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn namespace_json(namespace: &NamespaceSpec, source: &str) -> Value {
    let mut schema: Vec<Value> = namespace
        .includes
        .iter()
        .map(|include| {
            json!({
                "namespace": include.namespace,
                "neurodata_types": [include.neurodata_type],
            })
        })
        .collect();
    schema.push(json!({ "source": source }));

    json!({
        "namespaces": [{
            "name": namespace.name,
            "version": namespace.version,
            "doc": namespace.doc,
            "author": namespace.authors,
            "contact": namespace.contacts,
            "schema": schema,
        }]
    })
}

fn group_json(group: &GroupSpec) -> Value {
    json!({
        "neurodata_type_def": group.neurodata_type_def,
        "neurodata_type_inc": group.neurodata_type_inc,
        "doc": group.doc,
        "attributes": group.attributes.iter().map(attribute_json).collect::<Vec<_>>(),
        "datasets": group.datasets.iter().map(dataset_json).collect::<Vec<_>>(),
    })
}

fn dataset_json(dataset: &DatasetSpec) -> Value {
    let mut object = Map::new();
    object.insert("name".into(), dataset.name.into());
    object.insert("dtype".into(), dataset.dtype.as_str().into());

    // A single alternative is written flat, several as a list of lists.
    let shapes: Vec<Value> = dataset
        .dims
        .iter()
        .map(|labels| Value::Array(labels.iter().map(|_| Value::Null).collect()))
        .collect();
    let dims: Vec<Value> = dataset.dims.iter().map(|labels| json!(labels)).collect();
    match (dims.as_slice(), shapes.as_slice()) {
        ([single_dims], [single_shape]) => {
            object.insert("dims".into(), single_dims.clone());
            object.insert("shape".into(), single_shape.clone());
        }
        _ => {
            object.insert("dims".into(), Value::Array(dims));
            object.insert("shape".into(), Value::Array(shapes));
        }
    }

    if dataset.quantity == Quantity::Optional {
        object.insert("quantity".into(), dataset.quantity.as_str().into());
    }
    object.insert("doc".into(), dataset.doc.into());
    object.insert(
        "attributes".into(),
        dataset.attributes.iter().map(attribute_json).collect(),
    );
    Value::Object(object)
}

fn attribute_json(attribute: &AttributeSpec) -> Value {
    let mut object = Map::new();
    object.insert("name".into(), attribute.name.into());
    object.insert("dtype".into(), attribute.dtype.as_str().into());
    object.insert("doc".into(), attribute.doc.into());
    if let Some(value) = attribute.value {
        object.insert("value".into(), value_json(value));
    }
    if let Some(default_value) = attribute.default_value {
        object.insert("default_value".into(), value_json(default_value));
    }
    if !attribute.required {
        object.insert("required".into(), false.into());
    }
    Value::Object(object)
}

fn value_json(value: SpecValue) -> Value {
    match value {
        SpecValue::Text(text) => text.into(),
        SpecValue::Bool(flag) => flag.into(),
    }
}
