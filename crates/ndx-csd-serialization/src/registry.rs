// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Process wide registry of neurodata types.
//!
//! Maps `(namespace, neurodata_type)` onto the schema and the functions that construct,
//! decode and encode instances of the type. The global registry is built once, on first
//! use, and is read-only afterwards.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;

use ndx_csd_structures::schema::{GroupSpec, CSD_GROUP_SPEC, CSD_TYPE_NAME, NAMESPACE_NAME};
use ndx_csd_structures::{ContainerProblem, CsdError, CsdRecord, CsdResult, FieldMap};
use tracing::debug;

use crate::error::{SerializationError, SerializationResult};
use crate::mapper::{CsdObjectMapper, NAMESPACE_ATTRIBUTE, NEURODATA_TYPE_ATTRIBUTE};
use crate::store::{join_path, AttributeValue, HierarchicalStore};

/// An instance of any registered neurodata type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum NeurodataObject {
    Csd(CsdRecord),
}

impl NeurodataObject {
    pub fn name(&self) -> &str {
        match self {
            NeurodataObject::Csd(record) => record.name(),
        }
    }

    pub fn neurodata_type(&self) -> &'static str {
        match self {
            NeurodataObject::Csd(_) => CSD_TYPE_NAME,
        }
    }

    pub fn as_csd(&self) -> Option<&CsdRecord> {
        match self {
            NeurodataObject::Csd(record) => Some(record),
        }
    }
}

impl From<CsdRecord> for NeurodataObject {
    fn from(record: CsdRecord) -> Self {
        NeurodataObject::Csd(record)
    }
}

pub type ConstructFn = fn(&str, FieldMap) -> CsdResult<NeurodataObject>;
pub type DecodeFn = fn(&dyn HierarchicalStore, &str) -> CsdResult<NeurodataObject>;
pub type EncodeFn =
    fn(&NeurodataObject, &mut dyn HierarchicalStore, &str) -> SerializationResult<String>;

/// Everything the registry knows about one neurodata type.
#[derive(Clone, Copy)]
pub struct TypeRegistration {
    pub namespace: &'static str,
    pub neurodata_type: &'static str,
    pub spec: &'static GroupSpec,
    pub construct: ConstructFn,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

impl Debug for TypeRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("namespace", &self.namespace)
            .field("neurodata_type", &self.neurodata_type)
            .finish_non_exhaustive()
    }
}

/// Registry keyed by `(namespace, neurodata_type)`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<(String, String), TypeRegistration>,
}

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every type this crate knows how to map.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        registry.register(csd_registration());
        registry
    }

    /// The shared registry, built on first call.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL_REGISTRY.get_or_init(Self::with_builtin_types)
    }

    /// Adds a type, replacing any earlier registration under the same key.
    pub fn register(&mut self, registration: TypeRegistration) {
        debug_assert!(
            registration.spec.check_consistency().is_empty(),
            "inconsistent schema for {}",
            registration.neurodata_type
        );
        debug!(
            "Registering neurodata type {}:{}",
            registration.namespace, registration.neurodata_type
        );
        self.types.insert(
            (
                registration.namespace.to_string(),
                registration.neurodata_type.to_string(),
            ),
            registration,
        );
    }

    pub fn get(&self, namespace: &str, neurodata_type: &str) -> Option<&TypeRegistration> {
        self.types
            .get(&(namespace.to_string(), neurodata_type.to_string()))
    }

    /// Registered `(namespace, neurodata_type)` pairs, sorted.
    pub fn registered_types(&self) -> Vec<(&'static str, &'static str)> {
        let mut keys: Vec<_> = self
            .types
            .values()
            .map(|registration| (registration.namespace, registration.neurodata_type))
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Builds an instance of a registered type from loosely typed fields.
    pub fn construct(
        &self,
        namespace: &str,
        neurodata_type: &str,
        name: &str,
        fields: FieldMap,
    ) -> SerializationResult<NeurodataObject> {
        let registration = self.lookup(namespace, neurodata_type)?;
        Ok((registration.construct)(name, fields)?)
    }

    /// Decodes a group, dispatching on its `neurodata_type` and `namespace` attributes.
    ///
    /// A group without a `namespace` attribute is looked up in the `ndx-csd` namespace.
    pub fn decode_any(
        &self,
        store: &dyn HierarchicalStore,
        group_path: &str,
    ) -> CsdResult<NeurodataObject> {
        let group = join_path("", group_path);
        if !store.has_group(&group) {
            return Err(CsdError::malformed(group, ContainerProblem::MissingGroup));
        }
        let neurodata_type = read_text_attribute(store, &group, NEURODATA_TYPE_ATTRIBUTE)?
            .ok_or_else(|| {
                CsdError::malformed(
                    group.as_str(),
                    ContainerProblem::MissingAttribute {
                        name: NEURODATA_TYPE_ATTRIBUTE.to_string(),
                    },
                )
            })?;
        let namespace = read_text_attribute(store, &group, NAMESPACE_ATTRIBUTE)?
            .unwrap_or_else(|| NAMESPACE_NAME.to_string());

        let registration = self.get(&namespace, &neurodata_type).ok_or_else(|| {
            CsdError::malformed(
                group.as_str(),
                ContainerProblem::WrongNeurodataType {
                    found: format!("{}:{}", namespace, neurodata_type),
                },
            )
        })?;
        (registration.decode)(store, &group)
    }

    /// Encodes any registered object under `parent`, returning the new group path.
    pub fn encode(
        &self,
        object: &NeurodataObject,
        store: &mut dyn HierarchicalStore,
        parent: &str,
    ) -> SerializationResult<String> {
        let registration = self.lookup(NAMESPACE_NAME, object.neurodata_type())?;
        (registration.encode)(object, store, parent)
    }

    fn lookup(&self, namespace: &str, neurodata_type: &str) -> SerializationResult<&TypeRegistration> {
        self.get(namespace, neurodata_type)
            .ok_or_else(|| SerializationError::UnknownType {
                namespace: namespace.to_string(),
                neurodata_type: neurodata_type.to_string(),
            })
    }
}

fn read_text_attribute(
    store: &dyn HierarchicalStore,
    group: &str,
    name: &str,
) -> CsdResult<Option<String>> {
    let stored = store.get_attribute(group, name).map_err(|error| {
        CsdError::malformed(
            group,
            ContainerProblem::Unreadable {
                reason: error.to_string(),
            },
        )
    })?;
    match stored {
        None => Ok(None),
        Some(AttributeValue::Text(text)) => Ok(Some(text)),
        Some(other) => Err(CsdError::malformed(
            group,
            ContainerProblem::WrongAttributeType {
                name: name.to_string(),
                expected: "text",
                found: other.type_name(),
            },
        )),
    }
}

//region CSD registration

fn csd_registration() -> TypeRegistration {
    TypeRegistration {
        namespace: NAMESPACE_NAME,
        neurodata_type: CSD_TYPE_NAME,
        spec: &CSD_GROUP_SPEC,
        construct: construct_csd,
        decode: decode_csd,
        encode: encode_csd,
    }
}

fn construct_csd(name: &str, fields: FieldMap) -> CsdResult<NeurodataObject> {
    CsdRecord::try_from_fields(name, fields).map(NeurodataObject::Csd)
}

fn decode_csd(store: &dyn HierarchicalStore, group_path: &str) -> CsdResult<NeurodataObject> {
    CsdObjectMapper.decode(store, group_path).map(NeurodataObject::Csd)
}

fn encode_csd(
    object: &NeurodataObject,
    store: &mut dyn HierarchicalStore,
    parent: &str,
) -> SerializationResult<String> {
    match object {
        NeurodataObject::Csd(record) => CsdObjectMapper.encode(record, store, parent),
    }
}

//endregion
