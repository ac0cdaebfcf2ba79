// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative FOM metadata.
//!
//! These mirror the object and interaction classes a federate declares. They
//! are built while configuring and are read-only once the federate runs.

use super::Sharing;
use crate::codec::DataType;
use std::collections::BTreeMap;

/// One attribute of an object class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttribute {
    pub name: String,
    pub data_type: DataType,
    pub sharing: Sharing,
}

impl ObjectAttribute {
    pub fn new(name: impl Into<String>, data_type: DataType, sharing: Sharing) -> Self {
        Self {
            name: name.into(),
            data_type,
            sharing,
        }
    }
}

/// An object class with its attributes, keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClass {
    pub name: String,
    pub sharing: Sharing,
    attributes: BTreeMap<String, ObjectAttribute>,
}

impl ObjectClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sharing: Sharing::Neither,
            attributes: BTreeMap::new(),
        }
    }

    /// Add or merge an attribute. The class sharing widens to cover it.
    pub fn add_attribute(&mut self, attribute: ObjectAttribute) {
        self.sharing = self.sharing.merge(attribute.sharing);
        match self.attributes.get_mut(&attribute.name) {
            Some(existing) => {
                existing.sharing = existing.sharing.merge(attribute.sharing);
                existing.data_type = attribute.data_type;
            }
            None => {
                self.attributes.insert(attribute.name.clone(), attribute);
            }
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&ObjectAttribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &ObjectAttribute> {
        self.attributes.values()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Names of the attributes this federate publishes.
    pub fn published_attribute_names(&self) -> Vec<String> {
        self.attributes
            .values()
            .filter(|a| a.sharing.is_publish())
            .map(|a| a.name.clone())
            .collect()
    }

    /// Names of the attributes this federate subscribes to.
    pub fn subscribed_attribute_names(&self) -> Vec<String> {
        self.attributes
            .values()
            .filter(|a| a.sharing.is_subscribe())
            .map(|a| a.name.clone())
            .collect()
    }
}

/// One parameter of an interaction class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionParameter {
    pub name: String,
    pub data_type: DataType,
}

impl InteractionParameter {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An interaction class with its parameters, keyed by parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionClass {
    pub name: String,
    pub sharing: Sharing,
    parameters: BTreeMap<String, InteractionParameter>,
}

impl InteractionClass {
    pub fn new(name: impl Into<String>, sharing: Sharing) -> Self {
        Self {
            name: name.into(),
            sharing,
            parameters: BTreeMap::new(),
        }
    }

    pub fn add_parameter(&mut self, parameter: InteractionParameter) {
        self.parameters.insert(parameter.name.clone(), parameter);
    }

    pub fn parameter(&self, name: &str) -> Option<&InteractionParameter> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &InteractionParameter> {
        self.parameters.values()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}
