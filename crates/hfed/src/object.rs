// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object instances exchanged with the federation.

use crate::handle::{ObjectClassHandle, ObjectInstanceHandle};
use crate::realizer::Realizable;
use crate::rti::Ambassador;
use crate::values::ValueMap;
use std::collections::HashMap;

/// One object instance: its identity and a bag of attribute name → bytes.
///
/// The instance handle belongs to the RTI. Once the instance has been
/// removed the handle must not be reused.
#[derive(Debug, Clone, PartialEq)]
pub struct HLAObject {
    instance: ObjectInstanceHandle,
    class: ObjectClassHandle,
    class_name: String,
    instance_name: String,
    values: HashMap<String, Vec<u8>>,
}

impl HLAObject {
    pub fn new(
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        class_name: impl Into<String>,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            instance,
            class,
            class_name: class_name.into(),
            instance_name: instance_name.into(),
            values: HashMap::new(),
        }
    }

    pub fn instance_handle(&self) -> ObjectInstanceHandle {
        self.instance
    }

    pub fn class_handle(&self) -> ObjectClassHandle {
        self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Attribute names carried by this object, sorted.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Drop all attribute values, keeping the identity.
    pub fn clear_values(&mut self) {
        self.values.clear();
    }
}

impl ValueMap for HLAObject {
    fn values(&self) -> &HashMap<String, Vec<u8>> {
        &self.values
    }

    fn values_mut(&mut self) -> &mut HashMap<String, Vec<u8>> {
        &mut self.values
    }

    fn owner(&self) -> &str {
        &self.class_name
    }
}

impl Realizable for HLAObject {
    type Handle = ObjectClassHandle;

    fn class_handle(&self) -> ObjectClassHandle {
        self.class
    }

    fn resolve(ambassador: &Ambassador, class_name: &str) -> Option<ObjectClassHandle> {
        ambassador.object_class_handle(class_name)
    }
}

/// A strongly-typed view over an [`HLAObject`] of one object class.
pub trait ObjectType: Sized {
    /// Fully-qualified object class name.
    const CLASS_NAME: &'static str;

    fn from_object(object: HLAObject) -> Self;
    fn object(&self) -> &HLAObject;
}
