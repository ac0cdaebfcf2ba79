// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name ↔ handle tables for the loopback RTI.

use crate::handle::{AttributeHandle, InteractionClassHandle, ObjectClassHandle, ParameterHandle};
use crate::rti::{RtiException, RtiResult};
use std::collections::HashMap;

/// Bidirectional table keyed by a scope (0 for top-level classes, the class
/// handle for attributes/parameters) and a name.
#[derive(Debug, Default)]
struct NameTable {
    by_name: HashMap<(u64, String), u64>,
    by_handle: HashMap<(u64, u64), String>,
}

impl NameTable {
    fn handle(&self, scope: u64, name: &str) -> Option<u64> {
        self.by_name.get(&(scope, name.to_string())).copied()
    }

    fn name(&self, scope: u64, handle: u64) -> Option<&str> {
        self.by_handle.get(&(scope, handle)).map(String::as_str)
    }

    fn insert(&mut self, scope: u64, name: &str, handle: u64) {
        self.by_name.insert((scope, name.to_string()), handle);
        self.by_handle.insert((scope, handle), name.to_string());
    }
}

const TOP: u64 = 0;

/// All names the loopback RTI knows.
///
/// In strict mode only declared names resolve. Otherwise every new name gets
/// a fresh handle on first lookup, which is how an RTI loaded with a FOM the
/// federate agrees with behaves.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    strict: bool,
    next: u64,
    object_classes: NameTable,
    attributes: NameTable,
    interaction_classes: NameTable,
    parameters: NameTable,
}

impl Catalog {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            strict,
            next: 1,
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> u64 {
        let handle = self.next;
        self.next += 1;
        handle
    }

    fn resolve(&mut self, table: Table, scope: u64, name: &str) -> RtiResult<u64> {
        if let Some(handle) = self.table(table).handle(scope, name) {
            return Ok(handle);
        }
        if self.strict {
            return Err(RtiException::NameNotFound(name.to_string()));
        }
        let handle = self.allocate();
        self.table_mut(table).insert(scope, name, handle);
        Ok(handle)
    }

    fn table(&self, table: Table) -> &NameTable {
        match table {
            Table::ObjectClass => &self.object_classes,
            Table::Attribute => &self.attributes,
            Table::InteractionClass => &self.interaction_classes,
            Table::Parameter => &self.parameters,
        }
    }

    fn table_mut(&mut self, table: Table) -> &mut NameTable {
        match table {
            Table::ObjectClass => &mut self.object_classes,
            Table::Attribute => &mut self.attributes,
            Table::InteractionClass => &mut self.interaction_classes,
            Table::Parameter => &mut self.parameters,
        }
    }

    // ------------------------------------------------------------------
    // Declarations (used by the builder regardless of strictness)
    // ------------------------------------------------------------------

    pub(crate) fn declare_object_class(&mut self, name: &str, attributes: &[&str]) {
        let class = match self.object_classes.handle(TOP, name) {
            Some(h) => h,
            None => {
                let h = self.allocate();
                self.object_classes.insert(TOP, name, h);
                h
            }
        };
        for attribute in attributes {
            if self.attributes.handle(class, attribute).is_none() {
                let h = self.allocate();
                self.attributes.insert(class, attribute, h);
            }
        }
    }

    pub(crate) fn declare_interaction_class(&mut self, name: &str, parameters: &[&str]) {
        let class = match self.interaction_classes.handle(TOP, name) {
            Some(h) => h,
            None => {
                let h = self.allocate();
                self.interaction_classes.insert(TOP, name, h);
                h
            }
        };
        for parameter in parameters {
            if self.parameters.handle(class, parameter).is_none() {
                let h = self.allocate();
                self.parameters.insert(class, parameter, h);
            }
        }
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub(crate) fn object_class_handle(&mut self, name: &str) -> RtiResult<ObjectClassHandle> {
        self.resolve(Table::ObjectClass, TOP, name)
            .map(ObjectClassHandle::new)
    }

    pub(crate) fn object_class_name(&self, class: ObjectClassHandle) -> RtiResult<String> {
        self.object_classes
            .name(TOP, class.raw())
            .map(str::to_string)
            .ok_or_else(|| RtiException::InvalidHandle(class.to_string()))
    }

    pub(crate) fn attribute_handle(
        &mut self,
        class: ObjectClassHandle,
        name: &str,
    ) -> RtiResult<AttributeHandle> {
        self.object_class_name(class)?;
        self.resolve(Table::Attribute, class.raw(), name)
            .map(AttributeHandle::new)
    }

    pub(crate) fn attribute_name(
        &self,
        class: ObjectClassHandle,
        attribute: AttributeHandle,
    ) -> RtiResult<String> {
        self.attributes
            .name(class.raw(), attribute.raw())
            .map(str::to_string)
            .ok_or_else(|| RtiException::InvalidHandle(attribute.to_string()))
    }

    pub(crate) fn interaction_class_handle(
        &mut self,
        name: &str,
    ) -> RtiResult<InteractionClassHandle> {
        self.resolve(Table::InteractionClass, TOP, name)
            .map(InteractionClassHandle::new)
    }

    pub(crate) fn interaction_class_name(&self, class: InteractionClassHandle) -> RtiResult<String> {
        self.interaction_classes
            .name(TOP, class.raw())
            .map(str::to_string)
            .ok_or_else(|| RtiException::InvalidHandle(class.to_string()))
    }

    pub(crate) fn parameter_handle(
        &mut self,
        class: InteractionClassHandle,
        name: &str,
    ) -> RtiResult<ParameterHandle> {
        self.interaction_class_name(class)?;
        self.resolve(Table::Parameter, class.raw(), name)
            .map(ParameterHandle::new)
    }

    pub(crate) fn parameter_name(
        &self,
        class: InteractionClassHandle,
        parameter: ParameterHandle,
    ) -> RtiResult<String> {
        self.parameters
            .name(class.raw(), parameter.raw())
            .map(str::to_string)
            .ok_or_else(|| RtiException::InvalidHandle(parameter.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Table {
    ObjectClass,
    Attribute,
    InteractionClass,
    Parameter,
}
