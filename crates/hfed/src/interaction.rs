// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interactions: one-shot messages with named parameters.

use crate::handle::InteractionClassHandle;
use crate::realizer::Realizable;
use crate::rti::Ambassador;
use crate::values::ValueMap;
use std::collections::HashMap;

/// An interaction to send or one that was received.
#[derive(Debug, Clone, PartialEq)]
pub struct HLAInteraction {
    class: InteractionClassHandle,
    class_name: String,
    values: HashMap<String, Vec<u8>>,
}

impl HLAInteraction {
    pub fn new(class: InteractionClassHandle, class_name: impl Into<String>) -> Self {
        Self {
            class,
            class_name: class_name.into(),
            values: HashMap::new(),
        }
    }

    pub fn class_handle(&self) -> InteractionClassHandle {
        self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Parameter names carried by this interaction, sorted.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ValueMap for HLAInteraction {
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

impl Realizable for HLAInteraction {
    type Handle = InteractionClassHandle;

    fn class_handle(&self) -> InteractionClassHandle {
        self.class
    }

    fn resolve(ambassador: &Ambassador, class_name: &str) -> Option<InteractionClassHandle> {
        ambassador.interaction_class_handle(class_name)
    }
}

/// A strongly-typed view over an [`HLAInteraction`] of one interaction class.
///
/// ```
/// use hfed::{HLAInteraction, InteractionType, ValueMap};
///
/// struct Ping(HLAInteraction);
///
/// impl InteractionType for Ping {
///     const CLASS_NAME: &'static str = "Ping";
///     fn from_interaction(interaction: HLAInteraction) -> Self {
///         Ping(interaction)
///     }
///     fn interaction(&self) -> &HLAInteraction {
///         &self.0
///     }
/// }
///
/// impl Ping {
///     fn count(&self) -> i32 {
///         self.0.get_int("count")
///     }
/// }
/// ```
pub trait InteractionType: Sized {
    /// Fully-qualified interaction class name.
    const CLASS_NAME: &'static str;

    fn from_interaction(interaction: HLAInteraction) -> Self;
    fn interaction(&self) -> &HLAInteraction;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names_sorted() {
        let mut i = HLAInteraction::new(InteractionClassHandle::new(1), "Ping");
        i.set_int("count", 1).set_string("from", "a");
        assert_eq!(i.parameter_names(), vec!["count", "from"]);
        assert_eq!(i.class_handle(), InteractionClassHandle::new(1));
        assert_eq!(i.class_name(), "Ping");
    }
}
