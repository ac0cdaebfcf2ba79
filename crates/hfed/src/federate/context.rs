// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::state::LifecycleState;
use crate::config::FederateConfiguration;
use crate::error::Result;
use crate::handle::{FederateHandle, ObjectInstanceHandle};
use crate::interaction::HLAInteraction;
use crate::object::HLAObject;
use crate::rti::{Ambassador, LogicalTime};
use std::collections::HashMap;

/// What a hook can see and do while it runs.
///
/// Borrowed from the runner for the duration of one hook call.
pub struct FederateContext<'a> {
    pub(crate) ambassador: &'a mut Ambassador,
    pub(crate) config: &'a FederateConfiguration,
    pub(crate) state: LifecycleState,
    pub(crate) time: LogicalTime,
    pub(crate) federate: Option<FederateHandle>,
    pub(crate) remote_objects: &'a HashMap<ObjectInstanceHandle, HLAObject>,
}

impl<'a> FederateContext<'a> {
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Federate logical time at the moment the hook was called.
    pub fn current_time(&self) -> LogicalTime {
        self.time
    }

    pub fn config(&self) -> &FederateConfiguration {
        self.config
    }

    pub fn federate_handle(&self) -> Option<FederateHandle> {
        self.federate
    }

    pub fn ambassador(&self) -> &Ambassador {
        &*self.ambassador
    }

    pub fn ambassador_mut(&mut self) -> &mut Ambassador {
        &mut *self.ambassador
    }

    /// Discovered instances owned by other federates, with their latest values.
    pub fn remote_objects(&self) -> impl Iterator<Item = &HLAObject> {
        self.remote_objects.values()
    }

    pub fn remote_object(&self, instance: ObjectInstanceHandle) -> Option<&HLAObject> {
        self.remote_objects.get(&instance)
    }

    /// An empty interaction of class `class_name`.
    pub fn new_interaction(&self, class_name: &str) -> Result<HLAInteraction> {
        let class = self.ambassador.require_interaction_class_handle(class_name)?;
        Ok(HLAInteraction::new(class, class_name))
    }

    /// Send in receive order.
    pub fn send_interaction(&mut self, interaction: &HLAInteraction) -> Result<()> {
        self.ambassador.send_interaction(interaction, &[], None)
    }

    /// Send time-stamped at `current_time + lookahead`.
    pub fn send_interaction_timestamped(&mut self, interaction: &HLAInteraction) -> Result<()> {
        let time = self.time + self.config.lookahead();
        self.ambassador.send_interaction(interaction, &[], Some(time))
    }

    pub fn register_object(&mut self, class_name: &str) -> Result<HLAObject> {
        self.ambassador.register_object(class_name)
    }

    /// Send the values currently carried by `object`, in receive order.
    pub fn update_object(&mut self, object: &HLAObject) -> Result<()> {
        self.ambassador.update_attributes(object, &[], None)
    }

    pub fn delete_object(&mut self, object: &HLAObject) -> Result<()> {
        self.ambassador
            .delete_object_instance(object.instance_handle(), &[])
    }
}
