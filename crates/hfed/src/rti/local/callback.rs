// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Queued callbacks of the loopback RTI.

use crate::handle::{AttributeHandle, InteractionClassHandle, ObjectClassHandle, ObjectInstanceHandle};
use crate::rti::{
    AttributeValueMap, FederateAmbassador, LogicalTime, ParameterValueMap, SyncPointFailureReason,
};

/// One callback waiting in a connection's queue.
#[derive(Debug, Clone)]
pub(crate) enum Callback {
    SyncRegistrationSucceeded(String),
    SyncRegistrationFailed(String, SyncPointFailureReason),
    Announce(String, Vec<u8>),
    Synchronized(String),
    RegulationEnabled(LogicalTime),
    ConstrainedEnabled(LogicalTime),
    Grant(LogicalTime),
    Discover {
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: String,
    },
    Reflect {
        instance: ObjectInstanceHandle,
        values: AttributeValueMap,
        tag: Vec<u8>,
        time: Option<LogicalTime>,
    },
    Receive {
        class: InteractionClassHandle,
        values: ParameterValueMap,
        tag: Vec<u8>,
        time: Option<LogicalTime>,
    },
    Remove {
        instance: ObjectInstanceHandle,
        tag: Vec<u8>,
    },
    Provide {
        instance: ObjectInstanceHandle,
        attributes: Vec<AttributeHandle>,
        tag: Vec<u8>,
    },
}

impl Callback {
    pub(crate) fn deliver(self, target: &dyn FederateAmbassador) {
        match self {
            Callback::SyncRegistrationSucceeded(label) => {
                target.synchronization_point_registration_succeeded(&label)
            }
            Callback::SyncRegistrationFailed(label, reason) => {
                target.synchronization_point_registration_failed(&label, reason)
            }
            Callback::Announce(label, tag) => target.announce_synchronization_point(&label, &tag),
            Callback::Synchronized(label) => target.federation_synchronized(&label),
            Callback::RegulationEnabled(time) => target.time_regulation_enabled(time),
            Callback::ConstrainedEnabled(time) => target.time_constrained_enabled(time),
            Callback::Grant(time) => target.time_advance_grant(time),
            Callback::Discover {
                instance,
                class,
                name,
            } => target.discover_object_instance(instance, class, &name),
            Callback::Reflect {
                instance,
                values,
                tag,
                time,
            } => target.reflect_attribute_values(instance, values, &tag, time),
            Callback::Receive {
                class,
                values,
                tag,
                time,
            } => target.receive_interaction(class, values, &tag, time),
            Callback::Remove { instance, tag } => target.remove_object_instance(instance, &tag),
            Callback::Provide {
                instance,
                attributes,
                tag,
            } => target.provide_attribute_value_update(instance, &attributes, &tag),
        }
    }
}

/// Callbacks addressed to connections, collected while the shared state is
/// locked and sent once it is released.
pub(crate) type Outbox = Vec<(u64, Callback)>;

/// Discards every callback.
#[cfg(test)]
pub(crate) struct NullCallbacks;

#[cfg(test)]
impl FederateAmbassador for NullCallbacks {
    fn synchronization_point_registration_succeeded(&self, _label: &str) {}
    fn synchronization_point_registration_failed(
        &self,
        _label: &str,
        _reason: SyncPointFailureReason,
    ) {
    }
    fn announce_synchronization_point(&self, _label: &str, _tag: &[u8]) {}
    fn federation_synchronized(&self, _label: &str) {}
    fn time_regulation_enabled(&self, _time: LogicalTime) {}
    fn time_constrained_enabled(&self, _time: LogicalTime) {}
    fn time_advance_grant(&self, _time: LogicalTime) {}
    fn discover_object_instance(
        &self,
        _instance: ObjectInstanceHandle,
        _class: ObjectClassHandle,
        _name: &str,
    ) {
    }
    fn reflect_attribute_values(
        &self,
        _instance: ObjectInstanceHandle,
        _values: AttributeValueMap,
        _tag: &[u8],
        _time: Option<LogicalTime>,
    ) {
    }
    fn receive_interaction(
        &self,
        _class: InteractionClassHandle,
        _values: ParameterValueMap,
        _tag: &[u8],
        _time: Option<LogicalTime>,
    ) {
    }
    fn remove_object_instance(&self, _instance: ObjectInstanceHandle, _tag: &[u8]) {}
}
