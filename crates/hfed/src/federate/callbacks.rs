// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTI callback sink.
//!
//! [`CallbackState`] is the [`FederateAmbassador`] the runner connects with.
//! With immediate callbacks it is called from an RTI thread while the
//! lifecycle thread reads it, so everything it records sits behind one
//! mutex. Callbacks never run application code: they record protocol state
//! and queue [`RtiEvent`]s that the lifecycle thread drains between RTI calls.

use crate::handle::{
    AttributeHandle, InteractionClassHandle, ObjectClassHandle, ObjectInstanceHandle,
};
use crate::rti::{
    AttributeValueMap, FederateAmbassador, LogicalTime, ParameterValueMap, SyncPointFailureReason,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};

/// An object/interaction callback waiting for the lifecycle thread.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RtiEvent {
    Discovered {
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: String,
    },
    Reflected {
        instance: ObjectInstanceHandle,
        values: AttributeValueMap,
        time: Option<LogicalTime>,
    },
    Interaction {
        class: InteractionClassHandle,
        values: ParameterValueMap,
        time: Option<LogicalTime>,
    },
    Removed {
        instance: ObjectInstanceHandle,
    },
    ProvideUpdate {
        instance: ObjectInstanceHandle,
        attributes: Vec<AttributeHandle>,
    },
}

#[derive(Debug, Default)]
struct Inner {
    announced: HashSet<String>,
    registration_failures: HashMap<String, SyncPointFailureReason>,
    synchronized: HashSet<String>,
    regulating: bool,
    constrained: bool,
    time: LogicalTime,
    instance_classes: HashMap<ObjectInstanceHandle, ObjectClassHandle>,
    events: VecDeque<RtiEvent>,
}

/// Protocol state recorded from RTI callbacks.
#[derive(Debug, Default)]
pub(crate) struct CallbackState {
    inner: Mutex<Inner>,
}

impl CallbackState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_announced(&self, label: &str) -> bool {
        self.inner.lock().announced.contains(label)
    }

    pub(crate) fn registration_failure(&self, label: &str) -> Option<SyncPointFailureReason> {
        self.inner.lock().registration_failures.get(label).copied()
    }

    pub(crate) fn is_synchronized(&self, label: &str) -> bool {
        self.inner.lock().synchronized.contains(label)
    }

    pub(crate) fn is_regulating(&self) -> bool {
        self.inner.lock().regulating
    }

    pub(crate) fn is_constrained(&self) -> bool {
        self.inner.lock().constrained
    }

    /// Mark the time policy as off after the runner disabled it.
    pub(crate) fn clear_time_policy(&self) {
        let mut inner = self.inner.lock();
        inner.regulating = false;
        inner.constrained = false;
    }

    /// Last granted (or enabled-at) logical time.
    pub(crate) fn federate_time(&self) -> LogicalTime {
        self.inner.lock().time
    }

    #[cfg(test)]
    pub(crate) fn known_instances(&self) -> usize {
        self.inner.lock().instance_classes.len()
    }

    pub(crate) fn drain_events(&self) -> Vec<RtiEvent> {
        self.inner.lock().events.drain(..).collect()
    }
}

impl FederateAmbassador for CallbackState {
    fn synchronization_point_registration_succeeded(&self, label: &str) {
        log::debug!("[callbacks] registered sync point '{}'", label);
    }

    fn synchronization_point_registration_failed(&self, label: &str, reason: SyncPointFailureReason) {
        log::debug!("[callbacks] sync point '{}' registration failed: {:?}", label, reason);
        self.inner
            .lock()
            .registration_failures
            .insert(label.to_string(), reason);
    }

    fn announce_synchronization_point(&self, label: &str, _tag: &[u8]) {
        log::debug!("[callbacks] sync point '{}' announced", label);
        self.inner.lock().announced.insert(label.to_string());
    }

    fn federation_synchronized(&self, label: &str) {
        log::debug!("[callbacks] federation synchronized on '{}'", label);
        self.inner.lock().synchronized.insert(label.to_string());
    }

    fn time_regulation_enabled(&self, time: LogicalTime) {
        let mut inner = self.inner.lock();
        inner.regulating = true;
        inner.time = time;
    }

    fn time_constrained_enabled(&self, time: LogicalTime) {
        let mut inner = self.inner.lock();
        inner.constrained = true;
        inner.time = time;
    }

    fn time_advance_grant(&self, time: LogicalTime) {
        self.inner.lock().time = time;
    }

    fn discover_object_instance(
        &self,
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: &str,
    ) {
        let mut inner = self.inner.lock();
        inner.instance_classes.insert(instance, class);
        inner.events.push_back(RtiEvent::Discovered {
            instance,
            class,
            name: name.to_string(),
        });
    }

    fn reflect_attribute_values(
        &self,
        instance: ObjectInstanceHandle,
        values: AttributeValueMap,
        _tag: &[u8],
        time: Option<LogicalTime>,
    ) {
        let mut inner = self.inner.lock();
        if !inner.instance_classes.contains_key(&instance) {
            log::warn!("[callbacks] reflection for unknown instance {}, dropped", instance);
            return;
        }
        inner.events.push_back(RtiEvent::Reflected {
            instance,
            values,
            time,
        });
    }

    fn receive_interaction(
        &self,
        class: InteractionClassHandle,
        values: ParameterValueMap,
        _tag: &[u8],
        time: Option<LogicalTime>,
    ) {
        self.inner
            .lock()
            .events
            .push_back(RtiEvent::Interaction {
                class,
                values,
                time,
            });
    }

    fn remove_object_instance(&self, instance: ObjectInstanceHandle, _tag: &[u8]) {
        let mut inner = self.inner.lock();
        if inner.instance_classes.remove(&instance).is_none() {
            log::warn!("[callbacks] removal of unknown instance {}, dropped", instance);
            return;
        }
        inner.events.push_back(RtiEvent::Removed { instance });
    }

    fn provide_attribute_value_update(
        &self,
        instance: ObjectInstanceHandle,
        attributes: &[AttributeHandle],
        _tag: &[u8],
    ) {
        self.inner
            .lock()
            .events
            .push_back(RtiEvent::ProvideUpdate {
                instance,
                attributes: attributes.to_vec(),
            });
    }
}
