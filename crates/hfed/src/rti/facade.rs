// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ambassador facade.
//!
//! Wraps the vendor [`RtiAmbassador`] so the rest of the framework deals in
//! class/attribute names and [`crate::Error`] values:
//!
//! - every [`RtiException`] becomes an [`Error`] with an [`ErrorKind`] and a
//!   message naming what was involved;
//! - lookups come in two flavours: safe ones returning `Option` (the
//!   failure is logged at `debug`) and `require_*` ones returning `Result`.

use super::{
    AttributeValueMap, CallbackModel, FederateAmbassador, LogicalTime, ParameterValueMap,
    ResignAction, RtiAmbassador, RtiException,
};
use crate::error::{Error, ErrorKind, Result};
use crate::handle::{
    AttributeHandle, FederateHandle, InteractionClassHandle, ObjectClassHandle,
    ObjectInstanceHandle, ParameterHandle,
};
use crate::interaction::HLAInteraction;
use crate::object::HLAObject;
use crate::values::ValueMap;
use std::fmt;
use std::sync::Arc;

/// The federate's single connection to the RTI.
pub struct Ambassador {
    rti: Box<dyn RtiAmbassador>,
}

impl fmt::Debug for Ambassador {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ambassador").finish_non_exhaustive()
    }
}

impl Ambassador {
    pub fn new<R: RtiAmbassador + 'static>(rti: R) -> Self {
        Self { rti: Box::new(rti) }
    }

    pub fn from_boxed(rti: Box<dyn RtiAmbassador>) -> Self {
        Self { rti }
    }

    /// An ambassador on a strict loopback RTI with nothing declared: every
    /// lookup misses.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self::new(super::LocalRti::builder().strict().build().ambassador())
    }

    /// Direct access to the vendor binding.
    pub fn rti(&self) -> &dyn RtiAmbassador {
        self.rti.as_ref()
    }

    pub fn rti_mut(&mut self) -> &mut dyn RtiAmbassador {
        self.rti.as_mut()
    }

    // ========================================================================
    // Federation management
    // ========================================================================

    pub fn connect(
        &mut self,
        callbacks: Arc<dyn FederateAmbassador>,
        model: CallbackModel,
    ) -> Result<()> {
        self.rti
            .connect(callbacks, model)
            .map_err(|e| Error::rti(ErrorKind::ConnectionFailed, "connect to RTI", e))
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.rti
            .disconnect()
            .map_err(|e| Error::rti(ErrorKind::ConnectionFailed, "disconnect from RTI", e))
    }

    /// Create the federation execution. Returns `false` when it already
    /// existed, which is not an error.
    pub fn create_federation(&mut self, name: &str, fom_modules: &[String]) -> Result<bool> {
        match self.rti.create_federation_execution(name, fom_modules) {
            Ok(()) => {
                log::info!("[ambassador] created federation '{}'", name);
                Ok(true)
            }
            Err(RtiException::FederationExecutionAlreadyExists(_)) => {
                log::info!("[ambassador] federation '{}' already exists", name);
                Ok(false)
            }
            Err(e) => Err(Error::rti(
                ErrorKind::FederationManagementFailed,
                format!("create federation '{}'", name),
                e,
            )),
        }
    }

    /// Destroy the federation execution. Returns `false` when other
    /// federates are still joined or it is already gone.
    pub fn destroy_federation(&mut self, name: &str) -> Result<bool> {
        match self.rti.destroy_federation_execution(name) {
            Ok(()) => {
                log::info!("[ambassador] destroyed federation '{}'", name);
                Ok(true)
            }
            Err(RtiException::FederatesCurrentlyJoined(_)) => {
                log::info!(
                    "[ambassador] federation '{}' not destroyed, federates still joined",
                    name
                );
                Ok(false)
            }
            Err(RtiException::FederationExecutionDoesNotExist(_)) => {
                log::info!("[ambassador] federation '{}' already destroyed", name);
                Ok(false)
            }
            Err(e) => Err(Error::rti(
                ErrorKind::FederationManagementFailed,
                format!("destroy federation '{}'", name),
                e,
            )),
        }
    }

    pub fn join(
        &mut self,
        federate_name: &str,
        federate_type: &str,
        federation_name: &str,
        modules: &[String],
    ) -> Result<FederateHandle> {
        self.rti
            .join_federation_execution(federate_name, federate_type, federation_name, modules)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::JoinFailed,
                    format!(
                        "federate '{}' ({}) joining '{}'",
                        federate_name, federate_type, federation_name
                    ),
                    e,
                )
            })
    }

    pub fn resign(&mut self, action: ResignAction) -> Result<()> {
        self.rti.resign_federation_execution(action).map_err(|e| {
            Error::rti(
                ErrorKind::FederationManagementFailed,
                format!("resign ({:?})", action),
                e,
            )
        })
    }

    // ========================================================================
    // Synchronization
    // ========================================================================

    pub fn register_sync_point(&mut self, label: &str, tag: &[u8]) -> Result<()> {
        self.rti
            .register_federation_synchronization_point(label, tag)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::SyncPointFailed,
                    format!("register synchronization point '{}'", label),
                    e,
                )
            })
    }

    pub fn achieve_sync_point(&mut self, label: &str) -> Result<()> {
        self.rti.synchronization_point_achieved(label).map_err(|e| {
            Error::rti(
                ErrorKind::SyncPointFailed,
                format!("achieve synchronization point '{}'", label),
                e,
            )
        })
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Publish `attributes` of the object class `class_name`.
    pub fn publish_object_class<S: AsRef<str>>(
        &mut self,
        class_name: &str,
        attributes: &[S],
    ) -> Result<ObjectClassHandle> {
        let class = self.require_object_class_handle(class_name)?;
        let handles = self.require_attribute_handles(class, class_name, attributes)?;
        self.rti
            .publish_object_class_attributes(class, &handles)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::PublishSubscribeFailed,
                    format!("publish {} {:?}", class_name, names(attributes)),
                    e,
                )
            })?;
        log::debug!("[ambassador] published {} {:?}", class_name, names(attributes));
        Ok(class)
    }

    /// Subscribe to `attributes` of the object class `class_name`.
    pub fn subscribe_object_class<S: AsRef<str>>(
        &mut self,
        class_name: &str,
        attributes: &[S],
    ) -> Result<ObjectClassHandle> {
        let class = self.require_object_class_handle(class_name)?;
        let handles = self.require_attribute_handles(class, class_name, attributes)?;
        self.rti
            .subscribe_object_class_attributes(class, &handles)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::PublishSubscribeFailed,
                    format!("subscribe {} {:?}", class_name, names(attributes)),
                    e,
                )
            })?;
        log::debug!("[ambassador] subscribed {} {:?}", class_name, names(attributes));
        Ok(class)
    }

    pub fn publish_interaction(&mut self, class_name: &str) -> Result<InteractionClassHandle> {
        let class = self.require_interaction_class_handle(class_name)?;
        self.rti.publish_interaction_class(class).map_err(|e| {
            Error::rti(
                ErrorKind::PublishSubscribeFailed,
                format!("publish interaction {}", class_name),
                e,
            )
        })?;
        log::debug!("[ambassador] published interaction {}", class_name);
        Ok(class)
    }

    pub fn subscribe_interaction(&mut self, class_name: &str) -> Result<InteractionClassHandle> {
        let class = self.require_interaction_class_handle(class_name)?;
        self.rti.subscribe_interaction_class(class).map_err(|e| {
            Error::rti(
                ErrorKind::PublishSubscribeFailed,
                format!("subscribe interaction {}", class_name),
                e,
            )
        })?;
        log::debug!("[ambassador] subscribed interaction {}", class_name);
        Ok(class)
    }

    // ========================================================================
    // Object exchange
    // ========================================================================

    pub fn register_object_instance(
        &mut self,
        class: ObjectClassHandle,
    ) -> Result<ObjectInstanceHandle> {
        self.rti.register_object_instance(class).map_err(|e| {
            Error::rti(
                ErrorKind::SendFailed,
                format!("register instance of {}", self.describe_object_class(class)),
                e,
            )
        })
    }

    /// Register a new instance of `class_name` and wrap it, values empty.
    pub fn register_object(&mut self, class_name: &str) -> Result<HLAObject> {
        let class = self.require_object_class_handle(class_name)?;
        let instance = self.register_object_instance(class)?;
        let instance_name = self
            .object_instance_name(instance)
            .unwrap_or_else(|| instance.to_string());
        log::debug!(
            "[ambassador] registered {} '{}' ({})",
            class_name,
            instance_name,
            instance
        );
        Ok(HLAObject::new(instance, class, class_name, instance_name))
    }

    /// Send the attribute values carried by `object`.
    pub fn update_attributes(
        &mut self,
        object: &HLAObject,
        tag: &[u8],
        time: Option<LogicalTime>,
    ) -> Result<()> {
        let values = self.attribute_values_of(object)?;
        self.rti
            .update_attribute_values(object.instance_handle(), &values, tag, time)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::SendFailed,
                    format!(
                        "update {} '{}' {:?}",
                        object.class_name(),
                        object.instance_name(),
                        object.attribute_names()
                    ),
                    e,
                )
            })
    }

    /// Send `interaction` with its parameter values.
    pub fn send_interaction(
        &mut self,
        interaction: &HLAInteraction,
        tag: &[u8],
        time: Option<LogicalTime>,
    ) -> Result<()> {
        let class = interaction.class_handle();
        let mut values = ParameterValueMap::with_capacity(interaction.values().len());
        for (name, bytes) in interaction.values() {
            let handle = self.require_parameter_handle(class, interaction.class_name(), name)?;
            values.insert(handle, bytes.clone());
        }
        self.rti
            .send_interaction(class, &values, tag, time)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::SendFailed,
                    format!(
                        "send {} {:?}",
                        interaction.class_name(),
                        interaction.parameter_names()
                    ),
                    e,
                )
            })
    }

    pub fn delete_object_instance(
        &mut self,
        instance: ObjectInstanceHandle,
        tag: &[u8],
    ) -> Result<()> {
        self.rti
            .delete_object_instance(instance, tag)
            .map_err(|e| Error::rti(ErrorKind::SendFailed, format!("delete {}", instance), e))
    }

    /// Ask the owners of `object` to send fresh values of `attributes`.
    pub fn request_attribute_update<S: AsRef<str>>(
        &mut self,
        object: &HLAObject,
        attributes: &[S],
        tag: &[u8],
    ) -> Result<()> {
        let handles =
            self.require_attribute_handles(object.class_handle(), object.class_name(), attributes)?;
        self.rti
            .request_attribute_value_update(object.instance_handle(), &handles, tag)
            .map_err(|e| {
                Error::rti(
                    ErrorKind::SendFailed,
                    format!(
                        "request update of '{}' {:?}",
                        object.instance_name(),
                        names(attributes)
                    ),
                    e,
                )
            })
    }

    // ========================================================================
    // Time management
    // ========================================================================

    pub fn enable_time_regulation(&mut self, lookahead: f64) -> Result<()> {
        self.rti.enable_time_regulation(lookahead).map_err(|e| {
            Error::rti(
                ErrorKind::TimeManagementFailed,
                format!("enable time regulation (lookahead {})", lookahead),
                e,
            )
        })
    }

    pub fn disable_time_regulation(&mut self) -> Result<()> {
        self.rti.disable_time_regulation().map_err(|e| {
            Error::rti(ErrorKind::TimeManagementFailed, "disable time regulation", e)
        })
    }

    pub fn enable_time_constrained(&mut self) -> Result<()> {
        self.rti.enable_time_constrained().map_err(|e| {
            Error::rti(ErrorKind::TimeManagementFailed, "enable time constrained", e)
        })
    }

    pub fn disable_time_constrained(&mut self) -> Result<()> {
        self.rti.disable_time_constrained().map_err(|e| {
            Error::rti(ErrorKind::TimeManagementFailed, "disable time constrained", e)
        })
    }

    pub fn time_advance_request(&mut self, time: LogicalTime) -> Result<()> {
        self.rti.time_advance_request(time).map_err(|e| {
            Error::rti(
                ErrorKind::TimeManagementFailed,
                format!("time advance request to {}", time),
                e,
            )
        })
    }

    /// Let the RTI deliver pending callbacks. Returns whether more are pending.
    pub fn evoke_callbacks(&mut self, min_secs: f64, max_secs: f64) -> Result<bool> {
        self.rti
            .evoke_multiple_callbacks(min_secs, max_secs)
            .map_err(|e| Error::rti(ErrorKind::CallbackFailed, "evoke callbacks", e))
    }

    // ========================================================================
    // Safe lookups
    // ========================================================================

    pub fn object_class_handle(&self, name: &str) -> Option<ObjectClassHandle> {
        safe("object class", name, self.rti.get_object_class_handle(name))
    }

    pub fn object_class_name(&self, handle: ObjectClassHandle) -> Option<String> {
        safe("object class", handle, self.rti.get_object_class_name(handle))
    }

    pub fn attribute_handle(&self, class: ObjectClassHandle, name: &str) -> Option<AttributeHandle> {
        safe("attribute", name, self.rti.get_attribute_handle(class, name))
    }

    pub fn attribute_name(&self, class: ObjectClassHandle, handle: AttributeHandle) -> Option<String> {
        safe("attribute", handle, self.rti.get_attribute_name(class, handle))
    }

    pub fn interaction_class_handle(&self, name: &str) -> Option<InteractionClassHandle> {
        safe("interaction class", name, self.rti.get_interaction_class_handle(name))
    }

    pub fn interaction_class_name(&self, handle: InteractionClassHandle) -> Option<String> {
        safe("interaction class", handle, self.rti.get_interaction_class_name(handle))
    }

    pub fn parameter_handle(
        &self,
        class: InteractionClassHandle,
        name: &str,
    ) -> Option<ParameterHandle> {
        safe("parameter", name, self.rti.get_parameter_handle(class, name))
    }

    pub fn parameter_name(
        &self,
        class: InteractionClassHandle,
        handle: ParameterHandle,
    ) -> Option<String> {
        safe("parameter", handle, self.rti.get_parameter_name(class, handle))
    }

    pub fn object_instance_handle(&self, name: &str) -> Option<ObjectInstanceHandle> {
        safe("object instance", name, self.rti.get_object_instance_handle(name))
    }

    pub fn object_instance_name(&self, handle: ObjectInstanceHandle) -> Option<String> {
        safe("object instance", handle, self.rti.get_object_instance_name(handle))
    }

    pub fn known_object_class_handle(
        &self,
        instance: ObjectInstanceHandle,
    ) -> Option<ObjectClassHandle> {
        safe(
            "known class of",
            instance,
            self.rti.get_known_object_class_handle(instance),
        )
    }

    // ========================================================================
    // Checked lookups
    // ========================================================================

    pub fn require_object_class_handle(&self, name: &str) -> Result<ObjectClassHandle> {
        self.rti.get_object_class_handle(name).map_err(|e| {
            Error::rti(
                ErrorKind::HandleLookupFailed,
                format!("object class '{}'", name),
                e,
            )
        })
    }

    pub fn require_attribute_handle(
        &self,
        class: ObjectClassHandle,
        class_name: &str,
        name: &str,
    ) -> Result<AttributeHandle> {
        self.rti.get_attribute_handle(class, name).map_err(|e| {
            Error::rti(
                ErrorKind::HandleLookupFailed,
                format!("attribute '{}' of {} ({})", name, class_name, class),
                e,
            )
        })
    }

    pub fn require_interaction_class_handle(&self, name: &str) -> Result<InteractionClassHandle> {
        self.rti.get_interaction_class_handle(name).map_err(|e| {
            Error::rti(
                ErrorKind::HandleLookupFailed,
                format!("interaction class '{}'", name),
                e,
            )
        })
    }

    pub fn require_parameter_handle(
        &self,
        class: InteractionClassHandle,
        class_name: &str,
        name: &str,
    ) -> Result<ParameterHandle> {
        self.rti.get_parameter_handle(class, name).map_err(|e| {
            Error::rti(
                ErrorKind::HandleLookupFailed,
                format!("parameter '{}' of {} ({})", name, class_name, class),
                e,
            )
        })
    }

    // ========================================================================
    // Payload translation
    // ========================================================================

    /// Wrap a received interaction. Parameters whose handle cannot be named
    /// are dropped with a warning.
    pub fn interaction_from(
        &self,
        class: InteractionClassHandle,
        values: ParameterValueMap,
    ) -> HLAInteraction {
        let class_name = self
            .interaction_class_name(class)
            .unwrap_or_else(|| class.to_string());
        let mut interaction = HLAInteraction::new(class, class_name);
        for (handle, bytes) in values {
            match self.parameter_name(class, handle) {
                Some(name) => {
                    interaction.set_bytes(&name, bytes);
                }
                None => log::warn!(
                    "[ambassador] {}: unknown parameter {}, dropped",
                    interaction.class_name(),
                    handle
                ),
            }
        }
        interaction
    }

    /// Copy a reflection's values into `object`. Attributes whose handle
    /// cannot be named are dropped with a warning.
    pub fn apply_reflection(&self, object: &mut HLAObject, values: AttributeValueMap) {
        let class = object.class_handle();
        for (handle, bytes) in values {
            match self.attribute_name(class, handle) {
                Some(name) => {
                    object.set_bytes(&name, bytes);
                }
                None => log::warn!(
                    "[ambassador] {} '{}': unknown attribute {}, dropped",
                    object.class_name(),
                    object.instance_name(),
                    handle
                ),
            }
        }
    }

    fn attribute_values_of(&self, object: &HLAObject) -> Result<AttributeValueMap> {
        let mut values = AttributeValueMap::with_capacity(object.values().len());
        for (name, bytes) in object.values() {
            let handle =
                self.require_attribute_handle(object.class_handle(), object.class_name(), name)?;
            values.insert(handle, bytes.clone());
        }
        Ok(values)
    }

    fn require_attribute_handles<S: AsRef<str>>(
        &self,
        class: ObjectClassHandle,
        class_name: &str,
        attributes: &[S],
    ) -> Result<Vec<AttributeHandle>> {
        attributes
            .iter()
            .map(|a| self.require_attribute_handle(class, class_name, a.as_ref()))
            .collect()
    }

    fn describe_object_class(&self, class: ObjectClassHandle) -> String {
        match self.object_class_name(class) {
            Some(name) => format!("{} ({})", name, class),
            None => class.to_string(),
        }
    }
}

fn safe<T, K: fmt::Display>(what: &str, key: K, result: super::RtiResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("[ambassador] {} '{}' lookup failed: {}", what, key, e);
            None
        }
    }
}

fn names<S: AsRef<str>>(items: &[S]) -> Vec<&str> {
    items.iter().map(AsRef::as_ref).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rti::LocalRti;

    fn connected(rti: &LocalRti) -> Ambassador {
        let mut amb = Ambassador::new(rti.ambassador());
        amb.connect(Arc::new(crate::rti::local::NullCallbacks), CallbackModel::Evoked)
            .unwrap();
        amb
    }

    #[test]
    fn test_create_tolerates_existing() {
        let rti = LocalRti::new();
        let mut amb = connected(&rti);
        assert!(amb.create_federation("Demo", &[]).unwrap());
        assert!(!amb.create_federation("Demo", &[]).unwrap());
    }

    #[test]
    fn test_destroy_tolerates_joined_and_missing() {
        let rti = LocalRti::new();
        let mut a = connected(&rti);
        let mut b = connected(&rti);
        a.create_federation("Demo", &[]).unwrap();
        a.join("A", "T", "Demo", &[]).unwrap();
        b.join("B", "T", "Demo", &[]).unwrap();
        a.resign(ResignAction::default()).unwrap();
        assert!(!a.destroy_federation("Demo").unwrap());
        b.resign(ResignAction::default()).unwrap();
        assert!(b.destroy_federation("Demo").unwrap());
        assert!(!b.destroy_federation("Demo").unwrap());
    }

    #[test]
    fn test_join_failure_maps_kind() {
        let rti = LocalRti::new();
        let mut amb = connected(&rti);
        let err = amb.join("A", "T", "Missing", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::JoinFailed);
        assert!(err.message().contains("Missing"));
        assert!(matches!(
            err.cause(),
            Some(RtiException::FederationExecutionDoesNotExist(_))
        ));
    }

    #[test]
    fn test_lookup_flavours() {
        let rti = LocalRti::builder()
            .strict()
            .declare_object_class("Car", &["speed"])
            .build();
        let amb = connected(&rti);
        let car = amb.object_class_handle("Car").unwrap();
        assert!(amb.attribute_handle(car, "speed").is_some());
        assert!(amb.attribute_handle(car, "colour").is_none());
        assert_eq!(amb.object_class_name(car).as_deref(), Some("Car"));
        assert!(amb.object_class_handle("Truck").is_none());

        let err = amb.require_object_class_handle("Truck").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HandleLookupFailed);
        assert!(err.message().contains("Truck"));
    }

    #[test]
    fn test_publish_unknown_attribute_is_lookup_error() {
        let rti = LocalRti::builder()
            .strict()
            .declare_object_class("Car", &["speed"])
            .build();
        let mut amb = connected(&rti);
        amb.create_federation("Demo", &[]).unwrap();
        amb.join("A", "T", "Demo", &[]).unwrap();
        let err = amb.publish_object_class("Car", &["colour"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HandleLookupFailed);
        assert!(err.message().contains("colour"));
    }
}
