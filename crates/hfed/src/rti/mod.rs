// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # RTI boundary
//!
//! The Run-Time Infrastructure is a vendor-supplied dependency. This module
//! fixes the two traits the framework talks through:
//!
//! - [`RtiAmbassador`]: operations the federate invokes on the RTI
//!   (federation management, declarations, object exchange, time and
//!   synchronization services, name/handle translation).
//! - [`FederateAmbassador`]: callbacks the RTI delivers to the federate.
//!
//! A vendor binding implements [`RtiAmbassador`]; the framework wraps it in
//! the [`Ambassador`] facade which turns every [`RtiException`] into a
//! contextual [`crate::Error`]. [`LocalRti`] is an in-process implementation
//! used by tests and the samples.
//!
//! ```text
//!  Federate runner --(Ambassador facade)--> dyn RtiAmbassador --> RTI
//!        ^                                                        |
//!        +------- CallbackState (dyn FederateAmbassador) <--------+
//! ```

mod facade;
pub mod local;

pub use facade::Ambassador;
pub use local::{LocalRti, LocalRtiAmbassador, LocalRtiBuilder};

use crate::handle::{
    AttributeHandle, FederateHandle, InteractionClassHandle, ObjectClassHandle,
    ObjectInstanceHandle, ParameterHandle,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Attribute values keyed by handle, as moved by the RTI.
pub type AttributeValueMap = HashMap<AttributeHandle, Vec<u8>>;
/// Parameter values keyed by handle, as moved by the RTI.
pub type ParameterValueMap = HashMap<ParameterHandle, Vec<u8>>;
/// Logical time (HLAfloat64Time).
pub type LogicalTime = f64;

/// Result of a vendor ambassador call.
pub type RtiResult<T> = core::result::Result<T, RtiException>;

/// Exceptions raised by the vendor RTI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RtiException {
    #[error("not connected")]
    NotConnected,
    #[error("already connected")]
    AlreadyConnected,
    #[error("federation execution already exists: {0}")]
    FederationExecutionAlreadyExists(String),
    #[error("federation execution does not exist: {0}")]
    FederationExecutionDoesNotExist(String),
    #[error("federates currently joined to {0}")]
    FederatesCurrentlyJoined(String),
    #[error("federate already an execution member")]
    FederateAlreadyExecutionMember,
    #[error("federate not an execution member")]
    FederateNotExecutionMember,
    #[error("federate name already in use: {0}")]
    FederateNameAlreadyInUse(String),
    #[error("name not found: {0}")]
    NameNotFound(String),
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    #[error("object class not published: {0}")]
    ObjectClassNotPublished(String),
    #[error("attribute not published: {0}")]
    AttributeNotPublished(String),
    #[error("interaction class not published: {0}")]
    InteractionClassNotPublished(String),
    #[error("object instance not known: {0}")]
    ObjectInstanceNotKnown(String),
    #[error("invalid logical time: {0}")]
    InvalidLogicalTime(String),
    #[error("invalid lookahead: {0}")]
    InvalidLookahead(String),
    #[error("time regulation already enabled")]
    TimeRegulationAlreadyEnabled,
    #[error("time constrained already enabled")]
    TimeConstrainedAlreadyEnabled,
    #[error("time regulation not enabled")]
    TimeRegulationIsNotEnabled,
    #[error("time constrained not enabled")]
    TimeConstrainedIsNotEnabled,
    #[error("time advance already in progress")]
    InTimeAdvancingState,
    #[error("synchronization point label not announced: {0}")]
    SynchronizationPointLabelNotAnnounced(String),
    #[error("call not allowed from within callback")]
    CallNotAllowedFromWithinCallback,
    #[error("RTI internal error: {0}")]
    Internal(String),
}

/// How the RTI delivers callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackModel {
    /// Callbacks are delivered only inside `evoke_*_callbacks` calls.
    Evoked,
    /// Callbacks are delivered as soon as they occur, on an RTI thread.
    Immediate,
}

/// What the RTI does with owned instances when a federate resigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "snake_case"))]
pub enum ResignAction {
    UnconditionallyDivestAttributes,
    DeleteObjects,
    CancelPendingOwnershipAcquisitions,
    #[default]
    DeleteObjectsThenDivest,
    CancelThenDeleteThenDivest,
    NoAction,
}

impl ResignAction {
    /// Whether owned instances are deleted on resign.
    pub fn deletes_objects(self) -> bool {
        matches!(
            self,
            ResignAction::DeleteObjects
                | ResignAction::DeleteObjectsThenDivest
                | ResignAction::CancelThenDeleteThenDivest
        )
    }
}

/// Why registering a synchronization point failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPointFailureReason {
    /// Another federate already registered the label.
    LabelNotUnique,
    /// A requested synchronization set member is not joined.
    SynchronizationSetMemberNotJoined,
}

/// Operations a federate invokes on the RTI.
///
/// Implementations are owned by exactly one federate for their whole life.
pub trait RtiAmbassador: Send {
    // Federation management
    fn connect(
        &mut self,
        callbacks: Arc<dyn FederateAmbassador>,
        model: CallbackModel,
    ) -> RtiResult<()>;
    fn disconnect(&mut self) -> RtiResult<()>;
    fn create_federation_execution(&mut self, name: &str, fom_modules: &[String])
        -> RtiResult<()>;
    fn destroy_federation_execution(&mut self, name: &str) -> RtiResult<()>;
    fn join_federation_execution(
        &mut self,
        federate_name: &str,
        federate_type: &str,
        federation_name: &str,
        modules: &[String],
    ) -> RtiResult<FederateHandle>;
    fn resign_federation_execution(&mut self, action: ResignAction) -> RtiResult<()>;

    // Synchronization
    fn register_federation_synchronization_point(&mut self, label: &str, tag: &[u8])
        -> RtiResult<()>;
    fn synchronization_point_achieved(&mut self, label: &str) -> RtiResult<()>;

    // Declarations
    fn publish_object_class_attributes(
        &mut self,
        class: ObjectClassHandle,
        attributes: &[AttributeHandle],
    ) -> RtiResult<()>;
    fn subscribe_object_class_attributes(
        &mut self,
        class: ObjectClassHandle,
        attributes: &[AttributeHandle],
    ) -> RtiResult<()>;
    fn publish_interaction_class(&mut self, class: InteractionClassHandle) -> RtiResult<()>;
    fn subscribe_interaction_class(&mut self, class: InteractionClassHandle) -> RtiResult<()>;

    // Object exchange
    fn register_object_instance(&mut self, class: ObjectClassHandle)
        -> RtiResult<ObjectInstanceHandle>;
    fn update_attribute_values(
        &mut self,
        instance: ObjectInstanceHandle,
        values: &AttributeValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
    ) -> RtiResult<()>;
    fn send_interaction(
        &mut self,
        class: InteractionClassHandle,
        values: &ParameterValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
    ) -> RtiResult<()>;
    fn delete_object_instance(&mut self, instance: ObjectInstanceHandle, tag: &[u8])
        -> RtiResult<()>;
    fn request_attribute_value_update(
        &mut self,
        instance: ObjectInstanceHandle,
        attributes: &[AttributeHandle],
        tag: &[u8],
    ) -> RtiResult<()>;

    // Time management
    fn enable_time_regulation(&mut self, lookahead: f64) -> RtiResult<()>;
    fn disable_time_regulation(&mut self) -> RtiResult<()>;
    fn enable_time_constrained(&mut self) -> RtiResult<()>;
    fn disable_time_constrained(&mut self) -> RtiResult<()>;
    fn time_advance_request(&mut self, time: LogicalTime) -> RtiResult<()>;

    /// Deliver pending callbacks for at least `min_secs` (or until one
    /// arrives) and at most `max_secs`. Returns whether more are pending.
    fn evoke_multiple_callbacks(&mut self, min_secs: f64, max_secs: f64) -> RtiResult<bool>;

    // Name/handle translation
    fn get_object_class_handle(&self, name: &str) -> RtiResult<ObjectClassHandle>;
    fn get_object_class_name(&self, handle: ObjectClassHandle) -> RtiResult<String>;
    fn get_attribute_handle(&self, class: ObjectClassHandle, name: &str)
        -> RtiResult<AttributeHandle>;
    fn get_attribute_name(
        &self,
        class: ObjectClassHandle,
        handle: AttributeHandle,
    ) -> RtiResult<String>;
    fn get_interaction_class_handle(&self, name: &str) -> RtiResult<InteractionClassHandle>;
    fn get_interaction_class_name(&self, handle: InteractionClassHandle) -> RtiResult<String>;
    fn get_parameter_handle(
        &self,
        class: InteractionClassHandle,
        name: &str,
    ) -> RtiResult<ParameterHandle>;
    fn get_parameter_name(
        &self,
        class: InteractionClassHandle,
        handle: ParameterHandle,
    ) -> RtiResult<String>;
    fn get_object_instance_handle(&self, name: &str) -> RtiResult<ObjectInstanceHandle>;
    fn get_object_instance_name(&self, handle: ObjectInstanceHandle) -> RtiResult<String>;
    fn get_known_object_class_handle(
        &self,
        instance: ObjectInstanceHandle,
    ) -> RtiResult<ObjectClassHandle>;
}

/// Callbacks the RTI delivers to a federate.
///
/// Called either from inside `evoke_multiple_callbacks` on the federate's own
/// thread, or from an RTI thread when callbacks are immediate, hence `&self`
/// and `Send + Sync`. Implementations must not call back into the RTI.
pub trait FederateAmbassador: Send + Sync {
    fn synchronization_point_registration_succeeded(&self, label: &str);
    fn synchronization_point_registration_failed(
        &self,
        label: &str,
        reason: SyncPointFailureReason,
    );
    fn announce_synchronization_point(&self, label: &str, tag: &[u8]);
    fn federation_synchronized(&self, label: &str);

    fn time_regulation_enabled(&self, time: LogicalTime);
    fn time_constrained_enabled(&self, time: LogicalTime);
    fn time_advance_grant(&self, time: LogicalTime);

    fn discover_object_instance(
        &self,
        instance: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: &str,
    );
    fn reflect_attribute_values(
        &self,
        instance: ObjectInstanceHandle,
        values: AttributeValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
    );
    fn receive_interaction(
        &self,
        class: InteractionClassHandle,
        values: ParameterValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
    );
    fn remove_object_instance(&self, instance: ObjectInstanceHandle, tag: &[u8]);

    /// The RTI asks the owner for fresh values of `attributes`. Default: ignored.
    fn provide_attribute_value_update(
        &self,
        _instance: ObjectInstanceHandle,
        _attributes: &[AttributeHandle],
        _tag: &[u8],
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resign_action_deletes_objects() {
        assert!(ResignAction::default().deletes_objects());
        assert!(ResignAction::DeleteObjects.deletes_objects());
        assert!(!ResignAction::NoAction.deletes_objects());
        assert!(!ResignAction::UnconditionallyDivestAttributes.deletes_objects());
    }
}
