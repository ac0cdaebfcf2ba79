// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HFED - HLA 1516e federate framework
//!
//! Builds HLA federates on top of an RTI ambassador: the framework owns the
//! protocol sequencing (connect, join with retry, time policy,
//! synchronization points, time-stepped loop, resign) and the application
//! supplies hooks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hfed::{
//!     Ambassador, Federate, FederateConfiguration, FederateContext, LifecycleHooks,
//!     LocalRti, LogicalTime, Result, RtiEventHooks, SimControlHooks,
//! };
//!
//! struct Clock {
//!     steps: u32,
//! }
//!
//! impl LifecycleHooks for Clock {
//!     fn step(&mut self, _ctx: &mut FederateContext<'_>, time: LogicalTime) -> Result<bool> {
//!         println!("t = {}", time);
//!         self.steps += 1;
//!         Ok(self.steps < 10)
//!     }
//! }
//! impl RtiEventHooks for Clock {}
//! impl SimControlHooks for Clock {}
//!
//! fn main() -> Result<()> {
//!     let rti = LocalRti::new();
//!     let mut config = FederateConfiguration::new("clock", "Clock", "Demo");
//!     config.set_can_create_federation(true);
//!
//!     let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), Clock { steps: 0 });
//!     federate.run()
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        Application hooks                            |
//! |   LifecycleHooks | RtiEventHooks | SimControlHooks | Realizers      |
//! +---------------------------------------------------------------------+
//! |                        Federate runner                              |
//! |   lifecycle states | sync points | join retry | time advance        |
//! +---------------------------------------------------------------------+
//! |                        Ambassador facade                            |
//! |   error wrapping | handle/name lookups | HLAObject/HLAInteraction   |
//! +---------------------------------------------------------------------+
//! |                        RtiAmbassador trait                          |
//! |   vendor binding  |  LocalRti (in-process)                          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Federate`] | Lifecycle runner driving an application's hooks |
//! | [`FederateConfiguration`] | Identity, policies, FOM modules and declarations |
//! | [`Ambassador`] | Error-wrapping facade over an [`RtiAmbassador`] |
//! | [`HLAObject`] / [`HLAInteraction`] | Name-keyed payloads with typed getters |
//! | [`Realizer`] | Handle-keyed dispatch to application types |
//! | [`LocalRti`] | In-process RTI for tests and samples |
//!
//! ## Modules Overview
//!
//! - [`federate`] - Lifecycle runner and hooks (start here)
//! - [`config`] - Federate configuration and config files
//! - [`rti`] - RTI traits, facade and the in-process RTI
//! - [`codec`] - HLA basic data representation

/// HLA basic data representation (big-endian, length-prefixed strings).
pub mod codec;
/// Federate configuration (identity, policies, declarations, files).
pub mod config;
/// Framework error type.
pub mod error;
/// Lifecycle runner, hooks, synchronization and time advance.
pub mod federate;
/// Opaque RTI handles.
pub mod handle;
/// Interactions and their typed views.
pub mod interaction;
/// Object instances and their typed views.
pub mod object;
/// Handle-keyed dispatch tables.
pub mod realizer;
/// RTI ambassador traits, facade and in-process RTI.
pub mod rti;
/// Typed access to attribute/parameter payloads.
pub mod values;

pub use codec::{DataType, TypedValue};
#[cfg(feature = "config-files")]
pub use config::{ConfigFile, ConfigFormat};
pub use config::{
    FederateConfiguration, InteractionClass, InteractionParameter, ObjectAttribute, ObjectClass,
    Sharing,
};
pub use error::{Error, ErrorKind, Result};
pub use federate::{
    CancelToken, Federate, FederateContext, FederateHooks, LifecycleHooks, LifecycleState,
    RtiEventHooks, SimCommand, SimControlHooks, WaitPolicy, READY_TO_POPULATE, READY_TO_RESIGN,
    READY_TO_RUN, SIM_END, SIM_PAUSE, SIM_RESUME,
};
pub use handle::{
    AttributeHandle, FederateHandle, InteractionClassHandle, ObjectClassHandle,
    ObjectInstanceHandle, ParameterHandle,
};
pub use interaction::{HLAInteraction, InteractionType};
pub use object::{HLAObject, ObjectType};
pub use realizer::{
    InteractionRealizer, LazyRealizer, ObjectRealizer, Realizable, Realizer, RealizerBuilder,
};
pub use rti::{
    Ambassador, AttributeValueMap, CallbackModel, FederateAmbassador, LocalRti,
    LocalRtiAmbassador, LocalRtiBuilder, LogicalTime, ParameterValueMap, ResignAction,
    RtiAmbassador, RtiException, RtiResult, SyncPointFailureReason,
};
pub use values::ValueMap;
