// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Federate configuration.
//!
//! A [`FederateConfiguration`] carries the federate's identity, connection
//! and retry policy, time policy, FOM/SOM modules and the object/interaction
//! classes it publishes or subscribes to.
//!
//! # Freezing
//!
//! The configuration is mutable while it is being assembled (from code, a
//! file, command-line flags). [`FederateConfiguration::freeze`] seals it:
//! from then on every setter is a logged no-op, so the federate observes the
//! exact values that were present when it was frozen. The lifecycle runner
//! freezes the configuration it is given.
//!
//! # Example
//!
//! ```
//! use hfed::{DataType, FederateConfiguration};
//!
//! let mut config = FederateConfiguration::new("Pong", "PongFederate", "PingPong");
//! config
//!     .set_can_create_federation(true)
//!     .set_lookahead(0.5)
//!     .add_subscribed_interaction("Ping")
//!     .add_interaction_parameter("Ping", "count", DataType::Int)
//!     .add_published_interaction("Pong")
//!     .add_interaction_parameter("Pong", "count", DataType::Int);
//! config.freeze();
//! config.set_lookahead(9.0); // ignored
//! assert_eq!(config.lookahead(), 0.5);
//! ```

#[cfg(feature = "config-files")]
mod file;
mod model;
mod sharing;

#[cfg(feature = "config-files")]
pub use file::{ConfigFile, ConfigFormat};
pub use model::{InteractionClass, InteractionParameter, ObjectAttribute, ObjectClass};
pub use sharing::Sharing;

use crate::codec::DataType;
use crate::error::{Error, Result};
use crate::federate::WaitPolicy;
use crate::rti::{CallbackModel, ResignAction};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default number of join attempts before giving up.
pub const DEFAULT_MAX_JOIN_ATTEMPTS: u32 = 5;
/// Default wait between join attempts, in seconds.
pub const DEFAULT_JOIN_RETRY_INTERVAL_SECS: u64 = 5;
/// Default poll interval for waits when callbacks are delivered immediately.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Complete description of one federate.
#[derive(Debug, Clone, PartialEq)]
pub struct FederateConfiguration {
    federate_name: String,
    federate_type: String,
    federation_name: String,

    can_create_federation: bool,
    max_join_attempts: u32,
    join_retry_interval_secs: u64,

    time_stepped: bool,
    lookahead: f64,
    step_size: f64,
    callbacks_evoked: bool,
    evoke_min_secs: f64,
    evoke_max_secs: f64,

    late_joiner: bool,
    sync_before_resign: bool,
    sim_control: bool,
    resign_action: ResignAction,
    wait_timeout: Option<Duration>,
    poll_interval: Duration,

    fom_modules: Vec<String>,
    som_modules: Vec<String>,
    object_classes: BTreeMap<String, ObjectClass>,
    interaction_classes: BTreeMap<String, InteractionClass>,

    frozen: bool,
}

impl Default for FederateConfiguration {
    fn default() -> Self {
        Self {
            federate_name: String::new(),
            federate_type: String::new(),
            federation_name: String::new(),
            can_create_federation: false,
            max_join_attempts: DEFAULT_MAX_JOIN_ATTEMPTS,
            join_retry_interval_secs: DEFAULT_JOIN_RETRY_INTERVAL_SECS,
            time_stepped: true,
            lookahead: 1.0,
            step_size: 1.0,
            callbacks_evoked: true,
            evoke_min_secs: 0.1,
            evoke_max_secs: 0.2,
            late_joiner: false,
            sync_before_resign: false,
            sim_control: false,
            resign_action: ResignAction::default(),
            wait_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            fom_modules: Vec::new(),
            som_modules: Vec::new(),
            object_classes: BTreeMap::new(),
            interaction_classes: BTreeMap::new(),
            frozen: false,
        }
    }
}

impl FederateConfiguration {
    pub fn new(
        federate_name: impl Into<String>,
        federate_type: impl Into<String>,
        federation_name: impl Into<String>,
    ) -> Self {
        Self {
            federate_name: federate_name.into(),
            federate_type: federate_type.into(),
            federation_name: federation_name.into(),
            ..Self::default()
        }
    }

    /// Seal the configuration. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::debug!("[config] freezing configuration for '{}'", self.federate_name);
        }
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns `true` when mutation is allowed; logs the ignored change otherwise.
    fn mutable(&self, what: &str) -> bool {
        if self.frozen {
            log::warn!(
                "[config] '{}' is frozen, ignoring change to {}",
                self.federate_name,
                what
            );
        }
        !self.frozen
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    pub fn federate_name(&self) -> &str {
        &self.federate_name
    }

    pub fn federate_type(&self) -> &str {
        &self.federate_type
    }

    pub fn federation_name(&self) -> &str {
        &self.federation_name
    }

    pub fn set_federate_name(&mut self, name: impl Into<String>) -> &mut Self {
        if self.mutable("federate name") {
            self.federate_name = name.into();
        }
        self
    }

    pub fn set_federate_type(&mut self, federate_type: impl Into<String>) -> &mut Self {
        if self.mutable("federate type") {
            self.federate_type = federate_type.into();
        }
        self
    }

    pub fn set_federation_name(&mut self, name: impl Into<String>) -> &mut Self {
        if self.mutable("federation name") {
            self.federation_name = name.into();
        }
        self
    }

    // ------------------------------------------------------------------------
    // Connection policy
    // ------------------------------------------------------------------------

    pub fn can_create_federation(&self) -> bool {
        self.can_create_federation
    }

    pub fn max_join_attempts(&self) -> u32 {
        self.max_join_attempts
    }

    pub fn join_retry_interval_secs(&self) -> u64 {
        self.join_retry_interval_secs
    }

    pub fn join_retry_interval(&self) -> Duration {
        Duration::from_secs(self.join_retry_interval_secs)
    }

    pub fn set_can_create_federation(&mut self, can_create: bool) -> &mut Self {
        if self.mutable("can-create-federation") {
            self.can_create_federation = can_create;
        }
        self
    }

    pub fn set_max_join_attempts(&mut self, attempts: u32) -> &mut Self {
        if self.mutable("max join attempts") {
            self.max_join_attempts = attempts;
        }
        self
    }

    pub fn set_join_retry_interval_secs(&mut self, secs: u64) -> &mut Self {
        if self.mutable("join retry interval") {
            self.join_retry_interval_secs = secs;
        }
        self
    }

    // ------------------------------------------------------------------------
    // Time policy
    // ------------------------------------------------------------------------

    pub fn is_time_stepped(&self) -> bool {
        self.time_stepped
    }

    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    /// Nominal simulated time per step. Informational for application code;
    /// time advances themselves use the lookahead.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn are_callbacks_evoked(&self) -> bool {
        self.callbacks_evoked
    }

    pub fn callback_model(&self) -> CallbackModel {
        if self.callbacks_evoked {
            CallbackModel::Evoked
        } else {
            CallbackModel::Immediate
        }
    }

    /// `(min, max)` seconds passed to each callback evocation.
    pub fn evoke_window(&self) -> (f64, f64) {
        (self.evoke_min_secs, self.evoke_max_secs)
    }

    pub fn set_time_stepped(&mut self, time_stepped: bool) -> &mut Self {
        if self.mutable("time stepped") {
            self.time_stepped = time_stepped;
        }
        self
    }

    pub fn set_lookahead(&mut self, lookahead: f64) -> &mut Self {
        if self.mutable("lookahead") {
            self.lookahead = lookahead;
        }
        self
    }

    pub fn set_step_size(&mut self, step_size: f64) -> &mut Self {
        if self.mutable("step size") {
            self.step_size = step_size;
        }
        self
    }

    pub fn set_callbacks_evoked(&mut self, evoked: bool) -> &mut Self {
        if self.mutable("callbacks evoked") {
            self.callbacks_evoked = evoked;
        }
        self
    }

    pub fn set_evoke_window(&mut self, min_secs: f64, max_secs: f64) -> &mut Self {
        if self.mutable("evoke window") {
            self.evoke_min_secs = min_secs;
            self.evoke_max_secs = max_secs;
        }
        self
    }

    // ------------------------------------------------------------------------
    // Lifecycle options
    // ------------------------------------------------------------------------

    pub fn is_late_joiner(&self) -> bool {
        self.late_joiner
    }

    pub fn sync_before_resign(&self) -> bool {
        self.sync_before_resign
    }

    pub fn sim_control(&self) -> bool {
        self.sim_control
    }

    pub fn resign_action(&self) -> ResignAction {
        self.resign_action
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: self.wait_timeout,
            poll_interval: self.poll_interval,
        }
    }

    pub fn set_late_joiner(&mut self, late_joiner: bool) -> &mut Self {
        if self.mutable("late joiner") {
            self.late_joiner = late_joiner;
        }
        self
    }

    pub fn set_sync_before_resign(&mut self, sync: bool) -> &mut Self {
        if self.mutable("sync before resign") {
            self.sync_before_resign = sync;
        }
        self
    }

    pub fn set_sim_control(&mut self, enabled: bool) -> &mut Self {
        if self.mutable("sim control") {
            self.sim_control = enabled;
        }
        self
    }

    pub fn set_resign_action(&mut self, action: ResignAction) -> &mut Self {
        if self.mutable("resign action") {
            self.resign_action = action;
        }
        self
    }

    /// Bound every blocking wait. `None` waits indefinitely.
    pub fn set_wait_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        if self.mutable("wait timeout") {
            self.wait_timeout = timeout;
        }
        self
    }

    pub fn set_poll_interval(&mut self, interval: Duration) -> &mut Self {
        if self.mutable("poll interval") {
            self.poll_interval = interval;
        }
        self
    }

    // ------------------------------------------------------------------------
    // Modules
    // ------------------------------------------------------------------------

    /// FOM modules passed when creating the federation.
    pub fn fom_modules(&self) -> &[String] {
        &self.fom_modules
    }

    /// Modules passed when joining (SOM modules followed by the FOM modules).
    pub fn join_modules(&self) -> Vec<String> {
        let mut modules = self.som_modules.clone();
        for fom in &self.fom_modules {
            if !modules.contains(fom) {
                modules.push(fom.clone());
            }
        }
        modules
    }

    pub fn som_modules(&self) -> &[String] {
        &self.som_modules
    }

    pub fn add_fom_module(&mut self, module: impl Into<String>) -> &mut Self {
        if self.mutable("FOM modules") {
            push_unique(&mut self.fom_modules, module.into());
        }
        self
    }

    pub fn add_fom_modules<I, S>(&mut self, modules: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            self.add_fom_module(module);
        }
        self
    }

    pub fn add_som_module(&mut self, module: impl Into<String>) -> &mut Self {
        if self.mutable("SOM modules") {
            push_unique(&mut self.som_modules, module.into());
        }
        self
    }

    pub fn add_som_modules<I, S>(&mut self, modules: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            self.add_som_module(module);
        }
        self
    }

    // ------------------------------------------------------------------------
    // Object classes
    // ------------------------------------------------------------------------

    pub fn object_class(&self, name: &str) -> Option<&ObjectClass> {
        self.object_classes.get(name)
    }

    pub fn object_classes(&self) -> impl Iterator<Item = &ObjectClass> {
        self.object_classes.values()
    }

    pub fn published_object_classes(&self) -> impl Iterator<Item = &ObjectClass> {
        self.object_classes.values().filter(|c| c.sharing.is_publish())
    }

    pub fn subscribed_object_classes(&self) -> impl Iterator<Item = &ObjectClass> {
        self.object_classes
            .values()
            .filter(|c| c.sharing.is_subscribe())
    }

    /// Merge a whole object class declaration.
    pub fn add_object_class(&mut self, class: ObjectClass) -> &mut Self {
        if self.mutable("object classes") {
            let entry = self
                .object_classes
                .entry(class.name.clone())
                .or_insert_with(|| ObjectClass::new(class.name.clone()));
            entry.sharing = entry.sharing.merge(class.sharing);
            for attribute in class.attributes() {
                entry.add_attribute(attribute.clone());
            }
        }
        self
    }

    pub fn add_object_attribute(
        &mut self,
        class: &str,
        attribute: &str,
        data_type: DataType,
        sharing: Sharing,
    ) -> &mut Self {
        if self.mutable("object classes") {
            self.object_classes
                .entry(class.to_string())
                .or_insert_with(|| ObjectClass::new(class))
                .add_attribute(ObjectAttribute::new(attribute, data_type, sharing));
        }
        self
    }

    pub fn add_published_attributes(
        &mut self,
        class: &str,
        attributes: &[(&str, DataType)],
    ) -> &mut Self {
        for (name, data_type) in attributes {
            self.add_object_attribute(class, name, *data_type, Sharing::Publish);
        }
        self
    }

    pub fn add_subscribed_attributes(
        &mut self,
        class: &str,
        attributes: &[(&str, DataType)],
    ) -> &mut Self {
        for (name, data_type) in attributes {
            self.add_object_attribute(class, name, *data_type, Sharing::Subscribe);
        }
        self
    }

    // ------------------------------------------------------------------------
    // Interaction classes
    // ------------------------------------------------------------------------

    pub fn interaction_class(&self, name: &str) -> Option<&InteractionClass> {
        self.interaction_classes.get(name)
    }

    pub fn interaction_classes(&self) -> impl Iterator<Item = &InteractionClass> {
        self.interaction_classes.values()
    }

    pub fn published_interactions(&self) -> impl Iterator<Item = &InteractionClass> {
        self.interaction_classes
            .values()
            .filter(|c| c.sharing.is_publish())
    }

    pub fn subscribed_interactions(&self) -> impl Iterator<Item = &InteractionClass> {
        self.interaction_classes
            .values()
            .filter(|c| c.sharing.is_subscribe())
    }

    /// Merge a whole interaction class declaration.
    pub fn add_interaction_class(&mut self, class: InteractionClass) -> &mut Self {
        if self.mutable("interaction classes") {
            let entry = self
                .interaction_classes
                .entry(class.name.clone())
                .or_insert_with(|| InteractionClass::new(class.name.clone(), Sharing::Neither));
            entry.sharing = entry.sharing.merge(class.sharing);
            for parameter in class.parameters() {
                entry.add_parameter(parameter.clone());
            }
        }
        self
    }

    fn add_interaction_sharing(&mut self, name: &str, sharing: Sharing) -> &mut Self {
        self.add_interaction_class(InteractionClass::new(name, sharing))
    }

    pub fn add_published_interaction(&mut self, name: &str) -> &mut Self {
        self.add_interaction_sharing(name, Sharing::Publish)
    }

    pub fn add_subscribed_interaction(&mut self, name: &str) -> &mut Self {
        self.add_interaction_sharing(name, Sharing::Subscribe)
    }

    pub fn add_published_interactions(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.add_published_interaction(name);
        }
        self
    }

    pub fn add_subscribed_interactions(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.add_subscribed_interaction(name);
        }
        self
    }

    /// Declare a typed parameter; creates the class (sharing `Neither`) if needed.
    pub fn add_interaction_parameter(
        &mut self,
        class: &str,
        parameter: &str,
        data_type: DataType,
    ) -> &mut Self {
        if self.mutable("interaction classes") {
            self.interaction_classes
                .entry(class.to_string())
                .or_insert_with(|| InteractionClass::new(class, Sharing::Neither))
                .add_parameter(InteractionParameter::new(parameter, data_type));
        }
        self
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check the configuration for values the lifecycle cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.federate_name.trim().is_empty() {
            return Err(Error::config("federate name must not be empty"));
        }
        if self.federate_type.trim().is_empty() {
            return Err(Error::config("federate type must not be empty"));
        }
        if self.federation_name.trim().is_empty() {
            return Err(Error::config("federation name must not be empty"));
        }
        if self.max_join_attempts == 0 {
            return Err(Error::config("max join attempts must be at least 1"));
        }
        if self.time_stepped {
            if !(self.lookahead > 0.0) || !self.lookahead.is_finite() {
                return Err(Error::config(format!(
                    "lookahead must be a positive number for a time-stepped federate, got {}",
                    self.lookahead
                )));
            }
            if !(self.step_size > 0.0) || !self.step_size.is_finite() {
                return Err(Error::config(format!(
                    "step size must be a positive number for a time-stepped federate, got {}",
                    self.step_size
                )));
            }
        }
        if self.evoke_min_secs < 0.0 || self.evoke_min_secs > self.evoke_max_secs {
            return Err(Error::config(format!(
                "invalid evoke window [{}, {}]",
                self.evoke_min_secs, self.evoke_max_secs
            )));
        }
        for module in self.fom_modules.iter().chain(&self.som_modules) {
            if !module.contains("://") && !Path::new(module).exists() {
                return Err(Error::config(format!("module not found: {}", module)));
            }
        }
        Ok(())
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FederateConfiguration {
        FederateConfiguration::new("Ping", "PingFederate", "PingPong")
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.max_join_attempts(), 5);
        assert_eq!(config.join_retry_interval_secs(), 5);
        assert!(config.is_time_stepped());
        assert!(config.are_callbacks_evoked());
        assert!(!config.can_create_federation());
        assert_eq!(config.wait_timeout(), None);
        assert!(!config.is_frozen());
    }

    #[test]
    fn test_setters_are_noops_after_freeze() {
        let mut config = sample();
        config
            .set_lookahead(2.0)
            .set_max_join_attempts(3)
            .add_fom_module("https://fom/a.xml")
            .add_published_interaction("Ping");
        config.freeze();
        let frozen = config.clone();

        config
            .set_federate_name("Other")
            .set_federation_name("Other")
            .set_federate_type("Other")
            .set_can_create_federation(true)
            .set_max_join_attempts(10)
            .set_join_retry_interval_secs(0)
            .set_time_stepped(false)
            .set_lookahead(9.0)
            .set_step_size(9.0)
            .set_callbacks_evoked(false)
            .set_evoke_window(1.0, 2.0)
            .set_late_joiner(true)
            .set_sync_before_resign(true)
            .set_sim_control(true)
            .set_resign_action(ResignAction::NoAction)
            .set_wait_timeout(Some(Duration::from_secs(1)))
            .set_poll_interval(Duration::from_secs(1))
            .add_fom_module("https://fom/b.xml")
            .add_som_module("https://som/b.xml")
            .add_published_interaction("Pong")
            .add_subscribed_interaction("Ping")
            .add_interaction_parameter("Ping", "count", DataType::Int)
            .add_published_attributes("Vehicle", &[("speed", DataType::Double)])
            .add_object_class(ObjectClass::new("Other"));

        assert_eq!(config, frozen);
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let mut config = sample();
        config.freeze();
        config.freeze();
        assert!(config.is_frozen());
    }

    #[test]
    fn test_attribute_sets_merge_idempotently() {
        let mut config = sample();
        let attrs = [("A", DataType::Int), ("B", DataType::String)];
        config.add_published_attributes("Vehicle", &attrs);
        config.add_published_attributes("Vehicle", &attrs);
        let class = config.object_class("Vehicle").expect("class declared");
        assert_eq!(class.attribute_count(), 2);
        assert_eq!(config.object_classes().count(), 1);
    }

    #[test]
    fn test_interaction_sets_merge_idempotently() {
        let mut config = sample();
        config.add_published_interactions(&["Ping", "Pong"]);
        config.add_published_interactions(&["Ping", "Pong"]);
        assert_eq!(config.interaction_classes().count(), 2);

        config.add_subscribed_interaction("Ping");
        assert_eq!(
            config.interaction_class("Ping").map(|c| c.sharing),
            Some(Sharing::PublishSubscribe)
        );
        assert_eq!(config.interaction_classes().count(), 2);
    }

    #[test]
    fn test_module_lists_merge_idempotently() {
        let mut config = sample();
        config.add_fom_modules(["https://fom/a.xml", "https://fom/b.xml"]);
        config.add_fom_modules(["https://fom/a.xml", "https://fom/b.xml"]);
        config.add_som_modules(["https://som/a.xml"]);
        config.add_som_modules(["https://som/a.xml"]);
        assert_eq!(config.fom_modules().len(), 2);
        assert_eq!(config.som_modules().len(), 1);
        assert_eq!(
            config.join_modules(),
            vec![
                "https://som/a.xml".to_string(),
                "https://fom/a.xml".to_string(),
                "https://fom/b.xml".to_string()
            ]
        );
    }

    #[test]
    fn test_publish_subscribe_views() {
        let mut config = sample();
        config
            .add_published_interaction("Ping")
            .add_subscribed_interaction("Pong")
            .add_subscribed_attributes("Vehicle", &[("speed", DataType::Double)]);
        let published: Vec<_> = config.published_interactions().map(|c| c.name.as_str()).collect();
        let subscribed: Vec<_> = config.subscribed_interactions().map(|c| c.name.as_str()).collect();
        assert_eq!(published, vec!["Ping"]);
        assert_eq!(subscribed, vec!["Pong"]);
        assert_eq!(config.published_object_classes().count(), 0);
        assert_eq!(config.subscribed_object_classes().count(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(sample().validate().is_ok());

        let mut config = sample();
        config.set_federate_name("");
        assert!(config.validate().is_err());

        let mut config = sample();
        config.set_max_join_attempts(0);
        assert_eq!(
            config.validate().map_err(|e| e.kind()),
            Err(crate::ErrorKind::ConfigInvalid)
        );

        let mut config = sample();
        config.set_lookahead(0.0);
        assert!(config.validate().is_err());
        config.set_time_stepped(false);
        assert!(config.validate().is_ok());

        let mut config = sample();
        config.set_evoke_window(0.5, 0.1);
        assert!(config.validate().is_err());

        let mut config = sample();
        config.add_fom_module("/definitely/not/here/fom.xml");
        assert!(config.validate().is_err());
    }
}
