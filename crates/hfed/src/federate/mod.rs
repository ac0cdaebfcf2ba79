// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Federate lifecycle
//!
//! [`Federate`] drives an application (anything implementing
//! [`FederateHooks`]) through a fixed sequence of phases and owns every
//! HLA protocol step along the way.
//!
//! ```text
//! Gestating
//!   └─> Initializing
//!         connect ─> [create] ─> before_federation_join ─> join (retry)
//!         ─> enable time policy ─> publish/subscribe ─> tick
//!         ─> before_ready_to_populate ─> sync ReadyToPopulate ─> tick
//!         ─> before_ready_to_run      ─> sync ReadyToRun      ─> tick
//!         ─> before_first_step
//!   └─> Running
//!         loop { drain events ─> step(time) ─> advance time }
//!   └─> CleaningUp
//!         disable time policy ─> tick ─> before_ready_to_resign
//!         ─> [sync ReadyToResign] ─> tick ─> before_exit
//!         ─> resign ─> destroy ─> disconnect
//!   └─> Expired
//! ```
//!
//! Late joiners skip the ReadyToPopulate and ReadyToRun synchronizations;
//! their hooks still run.
//!
//! ## Threading
//!
//! The runner is single-threaded. RTI callbacks land in a [`CallbackState`]
//! (one mutex) either inside `evoke_multiple_callbacks` on this thread or on
//! an RTI thread; object and interaction callbacks are queued there and
//! handed to the [`RtiEventHooks`] by [`Federate::tick`], so every hook runs
//! on the lifecycle thread.

mod callbacks;
mod context;
mod hooks;
mod join;
mod sim_control;
mod state;
mod sync;
mod time;
mod wait;

pub use context::FederateContext;
pub use hooks::{FederateHooks, LifecycleHooks, RtiEventHooks, SimControlHooks};
pub use join::Sleeper;
pub use sim_control::{SimCommand, SIM_END, SIM_PAUSE, SIM_RESUME};
pub use state::LifecycleState;
pub use sync::{READY_TO_POPULATE, READY_TO_RESIGN, READY_TO_RUN};
pub use wait::{CancelToken, WaitPolicy};

use crate::config::FederateConfiguration;
use crate::error::{Error, ErrorKind, Result};
use crate::handle::{FederateHandle, ObjectInstanceHandle};
use crate::object::HLAObject;
use crate::rti::{Ambassador, LogicalTime};
use callbacks::{CallbackState, RtiEvent};
use sim_control::SimControl;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle runner for one federate.
pub struct Federate<H> {
    config: FederateConfiguration,
    ambassador: Ambassador,
    hooks: H,
    callbacks: Arc<CallbackState>,
    state: LifecycleState,
    cancel: CancelToken,
    sleeper: Sleeper,
    federate: Option<FederateHandle>,
    connected: bool,
    remote_objects: HashMap<ObjectInstanceHandle, HLAObject>,
    sim_control: SimControl,
}

impl<H> std::fmt::Debug for Federate<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Federate")
            .field("name", &self.config.federate_name())
            .field("state", &self.state)
            .field("federate", &self.federate)
            .finish_non_exhaustive()
    }
}

impl<H: FederateHooks> Federate<H> {
    /// Build a runner. `config` is frozen here.
    pub fn new(mut config: FederateConfiguration, ambassador: Ambassador, hooks: H) -> Self {
        config.freeze();
        Self {
            config,
            ambassador,
            hooks,
            callbacks: Arc::new(CallbackState::new()),
            state: LifecycleState::Gestating,
            cancel: CancelToken::new(),
            sleeper: join::thread_sleeper(),
            federate: None,
            connected: false,
            remote_objects: HashMap::new(),
            sim_control: SimControl::default(),
        }
    }

    /// Share `token` so another thread can cancel waits and the main loop.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Replace the sleep used between join attempts.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + Send + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &FederateConfiguration {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    pub fn ambassador(&self) -> &Ambassador {
        &self.ambassador
    }

    pub fn is_joined(&self) -> bool {
        self.federate.is_some()
    }

    pub fn federate_handle(&self) -> Option<FederateHandle> {
        self.federate
    }

    pub fn current_time(&self) -> LogicalTime {
        self.callbacks.federate_time()
    }

    // ========================================================================
    // Whole lifecycle
    // ========================================================================

    /// Run every phase to completion.
    ///
    /// On failure in any phase, cleanup included, the runner makes a
    /// best-effort resign/disconnect and ends `Expired` before returning the
    /// original error.
    pub fn run(&mut self) -> Result<()> {
        let outcome = self
            .initialize()
            .and_then(|()| self.execute())
            .and_then(|()| self.cleanup());
        if let Err(e) = outcome {
            log::error!("[federate] '{}' failed: {}", self.config.federate_name(), e);
            self.abort();
            return Err(e);
        }
        Ok(())
    }

    /// Gestating → Initializing, up to and including `before_first_step`.
    pub fn initialize(&mut self) -> Result<()> {
        self.transition(LifecycleState::Initializing)?;
        self.config.validate()?;
        log::info!(
            "[federate] '{}' ({}) initializing for federation '{}'",
            self.config.federate_name(),
            self.config.federate_type(),
            self.config.federation_name()
        );

        self.connect()?;
        if self.config.can_create_federation() {
            let name = self.config.federation_name().to_string();
            self.ambassador
                .create_federation(&name, self.config.fom_modules())?;
        }
        self.with_ctx(|hooks, ctx| hooks.before_federation_join(ctx))?;
        self.join_federation()?;
        self.enable_time_policy()?;
        self.publish_and_subscribe()?;
        self.tick()?;

        self.with_ctx(|hooks, ctx| hooks.before_ready_to_populate(ctx))?;
        if !self.config.is_late_joiner() {
            self.synchronize(READY_TO_POPULATE)?;
        }
        self.tick()?;

        self.with_ctx(|hooks, ctx| hooks.before_ready_to_run(ctx))?;
        if !self.config.is_late_joiner() {
            self.synchronize(READY_TO_RUN)?;
        }
        self.tick()?;

        self.with_ctx(|hooks, ctx| hooks.before_first_step(ctx))
    }

    /// Running: step and advance until `step` returns `false`, a SimEnd
    /// arrives, or the cancel token fires.
    pub fn execute(&mut self) -> Result<()> {
        self.transition(LifecycleState::Running)?;
        loop {
            self.dispatch_events()?;
            if self.sim_control.is_ended() {
                log::info!("[federate] simulation ended by SimEnd");
                break;
            }
            if self.cancel.is_cancelled() {
                log::info!("[federate] main loop cancelled");
                break;
            }
            if self.sim_control.is_paused() {
                self.tick()?;
                continue;
            }
            let time = self.current_time();
            if !self.with_ctx(|hooks, ctx| hooks.step(ctx, time))? {
                log::debug!("[federate] step returned false at t={}", time);
                break;
            }
            self.advance_time()?;
        }
        Ok(())
    }

    /// CleaningUp → Expired.
    pub fn cleanup(&mut self) -> Result<()> {
        self.transition(LifecycleState::CleaningUp)?;
        self.disable_time_policy()?;
        self.tick()?;
        self.with_ctx(|hooks, ctx| hooks.before_ready_to_resign(ctx))?;
        if self.config.sync_before_resign() {
            if self.cancel.is_cancelled() {
                log::info!("[sync] cancelled, skipping '{}'", READY_TO_RESIGN);
            } else {
                self.synchronize(READY_TO_RESIGN)?;
            }
        }
        self.tick()?;
        self.with_ctx(|hooks, ctx| hooks.before_exit(ctx))?;

        self.ambassador.resign(self.config.resign_action())?;
        self.federate = None;
        let name = self.config.federation_name().to_string();
        self.ambassador.destroy_federation(&name)?;
        self.disconnect()?;
        self.transition(LifecycleState::Expired)?;
        log::info!("[federate] '{}' expired", self.config.federate_name());
        Ok(())
    }

    // ========================================================================
    // Individual steps
    // ========================================================================

    /// Connect with this runner's callback sink and callback model.
    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        let callbacks: Arc<dyn crate::rti::FederateAmbassador> = self.callbacks.clone();
        self.ambassador
            .connect(callbacks, self.config.callback_model())?;
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.connected {
            self.ambassador.disconnect()?;
            self.connected = false;
        }
        Ok(())
    }

    /// Join with bounded retry. Exhausting the attempts is fatal.
    pub fn join_federation(&mut self) -> Result<FederateHandle> {
        if let Some(handle) = self.federate {
            return Ok(handle);
        }
        let federate_name = self.config.federate_name().to_string();
        let federate_type = self.config.federate_type().to_string();
        let federation = self.config.federation_name().to_string();
        let modules = self.config.join_modules();
        let ambassador = &mut self.ambassador;
        let handle = join::join_with_retry(
            self.config.max_join_attempts(),
            self.config.join_retry_interval(),
            &self.cancel,
            &mut *self.sleeper,
            |_| ambassador.join(&federate_name, &federate_type, &federation, &modules),
        )?;
        log::info!("[federate] '{}' joined '{}' as {}", federate_name, federation, handle);
        self.federate = Some(handle);
        Ok(handle)
    }

    fn publish_and_subscribe(&mut self) -> Result<()> {
        for class in self.config.object_classes() {
            let published = class.published_attribute_names();
            if !published.is_empty() {
                self.ambassador.publish_object_class(&class.name, &published)?;
            }
            let subscribed = class.subscribed_attribute_names();
            if !subscribed.is_empty() {
                self.ambassador
                    .subscribe_object_class(&class.name, &subscribed)?;
            }
        }
        for class in self.config.interaction_classes() {
            if class.sharing.is_publish() {
                self.ambassador.publish_interaction(&class.name)?;
            }
            if class.sharing.is_subscribe() {
                self.ambassador.subscribe_interaction(&class.name)?;
            }
        }
        if self.config.sim_control() {
            self.sim_control.subscribe(&mut self.ambassador)?;
        }
        Ok(())
    }

    /// Let the RTI deliver callbacks once, then hand queued events to the hooks.
    ///
    /// With evoked callbacks this evokes within the configured window; with
    /// immediate callbacks it sleeps one poll interval.
    pub fn tick(&mut self) -> Result<()> {
        if self.config.are_callbacks_evoked() {
            let (min, max) = self.config.evoke_window();
            self.ambassador.evoke_callbacks(min, max)?;
        } else {
            std::thread::sleep(self.config.poll_interval());
        }
        self.dispatch_events()
    }

    /// Block, ticking, until `done` holds for the recorded callback state.
    fn wait_for(
        &mut self,
        what: &str,
        mut done: impl FnMut(&CallbackState) -> Result<bool>,
    ) -> Result<()> {
        let callbacks = Arc::clone(&self.callbacks);
        let cancel = self.cancel.clone();
        let policy = self.config.wait_policy();
        wait::wait_until(what, policy, &cancel, || done(&callbacks), || self.tick())
    }

    fn dispatch_events(&mut self) -> Result<()> {
        for event in self.callbacks.drain_events() {
            self.dispatch(event)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: RtiEvent) -> Result<()> {
        match event {
            RtiEvent::Discovered {
                instance,
                class,
                name,
            } => {
                let class_name = self
                    .ambassador
                    .object_class_name(class)
                    .unwrap_or_else(|| class.to_string());
                let object = HLAObject::new(instance, class, class_name, name);
                self.remote_objects.insert(instance, object.clone());
                self.with_ctx(|hooks, ctx| hooks.receive_object_registration(ctx, &object))
            }
            RtiEvent::Reflected {
                instance,
                values,
                time,
            } => {
                let Some(object) = self.remote_objects.get_mut(&instance) else {
                    log::warn!("[federate] reflection for untracked instance {}", instance);
                    return Ok(());
                };
                self.ambassador.apply_reflection(object, values);
                let object = object.clone();
                self.with_ctx(|hooks, ctx| hooks.receive_attribute_reflection(ctx, &object, time))
            }
            RtiEvent::Interaction {
                class,
                values,
                time,
            } => {
                if let Some(command) = self.sim_control.classify(class) {
                    self.sim_control.apply(command);
                    return self.with_ctx(|hooks, ctx| match command {
                        SimCommand::End => hooks.receive_sim_end(ctx),
                        SimCommand::Pause => hooks.receive_sim_pause(ctx),
                        SimCommand::Resume => hooks.receive_sim_resume(ctx),
                    });
                }
                let interaction = self.ambassador.interaction_from(class, values);
                self.with_ctx(|hooks, ctx| hooks.receive_interaction(ctx, &interaction, time))
            }
            RtiEvent::Removed { instance } => {
                let object = match self.remote_objects.remove(&instance) {
                    Some(object) => object,
                    None => {
                        log::warn!("[federate] removal of untracked instance {}", instance);
                        return Ok(());
                    }
                };
                self.with_ctx(|hooks, ctx| hooks.receive_object_deleted(ctx, &object))
            }
            RtiEvent::ProvideUpdate {
                instance,
                attributes,
            } => {
                let Some(class) = self.ambassador.known_object_class_handle(instance) else {
                    log::warn!("[federate] update requested for unknown instance {}", instance);
                    return Ok(());
                };
                let names: Vec<String> = attributes
                    .iter()
                    .filter_map(|a| self.ambassador.attribute_name(class, *a))
                    .collect();
                self.with_ctx(|hooks, ctx| hooks.provide_attribute_update(ctx, instance, &names))
            }
        }
    }

    /// Call `f` with the hooks and a context borrowed from this runner.
    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut H, &mut FederateContext<'_>) -> R) -> R {
        let Self {
            config,
            ambassador,
            hooks,
            callbacks,
            state,
            federate,
            remote_objects,
            ..
        } = self;
        let mut ctx = FederateContext {
            ambassador,
            config,
            state: *state,
            time: callbacks.federate_time(),
            federate: *federate,
            remote_objects,
        };
        f(hooks, &mut ctx)
    }

    fn transition(&mut self, to: LifecycleState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(Error::new(
                ErrorKind::InvalidState,
                format!("cannot move from {} to {}", self.state, to),
            ));
        }
        log::debug!(
            "[federate] '{}': {} -> {}",
            self.config.federate_name(),
            self.state,
            to
        );
        self.state = to;
        Ok(())
    }

    /// Best-effort teardown after a failure. Errors are logged, not returned.
    fn abort(&mut self) {
        if self.federate.take().is_some() {
            if let Err(e) = self.ambassador.resign(self.config.resign_action()) {
                log::warn!("[federate] resign during abort failed: {}", e);
            }
        }
        if let Err(e) = self.disconnect() {
            log::warn!("[federate] disconnect during abort failed: {}", e);
        }
        self.state = LifecycleState::Expired;
    }
}
