// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Application override points.
//!
//! A federate is any type implementing the three hook traits. Every method
//! has a default except [`LifecycleHooks::step`], so an application only
//! writes the hooks it cares about. All hooks run on the lifecycle thread.

use super::context::FederateContext;
use crate::error::Result;
use crate::handle::ObjectInstanceHandle;
use crate::interaction::HLAInteraction;
use crate::object::HLAObject;
use crate::rti::LogicalTime;

/// Phase hooks, called in lifecycle order.
pub trait LifecycleHooks {
    fn before_federation_join(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    fn before_ready_to_populate(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    fn before_ready_to_run(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    fn before_first_step(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    /// One iteration of the main loop. Return `false` to leave the loop.
    fn step(&mut self, ctx: &mut FederateContext<'_>, time: LogicalTime) -> Result<bool>;

    fn before_ready_to_resign(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    fn before_exit(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Object and interaction traffic from other federates.
pub trait RtiEventHooks {
    fn receive_object_registration(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        _object: &HLAObject,
    ) -> Result<()> {
        Ok(())
    }

    /// `object` carries the latest value of every attribute reflected so far.
    fn receive_attribute_reflection(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        _object: &HLAObject,
        _time: Option<LogicalTime>,
    ) -> Result<()> {
        Ok(())
    }

    fn receive_interaction(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        _interaction: &HLAInteraction,
        _time: Option<LogicalTime>,
    ) -> Result<()> {
        Ok(())
    }

    fn receive_object_deleted(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        _object: &HLAObject,
    ) -> Result<()> {
        Ok(())
    }

    /// Another federate asked for fresh values of `attributes` of an owned instance.
    fn provide_attribute_update(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        _instance: ObjectInstanceHandle,
        _attributes: &[String],
    ) -> Result<()> {
        Ok(())
    }
}

/// Simulation-control interactions, delivered when `sim_control` is enabled.
pub trait SimControlHooks {
    fn receive_sim_end(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    fn receive_sim_pause(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }

    fn receive_sim_resume(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Everything the runner needs from an application.
pub trait FederateHooks: LifecycleHooks + RtiEventHooks + SimControlHooks {}

impl<T: LifecycleHooks + RtiEventHooks + SimControlHooks> FederateHooks for T {}
