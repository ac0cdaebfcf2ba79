// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Time policy and time advance.

use super::hooks::FederateHooks;
use super::Federate;
use crate::error::Result;

impl<H: FederateHooks> Federate<H> {
    /// Time-stepped federates become regulating (with the configured
    /// lookahead) and then constrained, waiting for each confirmation.
    pub(crate) fn enable_time_policy(&mut self) -> Result<()> {
        if !self.config.is_time_stepped() {
            return Ok(());
        }
        let lookahead = self.config.lookahead();
        self.ambassador.enable_time_regulation(lookahead)?;
        self.wait_for("time regulation", |callbacks| Ok(callbacks.is_regulating()))?;
        self.ambassador.enable_time_constrained()?;
        self.wait_for("time constrained", |callbacks| Ok(callbacks.is_constrained()))?;
        log::info!(
            "[federate] time policy enabled at t={} (lookahead {})",
            self.current_time(),
            lookahead
        );
        Ok(())
    }

    pub(crate) fn disable_time_policy(&mut self) -> Result<()> {
        if self.callbacks.is_regulating() {
            self.ambassador.disable_time_regulation()?;
        }
        if self.callbacks.is_constrained() {
            self.ambassador.disable_time_constrained()?;
        }
        self.callbacks.clear_time_policy();
        Ok(())
    }

    /// Move past the current step.
    ///
    /// Time-stepped: request `current + lookahead` and pump until granted.
    /// Otherwise tick once, which evokes callbacks or waits one poll
    /// interval, so an event-driven loop never spins.
    pub fn advance_time(&mut self) -> Result<()> {
        if self.config.is_time_stepped() {
            let target = self.current_time() + self.config.lookahead();
            self.ambassador.time_advance_request(target)?;
            self.wait_for(&format!("time advance grant to {}", target), |callbacks| {
                Ok(callbacks.federate_time() >= target)
            })?;
            log::trace!("[federate] advanced to t={}", target);
        } else {
            self.tick()?;
        }
        Ok(())
    }
}
