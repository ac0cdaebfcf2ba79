// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synchronization-point handshake.

use super::hooks::FederateHooks;
use super::Federate;
use crate::error::{Error, ErrorKind, Result};
use crate::rti::SyncPointFailureReason;

/// Reached once every federate has published and subscribed.
pub const READY_TO_POPULATE: &str = "ReadyToPopulate";
/// Reached once every federate has registered its initial objects.
pub const READY_TO_RUN: &str = "ReadyToRun";
/// Reached before resigning, when `sync_before_resign` is set.
pub const READY_TO_RESIGN: &str = "ReadyToResign";

impl<H: FederateHooks> Federate<H> {
    /// Register, achieve, then wait for the federation to synchronize on `label`.
    ///
    /// Registration is idempotent across federates: a `LabelNotUnique`
    /// failure means someone else registered the point first, which is fine.
    /// The handshake waits for the announcement before achieving so the RTI
    /// knows the point when the achievement arrives.
    pub fn synchronize(&mut self, label: &str) -> Result<()> {
        log::info!("[sync] '{}' registering '{}'", self.config.federate_name(), label);
        self.ambassador.register_sync_point(label, &[])?;

        self.wait_for(&format!("announcement of '{}'", label), |callbacks| {
            match callbacks.registration_failure(label) {
                Some(SyncPointFailureReason::LabelNotUnique) | None => {}
                Some(reason) => {
                    return Err(Error::new(
                        ErrorKind::SyncPointFailed,
                        format!("registration of '{}' failed: {:?}", label, reason),
                    ))
                }
            }
            Ok(callbacks.is_announced(label))
        })?;

        self.ambassador.achieve_sync_point(label)?;
        log::debug!("[sync] achieved '{}', waiting for federation", label);

        self.wait_for(&format!("synchronization on '{}'", label), |callbacks| {
            Ok(callbacks.is_synchronized(label))
        })?;
        log::info!("[sync] federation synchronized on '{}'", label);
        Ok(())
    }
}
