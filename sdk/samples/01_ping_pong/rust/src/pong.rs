// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The Pong federate: answers every Ping with a Pong of the same count.
//!
//! Received challenges wait in a list until the next step answers them. The
//! list sits behind its own mutex so the caller keeps a handle to it after
//! the federate moves to its own thread, and reads what was left unanswered.

use crate::messages::{message_realizer, Message, Pong};
use hfed::{
    FederateContext, HLAInteraction, InteractionType, LazyRealizer, LifecycleHooks, LogicalTime,
    Result, RtiEventHooks, SimControlHooks,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Counts received but not yet answered.
pub type Challenges = Arc<Mutex<Vec<i32>>>;

pub struct PongFederate {
    expected: usize,
    answered: usize,
    unanswered: Challenges,
    realizer: LazyRealizer<HLAInteraction, Message>,
}

impl PongFederate {
    /// Stop after answering `expected` pings.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            answered: 0,
            unanswered: Arc::new(Mutex::new(Vec::new())),
            realizer: LazyRealizer::new(message_realizer()),
        }
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Shared view of the unanswered challenges.
    pub fn challenges(&self) -> Challenges {
        Arc::clone(&self.unanswered)
    }
}

impl LifecycleHooks for PongFederate {
    fn step(&mut self, ctx: &mut FederateContext<'_>, time: LogicalTime) -> Result<bool> {
        let pending: Vec<i32> = self.unanswered.lock().drain(..).collect();
        for count in pending {
            let pong = Pong::new(ctx, count)?;
            ctx.send_interaction(pong.interaction())?;
            self.answered += 1;
            log::info!("[pong] t={} answered Ping({})", time, count);
        }
        Ok(self.answered < self.expected)
    }
}

impl RtiEventHooks for PongFederate {
    fn receive_interaction(
        &mut self,
        ctx: &mut FederateContext<'_>,
        interaction: &HLAInteraction,
        _time: Option<LogicalTime>,
    ) -> Result<()> {
        match self.realizer.get(ctx.ambassador()).realize(interaction) {
            Some(Message::Ping(ping)) => self.unanswered.lock().push(ping.count()),
            Some(Message::Pong(_)) | None => {
                log::warn!("[pong] unexpected {}", interaction.class_name());
            }
        }
        Ok(())
    }
}

impl SimControlHooks for PongFederate {}
