// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The Ping federate: one challenge per step, then wait for every answer.

use crate::messages::{message_realizer, Message, Ping};
use hfed::{
    Error, ErrorKind, FederateContext, HLAInteraction, InteractionType, LazyRealizer,
    LifecycleHooks, LogicalTime, Result, RtiEventHooks, SimControlHooks,
};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub struct PingFederate {
    rounds: i32,
    patience: Duration,
    started: Option<Instant>,
    sent: i32,
    replies: BTreeSet<i32>,
    realizer: LazyRealizer<HLAInteraction, Message>,
}

impl PingFederate {
    /// Send `rounds` pings; give up when the answers take longer than
    /// `patience` of wall-clock time from the first step.
    pub fn new(rounds: i32, patience: Duration) -> Self {
        Self {
            rounds,
            patience,
            started: None,
            sent: 0,
            replies: BTreeSet::new(),
            realizer: LazyRealizer::new(message_realizer()),
        }
    }

    pub fn sent(&self) -> i32 {
        self.sent
    }

    /// Counts answered so far, in order.
    pub fn replies(&self) -> Vec<i32> {
        self.replies.iter().copied().collect()
    }
}

impl LifecycleHooks for PingFederate {
    fn before_first_step(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        log::info!("[ping] starting at t={}", ctx.current_time());
        self.started = Some(Instant::now());
        Ok(())
    }

    fn step(&mut self, ctx: &mut FederateContext<'_>, time: LogicalTime) -> Result<bool> {
        if self.sent < self.rounds {
            self.sent += 1;
            let ping = Ping::new(ctx, self.sent)?;
            ctx.send_interaction(ping.interaction())?;
            log::info!("[ping] t={} sent Ping({})", time, self.sent);
        }

        if self.replies.len() >= self.rounds as usize {
            return Ok(false);
        }
        let elapsed = self.started.get_or_insert_with(Instant::now).elapsed();
        if elapsed >= self.patience {
            return Err(Error::new(
                ErrorKind::Timeout,
                format!(
                    "{} of {} pongs after {:?}",
                    self.replies.len(),
                    self.rounds,
                    elapsed
                ),
            ));
        }
        Ok(true)
    }

    fn before_exit(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        log::info!("[ping] {} pongs received", self.replies.len());
        Ok(())
    }
}

impl RtiEventHooks for PingFederate {
    fn receive_interaction(
        &mut self,
        ctx: &mut FederateContext<'_>,
        interaction: &HLAInteraction,
        _time: Option<LogicalTime>,
    ) -> Result<()> {
        match self.realizer.get(ctx.ambassador()).realize(interaction) {
            Some(Message::Pong(pong)) => {
                let count = pong.count();
                if count < 1 || count > self.sent {
                    log::warn!("[ping] Pong({}) answers a ping never sent, ignored", count);
                } else if !self.replies.insert(count) {
                    log::warn!("[ping] duplicate Pong({})", count);
                }
            }
            Some(Message::Ping(_)) | None => {
                log::warn!("[ping] unexpected {}", interaction.class_name());
            }
        }
        Ok(())
    }
}

impl SimControlHooks for PingFederate {}
