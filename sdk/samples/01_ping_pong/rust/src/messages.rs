// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed wrappers for the Ping and Pong interactions.

use hfed::{
    FederateContext, HLAInteraction, InteractionRealizer, InteractionType, RealizerBuilder,
    Result, ValueMap,
};

pub const COUNT: &str = "count";

/// A challenge sent by the Ping federate.
#[derive(Debug, Clone)]
pub struct Ping(HLAInteraction);

/// The answer to a [`Ping`], carrying the same count.
#[derive(Debug, Clone)]
pub struct Pong(HLAInteraction);

impl InteractionType for Ping {
    const CLASS_NAME: &'static str = "Ping";

    fn from_interaction(interaction: HLAInteraction) -> Self {
        Ping(interaction)
    }

    fn interaction(&self) -> &HLAInteraction {
        &self.0
    }
}

impl InteractionType for Pong {
    const CLASS_NAME: &'static str = "Pong";

    fn from_interaction(interaction: HLAInteraction) -> Self {
        Pong(interaction)
    }

    fn interaction(&self) -> &HLAInteraction {
        &self.0
    }
}

impl Ping {
    pub fn new(ctx: &FederateContext<'_>, count: i32) -> Result<Self> {
        let mut interaction = ctx.new_interaction(Self::CLASS_NAME)?;
        interaction.set_int(COUNT, count);
        Ok(Ping(interaction))
    }

    pub fn count(&self) -> i32 {
        self.0.get_int(COUNT)
    }
}

impl Pong {
    pub fn new(ctx: &FederateContext<'_>, count: i32) -> Result<Self> {
        let mut interaction = ctx.new_interaction(Self::CLASS_NAME)?;
        interaction.set_int(COUNT, count);
        Ok(Pong(interaction))
    }

    pub fn count(&self) -> i32 {
        self.0.get_int(COUNT)
    }
}

/// Everything either federate can receive.
#[derive(Debug, Clone)]
pub enum Message {
    Ping(Ping),
    Pong(Pong),
}

/// Realizer entries for both interaction classes.
pub fn message_realizer() -> RealizerBuilder<HLAInteraction, Message> {
    InteractionRealizer::builder()
        .entry(Ping::CLASS_NAME, |i| {
            Message::Ping(Ping::from_interaction(i.clone()))
        })
        .entry(Pong::CLASS_NAME, |i| {
            Message::Pong(Pong::from_interaction(i.clone()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfed::{Ambassador, InteractionClassHandle, LocalRti};

    #[test]
    fn test_realizer_builds_typed_ping() {
        let rti = LocalRti::new();
        let ambassador = Ambassador::new(rti.ambassador());
        let realizer = message_realizer().build(&ambassador);
        assert_eq!(realizer.len(), 2);

        let ping_class = ambassador.interaction_class_handle("Ping").unwrap();
        let mut generic = HLAInteraction::new(ping_class, "Ping");
        generic.set_int(COUNT, 42);

        match realizer.realize(&generic) {
            Some(Message::Ping(ping)) => assert_eq!(ping.count(), 42),
            other => panic!("expected Ping, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_class_not_realized() {
        let rti = LocalRti::new();
        let ambassador = Ambassador::new(rti.ambassador());
        let realizer = message_realizer().build(&ambassador);

        let unknown = HLAInteraction::new(InteractionClassHandle::new(9_999), "Other");
        assert!(realizer.realize(&unknown).is_none());
    }
}
