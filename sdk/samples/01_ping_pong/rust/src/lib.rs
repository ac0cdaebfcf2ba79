// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HFED Sample: Ping Pong
//!
//! Two federates in one process, each on its own thread, joined to the same
//! federation on the in-process RTI.
//!
//! ```text
//! ┌──────────────┐        Ping{count}        ┌──────────────┐
//! │     Ping     │ ────────────────────────▶ │     Pong     │
//! │   federate   │ ◀──────────────────────── │   federate   │
//! └──────────────┘        Pong{count}        └──────────────┘
//! ```
//!
//! The RTI requires both federates before any synchronization point
//! completes, so neither starts stepping until the other is ready. When time
//! stepped, both regulate and are constrained, so Ping stays within one
//! lookahead of Pong.
//!
//! ## Configuration layering
//!
//! Both federates start from one base configuration: [`default_base`], or a
//! configuration file. [`Overrides`] from the command line go on top, then
//! each federate sets its own identity and declarations. The runner freezes
//! the result.

pub mod messages;
pub mod ping;
pub mod pong;

pub use ping::PingFederate;
pub use pong::{Challenges, PongFederate};

use hfed::{Ambassador, DataType, Federate, FederateConfiguration, LocalRti, Result};
use std::thread;
use std::time::Duration;

pub const FEDERATION: &str = "PingPong";

/// How long Ping waits for its answers when no wait timeout is configured.
pub const DEFAULT_PATIENCE: Duration = Duration::from_secs(60);

/// One run of the sample.
#[derive(Debug, Clone)]
pub struct Options {
    pub rounds: i32,
    /// Settings shared by both federates.
    pub base: FederateConfiguration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rounds: 10,
            base: default_base(),
        }
    }
}

/// Sample defaults: evoked, time-stepped, short evoke window, 30 s waits.
pub fn default_base() -> FederateConfiguration {
    let mut config = FederateConfiguration::new("", "", FEDERATION);
    config
        .set_can_create_federation(true)
        .set_evoke_window(0.005, 0.05)
        .set_poll_interval(Duration::from_millis(5))
        .set_wait_timeout(Some(Duration::from_secs(30)));
    config
}

/// Command-line values that replace base settings. `None`/`false` keeps the
/// base value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub federation: Option<String>,
    pub immediate: bool,
    pub event_driven: bool,
    pub lookahead: Option<f64>,
    /// Seconds; 0 means unbounded.
    pub wait_timeout_secs: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, base: &mut FederateConfiguration) {
        if let Some(name) = &self.federation {
            base.set_federation_name(name.clone());
        }
        if self.immediate {
            base.set_callbacks_evoked(false);
        }
        if self.event_driven {
            base.set_time_stepped(false);
        }
        if let Some(lookahead) = self.lookahead {
            base.set_lookahead(lookahead);
        }
        if let Some(secs) = self.wait_timeout_secs {
            base.set_wait_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
    }
}

/// What both federates saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub sent: i32,
    pub replies: Vec<i32>,
    pub answered: usize,
    pub unanswered: usize,
}

fn federate_config(name: &str, base: &FederateConfiguration) -> FederateConfiguration {
    let mut config = base.clone();
    config
        .set_federate_name(name)
        .set_federate_type(format!("{}Federate", name))
        .add_interaction_parameter("Ping", "count", DataType::Int)
        .add_interaction_parameter("Pong", "count", DataType::Int);
    config
}

pub fn ping_config(base: &FederateConfiguration) -> FederateConfiguration {
    let mut config = federate_config("Ping", base);
    config
        .add_published_interaction("Ping")
        .add_subscribed_interaction("Pong");
    config
}

pub fn pong_config(base: &FederateConfiguration) -> FederateConfiguration {
    let mut config = federate_config("Pong", base);
    config
        .add_subscribed_interaction("Ping")
        .add_published_interaction("Pong");
    config
}

/// Run both federates to completion.
pub fn run(options: &Options) -> Result<Summary> {
    let rti = LocalRti::builder().min_federates(2).build();
    let rounds = options.rounds.max(0);
    let patience = options.base.wait_timeout().unwrap_or(DEFAULT_PATIENCE);

    let ping_ambassador = Ambassador::new(rti.ambassador());
    let pong_ambassador = Ambassador::new(rti.ambassador());
    let ping_config = ping_config(&options.base);
    let pong_config = pong_config(&options.base);

    let pong = PongFederate::new(rounds as usize);
    let challenges = pong.challenges();

    let pong_thread = thread::Builder::new()
        .name("pong".into())
        .spawn(move || {
            let mut federate = Federate::new(pong_config, pong_ambassador, pong);
            federate.run().map(|()| federate.into_hooks())
        })
        .map_err(|e| {
            hfed::Error::new(hfed::ErrorKind::InvalidState, format!("spawn pong: {}", e))
        })?;

    let mut ping = Federate::new(ping_config, ping_ambassador, PingFederate::new(rounds, patience));
    let ping_result = ping.run();

    let pong_result = pong_thread.join().map_err(|_| {
        hfed::Error::new(hfed::ErrorKind::InvalidState, "pong federate panicked")
    })?;
    ping_result?;
    let pong = pong_result?;
    let ping = ping.into_hooks();

    let unanswered = challenges.lock().len();
    Ok(Summary {
        sent: ping.sent(),
        replies: ping.replies(),
        answered: pong.answered(),
        unanswered,
    })
}
