// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Two federates exchanging objects and interactions over the in-process RTI.
//!
//! Each federate runs its whole lifecycle on its own thread; the RTI is
//! built with `min_federates(2)` so neither passes a synchronization point
//! before the other has joined.

use hfed::{
    Ambassador, DataType, Federate, FederateConfiguration, FederateContext, HLAInteraction,
    HLAObject, InteractionRealizer, LazyRealizer, LifecycleHooks, LocalRti, LogicalTime, Result,
    RtiEventHooks, SimControlHooks, ValueMap, SIM_END, SIM_PAUSE, SIM_RESUME,
};
use std::thread;
use std::time::Duration;

const PINGS: i32 = 5;
const STEP_CAP: u32 = 20_000;

fn base_config(federate: &str, evoked: bool) -> FederateConfiguration {
    let mut config = FederateConfiguration::new(federate, federate, "Exchange");
    config
        .set_can_create_federation(true)
        .set_callbacks_evoked(evoked)
        .set_time_stepped(false)
        .set_evoke_window(0.002, 0.05)
        .set_poll_interval(Duration::from_millis(2))
        .set_wait_timeout(Some(Duration::from_secs(20)));
    config
}

// ============================================================================
// Sender: registers a vehicle and sends one Ping per step
// ============================================================================

#[derive(Default)]
struct Sender {
    vehicle: Option<HLAObject>,
    sent: i32,
}

impl LifecycleHooks for Sender {
    fn before_first_step(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.vehicle = Some(ctx.register_object("Vehicle")?);
        Ok(())
    }

    fn step(&mut self, ctx: &mut FederateContext<'_>, _time: LogicalTime) -> Result<bool> {
        self.sent += 1;
        let mut ping = ctx.new_interaction("Ping")?;
        ping.set_int("count", self.sent);
        ctx.send_interaction(&ping)?;

        if let Some(vehicle) = self.vehicle.as_mut() {
            vehicle.set_double("speed", f64::from(self.sent) * 10.0);
            ctx.update_object(vehicle)?;
        }
        Ok(self.sent < PINGS)
    }
}
impl RtiEventHooks for Sender {}
impl SimControlHooks for Sender {}

fn sender_config(evoked: bool) -> FederateConfiguration {
    let mut config = base_config("Sender", evoked);
    config
        .add_published_interaction("Ping")
        .add_interaction_parameter("Ping", "count", DataType::Int)
        .add_published_attributes("Vehicle", &[("speed", DataType::Double)]);
    config
}

// ============================================================================
// Receiver: counts pings through a realizer and tracks the vehicle
// ============================================================================

#[derive(Debug, PartialEq)]
enum Message {
    Ping(i32),
}

struct Receiver {
    realizer: LazyRealizer<HLAInteraction, Message>,
    pings: Vec<i32>,
    discovered: Vec<String>,
    last_speed: f64,
    deleted: bool,
    steps: u32,
}

impl Receiver {
    fn new() -> Self {
        Self {
            realizer: LazyRealizer::new(
                InteractionRealizer::builder().entry("Ping", |i| Message::Ping(i.get_int("count"))),
            ),
            pings: Vec::new(),
            discovered: Vec::new(),
            last_speed: 0.0,
            deleted: false,
            steps: 0,
        }
    }
}

impl LifecycleHooks for Receiver {
    fn step(&mut self, _ctx: &mut FederateContext<'_>, _time: LogicalTime) -> Result<bool> {
        self.steps += 1;
        let done = self.pings.len() >= PINGS as usize && self.deleted;
        Ok(!done && self.steps < STEP_CAP)
    }
}

impl RtiEventHooks for Receiver {
    fn receive_object_registration(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        object: &HLAObject,
    ) -> Result<()> {
        self.discovered.push(object.class_name().to_string());
        Ok(())
    }

    fn receive_attribute_reflection(
        &mut self,
        ctx: &mut FederateContext<'_>,
        object: &HLAObject,
        _time: Option<LogicalTime>,
    ) -> Result<()> {
        assert!(ctx.remote_object(object.instance_handle()).is_some());
        self.last_speed = object.get_double("speed");
        Ok(())
    }

    fn receive_interaction(
        &mut self,
        ctx: &mut FederateContext<'_>,
        interaction: &HLAInteraction,
        _time: Option<LogicalTime>,
    ) -> Result<()> {
        match self.realizer.get(ctx.ambassador()).realize(interaction) {
            Some(Message::Ping(count)) => self.pings.push(count),
            None => panic!("unexpected interaction {}", interaction.class_name()),
        }
        Ok(())
    }

    fn receive_object_deleted(
        &mut self,
        _ctx: &mut FederateContext<'_>,
        _object: &HLAObject,
    ) -> Result<()> {
        self.deleted = true;
        Ok(())
    }
}
impl SimControlHooks for Receiver {}

fn receiver_config(evoked: bool) -> FederateConfiguration {
    let mut config = base_config("Receiver", evoked);
    config
        .add_subscribed_interaction("Ping")
        .add_interaction_parameter("Ping", "count", DataType::Int)
        .add_subscribed_attributes("Vehicle", &[("speed", DataType::Double)]);
    config
}

/// Run two federates to completion on their own threads.
fn run_pair<A, B>(rti: &LocalRti, a: (FederateConfiguration, A), b: (FederateConfiguration, B)) -> (A, B)
where
    A: hfed::FederateHooks + Send + 'static,
    B: hfed::FederateHooks + Send + 'static,
{
    let (config_a, hooks_a) = a;
    let (config_b, hooks_b) = b;
    let ambassador_a = rti.ambassador();
    let ambassador_b = rti.ambassador();

    let first = thread::spawn(move || {
        let mut federate = Federate::new(config_a, Ambassador::new(ambassador_a), hooks_a);
        federate.run().map(|()| federate.into_hooks())
    });
    let second = thread::spawn(move || {
        let mut federate = Federate::new(config_b, Ambassador::new(ambassador_b), hooks_b);
        federate.run().map(|()| federate.into_hooks())
    });
    let a = first.join().unwrap().expect("first federate completes");
    let b = second.join().unwrap().expect("second federate completes");
    (a, b)
}

fn exchange(evoked: bool) {
    let rti = LocalRti::builder().min_federates(2).build();
    let (sender, receiver) = run_pair(
        &rti,
        (sender_config(evoked), Sender::default()),
        (receiver_config(evoked), Receiver::new()),
    );

    assert_eq!(sender.sent, PINGS);
    assert_eq!(receiver.pings, vec![1, 2, 3, 4, 5]);
    assert_eq!(receiver.discovered, vec!["Vehicle".to_string()]);
    assert_eq!(receiver.last_speed, 50.0);
    assert!(receiver.deleted);
    assert!(receiver.realizer.is_built());
    assert!(!rti.federation_exists("Exchange"));
}

#[test]
fn test_exchange_with_evoked_callbacks() {
    exchange(true);
}

#[test]
fn test_exchange_with_immediate_callbacks() {
    exchange(false);
}

// ============================================================================
// Simulation control
// ============================================================================

/// Sends SimPause, SimResume and SimEnd on consecutive steps.
struct Controller {
    steps: u32,
}

impl LifecycleHooks for Controller {
    fn step(&mut self, ctx: &mut FederateContext<'_>, _time: LogicalTime) -> Result<bool> {
        self.steps += 1;
        let class = match self.steps {
            1 => SIM_PAUSE,
            2 => SIM_RESUME,
            _ => SIM_END,
        };
        let command = ctx.new_interaction(class)?;
        ctx.send_interaction(&command)?;
        Ok(self.steps < 3)
    }
}
impl RtiEventHooks for Controller {}
impl SimControlHooks for Controller {}

/// Steps forever until told to stop.
#[derive(Default)]
struct Worker {
    steps: u32,
    commands: Vec<&'static str>,
    steps_at_pause: Option<u32>,
    steps_at_resume: Option<u32>,
    ended_in_step: bool,
}

impl LifecycleHooks for Worker {
    fn step(&mut self, _ctx: &mut FederateContext<'_>, _time: LogicalTime) -> Result<bool> {
        self.steps += 1;
        if self.steps >= STEP_CAP {
            self.ended_in_step = true;
            return Ok(false);
        }
        Ok(true)
    }
}
impl RtiEventHooks for Worker {}

impl SimControlHooks for Worker {
    fn receive_sim_end(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        self.commands.push("end");
        Ok(())
    }

    fn receive_sim_pause(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        self.commands.push("pause");
        self.steps_at_pause = Some(self.steps);
        Ok(())
    }

    fn receive_sim_resume(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        self.commands.push("resume");
        self.steps_at_resume = Some(self.steps);
        Ok(())
    }
}

#[test]
fn test_sim_control_pauses_resumes_and_ends() {
    let rti = LocalRti::builder().min_federates(2).build();

    let mut controller_config = base_config("Controller", true);
    controller_config.add_published_interactions(&[SIM_PAUSE, SIM_RESUME, SIM_END]);
    let mut worker_config = base_config("Worker", true);
    worker_config.set_sim_control(true);

    let (_, worker) = run_pair(
        &rti,
        (controller_config, Controller { steps: 0 }),
        (worker_config, Worker::default()),
    );

    assert_eq!(worker.commands, vec!["pause", "resume", "end"]);
    assert!(!worker.ended_in_step);
    assert_eq!(worker.steps_at_pause, worker.steps_at_resume, "no step while paused");
}
