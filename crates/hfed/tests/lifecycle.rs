// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lifecycle tests against the in-process RTI.
//!
//! Covers phase ordering, time-stepped advance, join retry (success after
//! transient failures and exhaustion), cancellation, teardown after a failed
//! cleanup, the ReadyToResign handshake and late joiners.

use hfed::{
    Ambassador, CancelToken, Error, ErrorKind, Federate, FederateConfiguration, FederateContext,
    LifecycleHooks, LifecycleState, LocalRti, LogicalTime, Result, RtiEventHooks,
    SimControlHooks,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

fn test_config(federate: &str, federation: &str) -> FederateConfiguration {
    let mut config = FederateConfiguration::new(federate, "TestFederate", federation);
    config
        .set_can_create_federation(true)
        .set_evoke_window(0.005, 0.05)
        .set_poll_interval(Duration::from_millis(2))
        .set_wait_timeout(Some(Duration::from_secs(10)));
    config
}

/// Records every hook call with the lifecycle state it observed.
#[derive(Default)]
struct PhaseRecorder {
    phases: Vec<(&'static str, LifecycleState)>,
    times: Vec<LogicalTime>,
    max_steps: usize,
    joined_in_before_join: Option<bool>,
}

impl PhaseRecorder {
    fn with_steps(max_steps: usize) -> Self {
        Self {
            max_steps,
            ..Self::default()
        }
    }

    fn record(&mut self, phase: &'static str, ctx: &FederateContext<'_>) {
        self.phases.push((phase, ctx.state()));
    }
}

impl LifecycleHooks for PhaseRecorder {
    fn before_federation_join(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.joined_in_before_join = Some(ctx.federate_handle().is_some());
        self.record("before_federation_join", ctx);
        Ok(())
    }

    fn before_ready_to_populate(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.record("before_ready_to_populate", ctx);
        Ok(())
    }

    fn before_ready_to_run(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.record("before_ready_to_run", ctx);
        Ok(())
    }

    fn before_first_step(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.record("before_first_step", ctx);
        Ok(())
    }

    fn step(&mut self, ctx: &mut FederateContext<'_>, time: LogicalTime) -> Result<bool> {
        if self.times.is_empty() {
            self.record("step", ctx);
        }
        self.times.push(time);
        Ok(self.times.len() < self.max_steps)
    }

    fn before_ready_to_resign(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.record("before_ready_to_resign", ctx);
        Ok(())
    }

    fn before_exit(&mut self, ctx: &mut FederateContext<'_>) -> Result<()> {
        self.record("before_exit", ctx);
        Ok(())
    }
}

impl RtiEventHooks for PhaseRecorder {}
impl SimControlHooks for PhaseRecorder {}

/// Counts the delays requested between join attempts.
fn counting_sleeper() -> (Arc<Mutex<Vec<Duration>>>, impl FnMut(Duration) + Send + 'static) {
    let delays = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&delays);
    (delays, move |d| sink.lock().unwrap().push(d))
}

#[test]
fn test_phases_run_in_order_with_monotonic_states() {
    let rti = LocalRti::new();
    let mut federate = Federate::new(
        test_config("solo", "Phases"),
        Ambassador::new(rti.ambassador()),
        PhaseRecorder::with_steps(3),
    );
    assert_eq!(federate.state(), LifecycleState::Gestating);

    federate.run().expect("lifecycle completes");
    assert_eq!(federate.state(), LifecycleState::Expired);
    assert!(!federate.is_joined());

    let hooks = federate.into_hooks();
    let names: Vec<_> = hooks.phases.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec![
            "before_federation_join",
            "before_ready_to_populate",
            "before_ready_to_run",
            "before_first_step",
            "step",
            "before_ready_to_resign",
            "before_exit",
        ]
    );
    assert_eq!(hooks.joined_in_before_join, Some(false));

    let states: Vec<_> = hooks.phases.iter().map(|(_, state)| *state).collect();
    assert!(states.windows(2).all(|w| w[0] <= w[1]), "{:?}", states);
    assert_eq!(states[0], LifecycleState::Initializing);
    assert_eq!(states[4], LifecycleState::Running);
    assert_eq!(states[6], LifecycleState::CleaningUp);

    // the last federate out destroys the federation
    assert!(!rti.federation_exists("Phases"));
}

#[test]
fn test_time_stepped_federate_advances_by_lookahead() {
    let rti = LocalRti::new();
    let mut config = test_config("stepper", "Steps");
    config.set_time_stepped(true).set_lookahead(0.5);

    let mut federate = Federate::new(
        config,
        Ambassador::new(rti.ambassador()),
        PhaseRecorder::with_steps(5),
    );
    federate.run().expect("lifecycle completes");

    let hooks = federate.into_hooks();
    assert_eq!(hooks.times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn test_event_driven_federate_keeps_time() {
    let rti = LocalRti::new();
    let mut config = test_config("events", "Events");
    config.set_time_stepped(false);

    let mut federate = Federate::new(
        config,
        Ambassador::new(rti.ambassador()),
        PhaseRecorder::with_steps(4),
    );
    federate.run().expect("lifecycle completes");
    assert_eq!(federate.into_hooks().times, vec![0.0; 4]);
}

#[test]
fn test_join_succeeds_after_transient_failures() {
    let rti = LocalRti::new();
    rti.fail_next_joins(2);
    let (delays, sleeper) = counting_sleeper();

    let mut config = test_config("retrier", "Retry");
    config.set_max_join_attempts(5).set_join_retry_interval_secs(3);

    let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), PhaseRecorder::with_steps(1))
        .with_sleeper(sleeper);
    federate.run().expect("third attempt joins");

    assert_eq!(rti.join_attempts(), 3);
    assert_eq!(*delays.lock().unwrap(), vec![Duration::from_secs(3); 2]);
}

#[test]
fn test_join_exhaustion_is_fatal_after_exact_attempts() {
    let rti = LocalRti::new();
    rti.fail_next_joins(u32::MAX);
    let (delays, sleeper) = counting_sleeper();

    let mut config = test_config("doomed", "Exhaust");
    config.set_max_join_attempts(4).set_join_retry_interval_secs(1);

    let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), PhaseRecorder::with_steps(1))
        .with_sleeper(sleeper);
    let err = federate.run().expect_err("join never succeeds");

    assert_eq!(err.kind(), ErrorKind::JoinFailed);
    assert!(err.cause().is_some(), "last RTI cause is carried");
    assert_eq!(rti.join_attempts(), 4);
    assert_eq!(delays.lock().unwrap().len(), 3);
    assert!(!federate.is_joined());
    assert_eq!(federate.state(), LifecycleState::Expired);

    // no hook past the join point ran
    let hooks = federate.into_hooks();
    assert_eq!(hooks.phases.len(), 1);
    assert!(hooks.times.is_empty());
}

#[test]
fn test_missing_federation_without_create_rights_fails_join() {
    let rti = LocalRti::new();
    let (delays, sleeper) = counting_sleeper();

    let mut config = test_config("guest", "Nowhere");
    config
        .set_can_create_federation(false)
        .set_max_join_attempts(2)
        .set_join_retry_interval_secs(1);

    let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), PhaseRecorder::with_steps(1))
        .with_sleeper(sleeper);
    let err = federate.run().expect_err("no federation to join");
    assert_eq!(err.kind(), ErrorKind::JoinFailed);
    assert_eq!(delays.lock().unwrap().len(), 1);
    assert!(!rti.federation_exists("Nowhere"));
}

#[test]
fn test_invalid_configuration_rejected_before_connecting() {
    let rti = LocalRti::new();
    let mut config = test_config("bad", "Invalid");
    config.set_time_stepped(true).set_lookahead(0.0);

    let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), PhaseRecorder::with_steps(1));
    let err = federate.run().expect_err("lookahead must be positive");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(rti.join_attempts(), 0);
    assert!(!rti.federation_exists("Invalid"));
}

#[test]
fn test_configuration_frozen_by_runner() {
    let rti = LocalRti::new();
    let federate = Federate::new(
        test_config("frozen", "Frozen"),
        Ambassador::new(rti.ambassador()),
        PhaseRecorder::with_steps(1),
    );
    assert!(federate.config().is_frozen());
}

struct Forever;

impl LifecycleHooks for Forever {
    fn step(&mut self, _ctx: &mut FederateContext<'_>, _time: LogicalTime) -> Result<bool> {
        Ok(true)
    }
}
impl RtiEventHooks for Forever {}
impl SimControlHooks for Forever {}

#[test]
fn test_cancel_token_ends_main_loop() {
    let rti = LocalRti::new();
    let token = CancelToken::new();
    let mut config = test_config("endless", "Cancel");
    config.set_time_stepped(false);
    let mut federate = Federate::new(
        config,
        Ambassador::new(rti.ambassador()),
        Forever,
    )
    .with_cancel_token(token.clone());

    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        token.cancel();
    });
    federate.initialize().expect("initialize");
    federate.execute().expect("loop ends on cancel");
    canceller.join().unwrap();
    assert_eq!(federate.state(), LifecycleState::Running);
}

#[test]
fn test_sync_wait_times_out_without_peers() {
    // two federates required for any synchronization, only one shows up
    let rti = LocalRti::builder().min_federates(2).build();
    let mut config = test_config("lonely", "Lonely");
    config.set_wait_timeout(Some(Duration::from_millis(150)));

    let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), Forever);
    let err = federate.run().expect_err("ReadyToPopulate never completes");
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.message().contains("ReadyToPopulate"), "{}", err);

    // the runner resigned on the way out
    assert!(rti.joined_federates("Lonely").is_empty());
}

// ============================================================================
// Cleanup, ReadyToResign and late joiners
// ============================================================================

type Journal = Arc<Mutex<Vec<String>>>;

fn position(journal: &Journal, entry: &str) -> usize {
    let entries = journal.lock().unwrap();
    entries
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("'{}' missing from {:?}", entry, *entries))
}

/// Steps a fixed number of times (or until told to stop) and journals the
/// hooks that matter for teardown.
#[derive(Default)]
struct Scripted {
    name: &'static str,
    steps: u32,
    stop_after: u32,
    /// Cancel this token at `stop_after` instead of returning `false`.
    cancel: Option<CancelToken>,
    /// Keep stepping until this flag is set.
    until: Option<Arc<AtomicBool>>,
    started: Option<mpsc::Sender<()>>,
    fail_before_exit: bool,
    journal: Journal,
}

impl Scripted {
    fn new(name: &'static str, stop_after: u32, journal: &Journal) -> Self {
        Self {
            name,
            stop_after,
            journal: Arc::clone(journal),
            ..Self::default()
        }
    }

    fn note(&self, what: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{} {}", self.name, what));
    }
}

impl LifecycleHooks for Scripted {
    fn before_ready_to_populate(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        self.note("populate");
        Ok(())
    }

    fn step(&mut self, _ctx: &mut FederateContext<'_>, _time: LogicalTime) -> Result<bool> {
        self.steps += 1;
        if let Some(started) = self.started.take() {
            let _ = started.send(());
        }
        if let Some(token) = &self.cancel {
            if self.steps >= self.stop_after {
                token.cancel();
            }
            return Ok(true);
        }
        let more = match &self.until {
            Some(flag) => !flag.load(Ordering::SeqCst) && self.steps < 10_000,
            None => self.steps < self.stop_after,
        };
        if !more {
            self.note("last step");
        }
        Ok(more)
    }

    fn before_ready_to_resign(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        self.note("resign");
        Ok(())
    }

    fn before_exit(&mut self, _ctx: &mut FederateContext<'_>) -> Result<()> {
        self.note("exit");
        if self.fail_before_exit {
            return Err(Error::new(ErrorKind::CallbackFailed, "exit refused"));
        }
        Ok(())
    }
}
impl RtiEventHooks for Scripted {}
impl SimControlHooks for Scripted {}

fn event_driven(federate: &str, federation: &str) -> FederateConfiguration {
    let mut config = test_config(federate, federation);
    config.set_time_stepped(false);
    config
}

#[test]
fn test_cancelled_run_skips_ready_to_resign_and_resigns() {
    let rti = LocalRti::new();
    let journal = Journal::default();
    let token = CancelToken::new();
    let mut config = event_driven("p", "CancelResign");
    config.set_sync_before_resign(true);

    let mut hooks = Scripted::new("p", 2, &journal);
    hooks.cancel = Some(token.clone());
    let mut federate = Federate::new(config, Ambassador::new(rti.ambassador()), hooks)
        .with_cancel_token(token);

    federate.run().expect("cancelled run still tears down");
    assert_eq!(federate.state(), LifecycleState::Expired);
    assert!(!federate.is_joined());
    assert!(rti.joined_federates("CancelResign").is_empty());
    assert!(!rti.federation_exists("CancelResign"));
    assert!(position(&journal, "p resign") < position(&journal, "p exit"));
}

#[test]
fn test_cleanup_failure_resigns_and_expires() {
    let rti = LocalRti::new();
    let journal = Journal::default();
    let mut hooks = Scripted::new("q", 1, &journal);
    hooks.fail_before_exit = true;
    let mut federate = Federate::new(
        event_driven("q", "BadExit"),
        Ambassador::new(rti.ambassador()),
        hooks,
    );

    let err = federate.run().expect_err("before_exit fails");
    assert_eq!(err.kind(), ErrorKind::CallbackFailed);
    assert_eq!(federate.state(), LifecycleState::Expired);
    assert!(!federate.is_joined());
    assert!(rti.joined_federates("BadExit").is_empty());
}

#[test]
fn test_ready_to_resign_waits_for_every_federate() {
    let rti = LocalRti::builder().min_federates(2).build();
    let journal = Journal::default();

    let spawn = |name: &'static str, stop_after: u32| {
        let mut config = event_driven(name, "Resign");
        config.set_sync_before_resign(true);
        let ambassador = Ambassador::new(rti.ambassador());
        let hooks = Scripted::new(name, stop_after, &journal);
        thread::spawn(move || {
            let mut federate = Federate::new(config, ambassador, hooks);
            federate.run().map(|()| federate.state())
        })
    };
    let fast = spawn("fast", 2);
    let slow = spawn("slow", 30);

    assert_eq!(fast.join().unwrap().expect("fast completes"), LifecycleState::Expired);
    assert_eq!(slow.join().unwrap().expect("slow completes"), LifecycleState::Expired);

    // fast cannot leave ReadyToResign before slow has stopped stepping
    assert!(position(&journal, "slow last step") < position(&journal, "fast exit"));
    assert!(position(&journal, "fast resign") < position(&journal, "fast exit"));
    assert!(!rti.federation_exists("Resign"));
}

#[test]
fn test_late_joiner_skips_synchronization() {
    let rti = LocalRti::new();
    let journal = Journal::default();
    let stop = Arc::new(AtomicBool::new(false));
    let (started_tx, started_rx) = mpsc::channel();

    let mut early_hooks = Scripted::new("early", 0, &journal);
    early_hooks.until = Some(Arc::clone(&stop));
    early_hooks.started = Some(started_tx);
    let early_config = event_driven("early", "Late");
    let early_ambassador = Ambassador::new(rti.ambassador());
    let early = thread::spawn(move || {
        let mut federate = Federate::new(early_config, early_ambassador, early_hooks);
        federate.run()
    });
    started_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("early federate reaches its main loop");

    // the early federate has already passed both points; a late joiner that
    // tried to synchronize would wait for it forever
    let mut late_config = event_driven("late", "Late");
    late_config
        .set_can_create_federation(false)
        .set_late_joiner(true)
        .set_wait_timeout(Some(Duration::from_secs(2)));
    let mut late = Federate::new(
        late_config,
        Ambassador::new(rti.ambassador()),
        Scripted::new("late", 3, &journal),
    );
    let late_result = late.run();
    stop.store(true, Ordering::SeqCst);
    early.join().unwrap().expect("early completes");

    late_result.expect("late joiner runs without synchronizing");
    assert_eq!(late.into_hooks().steps, 3);
    assert!(position(&journal, "late populate") < position(&journal, "late last step"));
    assert!(!rti.federation_exists("Late"));
}
