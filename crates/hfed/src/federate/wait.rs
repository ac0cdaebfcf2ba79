// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Blocking waits on RTI callbacks.
//!
//! Sync points, time-regulation enables and time advances all wait the same
//! way: check a condition recorded by the callbacks, and if it does not hold
//! yet, pump the RTI once and check again. A [`WaitPolicy`] may bound the
//! total wait; a [`CancelToken`] aborts it from another thread.

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::{Error, ErrorKind, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Bound and pace of blocking waits.
///
/// `timeout: None` waits until the condition holds, as HLA federates
/// traditionally do. Setting a timeout turns a stalled federation into an
/// [`ErrorKind::Timeout`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Option<Duration>,
    /// Pause between checks when callbacks are delivered on an RTI thread.
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitPolicy {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// Cooperative cancellation shared between a federate and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Pump until `done` holds, honouring `policy` and `cancel`.
pub(crate) fn wait_until(
    what: &str,
    policy: WaitPolicy,
    cancel: &CancelToken,
    mut done: impl FnMut() -> Result<bool>,
    mut pump: impl FnMut() -> Result<()>,
) -> Result<()> {
    let started = Instant::now();
    loop {
        if done()? {
            return Ok(());
        }
        if cancel.is_cancelled() {
            return Err(Error::new(
                ErrorKind::Cancelled,
                format!("cancelled while waiting for {}", what),
            ));
        }
        if let Some(timeout) = policy.timeout {
            if started.elapsed() >= timeout {
                return Err(Error::new(
                    ErrorKind::Timeout,
                    format!("waited {:?} for {}", timeout, what),
                ));
            }
        }
        pump()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_returns_once_condition_holds() {
        let pumps = Cell::new(0);
        wait_until(
            "three pumps",
            WaitPolicy::default(),
            &CancelToken::new(),
            || Ok(pumps.get() >= 3),
            || {
                pumps.set(pumps.get() + 1);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(pumps.get(), 3);
    }

    #[test]
    fn test_timeout() {
        let err = wait_until(
            "never",
            WaitPolicy::with_timeout(Duration::from_millis(20)),
            &CancelToken::new(),
            || Ok(false),
            || {
                std::thread::sleep(Duration::from_millis(2));
                Ok(())
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.message().contains("never"));
    }

    #[test]
    fn test_cancel() {
        let token = CancelToken::new();
        let remote = token.clone();
        let err = wait_until(
            "cancel",
            WaitPolicy::default(),
            &token,
            || Ok(false),
            || {
                remote.cancel();
                Ok(())
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_pump_error_propagates() {
        let err = wait_until(
            "pump",
            WaitPolicy::default(),
            &CancelToken::new(),
            || Ok(false),
            || Err(Error::new(ErrorKind::CallbackFailed, "boom")),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CallbackFailed);
    }
}
