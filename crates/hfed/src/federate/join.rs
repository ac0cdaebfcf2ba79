// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded federation-join retry.

use super::wait::CancelToken;
use crate::error::{Error, ErrorKind, Result};
use std::time::Duration;

/// Sleep used between join attempts. Injectable so tests can count delays.
pub type Sleeper = Box<dyn FnMut(Duration) + Send>;

pub(crate) fn thread_sleeper() -> Sleeper {
    Box::new(std::thread::sleep)
}

/// Call `attempt` up to `max_attempts` times, sleeping `interval` between
/// failures. Exhausting every attempt is a [`ErrorKind::JoinFailed`] error
/// carrying the last RTI cause.
pub(crate) fn join_with_retry<T>(
    max_attempts: u32,
    interval: Duration,
    cancel: &CancelToken,
    sleeper: &mut dyn FnMut(Duration),
    mut attempt: impl FnMut(u32) -> Result<T>,
) -> Result<T> {
    let max_attempts = max_attempts.max(1);
    let mut last = None;
    for n in 1..=max_attempts {
        match attempt(n) {
            Ok(value) => {
                if n > 1 {
                    log::info!("[join] joined on attempt {}/{}", n, max_attempts);
                }
                return Ok(value);
            }
            Err(e) => {
                log::warn!("[join] attempt {}/{} failed: {}", n, max_attempts, e);
                last = Some(e);
            }
        }
        if n < max_attempts {
            if cancel.is_cancelled() {
                return Err(Error::new(
                    ErrorKind::Cancelled,
                    format!("join cancelled after {} attempts", n),
                ));
            }
            sleeper(interval);
        }
    }

    let message = format!("gave up after {} attempts", max_attempts);
    Err(match last.as_ref().and_then(Error::cause) {
        Some(cause) => Error::rti(
            ErrorKind::JoinFailed,
            format!("{}: {}", message, last.as_ref().map_or("", Error::message)),
            cause.clone(),
        ),
        None => Error::new(ErrorKind::JoinFailed, message),
    })
}
