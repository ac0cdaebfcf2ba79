// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Framework error type.
//!
//! Every failure surfaced by the ambassador facade, the configuration layer or
//! the lifecycle runner is an [`Error`]: a coarse [`ErrorKind`] callers can
//! branch on, a message naming the class/handle/label involved, and the
//! vendor [`RtiException`] that caused it when there is one.

use crate::rti::RtiException;
use std::fmt;
use thiserror::Error;

/// Classification of framework failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // ========================================================================
    // Federation management
    // ========================================================================
    /// Connecting to (or disconnecting from) the RTI failed.
    ConnectionFailed,
    /// Creating, destroying or resigning from a federation execution failed.
    FederationManagementFailed,
    /// Joining the federation execution failed (after all retries).
    JoinFailed,

    // ========================================================================
    // Runtime services
    // ========================================================================
    /// Enabling/disabling time regulation or constraint, or a time advance, failed.
    TimeManagementFailed,
    /// Registering or achieving a synchronization point failed.
    SyncPointFailed,
    /// A publish or subscribe declaration was rejected.
    PublishSubscribeFailed,
    /// Registering/updating/deleting an instance or sending an interaction failed.
    SendFailed,
    /// Translating a name to a handle (or back) failed.
    HandleLookupFailed,
    /// Evoking callbacks failed.
    CallbackFailed,

    // ========================================================================
    // Local
    // ========================================================================
    /// Configuration is malformed or inconsistent.
    ConfigInvalid,
    /// Operation is not valid in the current lifecycle state.
    InvalidState,
    /// A bounded wait elapsed before its condition held.
    Timeout,
    /// A wait was cancelled through its cancel token.
    Cancelled,
}

impl ErrorKind {
    /// Whether retrying the failed operation may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::ConnectionFailed | ErrorKind::JoinFailed | ErrorKind::Timeout
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConnectionFailed => "connection failed",
            ErrorKind::FederationManagementFailed => "federation management failed",
            ErrorKind::JoinFailed => "join failed",
            ErrorKind::TimeManagementFailed => "time management failed",
            ErrorKind::SyncPointFailed => "synchronization point failed",
            ErrorKind::PublishSubscribeFailed => "publish/subscribe failed",
            ErrorKind::SendFailed => "send failed",
            ErrorKind::HandleLookupFailed => "handle lookup failed",
            ErrorKind::CallbackFailed => "callback evocation failed",
            ErrorKind::ConfigInvalid => "invalid configuration",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::Timeout => "timed out",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Errors returned by framework operations.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<RtiException>,
}

impl Error {
    /// Create an error without an underlying RTI cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error wrapping the RTI exception that caused it.
    pub fn rti(kind: ErrorKind, message: impl Into<String>, cause: RtiException) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// Shorthand for a [`ErrorKind::ConfigInvalid`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The RTI exception behind this error, if any.
    pub fn cause(&self) -> Option<&RtiException> {
        self.cause.as_ref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Convenient alias for framework results.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = Error::new(ErrorKind::JoinFailed, "federate 'Ping' could not join 'Demo'");
        assert_eq!(
            err.to_string(),
            "join failed: federate 'Ping' could not join 'Demo'"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_rti_cause_is_source() {
        let err = Error::rti(
            ErrorKind::HandleLookupFailed,
            "no object class 'Foo'",
            RtiException::NameNotFound("Foo".into()),
        );
        assert_eq!(err.kind(), ErrorKind::HandleLookupFailed);
        assert_eq!(err.cause(), Some(&RtiException::NameNotFound("Foo".into())));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::JoinFailed.is_retryable());
        assert!(ErrorKind::ConnectionFailed.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(!ErrorKind::ConfigInvalid.is_retryable());
        assert!(!ErrorKind::SendFailed.is_retryable());
        assert!(!Error::config("bad").is_retryable());
    }
}
