// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

/// Lifecycle phase of a federate.
///
/// Phases only move forward, in declaration order. Hooks read the current
/// phase from their context; nothing outside the runner can change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifecycleState {
    /// Constructed, nothing sent to the RTI yet.
    #[default]
    Gestating,
    /// Connecting, joining, declaring and synchronizing.
    Initializing,
    /// In the step/advance loop.
    Running,
    /// Disabling time policy, resigning and destroying.
    CleaningUp,
    /// Done. Terminal.
    Expired,
}

impl LifecycleState {
    /// The phase that follows this one.
    pub const fn next(self) -> Option<LifecycleState> {
        match self {
            LifecycleState::Gestating => Some(LifecycleState::Initializing),
            LifecycleState::Initializing => Some(LifecycleState::Running),
            LifecycleState::Running => Some(LifecycleState::CleaningUp),
            LifecycleState::CleaningUp => Some(LifecycleState::Expired),
            LifecycleState::Expired => None,
        }
    }

    /// Whether moving from `self` to `to` goes forward.
    pub fn can_transition_to(self, to: LifecycleState) -> bool {
        to > self
    }

    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Expired
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Gestating => "gestating",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Running => "running",
            LifecycleState::CleaningUp => "cleaning up",
            LifecycleState::Expired => "expired",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_declaration_order() {
        let mut state = LifecycleState::default();
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            assert!(state.can_transition_to(next));
            assert!(!next.can_transition_to(state));
            state = next;
            seen.push(state);
        }
        assert_eq!(seen.len(), 5);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_no_self_transition() {
        assert!(!LifecycleState::Running.can_transition_to(LifecycleState::Running));
        assert!(!LifecycleState::Expired.can_transition_to(LifecycleState::Gestating));
    }
}
