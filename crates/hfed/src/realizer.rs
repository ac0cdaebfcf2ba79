// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handle-keyed dispatch tables.
//!
//! A [`Realizer`] turns a generic [`HLAInteraction`] or [`HLAObject`] into an
//! application type by looking up a factory keyed by the class handle. It
//! replaces a chain of name comparisons in every callback handler: adding a
//! typed wrapper means adding one entry.
//!
//! Tables are built once from class names (resolved through the ambassador)
//! and are immutable afterwards. [`LazyRealizer`] defers the build until the
//! first lookup, when the federate is joined and handles exist.
//!
//! ```no_run
//! # use hfed::{Ambassador, HLAInteraction, InteractionRealizer, ValueMap};
//! # fn demo(ambassador: &Ambassador, incoming: &HLAInteraction) {
//! enum Message {
//!     Ping(i32),
//!     Pong(i32),
//! }
//!
//! let realizer: InteractionRealizer<Message> = InteractionRealizer::builder()
//!     .entry("Ping", |i| Message::Ping(i.get_int("count")))
//!     .entry("Pong", |i| Message::Pong(i.get_int("count")))
//!     .build(ambassador);
//!
//! match realizer.realize(incoming) {
//!     Some(Message::Ping(n)) => println!("ping {}", n),
//!     Some(Message::Pong(n)) => println!("pong {}", n),
//!     None => println!("unknown interaction {}", incoming.class_name()),
//! }
//! # }
//! ```

use crate::interaction::HLAInteraction;
use crate::object::HLAObject;
use crate::rti::Ambassador;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

/// A generic received value that can be dispatched by class handle.
pub trait Realizable {
    type Handle: Copy + Eq + Hash + fmt::Debug + Send + Sync;

    fn class_handle(&self) -> Self::Handle;

    /// Resolve a class name through the ambassador (safe lookup).
    fn resolve(ambassador: &Ambassador, class_name: &str) -> Option<Self::Handle>;
}

type Factory<G, T> = Box<dyn Fn(&G) -> T + Send + Sync>;

/// Immutable handle → factory table.
pub struct Realizer<G: Realizable, T> {
    table: HashMap<G::Handle, Factory<G, T>>,
}

/// Dispatch table for interactions.
pub type InteractionRealizer<T> = Realizer<HLAInteraction, T>;
/// Dispatch table for object reflections.
pub type ObjectRealizer<T> = Realizer<HLAObject, T>;

impl<G: Realizable, T> Realizer<G, T> {
    pub fn builder() -> RealizerBuilder<G, T> {
        RealizerBuilder::new()
    }

    /// Whether a factory exists for `handle`.
    pub fn can_realize(&self, handle: G::Handle) -> bool {
        self.table.contains_key(&handle)
    }

    /// Convert `generic` with the factory registered for its class, if any.
    pub fn realize(&self, generic: &G) -> Option<T> {
        self.table
            .get(&generic.class_handle())
            .map(|factory| factory(generic))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = G::Handle> + '_ {
        self.table.keys().copied()
    }
}

impl<G: Realizable, T> Default for Realizer<G, T> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
        }
    }
}

impl<G: Realizable, T> fmt::Debug for Realizer<G, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realizer")
            .field("handles", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects entries by class name and resolves them in [`Self::build`].
pub struct RealizerBuilder<G: Realizable, T> {
    named: Vec<(String, Factory<G, T>)>,
    resolved: Vec<(G::Handle, Factory<G, T>)>,
}

impl<G: Realizable, T> RealizerBuilder<G, T> {
    pub fn new() -> Self {
        Self {
            named: Vec::new(),
            resolved: Vec::new(),
        }
    }

    /// Register a factory for the class called `class_name`.
    #[must_use]
    pub fn entry<F>(mut self, class_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&G) -> T + Send + Sync + 'static,
    {
        self.named.push((class_name.into(), Box::new(factory)));
        self
    }

    /// Register a factory for an already-known handle.
    #[must_use]
    pub fn entry_for_handle<F>(mut self, handle: G::Handle, factory: F) -> Self
    where
        F: Fn(&G) -> T + Send + Sync + 'static,
    {
        self.resolved.push((handle, Box::new(factory)));
        self
    }

    /// Resolve every named entry. Names the RTI does not know are logged and
    /// left out; lookups for them fall through to the caller's fallback.
    pub fn build(self, ambassador: &Ambassador) -> Realizer<G, T> {
        let mut table = HashMap::with_capacity(self.named.len() + self.resolved.len());
        for (name, factory) in self.named {
            match G::resolve(ambassador, &name) {
                Some(handle) => {
                    log::debug!("[realizer] {} -> {:?}", name, handle);
                    table.insert(handle, factory);
                }
                None => log::warn!("[realizer] class '{}' is unknown, entry skipped", name),
            }
        }
        for (handle, factory) in self.resolved {
            table.insert(handle, factory);
        }
        Realizer { table }
    }
}

impl<G: Realizable, T> Default for RealizerBuilder<G, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`Realizer`] built on first use.
pub struct LazyRealizer<G: Realizable, T> {
    cell: OnceLock<Realizer<G, T>>,
    pending: Mutex<Option<RealizerBuilder<G, T>>>,
}

impl<G: Realizable, T> LazyRealizer<G, T> {
    pub fn new(builder: RealizerBuilder<G, T>) -> Self {
        Self {
            cell: OnceLock::new(),
            pending: Mutex::new(Some(builder)),
        }
    }

    /// The table, building it through `ambassador` the first time.
    pub fn get(&self, ambassador: &Ambassador) -> &Realizer<G, T> {
        self.cell.get_or_init(|| {
            self.pending
                .lock()
                .take()
                .map(|builder| builder.build(ambassador))
                .unwrap_or_default()
        })
    }

    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::InteractionClassHandle;
    use crate::values::ValueMap;

    #[test]
    fn test_pre_resolved_entries() {
        let ping = InteractionClassHandle::new(1);
        let other = InteractionClassHandle::new(2);
        let realizer: InteractionRealizer<i32> = InteractionRealizer::builder()
            .entry_for_handle(ping, |i| i.get_int("count"))
            .build(&Ambassador::detached());

        assert!(realizer.can_realize(ping));
        assert!(!realizer.can_realize(other));

        let mut msg = HLAInteraction::new(ping, "Ping");
        msg.set_int("count", 4);
        assert_eq!(realizer.realize(&msg), Some(4));
        assert_eq!(realizer.realize(&HLAInteraction::new(other, "Other")), None);
    }

    #[test]
    fn test_unknown_names_skipped() {
        let realizer: InteractionRealizer<()> = InteractionRealizer::builder()
            .entry("Nope", |_| ())
            .build(&Ambassador::detached());
        assert!(realizer.is_empty());
    }

    #[test]
    fn test_lazy_builds_once() {
        let lazy: LazyRealizer<HLAInteraction, u8> = LazyRealizer::new(
            InteractionRealizer::builder().entry_for_handle(InteractionClassHandle::new(3), |_| 1),
        );
        assert!(!lazy.is_built());
        let amb = Ambassador::detached();
        assert_eq!(lazy.get(&amb).len(), 1);
        assert!(lazy.is_built());
        assert_eq!(lazy.get(&amb).len(), 1);
    }
}
