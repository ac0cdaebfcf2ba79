// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process loopback RTI.
//!
//! [`LocalRti`] implements enough of the RTI services for several federates
//! living in one process to create and join a federation, synchronize,
//! advance time and exchange interactions and attribute updates. It backs
//! the integration tests and the samples; it is not a full HLA RTI (no
//! ownership, no DDM, receive-order delivery only).
//!
//! Time management is conservative: a constrained federate's advance to `t`
//! is granted once every other regulating federate has reached, or
//! requested, at least `t - lookahead`.
//!
//! # Architecture
//!
//! ```text
//!   LocalRtiAmbassador ──┐                 ┌──> crossbeam queue ──> evoke_multiple_callbacks
//!   LocalRtiAmbassador ──┼──> Mutex<Shared>┤
//!   LocalRtiAmbassador ──┘   (federations, └──> crossbeam queue ──> delivery thread (immediate)
//!                             catalog)
//! ```
//!
//! Every operation locks the shared state, mutates it and enqueues the
//! resulting callbacks before releasing the lock, so callbacks caused by one
//! operation are queued in the order they were produced. Callbacks are never
//! delivered with the lock held.
//!
//! # Example
//!
//! ```no_run
//! use hfed::LocalRti;
//!
//! let rti = LocalRti::builder().min_federates(2).build();
//! let ping = rti.ambassador();
//! let pong = rti.ambassador();
//! # drop((ping, pong));
//! ```

mod ambassador;
mod callback;
mod catalog;
mod federation;

pub use ambassador::LocalRtiAmbassador;

#[cfg(test)]
pub(crate) use callback::NullCallbacks;

use callback::{Callback, Outbox};
use catalog::Catalog;
use crossbeam::channel::Sender;
use federation::Federation;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared loopback RTI. Cheap to clone; all clones are the same RTI.
#[derive(Clone)]
pub struct LocalRti {
    shared: Arc<Mutex<Shared>>,
}

impl std::fmt::Debug for LocalRti {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("LocalRti")
            .field("federations", &shared.federations.keys().collect::<Vec<_>>())
            .field("connections", &shared.connections.len())
            .finish()
    }
}

pub(crate) struct Shared {
    catalog: Catalog,
    federations: HashMap<String, Federation>,
    connections: HashMap<u64, Sender<Callback>>,
    min_federates: usize,
    next_connection: u64,
    next_federate: u64,
    next_instance: u64,
    failing_joins: u32,
    join_attempts: u64,
}

impl Shared {
    fn dispatch(&self, outbox: Outbox) {
        for (conn, callback) in outbox {
            if let Some(sender) = self.connections.get(&conn) {
                // a closed queue means the connection is going away
                let _ = sender.send(callback);
            }
        }
    }
}

impl Default for LocalRti {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRti {
    /// Loopback RTI with dynamic handle allocation and no minimum federate count.
    pub fn new() -> Self {
        LocalRtiBuilder::default().build()
    }

    pub fn builder() -> LocalRtiBuilder {
        LocalRtiBuilder::default()
    }

    /// A new, unconnected ambassador on this RTI.
    pub fn ambassador(&self) -> LocalRtiAmbassador {
        let conn = {
            let mut shared = self.shared.lock();
            let conn = shared.next_connection;
            shared.next_connection += 1;
            conn
        };
        LocalRtiAmbassador::new(self.clone(), conn)
    }

    /// Make the next `count` join calls fail.
    pub fn fail_next_joins(&self, count: u32) {
        self.shared.lock().failing_joins = count;
    }

    /// Number of join calls received so far, failed ones included.
    pub fn join_attempts(&self) -> u64 {
        self.shared.lock().join_attempts
    }

    pub fn federation_exists(&self, name: &str) -> bool {
        self.shared.lock().federations.contains_key(name)
    }

    /// Names of the federates joined to `federation`.
    pub fn joined_federates(&self, federation: &str) -> Vec<String> {
        self.shared
            .lock()
            .federations
            .get(federation)
            .map(Federation::member_names)
            .unwrap_or_default()
    }

    /// FOM modules of `federation`: creation modules, then joiners' extras.
    pub fn fom_modules(&self, federation: &str) -> Vec<String> {
        self.shared
            .lock()
            .federations
            .get(federation)
            .map(|f| f.fom_modules().to_vec())
            .unwrap_or_default()
    }

    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, Shared> {
        self.shared.lock()
    }
}

/// Builder for [`LocalRti`].
#[derive(Debug, Default)]
pub struct LocalRtiBuilder {
    strict: bool,
    min_federates: usize,
    object_classes: Vec<(String, Vec<String>)>,
    interaction_classes: Vec<(String, Vec<String>)>,
}

impl LocalRtiBuilder {
    /// Only declared class/attribute/parameter names resolve.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Synchronization points complete only once this many federates are joined.
    #[must_use]
    pub fn min_federates(mut self, count: usize) -> Self {
        self.min_federates = count;
        self
    }

    #[must_use]
    pub fn declare_object_class(mut self, name: &str, attributes: &[&str]) -> Self {
        self.object_classes.push((
            name.to_string(),
            attributes.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }

    #[must_use]
    pub fn declare_interaction_class(mut self, name: &str, parameters: &[&str]) -> Self {
        self.interaction_classes.push((
            name.to_string(),
            parameters.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    pub fn build(self) -> LocalRti {
        let mut catalog = Catalog::new(self.strict);
        for (name, attributes) in &self.object_classes {
            let attributes: Vec<&str> = attributes.iter().map(String::as_str).collect();
            catalog.declare_object_class(name, &attributes);
        }
        for (name, parameters) in &self.interaction_classes {
            let parameters: Vec<&str> = parameters.iter().map(String::as_str).collect();
            catalog.declare_interaction_class(name, &parameters);
        }
        LocalRti {
            shared: Arc::new(Mutex::new(Shared {
                catalog,
                federations: HashMap::new(),
                connections: HashMap::new(),
                min_federates: self.min_federates,
                next_connection: 1,
                next_federate: 1,
                next_instance: 1,
                failing_joins: 0,
                join_attempts: 0,
            })),
        }
    }
}
