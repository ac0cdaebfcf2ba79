// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque RTI handles.
//!
//! Handles are assigned by the RTI and stay stable for the life of a
//! federation session. They are cheap `Copy` keys, which is why dispatch
//! tables and the callback maps are keyed by handle rather than by name.

use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_handle!(
    /// Identifies a joined federate.
    FederateHandle,
    "Federate"
);
define_handle!(
    /// Identifies an object class of the FOM.
    ObjectClassHandle,
    "ObjectClass"
);
define_handle!(
    /// Identifies an attribute of an object class.
    AttributeHandle,
    "Attribute"
);
define_handle!(
    /// Identifies an interaction class of the FOM.
    InteractionClassHandle,
    "InteractionClass"
);
define_handle!(
    /// Identifies a parameter of an interaction class.
    ParameterHandle,
    "Parameter"
);
define_handle!(
    /// Identifies a registered object instance. Owned by the RTI.
    ObjectInstanceHandle,
    "ObjectInstance"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_handle_formatting() {
        let h = ObjectClassHandle::new(7);
        assert_eq!(format!("{:?}", h), "ObjectClass(7)");
        assert_eq!(h.to_string(), "ObjectClass#7");
        assert_eq!(h.raw(), 7);
    }

    #[test]
    fn test_handles_hash_by_value() {
        let set: HashSet<_> = [InteractionClassHandle::new(1), InteractionClassHandle::new(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }
}
