// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

/// How a federate shares an object class, attribute or interaction class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "snake_case"))]
pub enum Sharing {
    Publish,
    Subscribe,
    PublishSubscribe,
    #[default]
    Neither,
}

impl Sharing {
    pub const fn is_publish(self) -> bool {
        matches!(self, Sharing::Publish | Sharing::PublishSubscribe)
    }

    pub const fn is_subscribe(self) -> bool {
        matches!(self, Sharing::Subscribe | Sharing::PublishSubscribe)
    }

    pub const fn is_neither(self) -> bool {
        matches!(self, Sharing::Neither)
    }

    pub const fn from_flags(publish: bool, subscribe: bool) -> Self {
        match (publish, subscribe) {
            (true, true) => Sharing::PublishSubscribe,
            (true, false) => Sharing::Publish,
            (false, true) => Sharing::Subscribe,
            (false, false) => Sharing::Neither,
        }
    }

    /// Union of both sharing modes.
    #[must_use]
    pub const fn merge(self, other: Sharing) -> Self {
        Sharing::from_flags(
            self.is_publish() || other.is_publish(),
            self.is_subscribe() || other.is_subscribe(),
        )
    }
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sharing::Publish => "publish",
            Sharing::Subscribe => "subscribe",
            Sharing::PublishSubscribe => "publish_subscribe",
            Sharing::Neither => "neither",
        };
        f.write_str(s)
    }
}
