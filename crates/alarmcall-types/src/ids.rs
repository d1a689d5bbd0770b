//! Strongly-typed identifiers for the simulation.
//!
//! Predators, signals, and states are plain integer positions into fixed-size
//! ordered lists. Wrapping them in newtypes keeps a predator index from being
//! passed where a signal index is expected, while the raw `usize` stays one
//! call away for tensor addressing.
//!
//! Game runs are identified by a UUID v7 ([`RunId`]) so archived turn records
//! from different runs can be told apart by the reporting side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a `usize` position with standard derives.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// Create an identifier from a raw position.
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Return the raw position used to address tensors.
            pub const fn index(self) -> usize {
                self.0
            }

            /// Return identifiers `0..count` in order.
            pub fn range(count: usize) -> Vec<Self> {
                (0..count).map(Self).collect()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_index! {
    /// Position of a predator (threat type) in the threat matrix.
    PredatorId
}

define_index! {
    /// Position of a signal (alarm call) an agent can emit.
    SignalId
}

define_index! {
    /// Position of a behavioral state (hide, flee, climb, ...) an agent can adopt.
    StateId
}

/// Unique identifier for a single game run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
