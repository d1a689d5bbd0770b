//! Error types for the `alarmcall-threat` crate.
//!
//! Malformed matrices and spawn distributions are configuration errors raised
//! at construction. An out-of-range predator index at hunt time is a
//! programming error; it is still returned as a value so the engine can abort
//! the run cleanly.

use alarmcall_types::{PredatorId, StateId};

/// Errors that can occur when building or querying a threat model.
#[derive(Debug, thiserror::Error)]
pub enum ThreatError {
    /// The survival matrix is empty, ragged, or has entries outside `[0, 1]`.
    #[error("invalid threat matrix: {reason}")]
    InvalidMatrix {
        /// Explanation of what is wrong with the matrix.
        reason: String,
    },

    /// The spawn distribution has the wrong length, negative weights, or
    /// does not sum to 1.
    #[error("invalid spawn distribution: {reason}")]
    InvalidSpawnDistribution {
        /// Explanation of what is wrong with the distribution.
        reason: String,
    },

    /// A predator index outside `[0, P)` was used.
    #[error("unknown predator {predator} (model has {count} predators)")]
    UnknownPredator {
        /// The offending predator.
        predator: PredatorId,
        /// Number of predators in the model.
        count: usize,
    },

    /// A state outside `[0, A)` was referenced, or a survival map is missing
    /// one.
    #[error("unknown or missing state {state} (model has {count} states)")]
    UnknownState {
        /// The offending state.
        state: StateId,
        /// Number of states in the model.
        count: usize,
    },

    /// The state batch passed to a hunt does not have one column per state.
    #[error("state batch has {found} columns, expected {expected}")]
    StateWidthMismatch {
        /// Number of states in the model.
        expected: usize,
        /// Number of columns in the batch.
        found: usize,
    },
}
