//! Error types for the `alarmcall-population` crate.

/// Errors that can occur when building, checking, or evolving a population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// A predator, signal, or state dimension is zero.
    #[error("invalid dimensions: {reason}")]
    InvalidDimensions {
        /// Which dimension is wrong and why.
        reason: String,
    },

    /// A dynamically shaped tensor is not three-dimensional.
    #[error("{tensor} tensor has rank {rank}, expected 3")]
    InvalidRank {
        /// `"word"` or `"action"`.
        tensor: &'static str,
        /// Rank that was supplied.
        rank: usize,
    },

    /// A row of a strategy tensor is not one-hot.
    #[error("{tensor} tensor, agent {agent}, row {row}: {reason}")]
    InvariantViolation {
        /// `"word"` or `"action"`.
        tensor: &'static str,
        /// Agent (first axis) holding the bad row.
        agent: usize,
        /// Predator (word tensor) or signal (action tensor) of the bad row.
        row: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// Two tensors, or two populations, disagree on their shared dimensions.
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// Which shapes disagree.
        reason: String,
    },

    /// An operation needs at least one agent.
    #[error("population is empty")]
    EmptyPopulation,

    /// An agent, predator, or signal index is past the end of its axis.
    #[error("{what} index {index} out of range (length {len})")]
    IndexOutOfRange {
        /// Which axis the index addresses.
        what: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the axis.
        len: usize,
    },

    /// A reproduction or mutation rate is outside its allowed range.
    #[error("invalid {name} rate {value}: {reason}")]
    InvalidRate {
        /// `"reproduction"` or `"mutation"`.
        name: &'static str,
        /// Rate that was supplied.
        value: f64,
        /// Allowed range.
        reason: &'static str,
    },

    /// A scalar agent maps to an identifier missing from the ordered id list,
    /// or leaves a predator or signal unmapped.
    #[error("agent {agent} cannot be encoded: {reason}")]
    UnmappedIndex {
        /// Position of the agent in the input list.
        agent: usize,
        /// Which mapping is missing or unknown.
        reason: String,
    },
}
