//! Population-wide summaries of the strategy tensors.
//!
//! Counts are summed over agents; chances are counts divided by their row
//! total; a convention is the set of outputs with maximal count (or chance)
//! for a given input, ties included. An empty population has all-zero counts
//! and chances, so every output ties for its convention.

use alarmcall_types::{SignalId, StateId};
use ndarray::Array2;

use crate::onehot;
use crate::population::PopulationState;

fn same_count(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.5
}

fn same_chance(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON
}

impl PopulationState {
    /// `(P, S)` number of agents calling each signal for each predator.
    pub fn word_count(&self) -> Array2<u64> {
        onehot::counts(self.words().view())
    }

    /// `(S, A)` number of agents reacting to each signal with each state.
    pub fn action_count(&self) -> Array2<u64> {
        onehot::counts(self.actions().view())
    }

    /// `(P, S)` fraction of agents calling each signal for each predator.
    pub fn word_chances(&self) -> Array2<f64> {
        onehot::row_normalized(&self.word_count())
    }

    /// `(S, A)` fraction of agents reacting to each signal with each state.
    pub fn action_chances(&self) -> Array2<f64> {
        onehot::row_normalized(&self.action_count())
    }

    /// For each predator, the most used signals.
    #[allow(clippy::cast_precision_loss)]
    pub fn word_convention(&self) -> Vec<Vec<SignalId>> {
        let counts = self.word_count().mapv(|c| c as f64);
        onehot::argmax_ties(&counts, same_count)
            .into_iter()
            .map(|row| row.into_iter().map(SignalId).collect())
            .collect()
    }

    /// For each signal, the most common reactions.
    #[allow(clippy::cast_precision_loss)]
    pub fn action_convention(&self) -> Vec<Vec<StateId>> {
        let counts = self.action_count().mapv(|c| c as f64);
        onehot::argmax_ties(&counts, same_count)
            .into_iter()
            .map(|row| row.into_iter().map(StateId).collect())
            .collect()
    }

    /// `(P, A)` chance that a random emitter's call for a predator makes a
    /// random listener adopt each state.
    pub fn strategy_chances(&self) -> Array2<f64> {
        self.word_chances().dot(&self.action_chances())
    }

    /// For each predator, the states most likely to be adopted when it shows
    /// up.
    pub fn strategy_convention(&self) -> Vec<Vec<StateId>> {
        onehot::argmax_ties(&self.strategy_chances(), same_chance)
            .into_iter()
            .map(|row| row.into_iter().map(StateId).collect())
            .collect()
    }
}
