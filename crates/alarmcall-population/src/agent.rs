//! Scalar agents and the conversion boundary to and from the tensors.
//!
//! An [`Agent`] holds its two maps explicitly. It is far too slow to simulate
//! with, but it is easy to reason about, which makes it the reference the
//! batched witness is checked against and the shape external tooling works
//! with.

use std::collections::BTreeMap;

use alarmcall_types::{PredatorId, SignalId, StateId};
use ndarray::{Array3, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PopulationError;
use crate::onehot;
use crate::population::{PopulationState, check_dimensions};

/// One agent's strategy as explicit maps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Agent {
    /// Signal called on seeing each predator.
    pub wordmap: BTreeMap<PredatorId, SignalId>,
    /// State adopted on hearing each signal.
    pub actionmap: BTreeMap<SignalId, StateId>,
}

impl Agent {
    /// An agent whose every mapping is drawn uniformly from the given lists.
    /// An empty `signals` or `states` list leaves the corresponding map empty.
    pub fn random<R: Rng + ?Sized>(
        predators: &[PredatorId],
        signals: &[SignalId],
        states: &[StateId],
        rng: &mut R,
    ) -> Self {
        let mut pick = |len: usize| rng.random_range(0..len);
        let mut wordmap = BTreeMap::new();
        if !signals.is_empty() {
            for &predator in predators {
                if let Some(&signal) = signals.get(pick(signals.len())) {
                    wordmap.insert(predator, signal);
                }
            }
        }
        let mut actionmap = BTreeMap::new();
        if !states.is_empty() {
            for &signal in signals {
                if let Some(&state) = states.get(pick(states.len())) {
                    actionmap.insert(signal, state);
                }
            }
        }
        Self { wordmap, actionmap }
    }

    /// The call this agent gives when it sees `predator`.
    pub fn emit(&self, predator: PredatorId) -> Option<SignalId> {
        self.wordmap.get(&predator).copied()
    }

    /// The state this agent adopts when it hears `signal`.
    pub fn receive(&self, signal: SignalId) -> Option<StateId> {
        self.actionmap.get(&signal).copied()
    }
}

impl PopulationState {
    /// One-hot encode scalar agents.
    ///
    /// The id lists fix the tensor axes: predator `predators[i]` is row `i` of
    /// the word tensor, and so on.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::InvalidDimensions`] for an empty id list and
    /// [`PopulationError::UnmappedIndex`] if an agent leaves a predator or
    /// signal unmapped or maps to an id that is not listed.
    pub fn from_agents(
        agents: &[Agent],
        predators: &[PredatorId],
        signals: &[SignalId],
        states: &[StateId],
    ) -> Result<Self, PopulationError> {
        check_dimensions(predators.len(), signals.len(), states.len())?;
        let mut words = Array3::zeros((agents.len(), predators.len(), signals.len()));
        let mut actions = Array3::zeros((agents.len(), signals.len(), states.len()));
        for (n, agent) in agents.iter().enumerate() {
            for (row, &predator) in predators.iter().enumerate() {
                let signal = agent.emit(predator).ok_or_else(|| PopulationError::UnmappedIndex {
                    agent: n,
                    reason: format!("no signal for predator {predator}"),
                })?;
                let column = position(signals, signal).ok_or_else(|| {
                    PopulationError::UnmappedIndex {
                        agent: n,
                        reason: format!("signal {signal} is not a known signal"),
                    }
                })?;
                set_hot(&mut words, n, row, column);
            }
            for (row, &signal) in signals.iter().enumerate() {
                let state = agent.receive(signal).ok_or_else(|| PopulationError::UnmappedIndex {
                    agent: n,
                    reason: format!("no state for signal {signal}"),
                })?;
                let column = position(states, state).ok_or_else(|| {
                    PopulationError::UnmappedIndex {
                        agent: n,
                        reason: format!("state {state} is not a known state"),
                    }
                })?;
                set_hot(&mut actions, n, row, column);
            }
        }
        Self::from_tensors(words, actions)
    }

    /// Decode every agent back into explicit maps keyed by the given ids.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::ShapeMismatch`] if an id list length differs
    /// from the matching tensor axis, and
    /// [`PopulationError::InvariantViolation`] for a row with no hot entry.
    pub fn to_agents(
        &self,
        predators: &[PredatorId],
        signals: &[SignalId],
        states: &[StateId],
    ) -> Result<Vec<Agent>, PopulationError> {
        let given = (predators.len(), signals.len(), states.len());
        let ours = (self.predator_count(), self.signal_count(), self.state_count());
        if given != ours {
            return Err(PopulationError::ShapeMismatch {
                reason: format!("id lists have (P, S, A) = {given:?}, population {ours:?}"),
            });
        }
        (0..self.len())
            .map(|n| {
                let wordmap = decode_rows(self.words(), "word", n, predators, signals)?;
                let actionmap = decode_rows(self.actions(), "action", n, signals, states)?;
                Ok(Agent { wordmap, actionmap })
            })
            .collect()
    }
}

fn position<T: PartialEq>(ids: &[T], id: T) -> Option<usize> {
    ids.iter().position(|candidate| *candidate == id)
}

fn set_hot(tensor: &mut Array3<u8>, agent: usize, row: usize, column: usize) {
    if let Some(cell) = tensor.get_mut((agent, row, column)) {
        *cell = 1;
    }
}

fn decode_rows<K: Ord + Copy, V: Copy>(
    tensor: &Array3<u8>,
    name: &'static str,
    agent: usize,
    keys: &[K],
    values: &[V],
) -> Result<BTreeMap<K, V>, PopulationError> {
    keys.iter()
        .enumerate()
        .map(|(row, &key)| {
            onehot::hot_index(
                tensor
                    .index_axis(Axis(0), agent)
                    .index_axis_move(Axis(0), row),
            )
                .and_then(|column| values.get(column).copied())
                .map(|value| (key, value))
                .ok_or_else(|| PopulationError::InvariantViolation {
                    tensor: name,
                    agent,
                    row,
                    reason: "row holds no hot entry".to_owned(),
                })
        })
        .collect()
}
