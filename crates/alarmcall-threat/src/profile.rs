//! Scalar per-predator survival maps.
//!
//! A [`PredatorProfile`] is the readable form of one row of the survival
//! matrix: a map from state to survival probability. It is what the YAML
//! config holds under `threat.predators`, and it doubles as a scalar
//! reference for checking the batched hunt one agent at a time.

use std::collections::BTreeMap;

use alarmcall_types::StateId;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ThreatError;

/// One predator's survival probability for each behavioral state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredatorProfile {
    /// Optional display name ("eagle", "leopard").
    #[serde(default)]
    pub name: Option<String>,
    /// Survival probability keyed by state.
    #[serde(rename = "survival")]
    pub menu: BTreeMap<StateId, f64>,
}

impl PredatorProfile {
    /// Build a profile from probabilities listed in state order.
    pub fn from_probabilities(name: Option<String>, probabilities: &[f64]) -> Self {
        Self {
            name,
            menu: probabilities
                .iter()
                .enumerate()
                .map(|(a, &p)| (StateId(a), p))
                .collect(),
        }
    }

    /// Roll whether a single agent in `state` survives this predator.
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::UnknownState`] if the profile has no entry for
    /// `state`.
    pub fn survived<R: Rng + ?Sized>(&self, state: StateId, rng: &mut R) -> Result<bool, ThreatError> {
        let p = self
            .menu
            .get(&state)
            .copied()
            .ok_or(ThreatError::UnknownState {
                state,
                count: self.menu.len(),
            })?;
        Ok(rng.random::<f64>() < p)
    }

    /// States with the highest survival probability, ties included.
    pub fn best_states(&self) -> Vec<StateId> {
        let best = self.menu.values().fold(f64::NEG_INFINITY, |acc, &p| acc.max(p));
        self.menu
            .iter()
            .filter(|&(_, &p)| (p - best).abs() <= f64::EPSILON)
            .map(|(&state, _)| state)
            .collect()
    }

    /// Label used in logs: the name when set, otherwise the given index.
    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("predator-{index}"))
    }
}
