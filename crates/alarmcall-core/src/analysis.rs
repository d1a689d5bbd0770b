//! How well the current conventions protect the population.
//!
//! Everything here is read-only over a [`PopulationState`] and a
//! [`ThreatModel`]. The engine only uses [`optimal_responses`] (for the turn
//! record); the rest feeds reports.

use alarmcall_population::{PopulationError, PopulationState};
use alarmcall_threat::{ThreatError, ThreatModel};
use alarmcall_types::{PredatorId, SignalId, StateId};
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

/// Errors raised while analyzing a population against a threat model.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A threat model lookup failed.
    #[error("threat error: {source}")]
    Threat {
        /// The underlying threat error.
        #[from]
        source: ThreatError,
    },

    /// The population does not match the threat model.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: PopulationError,
    },
}

fn check_shape(population: &PopulationState, threat: &ThreatModel) -> Result<(), PopulationError> {
    let ours = (population.predator_count(), population.state_count());
    let theirs = (threat.predator_count(), threat.state_count());
    if ours != theirs {
        return Err(PopulationError::ShapeMismatch {
            reason: format!("population has (P, A) = {ours:?}, threat model {theirs:?}"),
        });
    }
    Ok(())
}

/// Chance that a random agent survives each predator, given the current
/// strategy mix: `sum_a strategy[p, a] * threat[p, a]`.
///
/// # Errors
///
/// Returns [`AnalysisError::Population`] if the population and threat model
/// disagree on predators or states.
pub fn survival_chances(
    population: &PopulationState,
    threat: &ThreatModel,
) -> Result<Array1<f64>, AnalysisError> {
    check_shape(population, threat)?;
    let weighted = population.strategy_chances() * threat.matrix();
    Ok(weighted.sum_axis(Axis(1)))
}

/// [`survival_chances`] weighted by how often each predator spawns.
///
/// # Errors
///
/// See [`survival_chances`].
pub fn overall_survival_chance(
    population: &PopulationState,
    threat: &ThreatModel,
) -> Result<f64, AnalysisError> {
    Ok(survival_chances(population, threat)?.dot(threat.spawn_distribution()))
}

/// For each predator, whether every state the population conventionally
/// adopts against it is one of its best states.
///
/// # Errors
///
/// See [`survival_chances`].
pub fn optimal_against(
    population: &PopulationState,
    threat: &ThreatModel,
) -> Result<Vec<bool>, AnalysisError> {
    check_shape(population, threat)?;
    population
        .strategy_convention()
        .into_iter()
        .enumerate()
        .map(|(p, convention)| {
            let best = threat.best_states(PredatorId(p))?;
            Ok(convention.iter().all(|state| best.contains(state)))
        })
        .collect()
}

/// Number of agents whose reaction was one of the best states against
/// `predator`. `state_counts` holds the number of agents in each state.
///
/// # Errors
///
/// Returns [`ThreatError::UnknownPredator`] for an unknown predator.
pub fn optimal_responses(
    state_counts: &[u64],
    threat: &ThreatModel,
    predator: PredatorId,
) -> Result<u64, ThreatError> {
    let best = threat.best_states(predator)?;
    Ok(best
        .iter()
        .filter_map(|state| state_counts.get(state.index()))
        .fold(0_u64, |acc, &count| acc.saturating_add(count)))
}

/// Population-wide summary for display tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConventionReport {
    /// Population size.
    pub population: usize,
    /// `[p][s]` agents calling `s` for predator `p`.
    pub word_count: Vec<Vec<u64>>,
    /// `[s][a]` agents reacting to `s` with state `a`.
    pub action_count: Vec<Vec<u64>>,
    /// `[p][s]` fraction of agents calling `s` for predator `p`.
    pub word_chances: Vec<Vec<f64>>,
    /// `[s][a]` fraction of agents reacting to `s` with state `a`.
    pub action_chances: Vec<Vec<f64>>,
    /// `[p][a]` chance a call about `p` makes a listener adopt `a`.
    pub strategy_chances: Vec<Vec<f64>>,
    /// Most used signals per predator.
    pub word_convention: Vec<Vec<SignalId>>,
    /// Most common reactions per signal.
    pub action_convention: Vec<Vec<StateId>>,
    /// Most likely states per predator.
    pub strategy_convention: Vec<Vec<StateId>>,
    /// Survival chance per predator.
    pub survival_chances: Vec<f64>,
    /// Survival chance against a randomly spawned predator.
    pub overall_survival_chance: f64,
    /// Whether the convention is optimal against each predator.
    pub optimal_against: Vec<bool>,
}

impl ConventionReport {
    /// Summarize `population` against `threat`.
    ///
    /// # Errors
    ///
    /// See [`survival_chances`].
    pub fn new(population: &PopulationState, threat: &ThreatModel) -> Result<Self, AnalysisError> {
        let survival = survival_chances(population, threat)?;
        Ok(Self {
            population: population.len(),
            word_count: rows(&population.word_count()),
            action_count: rows(&population.action_count()),
            word_chances: rows(&population.word_chances()),
            action_chances: rows(&population.action_chances()),
            strategy_chances: rows(&population.strategy_chances()),
            word_convention: population.word_convention(),
            action_convention: population.action_convention(),
            strategy_convention: population.strategy_convention(),
            overall_survival_chance: survival.dot(threat.spawn_distribution()),
            survival_chances: survival.to_vec(),
            optimal_against: optimal_against(population, threat)?,
        })
    }

    /// Whether the convention is optimal against every predator.
    pub fn is_optimal(&self) -> bool {
        self.optimal_against.iter().all(|&optimal| optimal)
    }
}

fn rows<T: Clone>(matrix: &Array2<T>) -> Vec<Vec<T>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ndarray::{Array3, arr1, arr2};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn threat() -> ThreatModel {
        ThreatModel::new(
            arr2(&[[0.7, 0.99, 0.6], [0.6, 0.7, 0.99]]),
            Some(arr1(&[0.5, 0.5])),
        )
        .unwrap()
    }

    /// Every agent calls signal p for predator p, and reacts to signal s with
    /// `reaction[s]`.
    fn uniform_population(agents: usize, reaction: [usize; 2]) -> PopulationState {
        let mut words = Array3::zeros((agents, 2, 2));
        let mut actions = Array3::zeros((agents, 2, 3));
        for n in 0..agents {
            for p in 0..2 {
                words[[n, p, p]] = 1;
                actions[[n, p, reaction[p]]] = 1;
            }
        }
        PopulationState::from_tensors(words, actions).unwrap()
    }

    #[test]
    fn optimal_convention_is_recognized() {
        let population = uniform_population(10, [1, 2]);
        let threat = threat();
        assert_eq!(optimal_against(&population, &threat).unwrap(), vec![true, true]);
        let chances = survival_chances(&population, &threat).unwrap();
        assert!((chances[0] - 0.99).abs() < 1e-12);
        assert!((chances[1] - 0.99).abs() < 1e-12);
        let overall = overall_survival_chance(&population, &threat).unwrap();
        assert!((overall - 0.99).abs() < 1e-12);
    }

    #[test]
    fn swapped_convention_is_not_optimal() {
        let population = uniform_population(10, [2, 1]);
        let report = ConventionReport::new(&population, &threat()).unwrap();
        assert_eq!(report.optimal_against, vec![false, false]);
        assert!(!report.is_optimal());
        assert!((report.overall_survival_chance - 0.65).abs() < 1e-12);
        assert_eq!(report.word_convention, vec![vec![SignalId(0)], vec![SignalId(1)]]);
    }

    #[test]
    fn optimal_responses_sum_best_states() {
        let threat = threat();
        assert_eq!(optimal_responses(&[5, 7, 11], &threat, PredatorId(0)).unwrap(), 7);
        assert_eq!(optimal_responses(&[5, 7, 11], &threat, PredatorId(1)).unwrap(), 11);
        assert!(optimal_responses(&[5, 7, 11], &threat, PredatorId(4)).is_err());
    }

    #[test]
    fn mismatched_population_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = PopulationState::random(5, 3, 2, 3, &mut rng).unwrap();
        assert!(matches!(
            survival_chances(&population, &threat()),
            Err(AnalysisError::Population { .. })
        ));
    }

    #[test]
    fn report_serializes() {
        let population = uniform_population(4, [1, 2]);
        let report = ConventionReport::new(&population, &threat()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["population"], 4);
        assert_eq!(json["optimal_against"][1], true);
    }
}
