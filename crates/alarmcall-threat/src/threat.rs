//! The threat model: who attacks, and who survives.
//!
//! A [`ThreatModel`] holds a `P×A` survival matrix (entry `(p, a)` is the
//! probability that an agent in state `a` survives predator `p`) and a spawn
//! distribution over predators. It never sees the population; the engine hands
//! it a batch of one-hot states and gets survivor indices back.
//!
//! # Spawning
//!
//! One uniform draw in `[0, 1)` is walked along the cumulative spawn weights,
//! the same weighted-table selection used for any categorical roll. When the
//! distribution is omitted at construction the uniform distribution `1/P` is
//! used.
//!
//! # Hunting
//!
//! Survival probabilities for the whole batch are a single matrix-vector
//! product `states · matrix[p]`. Each agent then gets one independent uniform
//! draw and survives iff the draw is strictly below its probability, so a
//! probability of `1.0` always survives and `0.0` never does.

use alarmcall_types::{PredatorId, StateId};
use ndarray::{Array1, Array2, ArrayView1, Zip};
use rand::Rng;
use tracing::debug;

use crate::error::ThreatError;
use crate::profile::PredatorProfile;

/// Maximum distance from 1.0 tolerated for the sum of a spawn distribution.
pub const SPAWN_SUM_TOLERANCE: f64 = 0.001;

/// Predator survival probabilities plus the distribution of predator spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatModel {
    /// `P×A` survival probabilities.
    survival: Array2<f64>,
    /// Length-`P` spawn probabilities.
    spawn: Array1<f64>,
}

impl ThreatModel {
    /// Create a threat model from a survival matrix and an optional spawn
    /// distribution (uniform when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::InvalidMatrix`] if the matrix is empty or has an
    /// entry outside `[0, 1]`, and [`ThreatError::InvalidSpawnDistribution`]
    /// if the distribution has the wrong length, a negative weight, or does
    /// not sum to 1 within [`SPAWN_SUM_TOLERANCE`].
    pub fn new(
        matrix: Array2<f64>,
        spawn_distribution: Option<Array1<f64>>,
    ) -> Result<Self, ThreatError> {
        validate_matrix(&matrix)?;
        let predators = matrix.nrows();
        let spawn = match spawn_distribution {
            Some(distribution) => {
                validate_spawn(&distribution, predators)?;
                distribution
            }
            None => uniform(predators),
        };
        debug!(
            predators,
            states = matrix.ncols(),
            spawn = ?spawn.as_slice(),
            "threat model built"
        );
        Ok(Self {
            survival: matrix,
            spawn,
        })
    }

    /// Create a threat model from nested rows, one per predator.
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::InvalidMatrix`] for ragged rows, plus every
    /// error [`ThreatModel::new`] can return.
    pub fn from_rows(
        rows: &[Vec<f64>],
        spawn_distribution: Option<&[f64]>,
    ) -> Result<Self, ThreatError> {
        let states = rows.first().map_or(0, Vec::len);
        if let Some((predator, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != states)
        {
            return Err(ThreatError::InvalidMatrix {
                reason: format!(
                    "row {predator} has {} entries, expected {states}",
                    row.len()
                ),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let matrix = Array2::from_shape_vec((rows.len(), states), flat).map_err(|e| {
            ThreatError::InvalidMatrix {
                reason: e.to_string(),
            }
        })?;
        let spawn = spawn_distribution.map(|weights| Array1::from_vec(weights.to_vec()));
        Self::new(matrix, spawn)
    }

    /// Create a threat model from per-predator survival maps.
    ///
    /// Every profile must give a probability for every state in
    /// `0..state_count` and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::UnknownState`] for a missing or out-of-range
    /// state, plus every error [`ThreatModel::new`] can return.
    pub fn from_profiles(
        profiles: &[PredatorProfile],
        state_count: usize,
        spawn_distribution: Option<Array1<f64>>,
    ) -> Result<Self, ThreatError> {
        let mut matrix = Array2::zeros((profiles.len(), state_count));
        for (mut row, profile) in matrix.rows_mut().into_iter().zip(profiles) {
            if let Some(&state) = profile.menu.keys().find(|s| s.index() >= state_count) {
                return Err(ThreatError::UnknownState {
                    state,
                    count: state_count,
                });
            }
            for (a, cell) in row.iter_mut().enumerate() {
                let state = StateId(a);
                *cell = profile
                    .menu
                    .get(&state)
                    .copied()
                    .ok_or(ThreatError::UnknownState {
                        state,
                        count: state_count,
                    })?;
            }
        }
        Self::new(matrix, spawn_distribution)
    }

    /// Convert back to one survival map per predator.
    pub fn to_profiles(&self) -> Vec<PredatorProfile> {
        self.survival
            .rows()
            .into_iter()
            .map(|row| PredatorProfile {
                name: None,
                menu: row
                    .iter()
                    .enumerate()
                    .map(|(a, &p)| (StateId(a), p))
                    .collect(),
            })
            .collect()
    }

    /// Number of predators (`P`).
    pub fn predator_count(&self) -> usize {
        self.survival.nrows()
    }

    /// Number of behavioral states (`A`).
    pub fn state_count(&self) -> usize {
        self.survival.ncols()
    }

    /// The `P×A` survival matrix.
    pub const fn matrix(&self) -> &Array2<f64> {
        &self.survival
    }

    /// The spawn distribution.
    pub const fn spawn_distribution(&self) -> &Array1<f64> {
        &self.spawn
    }

    /// Probability that an agent in `state` survives `predator`.
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::UnknownPredator`] or [`ThreatError::UnknownState`]
    /// for out-of-range indices.
    pub fn survival(&self, predator: PredatorId, state: StateId) -> Result<f64, ThreatError> {
        let row = self.predator_row(predator)?;
        row.get(state.index())
            .copied()
            .ok_or(ThreatError::UnknownState {
                state,
                count: self.state_count(),
            })
    }

    /// The states with maximal survival probability against `predator`,
    /// ties included, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::UnknownPredator`] for an out-of-range predator.
    pub fn best_states(&self, predator: PredatorId) -> Result<Vec<StateId>, ThreatError> {
        let row = self.predator_row(predator)?;
        let best = row.fold(f64::NEG_INFINITY, |acc, &p| acc.max(p));
        Ok(row
            .iter()
            .enumerate()
            .filter(|&(_, &p)| (p - best).abs() <= f64::EPSILON)
            .map(|(a, _)| StateId(a))
            .collect())
    }

    /// Draw the predator for this turn from the spawn distribution.
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> PredatorId {
        let roll: f64 = rng.random();
        let mut cumulative = 0.0;
        for (p, &weight) in self.spawn.iter().enumerate() {
            cumulative += weight;
            if roll < cumulative {
                return PredatorId(p);
            }
        }
        // Rounding can leave the cumulative sum just under 1.0.
        self.spawn
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &weight)| weight > 0.0)
            .map_or(PredatorId(0), |(p, _)| PredatorId(p))
    }

    /// Survival probability of every agent in the batch against `predator`.
    ///
    /// `states` is `(N, A)` with one one-hot row per agent.
    ///
    /// # Errors
    ///
    /// Returns [`ThreatError::UnknownPredator`] for an out-of-range predator
    /// and [`ThreatError::StateWidthMismatch`] if the batch is not `A` wide.
    pub fn survival_probabilities(
        &self,
        predator: PredatorId,
        states: &Array2<u8>,
    ) -> Result<Array1<f64>, ThreatError> {
        let row = self.predator_row(predator)?;
        if states.ncols() != row.len() {
            return Err(ThreatError::StateWidthMismatch {
                expected: row.len(),
                found: states.ncols(),
            });
        }
        Ok(states.mapv(f64::from).dot(&row))
    }

    /// Resolve a hunt: return the indices (ascending) of the agents that
    /// survive `predator`.
    ///
    /// # Errors
    ///
    /// See [`ThreatModel::survival_probabilities`].
    pub fn hunt<R: Rng + ?Sized>(
        &self,
        predator: PredatorId,
        states: &Array2<u8>,
        rng: &mut R,
    ) -> Result<Vec<usize>, ThreatError> {
        let probabilities = self.survival_probabilities(predator, states)?;
        let draws = Array1::from_shape_fn(probabilities.len(), |_| rng.random::<f64>());
        let mut survived = Array1::from_elem(probabilities.len(), false);
        Zip::from(&mut survived)
            .and(&draws)
            .and(&probabilities)
            .for_each(|alive, &draw, &p| *alive = draw < p);
        Ok(survived
            .iter()
            .enumerate()
            .filter_map(|(agent, &alive)| alive.then_some(agent))
            .collect())
    }

    /// The survival row for one predator.
    fn predator_row(&self, predator: PredatorId) -> Result<ArrayView1<'_, f64>, ThreatError> {
        if predator.index() >= self.predator_count() {
            return Err(ThreatError::UnknownPredator {
                predator,
                count: self.predator_count(),
            });
        }
        Ok(self.survival.row(predator.index()))
    }
}

/// Normalize arbitrary non-negative weights into a spawn distribution.
///
/// # Errors
///
/// Returns [`ThreatError::InvalidSpawnDistribution`] if a weight is negative
/// or not finite, or if all weights are zero.
pub fn normalized(weights: &[f64]) -> Result<Array1<f64>, ThreatError> {
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ThreatError::InvalidSpawnDistribution {
            reason: format!("weight {bad} is not a non-negative number"),
        });
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(ThreatError::InvalidSpawnDistribution {
            reason: "weights sum to zero".to_owned(),
        });
    }
    Ok(weights.iter().map(|w| w / total).collect())
}

fn validate_matrix(matrix: &Array2<f64>) -> Result<(), ThreatError> {
    if matrix.nrows() == 0 || matrix.ncols() == 0 {
        return Err(ThreatError::InvalidMatrix {
            reason: format!(
                "matrix must have at least one predator and one state, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            ),
        });
    }
    if let Some(((p, a), value)) = matrix
        .indexed_iter()
        .find(|(_, value)| !(0.0..=1.0).contains(*value))
    {
        return Err(ThreatError::InvalidMatrix {
            reason: format!("entry ({p}, {a}) = {value} is not a probability"),
        });
    }
    Ok(())
}

fn validate_spawn(distribution: &Array1<f64>, predators: usize) -> Result<(), ThreatError> {
    if distribution.len() != predators {
        return Err(ThreatError::InvalidSpawnDistribution {
            reason: format!(
                "{} weights given for {predators} predators",
                distribution.len()
            ),
        });
    }
    if let Some(bad) = distribution.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ThreatError::InvalidSpawnDistribution {
            reason: format!("weight {bad} is not a non-negative number"),
        });
    }
    let total = distribution.sum();
    if (total - 1.0).abs() > SPAWN_SUM_TOLERANCE {
        return Err(ThreatError::InvalidSpawnDistribution {
            reason: format!("weights sum to {total}, expected 1"),
        });
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn uniform(predators: usize) -> Array1<f64> {
    Array1::from_elem(predators, 1.0 / predators as f64)
}
