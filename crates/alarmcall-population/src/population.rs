//! The population as a pair of batched one-hot strategy tensors.
//!
//! Every agent carries two maps: predator → signal (which call it gives when
//! it sees a predator) and signal → state (what it does when it hears a call).
//! Instead of one object per agent, the whole population is stored as
//!
//! - a word tensor `(N, P, S)`: `words[n, p, s] == 1` iff agent `n` calls `s`
//!   on seeing predator `p`;
//! - an action tensor `(N, S, A)`: `actions[n, s, a] == 1` iff agent `n`
//!   reacts to signal `s` with state `a`.
//!
//! so each phase of a turn is a handful of whole-array operations. Every row
//! along the last axis of both tensors is one-hot at every observable
//! boundary; [`PopulationState::validate`] checks it.

use alarmcall_types::{PredatorId, ReproductionStats, SignalId, TruncationPolicy};
use ndarray::{Array2, Array3, ArrayD, Axis, Ix3, concatenate};
use rand::Rng;
use tracing::debug;

use crate::error::PopulationError;
use crate::onehot;

/// The outcome of the witness phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    /// Row of the agent that saw the predator and called.
    pub emitter: usize,
    /// Signal the emitter used.
    pub signal: SignalId,
    /// `(N, A)` one-hot reaction of every agent to that signal.
    pub states: Array2<u8>,
}

/// Batched strategies of every living agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationState {
    words: Array3<u8>,
    actions: Array3<u8>,
}

impl PopulationState {
    /// Create `agents` agents with independent uniformly random strategies.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::InvalidDimensions`] if `predators`,
    /// `signals`, or `states` is zero. `agents` may be zero.
    pub fn random<R: Rng + ?Sized>(
        agents: usize,
        predators: usize,
        signals: usize,
        states: usize,
        rng: &mut R,
    ) -> Result<Self, PopulationError> {
        check_dimensions(predators, signals, states)?;
        Ok(Self {
            words: onehot::random(agents, predators, signals, rng),
            actions: onehot::random(agents, signals, states, rng),
        })
    }

    /// Create a population from explicit tensors.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::ShapeMismatch`] if the tensors disagree on
    /// the agent count or the signal dimension, and
    /// [`PopulationError::InvariantViolation`] if a row is not one-hot.
    pub fn from_tensors(words: Array3<u8>, actions: Array3<u8>) -> Result<Self, PopulationError> {
        let (n_words, _, signals) = words.dim();
        let (n_actions, action_signals, _) = actions.dim();
        if n_words != n_actions {
            return Err(PopulationError::ShapeMismatch {
                reason: format!("word tensor has {n_words} agents, action tensor {n_actions}"),
            });
        }
        if signals != action_signals {
            return Err(PopulationError::ShapeMismatch {
                reason: format!(
                    "word tensor has {signals} signals, action tensor {action_signals}"
                ),
            });
        }
        let population = Self { words, actions };
        population.validate()?;
        Ok(population)
    }

    /// Create a population from dynamically shaped tensors.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::InvalidRank`] if either tensor is not
    /// three-dimensional, plus every error of [`PopulationState::from_tensors`].
    pub fn from_dyn_tensors(words: ArrayD<u8>, actions: ArrayD<u8>) -> Result<Self, PopulationError> {
        let words = into_rank3(words, "word")?;
        let actions = into_rank3(actions, "action")?;
        Self::from_tensors(words, actions)
    }

    /// Check that every row of both tensors is one-hot.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::InvariantViolation`] naming the first bad
    /// tensor, agent, and row.
    pub fn validate(&self) -> Result<(), PopulationError> {
        onehot::validate(self.words.view(), "word")?;
        onehot::validate(self.actions.view(), "action")
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.words.len_of(Axis(0))
    }

    /// Whether there are no agents left.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of predators (`P`).
    pub fn predator_count(&self) -> usize {
        self.words.len_of(Axis(1))
    }

    /// Number of signals (`S`).
    pub fn signal_count(&self) -> usize {
        self.words.len_of(Axis(2))
    }

    /// Number of states (`A`).
    pub fn state_count(&self) -> usize {
        self.actions.len_of(Axis(2))
    }

    /// The `(N, P, S)` word tensor.
    pub const fn words(&self) -> &Array3<u8> {
        &self.words
    }

    /// The `(N, S, A)` action tensor.
    pub const fn actions(&self) -> &Array3<u8> {
        &self.actions
    }

    /// Pick an emitter uniformly at random and broadcast its call for
    /// `predator` to everyone.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::EmptyPopulation`] when there is no one to
    /// call, plus every error of [`PopulationState::witness_from`].
    pub fn witness<R: Rng + ?Sized>(
        &self,
        predator: PredatorId,
        rng: &mut R,
    ) -> Result<Witness, PopulationError> {
        if self.is_empty() {
            return Err(PopulationError::EmptyPopulation);
        }
        let emitter = rng.random_range(0..self.len());
        self.witness_from(emitter, predator)
    }

    /// Broadcast the call `emitter` gives for `predator`: every agent,
    /// the emitter included, reacts through its own action row for that
    /// signal.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::IndexOutOfRange`] for an unknown emitter or
    /// predator, and [`PopulationError::InvariantViolation`] if the emitter's
    /// word row holds no signal.
    pub fn witness_from(&self, emitter: usize, predator: PredatorId) -> Result<Witness, PopulationError> {
        if emitter >= self.len() {
            return Err(PopulationError::IndexOutOfRange {
                what: "agent",
                index: emitter,
                len: self.len(),
            });
        }
        let p = predator.index();
        if p >= self.predator_count() {
            return Err(PopulationError::IndexOutOfRange {
                what: "predator",
                index: p,
                len: self.predator_count(),
            });
        }
        let word_row = self
            .words
            .index_axis(Axis(0), emitter)
            .index_axis_move(Axis(0), p);
        let signal =
            onehot::hot_index(word_row).ok_or_else(|| PopulationError::InvariantViolation {
                tensor: "word",
                agent: emitter,
                row: p,
                reason: "row holds no signal".to_owned(),
            })?;
        let states = self.actions.index_axis(Axis(1), signal).to_owned();
        Ok(Witness {
            emitter,
            signal: SignalId(signal),
            states,
        })
    }

    /// Keep only the listed agents, in the listed order.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::IndexOutOfRange`] if any index is not an
    /// agent; the population is left untouched in that case.
    pub fn survive(&mut self, indices: &[usize]) -> Result<(), PopulationError> {
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(PopulationError::IndexOutOfRange {
                what: "agent",
                index,
                len,
            });
        }
        self.words = self.words.select(Axis(0), indices);
        self.actions = self.actions.select(Axis(0), indices);
        Ok(())
    }

    /// Keep only the agents whose mask entry is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::ShapeMismatch`] if the mask length differs
    /// from the population size.
    pub fn survive_mask(&mut self, mask: &[bool]) -> Result<(), PopulationError> {
        if mask.len() != self.len() {
            return Err(PopulationError::ShapeMismatch {
                reason: format!("mask has {} entries for {} agents", mask.len(), self.len()),
            });
        }
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &alive)| alive.then_some(i))
            .collect();
        self.survive(&indices)
    }

    /// Grow the population and cut it back to `max_population`.
    ///
    /// With `N` agents and growth `g = rep_rate - 1`:
    ///
    /// 1. `floor(N * g * (1 - mut_rate))` copies of agents sampled with
    ///    replacement are appended;
    /// 2. `floor(N' * g * mut_rate)` fresh random agents are appended, where
    ///    `N'` is the size after step 1;
    /// 3. if the population exceeds `max_population`, rows are dropped per
    ///    `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::InvalidRate`] if `rep_rate` is below 1 or
    /// not finite, or `mut_rate` is outside `[0, 1]`.
    pub fn reproduce<R: Rng + ?Sized>(
        &mut self,
        rep_rate: f64,
        mut_rate: f64,
        max_population: usize,
        policy: TruncationPolicy,
        rng: &mut R,
    ) -> Result<ReproductionStats, PopulationError> {
        check_rates(rep_rate, mut_rate)?;
        let growth = rep_rate - 1.0;
        let before = self.len();

        let copied = floor_count(as_f64(before) * growth * (1.0 - mut_rate));
        if copied > 0 && before > 0 {
            let parents: Vec<usize> = (0..copied).map(|_| rng.random_range(0..before)).collect();
            let offspring = Self {
                words: self.words.select(Axis(0), &parents),
                actions: self.actions.select(Axis(0), &parents),
            };
            self.append(&offspring)?;
        }

        let mutated = floor_count(as_f64(self.len()) * growth * mut_rate);
        if mutated > 0 {
            let fresh = Self::random(
                mutated,
                self.predator_count(),
                self.signal_count(),
                self.state_count(),
                rng,
            )?;
            self.append(&fresh)?;
        }

        let truncated = self.truncate(max_population, policy, rng);

        let stats = ReproductionStats {
            population_before: before,
            copied,
            mutated,
            truncated,
            population_after: self.len(),
        };
        debug!(
            before,
            copied,
            mutated,
            truncated,
            after = stats.population_after,
            "reproduction applied"
        );
        Ok(stats)
    }

    /// Cut the population down to `max_population` rows and return how many
    /// were dropped. Kept rows stay in their original order.
    fn truncate<R: Rng + ?Sized>(
        &mut self,
        max_population: usize,
        policy: TruncationPolicy,
        rng: &mut R,
    ) -> usize {
        let grown = self.len();
        let truncated = grown.saturating_sub(max_population);
        if truncated == 0 {
            return 0;
        }
        let keep: Vec<usize> = match policy {
            TruncationPolicy::OldestFirst => (truncated..grown).collect(),
            TruncationPolicy::Random => {
                let mut keep = rand::seq::index::sample(rng, grown, max_population).into_vec();
                keep.sort_unstable();
                keep
            }
        };
        self.words = self.words.select(Axis(0), &keep);
        self.actions = self.actions.select(Axis(0), &keep);
        truncated
    }

    /// Append another population's agents after this one's.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::ShapeMismatch`] if the populations differ in
    /// predators, signals, or states.
    pub fn concatenate(&mut self, other: &Self) -> Result<(), PopulationError> {
        self.append(other)
    }

    fn append(&mut self, other: &Self) -> Result<(), PopulationError> {
        let ours = (self.predator_count(), self.signal_count(), self.state_count());
        let theirs = (other.predator_count(), other.signal_count(), other.state_count());
        if ours != theirs {
            return Err(PopulationError::ShapeMismatch {
                reason: format!(
                    "cannot join populations with (P, S, A) = {ours:?} and {theirs:?}"
                ),
            });
        }
        self.words = join(&self.words, &other.words)?;
        self.actions = join(&self.actions, &other.actions)?;
        Ok(())
    }
}

fn join(a: &Array3<u8>, b: &Array3<u8>) -> Result<Array3<u8>, PopulationError> {
    concatenate(Axis(0), &[a.view(), b.view()]).map_err(|e| PopulationError::ShapeMismatch {
        reason: e.to_string(),
    })
}

pub(crate) fn check_dimensions(
    predators: usize,
    signals: usize,
    states: usize,
) -> Result<(), PopulationError> {
    for (name, value) in [("predators", predators), ("signals", signals), ("states", states)] {
        if value == 0 {
            return Err(PopulationError::InvalidDimensions {
                reason: format!("{name} must be at least 1"),
            });
        }
    }
    Ok(())
}

fn check_rates(rep_rate: f64, mut_rate: f64) -> Result<(), PopulationError> {
    if !rep_rate.is_finite() || rep_rate < 1.0 {
        return Err(PopulationError::InvalidRate {
            name: "reproduction",
            value: rep_rate,
            reason: "must be a finite number of at least 1",
        });
    }
    if !(0.0..=1.0).contains(&mut_rate) {
        return Err(PopulationError::InvalidRate {
            name: "mutation",
            value: mut_rate,
            reason: "must lie in [0, 1]",
        });
    }
    Ok(())
}

fn into_rank3(tensor: ArrayD<u8>, name: &'static str) -> Result<Array3<u8>, PopulationError> {
    let rank = tensor.ndim();
    tensor
        .into_dimensionality::<Ix3>()
        .map_err(|_| PopulationError::InvalidRank { tensor: name, rank })
}

#[allow(clippy::cast_precision_loss)]
const fn as_f64(count: usize) -> f64 {
    count as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.floor() as usize
    } else {
        0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ndarray::{IxDyn, Slice, arr3};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    /// Two agents, two predators, two signals, two states.
    /// Agent 0 calls 0 for predator 0 and 1 for predator 1; hears 0 → state 1,
    /// 1 → state 0. Agent 1 calls 1 for both; hears 0 → 0, 1 → 1.
    fn pair() -> PopulationState {
        let words = arr3(&[[[1, 0], [0, 1]], [[0, 1], [0, 1]]]);
        let actions = arr3(&[[[0, 1], [1, 0]], [[1, 0], [0, 1]]]);
        PopulationState::from_tensors(words, actions).unwrap()
    }

    #[test]
    fn random_population_is_valid() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = PopulationState::random(100, 2, 3, 3, &mut rng).unwrap();
        assert_eq!(population.len(), 100);
        assert_eq!(population.words().dim(), (100, 2, 3));
        assert_eq!(population.actions().dim(), (100, 3, 3));
        assert!(population.validate().is_ok());
    }

    #[test]
    fn random_rejects_zero_dimensions() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(matches!(
            PopulationState::random(10, 2, 0, 3, &mut rng),
            Err(PopulationError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn empty_population_is_allowed() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = PopulationState::random(0, 2, 3, 3, &mut rng).unwrap();
        assert!(population.is_empty());
        assert!(matches!(
            population.witness(PredatorId(0), &mut rng),
            Err(PopulationError::EmptyPopulation)
        ));
    }

    #[test]
    fn from_tensors_checks_signal_agreement() {
        let words = Array3::<u8>::zeros((1, 1, 2));
        let actions = Array3::<u8>::zeros((1, 3, 2));
        assert!(matches!(
            PopulationState::from_tensors(words, actions),
            Err(PopulationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn from_tensors_rejects_non_one_hot() {
        let words = arr3(&[[[1, 1]]]);
        let actions = arr3(&[[[1], [1]]]);
        assert!(matches!(
            PopulationState::from_tensors(words, actions),
            Err(PopulationError::InvariantViolation { tensor: "word", .. })
        ));
    }

    #[test]
    fn from_dyn_tensors_rejects_rank_two() {
        let words = ArrayD::<u8>::zeros(IxDyn(&[2, 3]));
        let actions = ArrayD::<u8>::zeros(IxDyn(&[2, 3, 3]));
        assert!(matches!(
            PopulationState::from_dyn_tensors(words, actions),
            Err(PopulationError::InvalidRank {
                tensor: "word",
                rank: 2
            })
        ));
    }

    #[test]
    fn from_dyn_tensors_accepts_rank_three() {
        let population = pair();
        let words = population.words().clone().into_dyn();
        let actions = population.actions().clone().into_dyn();
        let rebuilt = PopulationState::from_dyn_tensors(words, actions).unwrap();
        assert_eq!(rebuilt, population);
    }

    #[test]
    fn validate_does_not_mutate() {
        let population = pair();
        let before = population.clone();
        assert!(population.validate().is_ok());
        assert!(population.validate().is_ok());
        assert_eq!(population, before);
    }

    #[test]
    fn witness_broadcasts_emitter_signal() {
        let population = pair();
        let witness = population.witness_from(0, PredatorId(0)).unwrap();
        assert_eq!(witness.signal, SignalId(0));
        // Agent 0 hears 0 → state 1, agent 1 hears 0 → state 0.
        assert_eq!(witness.states, ndarray::arr2(&[[0, 1], [1, 0]]));

        let witness = population.witness_from(1, PredatorId(0)).unwrap();
        assert_eq!(witness.signal, SignalId(1));
        assert_eq!(witness.states, ndarray::arr2(&[[1, 0], [0, 1]]));
    }

    #[test]
    fn witness_rejects_bad_indices() {
        let population = pair();
        assert!(matches!(
            population.witness_from(2, PredatorId(0)),
            Err(PopulationError::IndexOutOfRange { what: "agent", .. })
        ));
        assert!(matches!(
            population.witness_from(0, PredatorId(2)),
            Err(PopulationError::IndexOutOfRange {
                what: "predator",
                ..
            })
        ));
    }

    #[test]
    fn survive_keeps_rows_in_order() {
        let mut population = pair();
        let second = pair().witness_from(1, PredatorId(1)).unwrap();
        population.survive(&[1]).unwrap();
        assert_eq!(population.len(), 1);
        let witness = population.witness_from(0, PredatorId(1)).unwrap();
        assert_eq!(witness.signal, second.signal);
        assert!(population.validate().is_ok());
    }

    #[test]
    fn survive_rejects_out_of_range_and_keeps_state() {
        let mut population = pair();
        assert!(matches!(
            population.survive(&[0, 5]),
            Err(PopulationError::IndexOutOfRange { index: 5, .. })
        ));
        assert_eq!(population, pair());
    }

    #[test]
    fn survive_mask_matches_indices() {
        let mut by_mask = pair();
        let mut by_index = pair();
        by_mask.survive_mask(&[false, true]).unwrap();
        by_index.survive(&[1]).unwrap();
        assert_eq!(by_mask, by_index);
        assert!(matches!(
            by_mask.survive_mask(&[true, true]),
            Err(PopulationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn survive_everyone_removed() {
        let mut population = pair();
        population.survive(&[]).unwrap();
        assert!(population.is_empty());
        assert!(population.validate().is_ok());
    }

    #[test]
    fn reproduce_counts_follow_rates() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = PopulationState::random(100, 2, 3, 3, &mut rng).unwrap();
        let stats = population
            .reproduce(1.5, 0.2, 1000, TruncationPolicy::OldestFirst, &mut rng)
            .unwrap();
        // floor(100 * 0.5 * 0.8) = 40 copies, floor(140 * 0.5 * 0.2) = 14 fresh.
        assert_eq!(stats.copied, 40);
        assert_eq!(stats.mutated, 14);
        assert_eq!(stats.truncated, 0);
        assert_eq!(stats.population_after, 154);
        assert_eq!(population.len(), 154);
        assert!(population.validate().is_ok());
    }

    #[test]
    fn reproduce_caps_oldest_first() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = PopulationState::random(100, 2, 3, 3, &mut rng).unwrap();
        let newest = population
            .words()
            .slice_axis(Axis(0), Slice::from(50..))
            .to_owned();
        let stats = population
            .reproduce(1.5, 0.0, 100, TruncationPolicy::OldestFirst, &mut rng)
            .unwrap();
        assert_eq!(stats.copied, 50);
        assert_eq!(stats.truncated, 50);
        assert_eq!(population.len(), 100);
        // The first half of the survivors are the newest half of the originals.
        assert_eq!(population.words().slice_axis(Axis(0), Slice::from(..50)), newest);
    }

    #[test]
    fn reproduce_caps_randomly() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = PopulationState::random(100, 2, 3, 3, &mut rng).unwrap();
        let stats = population
            .reproduce(1.8, 0.3, 120, TruncationPolicy::Random, &mut rng)
            .unwrap();
        assert_eq!(population.len(), 120);
        assert_eq!(stats.population_after, 120);
        assert!(stats.truncated > 0);
        assert!(population.validate().is_ok());
    }

    /// `agents` agents whose single word row is hot at their own index, so
    /// every row can be traced back to its original position.
    fn tagged(agents: usize) -> PopulationState {
        let words = Array3::from_shape_fn((agents, 1, agents), |(i, _, j)| u8::from(i == j));
        let actions = Array3::ones((agents, agents, 1));
        PopulationState::from_tensors(words, actions).unwrap()
    }

    fn tags(population: &PopulationState) -> Vec<usize> {
        population
            .words()
            .outer_iter()
            .map(|agent| onehot::hot_index(agent.index_axis_move(Axis(0), 0)).unwrap())
            .collect()
    }

    #[test]
    fn random_truncation_keeps_ordered_subset() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = tagged(80);
        let truncated = population.truncate(40, TruncationPolicy::Random, &mut rng);
        assert_eq!(truncated, 40);
        let kept = tags(&population);
        assert_eq!(kept.len(), 40);
        assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
        // Unlike oldest-first, some of the oldest 40 rows survive.
        assert!(kept.iter().any(|&tag| tag < 40));
        assert_ne!(kept, (40..80).collect::<Vec<_>>());
        assert!(population.validate().is_ok());
    }

    #[test]
    fn oldest_first_truncation_keeps_newest_rows() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = tagged(80);
        let truncated = population.truncate(40, TruncationPolicy::OldestFirst, &mut rng);
        assert_eq!(truncated, 40);
        assert_eq!(tags(&population), (40..80).collect::<Vec<_>>());
    }

    #[test]
    fn truncation_below_cap_is_noop() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = tagged(10);
        assert_eq!(population.truncate(40, TruncationPolicy::Random, &mut rng), 0);
        assert_eq!(tags(&population), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn reproduce_identity_is_noop() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = PopulationState::random(64, 2, 3, 3, &mut rng).unwrap();
        let before = population.clone();
        let stats = population
            .reproduce(1.0, 0.0, 64, TruncationPolicy::Random, &mut rng)
            .unwrap();
        assert_eq!(population, before);
        assert_eq!((stats.copied, stats.mutated, stats.truncated), (0, 0, 0));
    }

    #[test]
    fn reproduce_rejects_bad_rates() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = pair();
        for (rep, mutation) in [(0.5, 0.0), (f64::NAN, 0.0), (1.2, 1.5), (1.2, -0.1)] {
            assert!(matches!(
                population.reproduce(rep, mutation, 10, TruncationPolicy::OldestFirst, &mut rng),
                Err(PopulationError::InvalidRate { .. })
            ));
        }
        assert_eq!(population, pair());
    }

    #[test]
    fn reproduce_empty_population_stays_empty() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = PopulationState::random(0, 2, 3, 3, &mut rng).unwrap();
        let stats = population
            .reproduce(2.0, 0.5, 100, TruncationPolicy::OldestFirst, &mut rng)
            .unwrap();
        assert_eq!(stats.population_after, 0);
        assert!(population.is_empty());
    }

    #[test]
    fn concatenate_appends_rows() {
        let mut population = pair();
        population.concatenate(&pair()).unwrap();
        assert_eq!(population.len(), 4);
        assert!(population.validate().is_ok());
        assert_eq!(
            population.witness_from(3, PredatorId(0)).unwrap().signal,
            SignalId(1)
        );
    }

    #[test]
    fn concatenate_rejects_shape_mismatch() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut population = pair();
        let other = PopulationState::random(3, 2, 3, 2, &mut rng).unwrap();
        assert!(matches!(
            population.concatenate(&other),
            Err(PopulationError::ShapeMismatch { .. })
        ));
        assert_eq!(population.len(), 2);
    }
}
