//! Plain-data records exposed to reporting collaborators.
//!
//! Everything here is produced by the engine and consumed by sinks (archives,
//! exporters, display tooling). None of it feeds back into the turn loop.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::RunOutcome;
use crate::ids::{PredatorId, RunId, SignalId};

// ---------------------------------------------------------------------------
// Reproduction
// ---------------------------------------------------------------------------

/// What a single reproduction phase did to the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReproductionStats {
    /// Population size when the phase started.
    pub population_before: usize,
    /// Offspring copied verbatim from sampled parents.
    pub copied: usize,
    /// Offspring with a freshly randomized strategy.
    pub mutated: usize,
    /// Rows removed to respect the cap.
    pub truncated: usize,
    /// Population size after the cap was applied.
    pub population_after: usize,
}

// ---------------------------------------------------------------------------
// Timings
// ---------------------------------------------------------------------------

/// Wall-clock cost of each phase of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseTimings {
    /// Choosing the emitter and propagating its signal to every agent. The
    /// predator spawn before it only counts towards `total`.
    pub witness: Duration,
    /// Survival draws and dropping the non-survivors.
    pub hunt: Duration,
    /// Whole reproduction phase (copies, mutations, truncation).
    pub reproduction: Duration,
    /// Whole turn, excluding the callback.
    pub total: Duration,
}

// ---------------------------------------------------------------------------
// Turn record
// ---------------------------------------------------------------------------

/// Metrics for a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The run this turn belongs to.
    pub run_id: RunId,
    /// Turn number (1-based).
    pub turn: u64,
    /// Predator that appeared.
    pub predator: PredatorId,
    /// Row index of the agent whose call was broadcast.
    pub emitter: usize,
    /// Signal the emitter used for the predator.
    pub signal: SignalId,
    /// Population before the hunt.
    pub population_before_hunt: usize,
    /// Population after the hunt.
    pub population_after_hunt: usize,
    /// Number of agents that reacted with each state, indexed by state.
    pub state_counts: Vec<u64>,
    /// Agents whose reaction was one of the predator's best states.
    pub optimal_responses: u64,
    /// Reproduction phase statistics. `None` on the turn the population
    /// went extinct.
    pub reproduction: Option<ReproductionStats>,
    /// Phase timings.
    pub timings: PhaseTimings,
}

impl TurnRecord {
    /// Population at the end of the turn (after reproduction when it ran).
    pub fn final_population(&self) -> usize {
        self.reproduction
            .map_or(self.population_after_hunt, |stats| stats.population_after)
    }

    /// Agents removed by the hunt.
    pub const fn casualties(&self) -> usize {
        self.population_before_hunt
            .saturating_sub(self.population_after_hunt)
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// The run.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Terminal state.
    pub outcome: RunOutcome,
    /// Population when the run ended.
    pub final_population: usize,
    /// Whether the configured win condition was met.
    pub won: bool,
}

impl RunReport {
    /// Number of turns the run lasted.
    pub const fn turns(&self) -> u64 {
        self.outcome.turns()
    }
}
