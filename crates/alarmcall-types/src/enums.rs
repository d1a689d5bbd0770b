//! Enumeration types for the simulation: policies, phases, and outcomes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// How an overpopulated state is cut back down to the cap after reproduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TruncationPolicy {
    /// Drop the lowest-index (earliest created) rows.
    #[default]
    OldestFirst,
    /// Keep a uniformly random subset of rows, preserving their relative order.
    Random,
}

/// What counts as "winning" a game. Reporting-only: it never changes the
/// turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinCondition {
    /// No win is ever reported.
    None,
    /// The game reached the turn budget without going extinct.
    #[default]
    Completion,
    /// The game completed and the population was back at the cap after
    /// every reproduction phase.
    SustainedCap,
}

// ---------------------------------------------------------------------------
// Turn state machine
// ---------------------------------------------------------------------------

/// Phase of the turn state machine.
///
/// A game starts in `Running`, cycles `SpawnPredator` → `Witness` → `Hunt` →
/// `ReproduceAndCap` once per turn, and ends in `Extinct` or `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ready to start the next turn.
    Running,
    /// Drawing the predator for this turn.
    SpawnPredator,
    /// Broadcasting the emitter's signal and collecting reactions.
    Witness,
    /// Resolving survival against the spawned predator.
    Hunt,
    /// Growing the population back and applying the cap.
    ReproduceAndCap,
    /// The population fell below the floor.
    Extinct,
    /// The turn budget was exhausted without extinction.
    Completed,
}

impl GamePhase {
    /// Whether the phase ends the game.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Extinct | Self::Completed)
    }
}

impl core::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::SpawnPredator => "spawn-predator",
            Self::Witness => "witness",
            Self::Hunt => "hunt",
            Self::ReproduceAndCap => "reproduce-and-cap",
            Self::Extinct => "extinct",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The population dropped below the floor during the given turn.
    Extinct {
        /// Turn (1-based) in which the population went extinct.
        turn: u64,
    },
    /// Every turn of the budget was played.
    Completed {
        /// Number of turns played.
        turns: u64,
    },
}

impl RunOutcome {
    /// The terminal phase matching this outcome.
    pub const fn phase(self) -> GamePhase {
        match self {
            Self::Extinct { .. } => GamePhase::Extinct,
            Self::Completed { .. } => GamePhase::Completed,
        }
    }

    /// Number of turns played before the run ended.
    pub const fn turns(self) -> u64 {
        match self {
            Self::Extinct { turn } => turn,
            Self::Completed { turns } => turns,
        }
    }
}
