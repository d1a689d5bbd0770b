//! Sampled turn history.
//!
//! Keeping every turn of a long game is wasteful, so the [`Archive`] keeps
//! every `interval`-th record plus the most recent one (which is the terminal
//! turn once the run ends). With `keep_maps` it also snapshots the word and
//! action count tables alongside each kept record.

use alarmcall_population::PopulationState;
use alarmcall_types::TurnRecord;
use ndarray::Array2;

use crate::config::SimulationConfig;
use crate::engine::TurnCallback;

/// A kept turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedTurn {
    /// The turn record.
    pub record: TurnRecord,
    /// `(P, S)` word counts at the end of the turn, when maps are kept.
    pub word_count: Option<Array2<u64>>,
    /// `(S, A)` action counts at the end of the turn, when maps are kept.
    pub action_count: Option<Array2<u64>>,
}

/// A [`TurnCallback`] that keeps a sample of the turn history.
#[derive(Debug, Clone)]
pub struct Archive {
    interval: u64,
    keep_maps: bool,
    kept: Vec<ArchivedTurn>,
    latest: Option<ArchivedTurn>,
}

impl Archive {
    /// Keep every `interval`-th turn. An interval of 0 is treated as 1.
    pub fn new(interval: u64, keep_maps: bool) -> Self {
        Self {
            interval: interval.max(1),
            keep_maps,
            kept: Vec::new(),
            latest: None,
        }
    }

    /// An archive configured from `simulation.archive_interval` and
    /// `simulation.archive_maps`.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.simulation.archive_interval,
            config.simulation.archive_maps,
        )
    }

    /// Kept turns in order, ending with the most recent turn.
    pub fn entries(&self) -> impl Iterator<Item = &ArchivedTurn> {
        let last_kept = self.kept.last().map(|entry| entry.record.turn);
        let tail = self
            .latest
            .as_ref()
            .filter(|latest| Some(latest.record.turn) != last_kept);
        self.kept.iter().chain(tail)
    }

    /// Number of kept turns.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Whether nothing has been archived yet.
    pub const fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    /// The most recent turn seen.
    pub const fn latest(&self) -> Option<&ArchivedTurn> {
        self.latest.as_ref()
    }

    /// Forget everything, e.g. between games.
    pub fn clear(&mut self) {
        self.kept.clear();
        self.latest = None;
    }
}

impl TurnCallback for Archive {
    fn on_turn(&mut self, record: &TurnRecord, population: &PopulationState) {
        let entry = ArchivedTurn {
            record: record.clone(),
            word_count: self.keep_maps.then(|| population.word_count()),
            action_count: self.keep_maps.then(|| population.action_count()),
        };
        if record.turn.checked_rem(self.interval) == Some(0) {
            self.kept.push(entry.clone());
        }
        self.latest = Some(entry);
    }
}
