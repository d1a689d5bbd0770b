//! Turn callback that logs progress and keeps the archive of the current
//! game.

use alarmcall_core::archive::Archive;
use alarmcall_core::engine::TurnCallback;
use alarmcall_population::PopulationState;
use alarmcall_types::TurnRecord;
use tracing::info;

/// Logs a progress line every `interval` turns and archives the game.
///
/// The archive is cleared whenever a new game starts (turn 1), so after a
/// series it holds the history of the last game played.
pub struct ProgressCallback {
    interval: u64,
    archive: Archive,
}

impl ProgressCallback {
    /// Create a callback logging every `interval` turns (0 is treated as 1).
    pub fn new(interval: u64, keep_maps: bool) -> Self {
        Self {
            interval: interval.max(1),
            archive: Archive::new(interval, keep_maps),
        }
    }

    /// History of the most recent game.
    pub const fn archive(&self) -> &Archive {
        &self.archive
    }
}

impl TurnCallback for ProgressCallback {
    fn on_turn(&mut self, record: &TurnRecord, population: &PopulationState) {
        if record.turn == 1 {
            self.archive.clear();
        }
        self.archive.on_turn(record, population);
        if record.turn.checked_rem(self.interval) == Some(0) {
            info!(
                run_id = %record.run_id,
                turn = record.turn,
                population = record.final_population(),
                casualties = record.casualties(),
                optimal = record.optimal_responses,
                conventions = ?population.strategy_convention(),
                "Progress"
            );
        }
    }
}
