//! Series of independent games.
//!
//! A single game often dies out early while the convention is still random.
//! A series resets and replays the same [`Game`] (same parameters, continuing
//! rng stream) until one game reaches the turn budget or the game count runs
//! out, and remembers the longest game together with its final population.

use alarmcall_population::PopulationState;
use alarmcall_types::{RunOutcome, RunReport};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::engine::{Game, NoOpCallback, RunError, TurnCallback};

/// Result of a series of games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesSummary {
    /// One report per game played, in order.
    pub reports: Vec<RunReport>,
    /// The game that lasted the most turns (the first one on ties).
    pub longest: Option<RunReport>,
    /// Population of the longest game as it stood when that game ended.
    #[serde(skip)]
    pub longest_population: Option<PopulationState>,
    /// Whether the series stopped because a game completed.
    pub completed: bool,
}

impl SeriesSummary {
    /// Number of games played.
    pub fn games_played(&self) -> usize {
        self.reports.len()
    }

    /// Number of games that met the win condition.
    pub fn wins(&self) -> usize {
        self.reports.iter().filter(|report| report.won).count()
    }
}

/// Play up to `games` games of at most `max_turns` turns each, stopping
/// early at the first completed game.
///
/// # Errors
///
/// Returns the first [`RunError`] raised by a game.
pub fn run_series<R: Rng>(
    game: &mut Game<R>,
    games: u32,
    max_turns: u64,
) -> Result<SeriesSummary, RunError> {
    run_series_with(game, games, max_turns, &mut NoOpCallback)
}

/// [`run_series`] with a callback that sees every turn of every game.
///
/// # Errors
///
/// Returns the first [`RunError`] raised by a game.
pub fn run_series_with<R: Rng, C: TurnCallback + ?Sized>(
    game: &mut Game<R>,
    games: u32,
    max_turns: u64,
    callback: &mut C,
) -> Result<SeriesSummary, RunError> {
    let mut reports: Vec<RunReport> = Vec::new();
    let mut longest: Option<RunReport> = None;
    let mut longest_population: Option<PopulationState> = None;
    let mut completed = false;

    for index in 1..=games {
        game.reset()?;
        let report = game.run(max_turns, callback)?;
        info!(
            game = index,
            of = games,
            turns = report.turns(),
            won = report.won,
            "Series game finished"
        );
        if longest
            .as_ref()
            .is_none_or(|best| report.turns() > best.turns())
        {
            longest = Some(report.clone());
            longest_population = game.population().cloned();
        }
        completed = matches!(report.outcome, RunOutcome::Completed { .. });
        reports.push(report);
        if completed {
            info!(game = index, "Game reached the turn budget, stopping series");
            break;
        }
    }

    Ok(SeriesSummary {
        reports,
        longest,
        longest_population,
        completed,
    })
}
