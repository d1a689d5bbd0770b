//! The turn loop: spawn, witness, hunt, reproduce.
//!
//! Each turn runs through four phases:
//!
//! 1. **Spawn** -- the threat model draws this turn's predator.
//! 2. **Witness** -- one random agent sees it and calls; every agent reacts
//!    to that call through its own action map.
//! 3. **Hunt** -- every agent survives or not according to the state it
//!    adopted. If fewer than `min_population` agents remain (or none), the
//!    game is lost and the turn ends here.
//! 4. **Reproduce and cap** -- survivors are copied (and some offspring
//!    mutated) until the population is back near the cap, then truncated to
//!    the cap.
//!
//! A game ends `Extinct` on the turn the floor is breached, or `Completed`
//! once the turn budget is spent. A failing phase aborts the run; the game
//! must be [`Game::reset`] before it can run again.

use std::time::Instant;

use alarmcall_population::{PopulationError, PopulationState};
use alarmcall_threat::{ThreatError, ThreatModel};
use alarmcall_types::{
    GamePhase, PhaseTimings, RunId, RunOutcome, RunReport, TruncationPolicy, TurnRecord,
    WinCondition,
};
use chrono::{DateTime, Utc};
use ndarray::Axis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::analysis;
use crate::clock::{ClockError, TurnClock};
use crate::config::{ConfigError, SimulationConfig};

/// Errors raised inside a single turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The turn counter failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The threat model rejected a spawn or hunt.
    #[error("threat error: {source}")]
    Threat {
        /// The underlying threat error.
        #[from]
        source: ThreatError,
    },

    /// A population operation failed.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: PopulationError,
    },
}

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A phase failed. `turn` and `population` describe the last completed
    /// turn.
    #[error("run aborted after turn {turn} with {population} agents: {source}")]
    Aborted {
        /// Last turn that completed.
        turn: u64,
        /// Population at the end of that turn.
        population: usize,
        /// What went wrong.
        #[source]
        source: TurnError,
    },

    /// The game already ended (or was aborted) and has not been reset.
    #[error("game is in phase {phase}; reset it before running again")]
    AlreadyFinished {
        /// Phase the game is stuck in.
        phase: GamePhase,
    },

    /// The turn budget is invalid.
    #[error("invalid turn budget: {source}")]
    Budget {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Callback invoked after each turn completes.
///
/// Runs outside the phase timings. Implementations can archive records,
/// update displays, and so on.
pub trait TurnCallback {
    /// Called after a turn, with the population as it stands at the end of
    /// the turn.
    fn on_turn(&mut self, record: &TurnRecord, population: &PopulationState);
}

/// A callback that ignores every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TurnCallback for NoOpCallback {
    fn on_turn(&mut self, _record: &TurnRecord, _population: &PopulationState) {}
}

/// Fixed parameters of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameParams {
    /// Population cap applied after every reproduction phase.
    pub max_population: usize,
    /// Population a fresh game starts with.
    pub initial_population: usize,
    /// The game is lost once fewer agents than this survive a hunt.
    pub min_population: usize,
    /// Number of distinct alarm calls.
    pub signals: usize,
    /// Number of behavioral states.
    pub states: usize,
    /// Growth factor applied to survivors each turn.
    pub reproduction_rate: f64,
    /// Fraction of offspring born with a fresh random strategy.
    pub mutation_rate: f64,
    /// How the population is cut back to the cap.
    pub truncation: TruncationPolicy,
    /// What counts as winning.
    pub win_condition: WinCondition,
}

impl GameParams {
    /// Extract the game parameters from a configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            max_population: config.population.max_population,
            initial_population: config.initial_population(),
            min_population: config.population.min_population,
            signals: config.population.signals,
            states: config.population.states,
            reproduction_rate: config.reproduction.rate,
            mutation_rate: config.reproduction.mutation,
            truncation: config.reproduction.truncation,
            win_condition: config.simulation.win_condition,
        }
    }

    fn validate(&self, threat: &ThreatModel) -> Result<(), ConfigError> {
        let reason = if self.max_population == 0 {
            "max_population must be positive".to_owned()
        } else if self.initial_population == 0 || self.initial_population > self.max_population {
            format!(
                "initial_population {} must lie in [1, {}]",
                self.initial_population, self.max_population
            )
        } else if self.min_population > self.max_population {
            "min_population exceeds max_population".to_owned()
        } else if self.signals == 0 || self.states == 0 {
            "signals and states must be positive".to_owned()
        } else if self.states != threat.state_count() {
            format!(
                "game has {} states, threat model {}",
                self.states,
                threat.state_count()
            )
        } else if !self.reproduction_rate.is_finite() || self.reproduction_rate < 1.0 {
            format!("reproduction rate {} must be at least 1", self.reproduction_rate)
        } else if !(0.0..=1.0).contains(&self.mutation_rate) {
            format!("mutation rate {} must lie in [0, 1]", self.mutation_rate)
        } else {
            return Ok(());
        };
        Err(ConfigError::Invalid { reason })
    }
}

/// One game: a threat model, a population, and the turn loop between them.
#[derive(Debug)]
pub struct Game<R: Rng> {
    params: GameParams,
    threat: ThreatModel,
    rng: R,
    population: Option<PopulationState>,
    clock: TurnClock,
    phase: GamePhase,
    run_id: RunId,
    started_at: DateTime<Utc>,
    /// Whether every reproduction so far refilled the population to the cap.
    at_cap_every_turn: bool,
}

impl Game<StdRng> {
    /// Build a game from a configuration, seeding the rng from `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration does not validate.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let threat = config.threat.build(config.population.states)?;
        Self::new(
            GameParams::from_config(config),
            threat,
            StdRng::seed_from_u64(config.world.seed),
        )
    }
}

impl<R: Rng> Game<R> {
    /// Create a game. The population is created on the first
    /// [`Game::run`] or [`Game::reset`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the parameters are inconsistent
    /// with each other or with the threat model.
    pub fn new(params: GameParams, threat: ThreatModel, rng: R) -> Result<Self, ConfigError> {
        params.validate(&threat)?;
        let clock = TurnClock::new(u64::MAX).map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        Ok(Self {
            params,
            threat,
            rng,
            population: None,
            clock,
            phase: GamePhase::Running,
            run_id: RunId::new(),
            started_at: Utc::now(),
            at_cap_every_turn: true,
        })
    }

    /// The game parameters.
    pub const fn params(&self) -> &GameParams {
        &self.params
    }

    /// The threat model.
    pub const fn threat(&self) -> &ThreatModel {
        &self.threat
    }

    /// The current population, once created.
    pub const fn population(&self) -> Option<&PopulationState> {
        self.population.as_ref()
    }

    /// Current phase of the turn state machine.
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Turns played so far.
    pub const fn turns(&self) -> u64 {
        self.clock.turn()
    }

    /// Identifier of the current run.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Start over: fresh random population, turn 0, new run id.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Aborted`] if the population cannot be created.
    pub fn reset(&mut self) -> Result<(), RunError> {
        self.population = None;
        self.clock.reset();
        self.clock.extend_budget(u64::MAX)?;
        self.phase = GamePhase::Running;
        self.run_id = RunId::new();
        self.started_at = Utc::now();
        self.at_cap_every_turn = true;
        self.ensure_population()
    }

    /// Play turns until the game ends or `max_turns` more turns have been
    /// played (counting from any turns already stepped with
    /// [`Game::run_turn`]), calling `callback` after every turn.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::AlreadyFinished`] if the game has not been reset
    /// since it last ended, [`RunError::Budget`] for a zero budget, and
    /// [`RunError::Aborted`] if a phase fails.
    pub fn run<C: TurnCallback + ?Sized>(
        &mut self,
        max_turns: u64,
        callback: &mut C,
    ) -> Result<RunReport, RunError> {
        if self.phase != GamePhase::Running {
            return Err(RunError::AlreadyFinished { phase: self.phase });
        }
        self.clock.extend_budget(max_turns)?;
        self.ensure_population()?;
        info!(
            run_id = %self.run_id,
            max_turns,
            population = self.population_len(),
            predators = self.threat.predator_count(),
            signals = self.params.signals,
            states = self.params.states,
            "Game starting"
        );

        while self.phase == GamePhase::Running && !self.clock.is_exhausted() {
            let record = self.run_turn()?;
            if let Some(population) = &self.population {
                callback.on_turn(&record, population);
            }
        }
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Completed;
        }

        let report = self.build_report();
        log_run_end(&report);
        Ok(report)
    }

    /// Play a single turn.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::AlreadyFinished`] if the game is not running and
    /// [`RunError::Aborted`] if a phase fails.
    pub fn run_turn(&mut self) -> Result<TurnRecord, RunError> {
        if self.phase != GamePhase::Running {
            return Err(RunError::AlreadyFinished { phase: self.phase });
        }
        self.ensure_population()?;
        let last_turn = self.clock.turn();
        let last_population = self.population_len();
        self.play_turn().map_err(|source| {
            warn!(
                run_id = %self.run_id,
                turn = last_turn,
                population = last_population,
                phase = %self.phase,
                error = %source,
                "Run aborted"
            );
            RunError::Aborted {
                turn: last_turn,
                population: last_population,
                source,
            }
        })
    }

    /// Report for the run, once it has ended.
    pub fn report(&self) -> Option<RunReport> {
        self.phase.is_terminal().then(|| self.build_report())
    }

    fn play_turn(&mut self) -> Result<TurnRecord, TurnError> {
        let turn_start = Instant::now();
        let turn = self.clock.advance()?;
        let Some(population) = self.population.as_mut() else {
            return Err(PopulationError::EmptyPopulation.into());
        };

        // --- Spawn ---
        self.phase = GamePhase::SpawnPredator;
        let predator = self.threat.spawn(&mut self.rng);

        // --- Witness ---
        self.phase = GamePhase::Witness;
        let witness_start = Instant::now();
        let witness = population.witness(predator, &mut self.rng)?;
        let witness_time = witness_start.elapsed();

        // --- Hunt ---
        self.phase = GamePhase::Hunt;
        let hunt_start = Instant::now();
        let population_before_hunt = population.len();
        let survivors = self.threat.hunt(predator, &witness.states, &mut self.rng)?;
        population.survive(&survivors)?;
        let hunt_time = hunt_start.elapsed();
        let population_after_hunt = population.len();

        let state_counts = witness
            .states
            .fold_axis(Axis(0), 0_u64, |acc, &v| acc.saturating_add(u64::from(v)))
            .to_vec();
        let optimal_responses = analysis::optimal_responses(&state_counts, &self.threat, predator)?;

        // --- Extinction check / reproduce and cap ---
        let reproduction_start = Instant::now();
        let reproduction = if population_after_hunt == 0
            || population_after_hunt < self.params.min_population
        {
            self.phase = GamePhase::Extinct;
            info!(
                run_id = %self.run_id,
                turn,
                population = population_after_hunt,
                min_population = self.params.min_population,
                "Population extinct"
            );
            None
        } else {
            self.phase = GamePhase::ReproduceAndCap;
            let stats = population.reproduce(
                self.params.reproduction_rate,
                self.params.mutation_rate,
                self.params.max_population,
                self.params.truncation,
                &mut self.rng,
            )?;
            if stats.population_after != self.params.max_population {
                self.at_cap_every_turn = false;
            }
            self.phase = if self.clock.is_exhausted() {
                info!(run_id = %self.run_id, turns = turn, "Turn budget reached");
                GamePhase::Completed
            } else {
                GamePhase::Running
            };
            Some(stats)
        };
        let reproduction_time = reproduction_start.elapsed();

        let record = TurnRecord {
            run_id: self.run_id,
            turn,
            predator,
            emitter: witness.emitter,
            signal: witness.signal,
            population_before_hunt,
            population_after_hunt,
            state_counts,
            optimal_responses,
            reproduction,
            timings: PhaseTimings {
                witness: witness_time,
                hunt: hunt_time,
                reproduction: reproduction_time,
                total: turn_start.elapsed(),
            },
        };
        debug!(
            turn,
            predator = %predator,
            signal = %record.signal,
            before_hunt = population_before_hunt,
            after_hunt = population_after_hunt,
            population = record.final_population(),
            optimal = optimal_responses,
            elapsed = ?record.timings.total,
            "Turn complete"
        );
        Ok(record)
    }

    fn ensure_population(&mut self) -> Result<(), RunError> {
        if self.population.is_some() {
            return Ok(());
        }
        let population = PopulationState::random(
            self.params.initial_population,
            self.threat.predator_count(),
            self.params.signals,
            self.params.states,
            &mut self.rng,
        )
        .map_err(|e| RunError::Aborted {
            turn: self.clock.turn(),
            population: 0,
            source: e.into(),
        })?;
        self.population = Some(population);
        Ok(())
    }

    fn population_len(&self) -> usize {
        self.population.as_ref().map_or(0, PopulationState::len)
    }

    fn build_report(&self) -> RunReport {
        let turns = self.clock.turn();
        let outcome = if self.phase == GamePhase::Extinct {
            RunOutcome::Extinct { turn: turns }
        } else {
            RunOutcome::Completed { turns }
        };
        let completed = matches!(outcome, RunOutcome::Completed { .. });
        let won = match self.params.win_condition {
            WinCondition::None => false,
            WinCondition::Completion => completed,
            WinCondition::SustainedCap => completed && self.at_cap_every_turn,
        };
        RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            outcome,
            final_population: self.population_len(),
            won,
        }
    }
}

/// Log the end of a run.
pub fn log_run_end(report: &RunReport) {
    info!(
        run_id = %report.run_id,
        outcome = ?report.outcome,
        turns = report.turns(),
        final_population = report.final_population,
        won = report.won,
        "Game ended"
    );
}
