//! Command-line runner for the alarm-call convention simulation.
//!
//! Loads configuration, plays a series of games, and logs the outcome
//! together with the conventions the population settled on.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`ALARMCALL_CONFIG`, else `alarmcall-config.yaml`,
//!    else defaults)
//! 2. Initialize structured logging (tracing), `RUST_LOG` overriding
//!    `logging.level`
//! 3. Build the game from the configuration
//! 4. Play the series
//! 5. Log the result and the convention report of the longest game

mod error;
mod progress;

use std::path::{Path, PathBuf};

use alarmcall_core::analysis::ConventionReport;
use alarmcall_core::config::SimulationConfig;
use alarmcall_core::engine::Game;
use alarmcall_core::experiment;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "ALARMCALL_CONFIG";

/// Configuration file read from the working directory when
/// `ALARMCALL_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "alarmcall-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a game aborts.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("alarmcall-engine starting");
    info!(
        source = %source,
        world_name = config.world.name,
        seed = config.world.seed,
        max_population = config.population.max_population,
        signals = config.population.signals,
        states = config.population.states,
        games = config.simulation.games,
        max_turns = config.simulation.max_turns,
        "Configuration loaded"
    );

    run(&config)?;
    Ok(())
}

/// Play the configured series and log the outcome.
fn run(config: &SimulationConfig) -> Result<(), EngineError> {
    // 3. Build the game.
    let mut game = Game::from_config(config)?;

    // 4. Play the series.
    let mut progress = ProgressCallback::new(
        config.simulation.archive_interval,
        config.simulation.archive_maps,
    );
    let summary = experiment::run_series_with(
        &mut game,
        config.simulation.games,
        config.simulation.max_turns,
        &mut progress,
    )?;

    // 5. Log the result.
    info!(
        games_played = summary.games_played(),
        wins = summary.wins(),
        completed = summary.completed,
        longest_turns = summary.longest.as_ref().map(alarmcall_types::RunReport::turns),
        archived_turns = progress.archive().len(),
        "Series finished"
    );
    if !summary.completed {
        warn!(
            games = config.simulation.games,
            max_turns = config.simulation.max_turns,
            "No game reached the turn budget"
        );
    }

    if let Some(population) = &summary.longest_population {
        let report = ConventionReport::new(population, game.threat())?;
        info!(
            population = report.population,
            overall_survival_chance = report.overall_survival_chance,
            optimal = report.is_optimal(),
            "Conventions of the longest game"
        );
        info!(report = %serde_json::to_string(&report)?, "Convention report");
    }
    Ok(())
}

/// Load configuration from `ALARMCALL_CONFIG` or `alarmcall-config.yaml`,
/// falling back to defaults when the variable is unset and the default file
/// does not exist. Returns the config and a description of where it came
/// from.
fn load_config() -> Result<(SimulationConfig, String), EngineError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        let config = SimulationConfig::from_file(&path)?;
        return Ok((config, path.display().to_string()));
    }
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        let config = SimulationConfig::from_file(path)?;
        Ok((config, DEFAULT_CONFIG_PATH.to_owned()))
    } else {
        Ok((SimulationConfig::default(), "defaults".to_owned()))
    }
}
