//! Configuration loading and typed config structures for the simulation.
//!
//! The canonical configuration lives in `alarmcall-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//!
//! Every field has a default, so an empty file is a valid configuration: the
//! classic two-predator, three-state scenario.

use std::path::Path;

use alarmcall_threat::{PredatorProfile, ThreatError, ThreatModel};
use alarmcall_types::{TruncationPolicy, WinCondition};
use ndarray::Array1;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },

    /// The threat section does not describe a valid threat model.
    #[error("invalid threat configuration: {source}")]
    Threat {
        /// The underlying threat model error.
        #[from]
        source: ThreatError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `alarmcall-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Run name and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Population size bounds and strategy dimensions.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Predators and how often each appears.
    #[serde(default)]
    pub threat: ThreatConfig,

    /// Reproduction and mutation rates.
    #[serde(default)]
    pub reproduction: ReproductionConfig,

    /// Turn budget, game count, archiving, and win condition.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::Invalid`] or [`ConfigError::Threat`] if it fails
    /// [`SimulationConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// See [`SimulationConfig::from_file`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no game could run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field, or
    /// [`ConfigError::Threat`] if the threat section does not build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let population = &self.population;
        if population.max_population == 0 {
            return invalid("population.max_population must be positive");
        }
        if population.signals == 0 {
            return invalid("population.signals must be positive");
        }
        if population.states == 0 {
            return invalid("population.states must be positive");
        }
        if population.min_population > population.max_population {
            return invalid("population.min_population exceeds population.max_population");
        }
        match population.initial_population {
            Some(0) => return invalid("population.initial_population must be positive"),
            Some(initial) if initial > population.max_population => {
                return invalid("population.initial_population exceeds population.max_population");
            }
            _ => {}
        }

        let reproduction = &self.reproduction;
        if !reproduction.rate.is_finite() || reproduction.rate < 1.0 {
            return invalid("reproduction.rate must be at least 1.0");
        }
        if !(0.0..=1.0).contains(&reproduction.mutation) {
            return invalid("reproduction.mutation must lie in [0, 1]");
        }

        let simulation = &self.simulation;
        if simulation.max_turns == 0 {
            return invalid("simulation.max_turns must be positive");
        }
        if simulation.games == 0 {
            return invalid("simulation.games must be positive");
        }
        if simulation.archive_interval == 0 {
            return invalid("simulation.archive_interval must be positive");
        }

        self.threat.build(population.states).map(|_| ())
    }

    /// Population size the first turn starts with.
    pub fn initial_population(&self) -> usize {
        self.population
            .initial_population
            .unwrap_or(self.population.max_population)
    }
}

fn invalid(reason: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid {
        reason: reason.to_owned(),
    })
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Population parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Population cap applied after every reproduction phase.
    #[serde(default = "default_max_population")]
    pub max_population: usize,

    /// Population of a fresh game. Defaults to `max_population`.
    #[serde(default)]
    pub initial_population: Option<usize>,

    /// Number of distinct alarm calls.
    #[serde(default = "default_signals")]
    pub signals: usize,

    /// Number of behavioral states. Must match the threat matrix width.
    #[serde(default = "default_states")]
    pub states: usize,

    /// The game is lost once fewer agents than this survive a hunt.
    #[serde(default = "default_min_population")]
    pub min_population: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_population: default_max_population(),
            initial_population: None,
            signals: default_signals(),
            states: default_states(),
            min_population: default_min_population(),
        }
    }
}

/// Threat description: either a raw matrix or named per-predator maps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThreatConfig {
    /// Survival probabilities, one row per predator.
    #[serde(default)]
    pub matrix: Option<Vec<Vec<f64>>>,

    /// Named predators with per-state survival maps.
    #[serde(default)]
    pub predators: Option<Vec<PredatorProfile>>,

    /// Spawn weights, one per predator. Uniform when omitted.
    #[serde(default)]
    pub spawn_distribution: Option<Vec<f64>>,
}

impl ThreatConfig {
    /// Build the threat model for `states` behavioral states.
    ///
    /// Without `matrix` or `predators` the default two-predator matrix is
    /// used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if both descriptions are given, the
    /// matrix width differs from `states`, or the spawn length differs from
    /// the predator count. Returns [`ConfigError::Threat`] if the model itself
    /// is rejected.
    pub fn build(&self, states: usize) -> Result<ThreatModel, ConfigError> {
        let spawn = self.spawn_distribution.clone().map(Array1::from_vec);
        let model = match (&self.matrix, &self.predators) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid {
                    reason: "threat.matrix and threat.predators are mutually exclusive".to_owned(),
                });
            }
            (Some(matrix), None) => {
                ThreatModel::from_rows(matrix, self.spawn_distribution.as_deref())?
            }
            (None, Some(profiles)) => ThreatModel::from_profiles(profiles, states, spawn)?,
            (None, None) => ThreatModel::from_rows(
                &default_threat_matrix(),
                self.spawn_distribution.as_deref(),
            )?,
        };
        if model.state_count() != states {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "threat matrix has {} states, population.states is {states}",
                    model.state_count()
                ),
            });
        }
        Ok(model)
    }
}

/// Reproduction parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReproductionConfig {
    /// Growth factor applied to survivors each turn (at least 1.0).
    #[serde(default = "default_reproduction_rate")]
    pub rate: f64,

    /// Fraction of offspring born with a fresh random strategy.
    #[serde(default = "default_mutation_rate")]
    pub mutation: f64,

    /// Which agents are dropped when the cap is exceeded.
    #[serde(default)]
    pub truncation: TruncationPolicy,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            rate: default_reproduction_rate(),
            mutation: default_mutation_rate(),
            truncation: TruncationPolicy::default(),
        }
    }
}

/// Run-level parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Turn budget per game.
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,

    /// Maximum number of games in a series.
    #[serde(default = "default_games")]
    pub games: u32,

    /// Keep every N-th turn record.
    #[serde(default = "default_archive_interval")]
    pub archive_interval: u64,

    /// Also keep word and action frequency tables with archived records.
    #[serde(default)]
    pub archive_maps: bool,

    /// What counts as winning a game.
    #[serde(default)]
    pub win_condition: WinCondition,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            games: default_games(),
            archive_interval: default_archive_interval(),
            archive_maps: false,
            win_condition: WinCondition::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    String::from("alarmcall")
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_population() -> usize {
    1000
}

const fn default_signals() -> usize {
    3
}

const fn default_states() -> usize {
    3
}

const fn default_min_population() -> usize {
    100
}

/// Survival matrix used when the threat section is empty.
pub fn default_threat_matrix() -> Vec<Vec<f64>> {
    vec![vec![0.7, 0.99, 0.6], vec![0.7, 0.6, 0.99]]
}

const fn default_reproduction_rate() -> f64 {
    1.2
}

const fn default_mutation_rate() -> f64 {
    0.05
}

const fn default_max_turns() -> u64 {
    1000
}

const fn default_games() -> u32 {
    10
}

const fn default_archive_interval() -> u64 {
    10
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    use alarmcall_types::StateId;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.population.max_population, 1000);
        assert_eq!(config.initial_population(), 1000);
        assert_eq!(config.reproduction.truncation, TruncationPolicy::OldestFirst);
        assert_eq!(config.simulation.win_condition, WinCondition::Completion);
    }

    #[test]
    fn default_threat_is_two_predators() {
        let model = ThreatConfig::default().build(3);
        assert!(model.is_ok());
        let model = model.ok();
        assert_eq!(model.as_ref().map(ThreatModel::predator_count), Some(2));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  name: test
  seed: 123
population:
  max_population: 500
  initial_population: 250
  signals: 4
  states: 2
  min_population: 10
threat:
  matrix:
    - [0.9, 0.1]
    - [0.2, 0.8]
  spawn_distribution: [0.25, 0.75]
reproduction:
  rate: 1.5
  mutation: 0.1
  truncation: random
simulation:
  max_turns: 200
  games: 3
  archive_interval: 5
  archive_maps: true
  win_condition: sustained-cap
logging:
  level: debug
";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.world.name, "test");
        assert_eq!(config.initial_population(), 250);
        assert_eq!(config.population.signals, 4);
        assert_eq!(config.reproduction.truncation, TruncationPolicy::Random);
        assert_eq!(config.simulation.win_condition, WinCondition::SustainedCap);
        assert!(config.simulation.archive_maps);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_named_predators() {
        let yaml = r"
population:
  states: 2
threat:
  predators:
    - name: eagle
      survival: { 0: 0.6, 1: 0.99 }
    - name: leopard
      survival: { 0: 0.99, 1: 0.5 }
";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();
        let model = config.threat.build(config.population.states);
        let best = model.ok().and_then(|m| m.best_states(alarmcall_types::PredatorId(1)).ok());
        assert_eq!(best, Some(vec![StateId(0)]));
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn rejects_low_reproduction_rate() {
        let result = SimulationConfig::parse("reproduction:\n  rate: 0.5\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_mutation_out_of_range() {
        let result = SimulationConfig::parse("reproduction:\n  mutation: 1.5\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_floor_above_cap() {
        let yaml = "population:\n  max_population: 50\n  min_population: 100\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_zero_turns_games_and_interval() {
        for yaml in [
            "simulation:\n  max_turns: 0\n",
            "simulation:\n  games: 0\n",
            "simulation:\n  archive_interval: 0\n",
        ] {
            assert!(matches!(
                SimulationConfig::parse(yaml),
                Err(ConfigError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn rejects_matrix_width_mismatch() {
        let yaml = "population:\n  states: 2\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_both_threat_descriptions() {
        let yaml = r"
threat:
  matrix: [[0.5, 0.5, 0.5]]
  predators:
    - survival: { 0: 0.5, 1: 0.5, 2: 0.5 }
";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_spawn_length_mismatch() {
        let yaml = "threat:\n  spawn_distribution: [1.0]\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Threat { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("alarmcall-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
