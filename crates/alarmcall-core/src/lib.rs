//! Turn loop, configuration, and reporting for the alarm-call simulation.
//!
//! This crate owns the game: it builds a threat model and a population from
//! configuration and runs the spawn, witness, hunt, and reproduce phases
//! until the population dies out or the turn budget is spent.
//!
//! # Modules
//!
//! - [`analysis`] -- Survival chances and convention optimality.
//! - [`archive`] -- [`Archive`] callback keeping a sample of turn records.
//! - [`clock`] -- Turn counter with checked advance and a turn budget.
//! - [`config`] -- Configuration loading from `alarmcall-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`Game`] and the turn loop.
//! - [`experiment`] -- Series of games stopping at the first completed one.
//!
//! [`Archive`]: archive::Archive
//! [`Game`]: engine::Game

pub mod analysis;
pub mod archive;
pub mod clock;
pub mod config;
pub mod engine;
pub mod experiment;
