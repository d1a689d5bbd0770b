//! Shared type definitions for the alarm-call convention simulation.
//!
//! This crate is the single source of truth for the identifiers, policies,
//! and report records used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Index newtypes for predators, signals, and states, plus run ids
//! - [`enums`] -- Truncation policy, win condition, turn phases, run outcomes
//! - [`structs`] -- Per-turn records, reproduction statistics, run reports

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{GamePhase, RunOutcome, TruncationPolicy, WinCondition};
pub use ids::{PredatorId, RunId, SignalId, StateId};
pub use structs::{PhaseTimings, ReproductionStats, RunReport, TurnRecord};
