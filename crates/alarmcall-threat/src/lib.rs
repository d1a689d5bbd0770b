//! Predators for the alarm-call simulation.
//!
//! The threat model is the environment side of the game: which predator shows
//! up each turn, and how likely each behavioral state is to survive it.
//!
//! # Modules
//!
//! - [`threat`] -- Survival matrix, spawn distribution, batched hunts
//! - [`profile`] -- Scalar per-predator survival maps
//! - [`error`] -- Construction and lookup errors

pub mod error;
pub mod profile;
pub mod threat;

pub use error::ThreatError;
pub use profile::PredatorProfile;
pub use threat::{SPAWN_SUM_TOLERANCE, ThreatModel, normalized};
