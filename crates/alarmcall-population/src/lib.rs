//! Batched agent strategies for the alarm-call simulation.
//!
//! The population is stored as two one-hot tensors so that witnessing,
//! hunting, and reproduction are whole-array operations instead of loops over
//! agents.
//!
//! # Modules
//!
//! - [`population`] -- The tensors, construction, witness, survival, reproduction
//! - [`views`] -- Counts, chances, and conventions across the population
//! - [`agent`] -- Scalar agents and tensor conversion
//! - [`onehot`] -- Row-wise one-hot helpers shared by both tensors
//! - [`error`] -- Population error type

pub mod agent;
pub mod error;
pub mod onehot;
pub mod population;
pub mod views;

pub use agent::Agent;
pub use error::PopulationError;
pub use population::{PopulationState, Witness};
