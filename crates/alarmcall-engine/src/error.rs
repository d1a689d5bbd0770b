//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: alarmcall_core::config::ConfigError,
    },

    /// A game aborted.
    #[error("run error: {source}")]
    Run {
        /// The underlying run error.
        #[from]
        source: alarmcall_core::engine::RunError,
    },

    /// The final convention report could not be built.
    #[error("analysis error: {source}")]
    Analysis {
        /// The underlying analysis error.
        #[from]
        source: alarmcall_core::analysis::AnalysisError,
    },

    /// A report could not be serialized.
    #[error("failed to serialize report: {source}")]
    Serialize {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
