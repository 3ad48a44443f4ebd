//! Error types for heat-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from heat-core
    #[error(transparent)]
    Core(#[from] heat_core::Error),

    /// JSON output could not be produced
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The config file differs from the resolved entries
    #[error("{count} database setting(s) out of sync")]
    Drift { count: usize },
}
