//! Error types for heat-core

/// Result type for heat-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in heat-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection string does not use an accepted database backend.
    ///
    /// Only the scheme is carried; the rest of the URI may hold credentials.
    #[error(
        "validate_re(): database_connection with scheme `{scheme}` does not match \"{pattern}\""
    )]
    InvalidConnectionString {
        scheme: String,
        pattern: &'static str,
    },

    /// A parameter override could not be applied
    #[error("Invalid parameter {key}: {message}")]
    InvalidParameter { key: String, message: String },

    /// The sync command line could not be parsed
    #[error("Invalid sync command: {message}")]
    InvalidSyncCommand { message: String },

    /// The sync command exited unsuccessfully
    #[error("Sync command `{command}` failed with exit code {code}: {stderr}")]
    SyncFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Filesystem error from heat-fs
    #[error(transparent)]
    Fs(#[from] heat_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
