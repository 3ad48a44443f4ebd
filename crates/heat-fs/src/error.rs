//! Error types for heat-fs

use std::path::PathBuf;

/// Result type for heat-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in heat-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} file at {path}: {message}")]
    ParamsParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported parameter file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Malformed INI at line {line}: {message}")]
    IniParse { line: usize, message: String },

    #[error("Value for {section}/{key} spans more than one line")]
    MultilineValue { section: String, key: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
