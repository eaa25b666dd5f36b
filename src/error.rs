//! Error types for the harness

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the harness
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("could not read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config at line {line}: {message}")]
    ConfigParse { line: usize, message: String },

    #[error("{kind} '{name}' is already registered")]
    DuplicateRegistration { kind: &'static str, name: String },

    #[error("{kind} '{name}' is not registered (available: {available})")]
    UnknownName {
        kind: &'static str,
        name: String,
        available: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("environment '{environment}' failed: {message}")]
    Environment {
        environment: String,
        message: String,
    },

    #[error("agent '{agent}' failed: {message}")]
    Agent { agent: String, message: String },

    #[error("environment '{environment}' used after close")]
    EnvironmentClosed { environment: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
