//! Error type for the CLI layer.
//!
//! The core never fails; everything here is about files, arguments and
//! configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON of the expected shape.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file is missing, malformed or out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command-line argument has an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// Writing the command output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing the command output failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
