//! @ai:module:intent Define error types for corpus construction and evaluation
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all callbench operations
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal, detected before any output is opened
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed analysis document {path}: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Result count mismatch in {file}: {left} with signatures vs {right} without")]
    LineCountMismatch {
        file: String,
        left: usize,
        right: usize,
    },

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(String),
}

impl Error {
    /// @ai:intent Shorthand for a configuration error
    /// @ai:effects pure
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
