//! Error types for the ngram-suggest library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the [`SuggestError`] enum.
//!
//! # Examples
//!
//! ```
//! use ngram_suggest::error::{Result, SuggestError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SuggestError::config("k should be in [2, 4]"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for ngram-suggest operations.
#[derive(Error, Debug)]
pub enum SuggestError {
    /// I/O errors (file operations, storage backends, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration supplied at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// Index build or on-disk index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Malformed posting list payloads
    #[error("Codec error: {0}")]
    Codec(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Errors raised while merging posting lists
    #[error("Merge error: {0}")]
    Merge(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SuggestError.
pub type Result<T> = std::result::Result<T, SuggestError>;

impl SuggestError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SuggestError::Config(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        SuggestError::Index(msg.into())
    }

    /// Create a new codec error.
    pub fn codec<S: Into<String>>(msg: S) -> Self {
        SuggestError::Codec(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SuggestError::Storage(msg.into())
    }

    /// Create a new merge error.
    pub fn merge<S: Into<String>>(msg: S) -> Self {
        SuggestError::Merge(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SuggestError::Other(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SuggestError::Storage(format!("Not found: {}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SuggestError::config("k should be in [2, 4]");
        assert_eq!(
            error.to_string(),
            "Configuration error: k should be in [2, 4]"
        );

        let error = SuggestError::codec("Incomplete VarInt");
        assert_eq!(error.to_string(), "Codec error: Incomplete VarInt");

        let error = SuggestError::not_found("words.hd");
        assert_eq!(error.to_string(), "Storage error: Not found: words.hd");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let suggest_error = SuggestError::from(io_error);

        match suggest_error {
            SuggestError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
