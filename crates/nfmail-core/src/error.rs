//! Error types for the nfmail-core library.

use thiserror::Error;

/// Main error type for the nfmail library.
///
/// Classification and extraction are total and never produce one of these;
/// the fallible edges are configuration I/O and serialization.
#[derive(Error, Debug)]
pub enum NfmailError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the nfmail library.
pub type Result<T> = std::result::Result<T, NfmailError>;
