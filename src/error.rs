//! Error types for docseg library.

use std::io;
use thiserror::Error;

/// Result type alias for docseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting documents.
///
/// The chunking passes never fail on their input; errors come from
/// configuration, I/O and downstream collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading elements or writing segments as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid chunking or windowing configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A summarizer call failed.
    #[error("Summarization error: {0}")]
    Summarize(String),

    /// A vector store rejected a document.
    #[error("Index error: {0}")]
    Index(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
