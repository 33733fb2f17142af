//! Error types for the voice RAG system

use thiserror::Error;

/// Result type alias for voice RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Voice RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Embedding service error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Completion service error
    #[error("Completion failed: {0}")]
    Completion(String),

    /// Transcription service error
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// Speech synthesis service error
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// Embedding store could not be read or written
    #[error("Embedding store error: {0}")]
    Store(String),

    /// Embedding store holds no documents
    #[error("Embedding store is empty")]
    EmptyStore,

    /// Vectors of different dimensionality were compared or stored together
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a completion error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion(message.into())
    }

    /// Create a transcription error
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription(message.into())
    }

    /// Create a synthesis error
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(message.into())
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Precondition violations that indicate a broken corpus rather than a bad request
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::EmptyStore | Error::DimensionMismatch { .. })
    }
}
