use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    /// One text failed to embed; the build skips it
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// The embedding backend cannot serve at all; fatal for the operation
    #[error("Embedding backend unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// No index stored for this repo id
    #[error("Index not found for repo '{0}'")]
    NotFound(String),

    /// An index file exists but does not parse; distinct from [`Self::NotFound`]
    /// so callers cannot mask corruption by silently rebuilding
    #[error("Stored index for repo '{0}' is corrupt: {1}")]
    CorruptIndex(String, String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}
