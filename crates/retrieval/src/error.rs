use semindex_vector::VectorStoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Similarity search failed; there is no fallback when the embedding
    /// backend is unavailable
    #[error("Search failed: {0}")]
    Search(#[from] VectorStoreError),
}
