//! # Semindex Vector
//!
//! Embedding index over an assembled symbol graph.
//!
//! ## Architecture
//!
//! ```text
//! SymbolGraph
//!     │
//!     ├──> descriptive text per symbol + per file
//!     │
//!     ├──> Embedder (injected; cached hash-based default)
//!     │        └─> Vec<f32>[384], unit-normalized
//!     │
//!     ├──> EmbeddingIndex ──> linear-scan cosine search
//!     │
//!     └──> IndexStore ──> one JSON document per sanitized repo id
//! ```
//!
//! Search is a deliberate linear scan: indexes cover one repository for
//! one run, and rebuilds are from scratch, so an ANN structure would buy
//! nothing here.

mod builder;
mod embedder;
mod error;
mod similarity;
mod store;
mod types;

pub use builder::{build_embeddings, search};
pub use embedder::{default_embedder, Embedder, HashEmbedder, DEFAULT_DIMENSION};
pub use error::{Result, VectorStoreError};
pub use similarity::cosine_similarity;
pub use store::{sanitize_repo_id, IndexStore};
pub use types::{EmbeddingIndex, EmbeddingRecord, IndexMetadata, ScoredEmbedding};
