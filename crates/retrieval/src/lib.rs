//! # Semindex Retrieval
//!
//! The consumer-facing surface of the semantic code index.
//!
//! ## Pipeline
//!
//! ```text
//! files ──> build_index ──> SymbolGraph
//!                               │
//!               build_embeddings┴──> EmbeddingIndex (IndexStore lifecycle)
//!                                          │
//!            retrieve_context(query) ──────┴──> ContextBundle
//!                     │
//!                     ├──> create_compact_context(token_budget)
//!                     └──> format_for_consumption ──> hand-off report
//! ```
//!
//! Point queries (`find_by_name`, `find_references`, [`find_similar`])
//! work without assembling a full bundle.

mod bundle;
mod compact;
mod engine;
mod error;
mod format;
mod intents;
mod snippets;

pub use bundle::{ContextBundle, Dependency, FileContext, Reference, Snippet, SummaryStats};
pub use compact::{
    create_compact_context, estimated_tokens, MAX_DEPENDENCIES, MAX_FILES, MAX_REFERENCES,
    MAX_SNIPPETS_PER_FILE, MAX_SYMBOLS,
};
pub use engine::{retrieve_context, RetrievalOptions, DEFAULT_MAX_FILES, DEFAULT_MAX_SYMBOLS};
pub use error::{Result, RetrievalError};
pub use format::format_for_consumption;
pub use intents::{retrieve_for_intent, Intent};

// The rest of the core, re-exported so one dependency covers the whole
// contract
pub use semindex_graph::{
    assemble, find_by_name, find_references, Edge, EdgeKind, EdgeTarget, FileRecord, SourceFile,
    Symbol, SymbolGraph, SymbolKind,
};
pub use semindex_repair::{FileFix, FixDescriptor, FixKind, RepairOutcome};
pub use semindex_vector::{
    build_embeddings, default_embedder, search, Embedder, EmbeddingIndex, EmbeddingRecord,
    HashEmbedder, IndexStore, ScoredEmbedding,
};

/// Build the symbol graph for a snapshot of files.
///
/// Alias of [`assemble`]; the other half of the public contract is
/// [`build_embeddings`].
pub fn build_index(files: &[SourceFile]) -> SymbolGraph {
    assemble(files)
}

/// Similarity point query, independent of full retrieval.
pub async fn find_similar(
    index: &EmbeddingIndex,
    text: &str,
    top_k: usize,
    embedder: &dyn Embedder,
) -> Result<Vec<ScoredEmbedding>> {
    Ok(search(index, text, top_k, embedder).await?)
}
