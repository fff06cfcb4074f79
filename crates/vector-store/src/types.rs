use serde::{Deserialize, Serialize};

/// One embedded symbol or file.
///
/// `id` is either a symbol id (`file::name`) from the graph the index was
/// built from, or the synthetic `file::<path>` id of a file-level record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: String,
    pub symbol_name: String,
    /// Symbol kind tag, or "file" for file-level records
    pub symbol_kind: String,
    pub file: String,
    /// 1-indexed declaration line; 0 for file-level records
    pub line: usize,
    /// All vectors in one index share this dimensionality
    pub vector: Vec<f32>,
    /// The text that was embedded
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub total_embeddings: usize,
    pub build_time_ms: u64,
    /// Model id of the embedder that produced the vectors
    pub model: String,
}

/// The embedding index for one repository analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingIndex {
    /// Sanitized repository identifier this index is keyed by
    pub repo_id: String,
    pub embeddings: Vec<EmbeddingRecord>,
    pub metadata: IndexMetadata,
}

/// A search hit. Carries everything from the stored record except the raw
/// vector, which is stripped to bound payload size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEmbedding {
    pub id: String,
    pub symbol_name: String,
    pub symbol_kind: String,
    pub file: String,
    pub line: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub score: f32,
}

impl ScoredEmbedding {
    #[must_use]
    pub fn from_record(record: &EmbeddingRecord, score: f32) -> Self {
        Self {
            id: record.id.clone(),
            symbol_name: record.symbol_name.clone(),
            symbol_kind: record.symbol_kind.clone(),
            file: record.file.clone(),
            line: record.line,
            text: record.text.clone(),
            documentation: record.documentation.clone(),
            signature: record.signature.clone(),
            score,
        }
    }
}
