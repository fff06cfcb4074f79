//! Index construction and linear-scan search.
//!
//! One vector per symbol plus one per file. Embedding calls are awaited
//! sequentially; they dominate build latency. A single text failing to
//! embed is skipped with a warning, an unavailable backend aborts the
//! build.

use crate::embedder::Embedder;
use crate::error::{Result, VectorStoreError};
use crate::similarity::cosine_similarity;
use crate::types::{EmbeddingIndex, EmbeddingRecord, IndexMetadata, ScoredEmbedding};
use semindex_extract::{Symbol, SymbolKind};
use semindex_graph::{FileRecord, SymbolGraph};
use std::time::Instant;

/// Names listed per file-level embedding text.
const FILE_TEXT_LIMIT: usize = 10;

/// Build the embedding index for an assembled graph.
pub async fn build_embeddings(
    graph: &SymbolGraph,
    repo_id: &str,
    embedder: &dyn Embedder,
) -> Result<EmbeddingIndex> {
    let started = Instant::now();
    let mut embeddings = Vec::with_capacity(graph.symbols.len() + graph.files.len());

    for symbol in graph.symbols.values() {
        let text = symbol_text(symbol);
        match embedder.embed(&text).await {
            Ok(vector) => embeddings.push(EmbeddingRecord {
                id: symbol.id(),
                symbol_name: symbol.name.clone(),
                symbol_kind: symbol.kind.as_str().to_string(),
                file: symbol.file.clone(),
                line: symbol.line,
                vector,
                text,
                documentation: symbol.documentation.clone(),
                signature: symbol.signature.clone(),
            }),
            Err(err @ VectorStoreError::EmbeddingUnavailable(_)) => return Err(err),
            Err(err) => {
                log::warn!("skipping embedding for symbol '{}': {err}", symbol.id());
            }
        }
    }

    for record in graph.files.values() {
        let text = file_text(record, graph);
        match embedder.embed(&text).await {
            Ok(vector) => embeddings.push(EmbeddingRecord {
                id: format!("file::{}", record.path),
                symbol_name: record.path.clone(),
                symbol_kind: "file".to_string(),
                file: record.path.clone(),
                line: 0,
                vector,
                text,
                documentation: None,
                signature: None,
            }),
            Err(err @ VectorStoreError::EmbeddingUnavailable(_)) => return Err(err),
            Err(err) => {
                log::warn!("skipping embedding for file '{}': {err}", record.path);
            }
        }
    }

    let metadata = IndexMetadata {
        total_embeddings: embeddings.len(),
        build_time_ms: started.elapsed().as_millis() as u64,
        model: embedder.model_id().to_string(),
    };
    log::info!(
        "built embedding index '{repo_id}': {} vectors in {}ms",
        metadata.total_embeddings,
        metadata.build_time_ms
    );

    Ok(EmbeddingIndex {
        repo_id: crate::store::sanitize_repo_id(repo_id),
        embeddings,
        metadata,
    })
}

/// Similarity search: linear scan over every stored vector, descending
/// score, at most `top_k` results with vectors stripped.
pub async fn search(
    index: &EmbeddingIndex,
    query: &str,
    top_k: usize,
    embedder: &dyn Embedder,
) -> Result<Vec<ScoredEmbedding>> {
    let query_vector = embedder.embed(query).await?;

    let mut scored: Vec<ScoredEmbedding> = index
        .embeddings
        .iter()
        .map(|record| {
            ScoredEmbedding::from_record(record, cosine_similarity(&query_vector, &record.vector))
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    Ok(scored)
}

/// Descriptive text for a symbol: kind and name, signature, parameters,
/// documentation, location, enclosing class.
fn symbol_text(symbol: &Symbol) -> String {
    let mut parts = vec![format!("{} {}", symbol.kind.as_str(), symbol.name)];
    if let Some(signature) = &symbol.signature {
        parts.push(signature.clone());
    }
    if !symbol.params.is_empty() {
        parts.push(format!("parameters: {}", symbol.params.join(" ")));
    }
    if let Some(doc) = &symbol.documentation {
        parts.push(doc.clone());
    }
    match symbol.file.rsplit_once('/') {
        Some((dir, name)) => parts.push(format!("in {name} ({dir})")),
        None => parts.push(format!("in {}", symbol.file)),
    }
    if let Some(class) = &symbol.class_name {
        parts.push(format!("class {class}"));
    }
    parts.join("\n")
}

/// Descriptive text for a file: path, language, and up to ten imports,
/// exports and contained symbol names each.
fn file_text(record: &FileRecord, graph: &SymbolGraph) -> String {
    let mut parts = vec![
        format!("file {}", record.path),
        format!("language {}", record.language),
    ];
    if !record.imports.is_empty() {
        let names: Vec<&str> = record
            .imports
            .iter()
            .take(FILE_TEXT_LIMIT)
            .map(String::as_str)
            .collect();
        parts.push(format!("imports: {}", names.join(" ")));
    }
    if !record.exports.is_empty() {
        let names: Vec<&str> = record
            .exports
            .iter()
            .take(FILE_TEXT_LIMIT)
            .map(String::as_str)
            .collect();
        parts.push(format!("exports: {}", names.join(" ")));
    }
    let symbols: Vec<&str> = graph
        .symbols_in_file(&record.path)
        .filter(|s| !matches!(s.kind, SymbolKind::Import | SymbolKind::Export))
        .take(FILE_TEXT_LIMIT)
        .map(|s| s.name.as_str())
        .collect();
    if !symbols.is_empty() {
        parts.push(format!("symbols: {}", symbols.join(" ")));
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::{default_embedder, HashEmbedder};
    use async_trait::async_trait;
    use semindex_graph::{assemble, SourceFile};

    fn sample_graph() -> SymbolGraph {
        assemble(&[
            SourceFile::new(
                "auth.js",
                "// Validates a session token.\nexport function authenticate(token) { return token; }\nexport function logout(session) { return session; }\n",
            ),
            SourceFile::new(
                "db.js",
                "export function query(sql) { return sql; }\n",
            ),
        ])
    }

    #[tokio::test]
    async fn test_build_covers_symbols_and_files() {
        let graph = sample_graph();
        let embedder = default_embedder();
        let index = build_embeddings(&graph, "acme/repo", embedder.as_ref())
            .await
            .unwrap();

        assert_eq!(index.repo_id, "acme_repo");
        assert_eq!(
            index.embeddings.len(),
            graph.symbols.len() + graph.files.len()
        );
        assert_eq!(index.metadata.total_embeddings, index.embeddings.len());
        assert_eq!(index.metadata.model, "hash-embed-v1");

        // every record id maps back to a symbol or a synthetic file id
        for record in &index.embeddings {
            let known = graph.symbols.contains_key(&record.id)
                || record.id == format!("file::{}", record.file);
            assert!(known, "unknown record id {}", record.id);
        }
    }

    #[tokio::test]
    async fn test_uniform_dimensionality() {
        let graph = sample_graph();
        let embedder = HashEmbedder::default();
        let index = build_embeddings(&graph, "repo", &embedder).await.unwrap();
        assert!(index
            .embeddings
            .iter()
            .all(|r| r.vector.len() == embedder.dimension()));
    }

    #[tokio::test]
    async fn test_search_ordering_and_bounds() {
        let graph = sample_graph();
        let embedder = default_embedder();
        let index = build_embeddings(&graph, "repo", embedder.as_ref())
            .await
            .unwrap();

        let results = search(&index, "session token validation", 3, embedder.as_ref())
            .await
            .unwrap();
        assert!(results.len() <= 3);
        assert!(results.len() <= index.embeddings.len());
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_search_returns_exactly_top_k() {
        let embedder = default_embedder();
        let mut embeddings = Vec::new();
        for i in 0..50 {
            let text = format!("function handler{i} processes request {i}");
            embeddings.push(EmbeddingRecord {
                id: format!("src/h.js::handler{i}"),
                symbol_name: format!("handler{i}"),
                symbol_kind: "function".to_string(),
                file: "src/h.js".to_string(),
                line: i + 1,
                vector: embedder.embed(&text).await.unwrap(),
                text,
                documentation: None,
                signature: None,
            });
        }
        let index = EmbeddingIndex {
            repo_id: "synthetic".to_string(),
            embeddings,
            metadata: IndexMetadata {
                total_embeddings: 50,
                build_time_ms: 0,
                model: "hash-embed-v1".to_string(),
            },
        };

        let results = search(&index, "security vulnerabilities", 10, embedder.as_ref())
            .await
            .unwrap();
        assert_eq!(results.len(), 10);
        assert!(results
            .iter()
            .skip(1)
            .all(|r| results[0].score >= r.score));
    }

    #[tokio::test]
    async fn test_search_top_k_larger_than_index() {
        let graph = sample_graph();
        let embedder = default_embedder();
        let index = build_embeddings(&graph, "repo", embedder.as_ref())
            .await
            .unwrap();
        let results = search(&index, "anything", 10_000, embedder.as_ref())
            .await
            .unwrap();
        assert_eq!(results.len(), index.embeddings.len());
    }

    struct FailingEmbedder {
        fatal: bool,
    }

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            if self.fatal {
                Err(VectorStoreError::EmbeddingUnavailable(
                    "backend offline".to_string(),
                ))
            } else {
                Err(VectorStoreError::EmbeddingError("bad text".to_string()))
            }
        }

        fn dimension(&self) -> usize {
            4
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_per_item_failures_are_skipped() {
        let graph = sample_graph();
        let embedder = FailingEmbedder { fatal: false };
        let index = build_embeddings(&graph, "repo", &embedder).await.unwrap();
        assert!(index.embeddings.is_empty());
        assert_eq!(index.metadata.total_embeddings, 0);
    }

    #[tokio::test]
    async fn test_unavailable_backend_aborts_build() {
        let graph = sample_graph();
        let embedder = FailingEmbedder { fatal: true };
        let result = build_embeddings(&graph, "repo", &embedder).await;
        assert!(matches!(
            result,
            Err(VectorStoreError::EmbeddingUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_search_propagates_embedder_failure() {
        let graph = sample_graph();
        let good = default_embedder();
        let index = build_embeddings(&graph, "repo", good.as_ref()).await.unwrap();
        let bad = FailingEmbedder { fatal: true };
        assert!(search(&index, "query", 5, &bad).await.is_err());
    }

    #[test]
    fn test_symbol_text_contents() {
        let graph = sample_graph();
        let auth = &graph.symbols["auth.js::authenticate"];
        let text = symbol_text(auth);
        assert!(text.contains("function authenticate"));
        assert!(text.contains("Validates a session token."));
        assert!(text.contains("auth.js"));
    }
}
