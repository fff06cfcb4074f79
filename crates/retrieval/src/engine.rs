//! Context retrieval: search, group, rank, excerpt, cross-reference.

use crate::bundle::{ContextBundle, Dependency, FileContext, Reference, SummaryStats};
use crate::error::Result;
use crate::snippets::extract_snippets;
use semindex_graph::{EdgeKind, SymbolGraph};
use semindex_vector::{search, Embedder, EmbeddingIndex, ScoredEmbedding};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_MAX_FILES: usize = 10;
pub const DEFAULT_MAX_SYMBOLS: usize = 30;
/// References kept per matched symbol.
pub const REFERENCES_PER_SYMBOL: usize = 5;
/// Paths listed in the summary.
const TOP_FILES: usize = 5;

#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Free-text query
    pub query: String,
    pub max_files: usize,
    pub max_symbols: usize,
    /// Embed whole file contents instead of snippets
    pub include_full_files: bool,
}

impl RetrievalOptions {
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_files: DEFAULT_MAX_FILES,
            max_symbols: DEFAULT_MAX_SYMBOLS,
            include_full_files: false,
        }
    }
}

/// Assemble a context bundle for a query.
///
/// Similarity search drives everything: results group by file, files rank
/// by match count, surviving files contribute bounded snippets (or full
/// text on request), and graph edges supply dependencies and references.
/// An unreadable file is omitted with a warning; an unavailable embedding
/// backend propagates.
pub async fn retrieve_context(
    index: &EmbeddingIndex,
    graph: &SymbolGraph,
    root_path: impl AsRef<Path>,
    options: &RetrievalOptions,
    embedder: &dyn Embedder,
) -> Result<ContextBundle> {
    let hits = search(index, &options.query, options.max_symbols, embedder).await?;
    log::debug!(
        "query '{}': {} hits across the index",
        options.query,
        hits.len()
    );

    // group by file; hits arrive ranked, so per-file lists stay best-first
    let mut by_file: BTreeMap<&str, Vec<&ScoredEmbedding>> = BTreeMap::new();
    for hit in &hits {
        by_file.entry(hit.file.as_str()).or_default().push(hit);
    }

    let mut ranked: Vec<(&str, Vec<&ScoredEmbedding>)> = by_file.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.len().cmp(&a.1.len()).then_with(|| {
            let best_a = a.1.first().map_or(0.0, |h| h.score);
            let best_b = b.1.first().map_or(0.0, |h| h.score);
            best_b
                .partial_cmp(&best_a)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    ranked.truncate(options.max_files);

    let root = root_path.as_ref();
    let mut files = Vec::new();
    for (path, file_hits) in &ranked {
        let Some(record) = graph.files.get(*path) else {
            continue;
        };

        let content = match tokio::fs::read_to_string(root.join(path)).await {
            Ok(content) => content,
            Err(err) => {
                log::warn!("{path}: unreadable at snippet stage ({err}), omitted from context");
                continue;
            }
        };

        let symbol_matches: Vec<(usize, String)> = file_hits
            .iter()
            .filter(|h| h.line > 0)
            .map(|h| (h.line, h.symbol_name.clone()))
            .collect();

        let (full, snippets) = if options.include_full_files {
            (Some(content), Vec::new())
        } else {
            (None, extract_snippets(&content, &symbol_matches))
        };

        files.push(FileContext {
            path: (*path).to_string(),
            language: record.language.clone(),
            match_count: file_hits.len(),
            imports: record.imports.clone(),
            exports: record.exports.clone(),
            content: full,
            snippets,
        });
    }

    let dependencies = collect_dependencies(graph, &files);
    let references = collect_references(graph, &hits);
    let summary = summarize(graph, &files, &hits);

    Ok(ContextBundle {
        query: options.query.clone(),
        files,
        symbols: hits,
        dependencies,
        references,
        summary,
    })
}

/// Cross-reference each bundled file's recorded imports against the
/// graph's import edges.
fn collect_dependencies(graph: &SymbolGraph, files: &[FileContext]) -> Vec<Dependency> {
    let mut dependencies = Vec::new();
    for file in files {
        for edge in graph.edges.iter().filter(|e| e.kind == EdgeKind::Imports) {
            let Some((edge_file, name)) = edge.from.split_once("::") else {
                continue;
            };
            if edge_file == file.path && file.imports.iter().any(|i| i == name) {
                dependencies.push(Dependency {
                    file: file.path.clone(),
                    imported: name.to_string(),
                    target: edge.to.clone(),
                });
            }
        }
    }
    dependencies
}

/// Edges whose endpoints textually contain a matched symbol's name,
/// capped per symbol.
fn collect_references(graph: &SymbolGraph, hits: &[ScoredEmbedding]) -> Vec<Reference> {
    let mut references = Vec::new();
    for hit in hits.iter().filter(|h| h.symbol_kind != "file") {
        let mut kept = 0;
        for edge in &graph.edges {
            if kept >= REFERENCES_PER_SYMBOL {
                break;
            }
            if edge.from.contains(&hit.symbol_name) || edge.to.id().contains(&hit.symbol_name) {
                references.push(Reference {
                    symbol: hit.symbol_name.clone(),
                    from: edge.from.clone(),
                    to: edge.to.id().to_string(),
                    kind: edge.kind,
                });
                kept += 1;
            }
        }
    }
    references
}

fn summarize(
    graph: &SymbolGraph,
    files: &[FileContext],
    hits: &[ScoredEmbedding],
) -> SummaryStats {
    let mut symbol_kinds: BTreeMap<String, usize> = BTreeMap::new();
    for hit in hits {
        *symbol_kinds.entry(hit.symbol_kind.clone()).or_default() += 1;
    }

    SummaryStats {
        total_files: graph.files.len(),
        total_symbols: graph.symbols.len(),
        matched_files: files.len(),
        matched_symbols: hits.len(),
        languages: graph.languages(),
        symbol_kinds,
        top_files: files.iter().take(TOP_FILES).map(|f| f.path.clone()).collect(),
    }
}
