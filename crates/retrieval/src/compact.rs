//! Token-budget compaction.
//!
//! The budget check uses a character-count proxy for tokens; the caps are
//! hard limits that hold even when that estimate is wrong.

use crate::bundle::ContextBundle;
use crate::format::format_for_consumption;

pub const MAX_FILES: usize = 5;
pub const MAX_SYMBOLS: usize = 20;
pub const MAX_SNIPPETS_PER_FILE: usize = 2;
pub const MAX_DEPENDENCIES: usize = 10;
pub const MAX_REFERENCES: usize = 10;

/// Rough proxy: four characters of rendered output per token.
const CHARS_PER_TOKEN: usize = 4;

/// Estimated token cost of the rendered bundle.
#[must_use]
pub fn estimated_tokens(bundle: &ContextBundle) -> usize {
    format_for_consumption(bundle).len() / CHARS_PER_TOKEN
}

/// Trim a bundle down to a token budget.
///
/// Trimming order is fixed: drop full file contents, cap files, cap
/// symbols, cap snippets per file, cap dependencies and references. Each
/// step only runs while the estimate is still over budget, but the caps
/// are enforced unconditionally at the end.
#[must_use]
pub fn create_compact_context(bundle: &ContextBundle, token_budget: usize) -> ContextBundle {
    let mut compact = bundle.clone();

    if estimated_tokens(&compact) > token_budget {
        for file in &mut compact.files {
            file.content = None;
        }
    }
    if estimated_tokens(&compact) > token_budget {
        compact.files.truncate(MAX_FILES);
    }
    if estimated_tokens(&compact) > token_budget {
        compact.symbols.truncate(MAX_SYMBOLS);
    }
    if estimated_tokens(&compact) > token_budget {
        for file in &mut compact.files {
            file.snippets.truncate(MAX_SNIPPETS_PER_FILE);
        }
    }
    if estimated_tokens(&compact) > token_budget {
        compact.dependencies.truncate(MAX_DEPENDENCIES);
        compact.references.truncate(MAX_REFERENCES);
    }

    // hard caps, independent of the estimate
    compact.files.truncate(MAX_FILES);
    compact.symbols.truncate(MAX_SYMBOLS);
    for file in &mut compact.files {
        file.snippets.truncate(MAX_SNIPPETS_PER_FILE);
    }
    compact.dependencies.truncate(MAX_DEPENDENCIES);
    compact.references.truncate(MAX_REFERENCES);

    compact.summary.matched_files = compact.files.len();
    compact.summary.matched_symbols = compact.symbols.len();
    compact
        .summary
        .top_files
        .retain(|path| compact.files.iter().any(|f| &f.path == path));

    log::debug!(
        "compacted bundle to ~{} tokens (budget {token_budget})",
        estimated_tokens(&compact)
    );
    compact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Dependency, FileContext, Reference, Snippet, SummaryStats};
    use semindex_graph::{EdgeKind, EdgeTarget};
    use semindex_vector::ScoredEmbedding;

    fn oversized_bundle() -> ContextBundle {
        let snippet = Snippet {
            start_line: 1,
            end_line: 10,
            text: "line\n".repeat(10),
            symbols: vec!["s".to_string()],
        };
        let files: Vec<FileContext> = (0..20)
            .map(|i| FileContext {
                path: format!("src/file{i}.js"),
                language: "javascript".to_string(),
                match_count: 3,
                imports: vec!["x".to_string()],
                exports: vec!["y".to_string()],
                content: Some("content ".repeat(500)),
                snippets: vec![snippet.clone(); 6],
            })
            .collect();
        let symbols: Vec<ScoredEmbedding> = (0..100)
            .map(|i| ScoredEmbedding {
                id: format!("src/file0.js::sym{i}"),
                symbol_name: format!("sym{i}"),
                symbol_kind: "function".to_string(),
                file: "src/file0.js".to_string(),
                line: i + 1,
                text: "text".to_string(),
                documentation: None,
                signature: None,
                score: 1.0 - i as f32 / 100.0,
            })
            .collect();
        let dependencies: Vec<Dependency> = (0..40)
            .map(|i| Dependency {
                file: "src/file0.js".to_string(),
                imported: format!("dep{i}"),
                target: EdgeTarget::Unresolved(format!("./mod::dep{i}")),
            })
            .collect();
        let references: Vec<Reference> = (0..40)
            .map(|i| Reference {
                symbol: format!("sym{i}"),
                from: format!("src/file0.js::sym{i}"),
                to: "lib::target".to_string(),
                kind: EdgeKind::Imports,
            })
            .collect();
        let top_files = files.iter().take(5).map(|f| f.path.clone()).collect();
        ContextBundle {
            query: "q".to_string(),
            files,
            symbols,
            dependencies,
            references,
            summary: SummaryStats {
                top_files,
                ..SummaryStats::default()
            },
        }
    }

    #[test]
    fn test_caps_hold_for_tiny_budget() {
        let compact = create_compact_context(&oversized_bundle(), 10);
        assert!(compact.files.len() <= MAX_FILES);
        assert!(compact.symbols.len() <= MAX_SYMBOLS);
        assert!(compact.dependencies.len() <= MAX_DEPENDENCIES);
        assert!(compact.references.len() <= MAX_REFERENCES);
        assert!(compact
            .files
            .iter()
            .all(|f| f.snippets.len() <= MAX_SNIPPETS_PER_FILE));
        assert!(compact.files.iter().all(|f| f.content.is_none()));
    }

    #[test]
    fn test_caps_hold_even_for_huge_budget() {
        // the estimate never triggers, the caps still must
        let compact = create_compact_context(&oversized_bundle(), usize::MAX);
        assert!(compact.files.len() <= MAX_FILES);
        assert!(compact.symbols.len() <= MAX_SYMBOLS);
        assert!(compact.dependencies.len() <= MAX_DEPENDENCIES);
        assert!(compact.references.len() <= MAX_REFERENCES);
        assert!(compact
            .files
            .iter()
            .all(|f| f.snippets.len() <= MAX_SNIPPETS_PER_FILE));
    }

    #[test]
    fn test_summary_reflects_compaction() {
        let compact = create_compact_context(&oversized_bundle(), 10);
        assert_eq!(compact.summary.matched_files, compact.files.len());
        assert_eq!(compact.summary.matched_symbols, compact.symbols.len());
        assert!(compact
            .summary
            .top_files
            .iter()
            .all(|path| compact.files.iter().any(|f| &f.path == path)));
    }

    #[test]
    fn test_estimate_shrinks() {
        let bundle = oversized_bundle();
        let before = estimated_tokens(&bundle);
        let after = estimated_tokens(&create_compact_context(&bundle, 10));
        assert!(after < before);
    }
}
