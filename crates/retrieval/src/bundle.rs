use semindex_graph::{EdgeKind, EdgeTarget};
use semindex_vector::ScoredEmbedding;
use serde::Serialize;
use std::collections::BTreeMap;

/// The ranked, size-bounded collection of files, symbols and snippets
/// assembled for one query. Serializable so callers can hand it off as a
/// single artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ContextBundle {
    pub query: String,
    /// Surviving files, best-ranked first
    pub files: Vec<FileContext>,
    /// Matched symbols across all files, ranked by similarity
    pub symbols: Vec<ScoredEmbedding>,
    pub dependencies: Vec<Dependency>,
    pub references: Vec<Reference>,
    pub summary: SummaryStats,
}

/// One file's share of the bundle.
#[derive(Debug, Clone, Serialize)]
pub struct FileContext {
    pub path: String,
    pub language: String,
    /// Matching symbols that put this file into the bundle
    pub match_count: usize,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    /// Full file text, only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub snippets: Vec<Snippet>,
}

/// A bounded code excerpt around one or more matched symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// 1-indexed, inclusive
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
    /// Symbols this snippet covers
    pub symbols: Vec<String>,
}

/// An import recorded by a bundled file, cross-referenced against graph
/// edges. The target may be dangling.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    pub file: String,
    pub imported: String,
    pub target: EdgeTarget,
}

/// An edge that textually involves a matched symbol.
#[derive(Debug, Clone, Serialize)]
pub struct Reference {
    /// The matched symbol this reference was found for
    pub symbol: String,
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryStats {
    /// Whole-graph counts
    pub total_files: usize,
    pub total_symbols: usize,
    /// Bundle counts
    pub matched_files: usize,
    pub matched_symbols: usize,
    pub languages: Vec<String>,
    /// Histogram of matched symbol kinds
    pub symbol_kinds: BTreeMap<String, usize>,
    /// Best-ranked file paths, at most five
    pub top_files: Vec<String>,
}
