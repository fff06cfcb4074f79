use semindex_extract::Symbol;
use semindex_repair::FileFix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One analyzed file. Derived entirely from the symbols extracted out of
/// it; `symbol_count` always equals the number of graph symbols whose
/// `file` is this record's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub language: String,
    pub symbol_count: usize,
    /// Content size in bytes
    pub size: usize,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

/// Relationship category between symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Imports,
    Extends,
}

/// Where an edge points.
///
/// Unresolved targets are valid: they represent external modules or
/// symbols this run never extracted, not errors. Consumers must handle
/// both cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum EdgeTarget {
    /// Target exists in this run's symbol table
    Resolved(String),
    /// Dangling reference, kept as `module::name` or a bare name
    Unresolved(String),
}

impl EdgeTarget {
    /// The target id regardless of resolution state.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Resolved(id) | Self::Unresolved(id) => id,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Directed relationship edge. Not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source symbol id (`file::name`)
    pub from: String,
    pub to: EdgeTarget,
    pub kind: EdgeKind,
}

/// The merged, file-spanning result of one analysis run.
///
/// Built once by [`crate::assemble`] and read-only afterwards; every
/// downstream component (embeddings, retrieval) borrows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolGraph {
    /// Symbol id (`file::name`) -> symbol. Collisions keep the last writer.
    pub symbols: BTreeMap<String, Symbol>,
    /// File path -> record
    pub files: BTreeMap<String, FileRecord>,
    pub edges: Vec<Edge>,
    /// Fixes from both repair stages, tagged with `should_commit`
    pub syntax_fixes: Vec<FileFix>,
}

impl SymbolGraph {
    /// Symbols extracted from one file, in id order.
    pub fn symbols_in_file<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.symbols.values().filter(move |s| s.file == path)
    }

    /// Distinct language tags across all files, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> =
            self.files.values().map(|f| f.language.clone()).collect();
        languages.sort();
        languages.dedup();
        languages
    }
}
