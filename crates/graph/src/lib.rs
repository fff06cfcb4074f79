//! # Semindex Graph
//!
//! Merges per-file extraction results into one repository-wide symbol
//! graph: a symbol table keyed by `file::name`, a file table derived from
//! each file's symbols, and a relationship edge list whose targets may be
//! dangling on purpose.
//!
//! The graph is built once per analysis run by [`assemble`] and is
//! read-only afterwards; there is no incremental update path. Point
//! queries ([`find_by_name`], [`find_references`]) work directly on the
//! assembled structure.

mod assembler;
mod query;
mod types;

pub use assembler::assemble;
pub use query::{find_by_name, find_references};
pub use types::{Edge, EdgeKind, EdgeTarget, FileRecord, SymbolGraph};

// Re-export the extraction types the graph is built from
pub use semindex_extract::{Language, SourceFile, Symbol, SymbolKind};
pub use semindex_repair::{FileFix, FixDescriptor, FixKind};
