//! # Semindex Extract
//!
//! Per-file structural symbol extraction.
//!
//! ## Architecture
//!
//! ```text
//! SourceFile
//!     │
//!     ├──> Language detection (from extension)
//!     │
//!     ├──> JavaScript / TypeScript ──> Tree-sitter AST walk
//!     │        └─ on parse failure: syntax repair, one retry,
//!     │           then generic extraction
//!     ├──> Python ──> line-pattern extraction
//!     │
//!     └──> anything else ──> generic regex extraction
//! ```
//!
//! [`extract`] is total: whatever the input, it returns a symbol list and
//! never an error. Degradations are logged with the file path and stage so
//! an impoverished extraction stays diagnosable.

mod ast;
mod docs;
mod error;
mod extractor;
mod generic;
mod language;
mod python;
mod types;

pub use error::{ExtractError, Result};
pub use extractor::extract;
pub use language::Language;
pub use types::{Extraction, Symbol, SymbolKind};

// Re-export the repair-layer types that flow through extraction results
pub use semindex_repair::{FileFix, FixDescriptor, FixKind, SourceFile};
