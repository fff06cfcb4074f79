//! # Semindex Repair
//!
//! Heuristic repair passes that run before symbol extraction.
//!
//! Two independent repairs share one outcome shape:
//!
//! - **Syntax repair** ([`repair_syntax`]): an ordered pipeline of
//!   structural rules that fix common malformed-source patterns
//!   (unbalanced brackets, missing terminators and separators, incomplete
//!   object-literal declarations) so a parser can succeed.
//! - **Naming repair** ([`repair_naming`]): a cross-file heuristic that
//!   detects exported names diverging from what importers expect and
//!   corrects the export.
//!
//! Both are total: they never error, and running either on its own output
//! is a no-op. Fixes carry a `should_commit` tag so the external workflow
//! can decide whether repaired content is worth persisting.

mod naming;
mod scan;
mod similarity;
mod syntax;
mod types;

pub use naming::repair_naming;
pub use similarity::similarity;
pub use syntax::repair_syntax;
pub use types::{file_stem, FileFix, FixDescriptor, FixKind, RepairOutcome, SourceFile};
