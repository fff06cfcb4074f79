use serde::{Deserialize, Serialize};

/// A source file handed to the core by the repository-scanning collaborator.
///
/// Paths are kept exactly as supplied and treated as relative to the
/// analysis root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// File base name without extension ("src/utils.js" -> "utils").
    #[must_use]
    pub fn stem(&self) -> &str {
        file_stem(&self.path)
    }
}

/// Base name of a path without its final extension.
#[must_use]
pub fn file_stem(path: &str) -> &str {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    base.rsplit_once('.').map_or(base, |(stem, _)| stem)
}

/// Category of a single applied repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixKind {
    /// Assignment followed by a method start with no opening brace
    IncompleteObjectLiteral,
    /// Missing statement terminator
    MissingTerminator,
    /// Missing separator between adjacent object members
    MissingMemberSeparator,
    /// Appended closing tokens / removed orphan closers
    UnbalancedBrackets,
    /// Trailing separator directly before a closing token
    OrphanTrailingSeparator,
    /// Exported symbol renamed to match its importers
    ExportRename,
}

impl FixKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncompleteObjectLiteral => "incomplete-object-literal",
            Self::MissingTerminator => "missing-terminator",
            Self::MissingMemberSeparator => "missing-member-separator",
            Self::UnbalancedBrackets => "unbalanced-brackets",
            Self::OrphanTrailingSeparator => "orphan-trailing-separator",
            Self::ExportRename => "export-rename",
        }
    }
}

/// One applied repair, with enough detail to diagnose what changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixDescriptor {
    pub kind: FixKind,
    /// 1-indexed line the fix anchors to, when meaningful
    pub line: Option<usize>,
    pub detail: String,
}

impl FixDescriptor {
    pub fn new(kind: FixKind, line: Option<usize>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            detail: detail.into(),
        }
    }
}

/// Result of running a repair pass over one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// True when at least one rule changed the content
    pub fixed: bool,
    /// Repaired content (identical to the input when `fixed` is false)
    pub content: String,
    pub fixes: Vec<FixDescriptor>,
    /// True when the change is material (differs beyond whitespace)
    pub should_commit: bool,
}

impl RepairOutcome {
    /// The no-op outcome: content passed through untouched.
    #[must_use]
    pub fn unchanged(content: &str) -> Self {
        Self {
            fixed: false,
            content: content.to_string(),
            fixes: Vec::new(),
            should_commit: false,
        }
    }

    pub(crate) fn from_edit(original: &str, content: String, fixes: Vec<FixDescriptor>) -> Self {
        let fixed = content != original && !fixes.is_empty();
        let should_commit = fixed && material_change(original, &content);
        Self {
            fixed,
            content,
            fixes,
            should_commit,
        }
    }
}

/// A repaired file, tagged for the external workflow that decides whether
/// to persist the rewritten content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFix {
    pub file_path: String,
    pub original_content: String,
    pub fixed_content: String,
    pub fixes: Vec<FixDescriptor>,
    pub should_commit: bool,
}

impl FileFix {
    #[must_use]
    pub fn from_outcome(file_path: &str, original: &str, outcome: &RepairOutcome) -> Self {
        Self {
            file_path: file_path.to_string(),
            original_content: original.to_string(),
            fixed_content: outcome.content.clone(),
            fixes: outcome.fixes.clone(),
            should_commit: outcome.should_commit,
        }
    }
}

/// Whitespace-insensitive comparison: a rewrite that only reflows
/// whitespace is not worth a commit.
fn material_change(before: &str, after: &str) -> bool {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    strip(before) != strip(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_stem() {
        assert_eq!(SourceFile::new("src/utils.js", "").stem(), "utils");
        assert_eq!(SourceFile::new("helper.test.ts", "").stem(), "helper.test");
        assert_eq!(SourceFile::new("Makefile", "").stem(), "Makefile");
        assert_eq!(SourceFile::new("a\\b\\mod.py", "").stem(), "mod");
    }

    #[test]
    fn test_material_change() {
        assert!(!material_change("a  b", "a b"));
        assert!(!material_change("a\nb", "a b\n"));
        assert!(material_change("a b", "a b;"));
    }

    #[test]
    fn test_unchanged_outcome() {
        let outcome = RepairOutcome::unchanged("let x = 1;");
        assert!(!outcome.fixed);
        assert!(!outcome.should_commit);
        assert_eq!(outcome.content, "let x = 1;");
    }
}
