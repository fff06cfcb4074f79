//! Cross-file naming repair.
//!
//! Detects exported names that diverge from what importers expect and
//! rewrites the export to match. Best-effort by design: when several files
//! legitimately export near-identical names a false positive is possible;
//! the payoff is catching the common truncated-name typo class
//! (`hlp` exported, `helper` imported).

use crate::similarity::similarity;
use crate::types::{file_stem, FixDescriptor, FixKind, RepairOutcome, SourceFile};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum similarity between a dangling import and the export it replaces.
const RENAME_THRESHOLD: f64 = 0.5;
/// Export/import similarity below this counts as diverged.
const DIVERGENCE_THRESHOLD: f64 = 0.5;
/// Import/file-stem similarity above this marks the import as canonical.
const FILE_MATCH_THRESHOLD: f64 = 0.7;
/// Export names this short and all-lowercase get the weaker file-name rule.
const SHORT_NAME_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Confidence {
    Medium,
    High,
}

#[derive(Debug)]
struct RenameFlag {
    original: String,
    suggested: String,
    confidence: Confidence,
}

/// Reconcile this file's exported names with what other files import from
/// it. Only high-confidence flags rewrite content; weaker ones are logged.
pub fn repair_naming(content: &str, file_path: &str, all_files: &[SourceFile]) -> RepairOutcome {
    let exports = exported_names(content);
    if exports.is_empty() {
        return RepairOutcome::unchanged(content);
    }

    let stem = file_stem(file_path);
    let imported = names_imported_from(file_path, all_files);
    if imported.is_empty() {
        return RepairOutcome::unchanged(content);
    }

    let dangling_imports: Vec<&String> =
        imported.iter().filter(|n| !exports.contains(*n)).collect();
    let dangling_exports: Vec<&String> =
        exports.iter().filter(|n| !imported.contains(*n)).collect();

    let mut flags: Vec<RenameFlag> = Vec::new();

    // An imported name this file does not export, with a close-enough
    // orphaned export, is the truncated-typo case.
    for imp in &dangling_imports {
        let best = dangling_exports
            .iter()
            .map(|exp| (exp, similarity(exp, imp)))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((exp, score)) = best {
            if score >= RENAME_THRESHOLD {
                flags.push(RenameFlag {
                    original: (*exp).clone(),
                    suggested: (*imp).clone(),
                    confidence: Confidence::High,
                });
            }
        }
    }

    // An import that matches the file's own name while every export
    // diverges from it: the file-name convention wins.
    for imp in &dangling_imports {
        if similarity(imp, stem) <= FILE_MATCH_THRESHOLD {
            continue;
        }
        let best = dangling_exports
            .iter()
            .map(|exp| (exp, similarity(exp, imp)))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((exp, score)) = best {
            if score < DIVERGENCE_THRESHOLD {
                flags.push(RenameFlag {
                    original: (*exp).clone(),
                    suggested: (*imp).clone(),
                    confidence: Confidence::High,
                });
            }
        }
    }

    // Weaker: a short all-lowercase export in a file with a longer
    // mixed-case name, while importers ask for the file-name form.
    for exp in &dangling_exports {
        let short_lower = exp.len() <= SHORT_NAME_LEN && exp.chars().all(|c| c.is_lowercase());
        let stem_mixed = stem.len() > exp.len() && stem.chars().any(|c| c.is_uppercase());
        if !short_lower || !stem_mixed {
            continue;
        }
        for imp in &imported {
            if imp.as_str() != exp.as_str() && similarity(imp, stem) > FILE_MATCH_THRESHOLD {
                flags.push(RenameFlag {
                    original: (*exp).clone(),
                    suggested: imp.clone(),
                    confidence: Confidence::Medium,
                });
            }
        }
    }

    apply_flags(content, file_path, dedup_flags(flags))
}

/// Keep one flag per (original, suggested) pair, at the highest confidence.
fn dedup_flags(flags: Vec<RenameFlag>) -> Vec<RenameFlag> {
    let mut out: Vec<RenameFlag> = Vec::new();
    for flag in flags {
        match out
            .iter_mut()
            .find(|f| f.original == flag.original && f.suggested == flag.suggested)
        {
            Some(existing) => existing.confidence = existing.confidence.max(flag.confidence),
            None => out.push(flag),
        }
    }
    out
}

fn apply_flags(content: &str, file_path: &str, flags: Vec<RenameFlag>) -> RepairOutcome {
    let mut current = content.to_string();
    let mut fixes = Vec::new();

    for flag in flags {
        if flag.confidence < Confidence::High {
            log::debug!(
                "{file_path}: export '{}' loosely matches import '{}' (not applied)",
                flag.original,
                flag.suggested
            );
            continue;
        }
        let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(&flag.original))) else {
            continue;
        };
        let replaced = pattern.replace_all(&current, flag.suggested.as_str());
        if replaced != current {
            log::info!(
                "{file_path}: renamed export '{}' -> '{}'",
                flag.original,
                flag.suggested
            );
            current = replaced.into_owned();
            fixes.push(FixDescriptor::new(
                FixKind::ExportRename,
                None,
                format!(
                    "renamed export '{}' to '{}' to match importers",
                    flag.original, flag.suggested
                ),
            ));
        }
    }

    if fixes.is_empty() {
        return RepairOutcome::unchanged(content);
    }
    RepairOutcome::from_edit(content, current, fixes)
}

static EXPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:async\s+)?(?:function\*?|class|const|let|var)\s+([A-Za-z_$][\w$]*)")
        .expect("valid regex")
});
static EXPORT_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s*\{([^}]*)\}").expect("valid regex"));
static IMPORT_STMT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)import\s+(.+?)\s+from\s+['"]([^'"]+)['"]"#).expect("valid regex")
});

/// Names this file exports. `export { a as b }` exports `b`.
fn exported_names(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    for caps in EXPORT_DECL.captures_iter(content) {
        if let Some(name) = caps.get(1) {
            push_unique(&mut names, name.as_str());
        }
    }
    for caps in EXPORT_LIST.captures_iter(content) {
        let inner = caps.get(1).map_or("", |m| m.as_str());
        for entry in inner.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let name = entry
                .split_once(" as ")
                .map_or(entry, |(_, alias)| alias.trim());
            if is_identifier(name) {
                push_unique(&mut names, name);
            }
        }
    }
    names
}

/// Names other files import from `file_path`, matched by specifier stem.
fn names_imported_from(file_path: &str, all_files: &[SourceFile]) -> Vec<String> {
    let stem = file_stem(file_path);
    let mut names = Vec::new();

    for other in all_files {
        if other.path == file_path {
            continue;
        }
        for caps in IMPORT_STMT.captures_iter(&other.content) {
            let clause = caps.get(1).map_or("", |m| m.as_str());
            let specifier = caps.get(2).map_or("", |m| m.as_str());
            if !specifier_targets(specifier, stem) {
                continue;
            }
            for name in import_clause_names(clause) {
                push_unique(&mut names, &name);
            }
        }
    }
    names
}

/// Whether a relative import specifier resolves to the given file stem.
fn specifier_targets(specifier: &str, stem: &str) -> bool {
    if !specifier.starts_with('.') {
        return false;
    }
    let trimmed = specifier.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let base = last.rsplit_once('.').map_or(last, |(s, _)| s);
    if base == "index" {
        let mut segments = trimmed.rsplit('/');
        segments.next();
        return segments.next() == Some(stem);
    }
    base == stem
}

/// Imported names as seen from the exporting module:
/// `import def, { a, b as c } from ...` yields `def`, `a`, `b`.
fn import_clause_names(clause: &str) -> Vec<String> {
    let mut names = Vec::new();

    if let (Some(open), Some(close)) = (clause.find('{'), clause.rfind('}')) {
        if open < close {
            for entry in clause[open + 1..close].split(',') {
                let entry = entry.trim();
                if entry.is_empty() {
                    continue;
                }
                let name = entry
                    .split_once(" as ")
                    .map_or(entry, |(orig, _)| orig.trim());
                if is_identifier(name) {
                    names.push(name.to_string());
                }
            }
        }
    }

    let head = clause.split('{').next().unwrap_or("").trim();
    let head = head.trim_end_matches(',').trim();
    if is_identifier(head) {
        names.push(head.to_string());
    }

    names
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files(pairs: &[(&str, &str)]) -> Vec<SourceFile> {
        pairs
            .iter()
            .map(|(p, c)| SourceFile::new(*p, *c))
            .collect()
    }

    #[test]
    fn test_renames_truncated_export() {
        let utils = "export const hlp = (x) => x * 2;\n";
        let all = files(&[
            ("utils.js", utils),
            ("main.js", "import { helper } from './utils';\nhelper(2);\n"),
        ]);
        let outcome = repair_naming(utils, "utils.js", &all);
        assert!(outcome.fixed);
        assert!(outcome.should_commit);
        assert!(outcome.content.contains("export const helper"));
        assert!(!outcome.content.contains("hlp"));
        assert_eq!(outcome.fixes.len(), 1);
        assert_eq!(outcome.fixes[0].kind, FixKind::ExportRename);
    }

    #[test]
    fn test_noop_when_names_agree() {
        let utils = "export function helper() {}\n";
        let all = files(&[
            ("utils.js", utils),
            ("main.js", "import { helper } from './utils';\n"),
        ]);
        let outcome = repair_naming(utils, "utils.js", &all);
        assert!(!outcome.fixed);
        assert_eq!(outcome.content, utils);
    }

    #[test]
    fn test_file_name_convention_rule() {
        let svc = "export class Svc {}\nexport const cx = 1;\n";
        let all = files(&[
            ("UserService.js", svc),
            (
                "app.js",
                "import { UserService } from './UserService';\nnew UserService();\n",
            ),
        ]);
        let outcome = repair_naming(svc, "UserService.js", &all);
        assert!(outcome.fixed);
        assert!(outcome.content.contains("UserService"));
    }

    #[test]
    fn test_weak_rule_is_not_applied() {
        // `helper` is exported and imported correctly; the extra short
        // export only earns a medium-confidence flag, which must not
        // rewrite anything.
        let content = "export const helper = 1;\nexport const hlp = 2;\n";
        let all = files(&[
            ("Helper.js", content),
            ("main.js", "import { helper } from './Helper';\n"),
        ]);
        let outcome = repair_naming(content, "Helper.js", &all);
        assert!(!outcome.fixed);
        assert_eq!(outcome.content, content);
    }

    #[test]
    fn test_ignores_package_imports() {
        let utils = "export const hlp = 1;\n";
        let all = files(&[
            ("utils.js", utils),
            ("main.js", "import { helper } from 'utils';\n"),
        ]);
        let outcome = repair_naming(utils, "utils.js", &all);
        assert!(!outcome.fixed);
    }

    #[test]
    fn test_specifier_matching() {
        assert!(specifier_targets("./utils", "utils"));
        assert!(specifier_targets("../lib/utils.js", "utils"));
        assert!(specifier_targets("./utils/index", "utils"));
        assert!(!specifier_targets("./other", "utils"));
        assert!(!specifier_targets("utils", "utils"));
    }

    #[test]
    fn test_import_clause_names() {
        assert_eq!(
            import_clause_names("def, { a, b as c }"),
            vec!["a".to_string(), "b".to_string(), "def".to_string()]
        );
        assert_eq!(import_clause_names("* as ns"), Vec::<String>::new());
    }

    #[test]
    fn test_exported_names() {
        let content =
            "export function f() {}\nexport const g = 1;\nexport { inner as outer };\n";
        assert_eq!(exported_names(content), vec!["f", "g", "outer"]);
    }
}
