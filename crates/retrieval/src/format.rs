//! Rendering a bundle into the hand-off report.
//!
//! The output is the literal artifact a downstream reasoning step
//! consumes: summary first, then the ranked files with their imports,
//! exports, matched symbols and snippets, then the dependency and
//! reference lists.

use crate::bundle::ContextBundle;
use std::fmt::Write;

pub fn format_for_consumption(bundle: &ContextBundle) -> String {
    let mut out = String::new();
    let summary = &bundle.summary;

    let _ = writeln!(out, "# Code Context: {}\n", bundle.query);

    let _ = writeln!(out, "## Summary");
    let _ = writeln!(
        out,
        "- Repository: {} files, {} symbols",
        summary.total_files, summary.total_symbols
    );
    let _ = writeln!(
        out,
        "- Matched: {} symbols in {} files",
        summary.matched_symbols, summary.matched_files
    );
    if !summary.languages.is_empty() {
        let _ = writeln!(out, "- Languages: {}", summary.languages.join(", "));
    }
    if !summary.symbol_kinds.is_empty() {
        let kinds: Vec<String> = summary
            .symbol_kinds
            .iter()
            .map(|(kind, count)| format!("{kind} ({count})"))
            .collect();
        let _ = writeln!(out, "- Symbol kinds: {}", kinds.join(", "));
    }
    out.push('\n');

    if !summary.top_files.is_empty() {
        let _ = writeln!(out, "## Top Files");
        for path in &summary.top_files {
            let _ = writeln!(out, "- {path}");
        }
        out.push('\n');
    }

    for file in &bundle.files {
        let _ = writeln!(
            out,
            "## {} ({}, {} matches)",
            file.path, file.language, file.match_count
        );
        if !file.imports.is_empty() {
            let _ = writeln!(out, "Imports: {}", file.imports.join(", "));
        }
        if !file.exports.is_empty() {
            let _ = writeln!(out, "Exports: {}", file.exports.join(", "));
        }

        let matched: Vec<String> = bundle
            .symbols
            .iter()
            .filter(|s| s.file == file.path && s.symbol_kind != "file")
            .map(|s| match &s.signature {
                Some(signature) => format!("{} [{}]", signature, s.symbol_kind),
                None => format!("{} [{}]", s.symbol_name, s.symbol_kind),
            })
            .collect();
        if !matched.is_empty() {
            let _ = writeln!(out, "Symbols: {}", matched.join("; "));
        }

        if let Some(content) = &file.content {
            let _ = writeln!(out, "```{}", file.language);
            out.push_str(content);
            if !content.ends_with('\n') {
                out.push('\n');
            }
            let _ = writeln!(out, "```");
        }
        for snippet in &file.snippets {
            let _ = writeln!(
                out,
                "Lines {}-{} ({}):",
                snippet.start_line,
                snippet.end_line,
                snippet.symbols.join(", ")
            );
            let _ = writeln!(out, "```{}", file.language);
            out.push_str(&snippet.text);
            if !snippet.text.ends_with('\n') {
                out.push('\n');
            }
            let _ = writeln!(out, "```");
        }
        out.push('\n');
    }

    if !bundle.dependencies.is_empty() {
        let _ = writeln!(out, "## Dependencies");
        for dep in &bundle.dependencies {
            let marker = if dep.target.is_resolved() { "" } else { " (external)" };
            let _ = writeln!(
                out,
                "- {} imports {} -> {}{marker}",
                dep.file,
                dep.imported,
                dep.target.id()
            );
        }
        out.push('\n');
    }

    if !bundle.references.is_empty() {
        let _ = writeln!(out, "## References");
        for reference in &bundle.references {
            let _ = writeln!(
                out,
                "- {} : {} -> {}",
                reference.symbol, reference.from, reference.to
            );
        }
    }

    out
}
