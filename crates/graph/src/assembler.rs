//! Two-phase graph assembly.
//!
//! Phase 1 runs naming repair over the whole file set, using every file as
//! cross-reference context, and keeps repaired content in memory for the
//! rest of the run. Phase 2 extracts each file and merges the results into
//! one graph. Merge policy for colliding symbol ids is last-write-wins.

use crate::types::{Edge, EdgeKind, EdgeTarget, FileRecord, SymbolGraph};
use semindex_extract::{extract, Language, SymbolKind};
use semindex_repair::{file_stem, repair_naming, FileFix, SourceFile};
use std::collections::BTreeMap;

/// Build the repository-wide symbol graph from a snapshot of files.
pub fn assemble(files: &[SourceFile]) -> SymbolGraph {
    let mut graph = SymbolGraph::default();

    // Phase 1: cross-file naming repair, applied in memory before extraction
    let mut repaired: Vec<SourceFile> = Vec::with_capacity(files.len());
    for file in files {
        let outcome = repair_naming(&file.content, &file.path, files);
        if outcome.fixed {
            graph
                .syntax_fixes
                .push(FileFix::from_outcome(&file.path, &file.content, &outcome));
            repaired.push(SourceFile::new(file.path.clone(), outcome.content));
        } else {
            repaired.push(file.clone());
        }
    }

    // Phase 2: per-file extraction, merged last-write-wins
    for file in &repaired {
        let extraction = extract(file);
        if let Some(fix) = extraction.fix {
            graph.syntax_fixes.push(fix);
        }

        let mut record = FileRecord {
            path: file.path.clone(),
            language: Language::from_path(&file.path).as_str().to_string(),
            symbol_count: 0,
            size: file.content.len(),
            imports: Vec::new(),
            exports: Vec::new(),
        };

        for symbol in extraction.symbols {
            match symbol.kind {
                SymbolKind::Import => record.imports.push(symbol.name.clone()),
                SymbolKind::Export => record.exports.push(symbol.name.clone()),
                _ => {}
            }
            let id = symbol.id();
            if let Some(previous) = graph.symbols.insert(id.clone(), symbol) {
                log::debug!(
                    "symbol id collision on '{id}': keeping the later definition (was line {})",
                    previous.line
                );
            }
        }

        graph.files.insert(record.path.clone(), record);
    }

    // Derive per-file counts from the merged table so collisions count once
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for symbol in graph.symbols.values() {
        *counts.entry(symbol.file.as_str()).or_default() += 1;
    }
    let counts: BTreeMap<String, usize> = counts
        .into_iter()
        .map(|(path, count)| (path.to_string(), count))
        .collect();
    for record in graph.files.values_mut() {
        record.symbol_count = counts.get(&record.path).copied().unwrap_or(0);
    }

    build_edges(&mut graph);

    log::info!(
        "assembled graph: {} symbols, {} files, {} edges, {} fixes",
        graph.symbols.len(),
        graph.files.len(),
        graph.edges.len(),
        graph.syntax_fixes.len()
    );
    graph
}

/// Import and extends edges. Targets resolve against the symbol table
/// when possible and stay dangling otherwise.
fn build_edges(graph: &mut SymbolGraph) {
    let mut edges = Vec::new();

    for symbol in graph.symbols.values() {
        match symbol.kind {
            SymbolKind::Import => {
                let module = symbol.source_module.as_deref().unwrap_or("");
                let target_id = format!("{module}::{}", symbol.name);
                let to = match resolve_module_target(graph, module, &symbol.name) {
                    Some(resolved) => EdgeTarget::Resolved(resolved),
                    None => EdgeTarget::Unresolved(target_id),
                };
                edges.push(Edge {
                    from: symbol.id(),
                    to,
                    kind: EdgeKind::Imports,
                });
            }
            SymbolKind::Class => {
                if let Some(base) = &symbol.extends {
                    edges.push(Edge {
                        from: symbol.id(),
                        to: resolve_class_target(graph, base, &symbol.file),
                        kind: EdgeKind::Extends,
                    });
                }
            }
            _ => {}
        }
    }

    graph.edges = edges;
}

/// Match a module specifier against analyzed files by stem and look the
/// imported name up in the target file.
fn resolve_module_target(graph: &SymbolGraph, module: &str, name: &str) -> Option<String> {
    if module.is_empty() {
        return None;
    }
    let stem = file_stem(module.trim_end_matches('/'));
    graph
        .files
        .keys()
        .find(|path| {
            file_stem(path) == stem && graph.symbols.contains_key(&format!("{path}::{name}"))
        })
        .map(|path| format!("{path}::{name}"))
}

/// Superclass lookup: same file first, then any class with that name.
fn resolve_class_target(graph: &SymbolGraph, base: &str, prefer_file: &str) -> EdgeTarget {
    let same_file = format!("{prefer_file}::{base}");
    if graph.symbols.contains_key(&same_file) {
        return EdgeTarget::Resolved(same_file);
    }
    if let Some(symbol) = graph
        .symbols
        .values()
        .find(|s| s.kind == SymbolKind::Class && s.name == base)
    {
        return EdgeTarget::Resolved(symbol.id());
    }
    EdgeTarget::Unresolved(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str, content: &str) -> SourceFile {
        SourceFile::new(path, content)
    }

    #[test]
    fn test_assemble_merges_files() {
        let files = vec![
            source(
                "utils.js",
                "export function helper() { return 1; }\n",
            ),
            source(
                "main.js",
                "import { helper } from './utils';\nfunction main() { return helper(); }\n",
            ),
        ];
        let graph = assemble(&files);

        assert!(graph.symbols.contains_key("utils.js::helper"));
        assert!(graph.symbols.contains_key("main.js::main"));
        assert_eq!(graph.files.len(), 2);

        let main_record = &graph.files["main.js"];
        assert_eq!(main_record.imports, vec!["helper"]);
        assert_eq!(main_record.language, "javascript");
    }

    #[test]
    fn test_symbol_count_invariant() {
        let files = vec![
            source("a.js", "export function one() {}\nfunction two() {}\n"),
            source("b.py", "def three():\n    pass\n"),
        ];
        let graph = assemble(&files);

        for record in graph.files.values() {
            let actual = graph.symbols_in_file(&record.path).count();
            assert_eq!(record.symbol_count, actual, "count mismatch for {}", record.path);
        }
    }

    #[test]
    fn test_import_edge_resolves_to_known_file() {
        let files = vec![
            source("utils.js", "export function helper() { return 1; }\n"),
            source("main.js", "import { helper } from './utils';\n"),
        ];
        let graph = assemble(&files);

        let edge = graph
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::Imports)
            .unwrap();
        assert_eq!(edge.from, "main.js::helper");
        assert_eq!(edge.to, EdgeTarget::Resolved("utils.js::helper".to_string()));
    }

    #[test]
    fn test_import_edge_stays_dangling_for_external_module() {
        let files = vec![source("main.js", "import { readFile } from 'fs/promises';\n")];
        let graph = assemble(&files);

        let edge = &graph.edges[0];
        assert!(!edge.to.is_resolved());
        assert_eq!(edge.to.id(), "fs/promises::readFile");
    }

    #[test]
    fn test_extends_edge() {
        let files = vec![source(
            "model.js",
            "class Base {}\nclass Derived extends Base {}\n",
        )];
        let graph = assemble(&files);

        let edge = graph
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::Extends)
            .unwrap();
        assert_eq!(edge.from, "model.js::Derived");
        assert_eq!(edge.to, EdgeTarget::Resolved("model.js::Base".to_string()));
    }

    #[test]
    fn test_naming_repair_flows_into_fixes() {
        let files = vec![
            source("utils.js", "export const hlp = (x) => x;\n"),
            source("main.js", "import { helper } from './utils';\n"),
        ];
        let graph = assemble(&files);

        assert!(graph.symbols.contains_key("utils.js::helper"));
        let fix = graph
            .syntax_fixes
            .iter()
            .find(|f| f.file_path == "utils.js")
            .unwrap();
        assert!(fix.should_commit);
        assert!(fix.fixed_content.contains("helper"));
    }

    #[test]
    fn test_collision_keeps_last_writer() {
        // the same name twice in one file: one id, one symbol
        let files = vec![source(
            "dup.js",
            "function task() { return 1; }\nfunction task() { return 2; }\n",
        )];
        let graph = assemble(&files);

        assert_eq!(graph.symbols_in_file("dup.js").count(), 1);
        assert_eq!(graph.symbols["dup.js::task"].line, 2);
        assert_eq!(graph.files["dup.js"].symbol_count, 1);
    }
}
