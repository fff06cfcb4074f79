//! Point queries over the assembled graph, usable independently of full
//! retrieval.

use crate::types::{Edge, SymbolGraph};
use semindex_extract::Symbol;

/// Symbols whose name contains the query, case-insensitive.
pub fn find_by_name<'a>(graph: &'a SymbolGraph, query: &str) -> Vec<&'a Symbol> {
    let needle = query.to_lowercase();
    graph
        .symbols
        .values()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

/// Edges whose endpoints textually contain the symbol name. Textual
/// containment is intentional: it also surfaces qualified forms like
/// `Class.method` and dangling targets.
pub fn find_references<'a>(graph: &'a SymbolGraph, symbol_name: &str) -> Vec<&'a Edge> {
    graph
        .edges
        .iter()
        .filter(|e| e.from.contains(symbol_name) || e.to.id().contains(symbol_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use semindex_repair::SourceFile;

    fn sample_graph() -> SymbolGraph {
        assemble(&[
            SourceFile::new(
                "auth.js",
                "export function authenticate(user) { return user; }\nexport function authorize(user) { return user; }\n",
            ),
            SourceFile::new("app.js", "import { authenticate } from './auth';\n"),
        ])
    }

    #[test]
    fn test_find_by_name_substring() {
        let graph = sample_graph();
        let hits = find_by_name(&graph, "auth");
        assert!(hits.len() >= 2);
        assert!(hits.iter().all(|s| s.name.to_lowercase().contains("auth")));
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let graph = sample_graph();
        assert!(!find_by_name(&graph, "AUTHENTICATE").is_empty());
    }

    #[test]
    fn test_find_by_name_no_match() {
        let graph = sample_graph();
        assert!(find_by_name(&graph, "nonexistent").is_empty());
    }

    #[test]
    fn test_find_references() {
        let graph = sample_graph();
        let refs = find_references(&graph, "authenticate");
        assert!(!refs.is_empty());
        assert!(refs
            .iter()
            .all(|e| e.from.contains("authenticate") || e.to.id().contains("authenticate")));
    }
}
