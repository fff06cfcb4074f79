//! Generic regex extraction, the catch-all when no richer strategy
//! applies. A small ordered list of cross-language signature patterns is
//! tried per line; the first match wins and the rest are skipped.

use crate::types::{Symbol, SymbolKind};
use once_cell::sync::Lazy;
use regex::Regex;

static PATTERNS: Lazy<Vec<(SymbolKind, Regex)>> = Lazy::new(|| {
    [
        (
            SymbolKind::Function,
            r"^\s*(?:export\s+)?(?:async\s+)?function\s+([A-Za-z_$][\w$]*)",
        ),
        (
            SymbolKind::Class,
            r"^\s*(?:export\s+)?(?:abstract\s+)?class\s+([A-Za-z_]\w*)",
        ),
        (
            SymbolKind::Interface,
            r"^\s*(?:export\s+)?interface\s+([A-Za-z_]\w*)",
        ),
        (SymbolKind::Function, r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)"),
        (
            SymbolKind::Function,
            r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+([A-Za-z_]\w*)",
        ),
        (
            SymbolKind::Function,
            r"^\s*func\s+(?:\([^)]*\)\s*)?([A-Za-z_]\w*)",
        ),
        (
            SymbolKind::Function,
            r"^\s*(?:public|private|protected)\s+(?:static\s+)?[\w<>\[\], ]+\s+([A-Za-z_]\w*)\s*\(",
        ),
        (
            SymbolKind::Variable,
            r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)",
        ),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid regex")))
    .collect()
});

pub fn extract(content: &str, file_path: &str) -> Vec<Symbol> {
    let mut symbols = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        for (kind, pattern) in PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                if let Some(name) = caps.get(1) {
                    symbols.push(Symbol::new(name.as_str(), *kind, file_path, idx + 1));
                }
                break;
            }
        }
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_language_patterns() {
        let code = "func (s *Server) Handle(w http.ResponseWriter) {\npub async fn fetch_rows() {\npublic static void main(String[] args) {\nclass Widget\n";
        let symbols = extract(code, "mixed.txt");
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Handle", "fetch_rows", "main", "Widget"]);
    }

    #[test]
    fn test_first_match_per_line() {
        // `function` wins over the variable pattern on the same line
        let code = "export function make() { const inner = 1; }\n";
        let symbols = extract(code, "one.js");
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "make");
        assert_eq!(symbols[0].kind, SymbolKind::Function);
    }

    #[test]
    fn test_empty_for_prose() {
        let symbols = extract("Just a README paragraph.\nNothing to see.\n", "README.md");
        assert!(symbols.is_empty());
    }
}
