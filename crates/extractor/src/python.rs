//! Line-oriented extraction for Python sources.
//!
//! No AST here: anchored patterns for `import`/`from ... import`,
//! `def name(params):` and `class Name:` recover the symbols that matter
//! for indexing, plus the docstring directly below a declaration.

use crate::types::{Symbol, SymbolKind};
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^import\s+(.+)$").expect("valid regex"));
static FROM_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^from\s+([\w.]+)\s+import\s+(.+)$").expect("valid regex"));
static DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(async\s+)?def\s+(\w+)\s*\(([^)]*)").expect("valid regex"));
static CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)class\s+(\w+)\s*(?:\(([^)]*)\))?\s*:").expect("valid regex"));

pub fn extract(content: &str, file_path: &str) -> Vec<Symbol> {
    let lines: Vec<&str> = content.lines().collect();
    let mut symbols = Vec::new();
    let mut current_class: Option<String> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if !trimmed.is_empty() && indent == 0 && !trimmed.starts_with('#') && !CLASS.is_match(line)
        {
            current_class = None;
        }

        if let Some(caps) = CLASS.captures(line) {
            let name = caps[2].to_string();
            let mut sym = Symbol::new(&name, SymbolKind::Class, file_path, line_no);
            sym.extends = caps
                .get(3)
                .and_then(|bases| bases.as_str().split(',').next())
                .map(str::trim)
                .filter(|base| !base.is_empty() && *base != "object")
                .map(ToString::to_string);
            sym.signature = Some(format!("class {name}"));
            sym.documentation = docstring_below(&lines, idx);
            if caps[1].is_empty() {
                current_class = Some(name);
            }
            symbols.push(sym);
            continue;
        }

        if let Some(caps) = DEF.captures(line) {
            let def_indent = caps[1].len();
            let is_async = caps.get(2).is_some();
            let name = caps[3].to_string();
            let params: Vec<String> = caps[4]
                .split(',')
                .map(clean_param)
                .filter(|p| !p.is_empty())
                .collect();

            let class_name = current_class
                .as_ref()
                .filter(|_| def_indent > 0)
                .cloned();
            let (sym_name, kind) = match &class_name {
                Some(cls) => (format!("{cls}.{name}"), SymbolKind::Method),
                None => (name.clone(), SymbolKind::Function),
            };

            let mut sym = Symbol::new(&sym_name, kind, file_path, line_no);
            sym.class_name = class_name;
            sym.is_async = is_async;
            sym.signature = Some(format!(
                "{}def {}({})",
                if is_async { "async " } else { "" },
                sym_name,
                params.join(", ")
            ));
            sym.params = params;
            sym.documentation = docstring_below(&lines, idx);
            symbols.push(sym);
            continue;
        }

        if let Some(caps) = FROM_IMPORT.captures(trimmed) {
            let module = caps[1].to_string();
            for entry in caps[2].split(',') {
                let name = import_binding(entry);
                if name.is_empty() || name == "*" {
                    continue;
                }
                let mut sym = Symbol::new(name, SymbolKind::Import, file_path, line_no);
                sym.source_module = Some(module.clone());
                symbols.push(sym);
            }
            continue;
        }

        if let Some(caps) = IMPORT.captures(trimmed) {
            for entry in caps[1].split(',') {
                let module = entry.trim().split_whitespace().next().unwrap_or("");
                let name = import_binding(entry);
                if name.is_empty() {
                    continue;
                }
                let mut sym = Symbol::new(name, SymbolKind::Import, file_path, line_no);
                sym.source_module = Some(module.to_string());
                symbols.push(sym);
            }
        }
    }

    symbols
}

/// `name`, `name as alias` -> the bound name. Parenthesized import lists
/// leave brackets on the split entries.
fn import_binding(entry: &str) -> &str {
    let entry = entry.trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')');
    entry
        .split_once(" as ")
        .map_or(entry, |(_, alias)| alias.trim())
}

/// Strip annotation and default from a parameter.
fn clean_param(param: &str) -> String {
    let param = param.trim();
    let param = param.split(':').next().unwrap_or(param);
    let param = param.split('=').next().unwrap_or(param);
    param.trim().to_string()
}

/// Triple-quoted string directly below a `def`/`class` line.
fn docstring_below(lines: &[&str], decl_idx: usize) -> Option<String> {
    let mut idx = decl_idx + 1;
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    let first = lines.get(idx)?.trim();
    let delim = if first.starts_with("\"\"\"") {
        "\"\"\""
    } else if first.starts_with("'''") {
        "'''"
    } else {
        return None;
    };

    let body = &first[delim.len()..];
    if let Some(end) = body.find(delim) {
        let text = body[..end].trim();
        return (!text.is_empty()).then(|| text.to_string());
    }

    let mut collected = vec![body.trim_end().to_string()];
    for line in lines.iter().skip(idx + 1) {
        if let Some(end) = line.find(delim) {
            collected.push(line[..end].trim_end().to_string());
            break;
        }
        collected.push(line.trim_end().to_string());
    }
    let text = collected.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functions_and_classes() {
        let code = "import os\nfrom queue import Queue, Empty as QueueEmpty\n\ndef run(job, retries=3):\n    \"\"\"Run a job.\"\"\"\n    pass\n\nclass Worker(Thread):\n    def start(self):\n        pass\n\n    async def poll(self, timeout: float = 1.0):\n        pass\n";
        let symbols = extract(code, "worker.py");

        let imports: Vec<&str> = symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Import)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(imports, vec!["os", "Queue", "QueueEmpty"]);

        let run = symbols.iter().find(|s| s.name == "run").unwrap();
        assert_eq!(run.kind, SymbolKind::Function);
        assert_eq!(run.params, vec!["job", "retries"]);
        assert_eq!(run.documentation.as_deref(), Some("Run a job."));

        let worker = symbols.iter().find(|s| s.name == "Worker").unwrap();
        assert_eq!(worker.kind, SymbolKind::Class);
        assert_eq!(worker.extends.as_deref(), Some("Thread"));

        let poll = symbols.iter().find(|s| s.name == "Worker.poll").unwrap();
        assert_eq!(poll.kind, SymbolKind::Method);
        assert!(poll.is_async);
        assert_eq!(poll.params, vec!["self", "timeout"]);
    }

    #[test]
    fn test_class_tracking_resets_at_top_level() {
        let code = "class A:\n    def m(self):\n        pass\n\nVALUE = 1\n\ndef standalone():\n    pass\n";
        let symbols = extract(code, "mod.py");
        let standalone = symbols.iter().find(|s| s.name == "standalone").unwrap();
        assert_eq!(standalone.kind, SymbolKind::Function);
        assert!(standalone.class_name.is_none());
    }

    #[test]
    fn test_multiline_docstring() {
        let code = "def f():\n    \"\"\"First line.\n    Second line.\n    \"\"\"\n    pass\n";
        let symbols = extract(code, "f.py");
        let doc = symbols[0].documentation.as_deref().unwrap();
        assert!(doc.contains("First line."));
        assert!(doc.contains("Second line."));
    }

    #[test]
    fn test_parenthesized_from_import() {
        let code = "from queue import (Queue, Empty)\n";
        let symbols = extract(code, "q.py");
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Queue", "Empty"]);
    }

    #[test]
    fn test_never_fails_on_garbage() {
        let symbols = extract("@@@ ??? \u{0} ::", "junk.py");
        assert!(symbols.is_empty());
    }
}
