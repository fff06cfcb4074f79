//! Tree-sitter extraction for the JavaScript family.
//!
//! Walks top-level declarations only: imports, functions, classes and
//! their members, variable declarations (descending into object-literal
//! namespaces and function-valued bindings), exports, and the TypeScript
//! type declarations. Nested function scopes are not indexed.

use crate::docs::doc_comment_above;
use crate::error::{ExtractError, Result};
use crate::language::Language;
use crate::types::{Symbol, SymbolKind};
use tree_sitter::{Node, Parser};

pub struct AstExtractor {
    parser: Parser,
    #[allow(dead_code)]
    language: Language,
}

impl AstExtractor {
    pub fn new(language: Language) -> Result<Self> {
        let ts_language = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| ExtractError::TreeSitterError(format!("failed to set language: {e}")))?;
        Ok(Self { parser, language })
    }

    /// Parse and extract top-level symbols. Errors when the tree contains
    /// syntax errors, which is the signal for the repair-and-retry chain.
    pub fn extract(&mut self, content: &str, file_path: &str) -> Result<Vec<Symbol>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| ExtractError::ParseError("parser produced no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::ParseError(format!(
                "{file_path}: source contains syntax errors"
            )));
        }

        let lines: Vec<&str> = content.lines().collect();
        let mut symbols = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            self.extract_statement(child, content, &lines, file_path, &mut symbols, false);
        }
        Ok(symbols)
    }

    fn extract_statement(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        file: &str,
        symbols: &mut Vec<Symbol>,
        exported: bool,
    ) {
        match node.kind() {
            "import_statement" => self.extract_import(node, content, file, symbols),
            "function_declaration" | "generator_function_declaration" => {
                if let Some(sym) = self.function_symbol(node, content, lines, file) {
                    if exported {
                        symbols.push(export_symbol(&sym.name, file, sym.line));
                    }
                    symbols.push(sym);
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                self.extract_class(node, content, lines, file, symbols, exported);
            }
            "lexical_declaration" | "variable_declaration" => {
                self.extract_variables(node, content, lines, file, symbols, exported);
            }
            "export_statement" => self.extract_export(node, content, lines, file, symbols),
            "interface_declaration" => {
                if let Some(sym) =
                    self.named_symbol(node, content, lines, file, SymbolKind::Interface, "interface")
                {
                    if exported {
                        symbols.push(export_symbol(&sym.name, file, sym.line));
                    }
                    symbols.push(sym);
                }
            }
            "type_alias_declaration" | "enum_declaration" => {
                if let Some(sym) =
                    self.named_symbol(node, content, lines, file, SymbolKind::TypeAlias, "type")
                {
                    if exported {
                        symbols.push(export_symbol(&sym.name, file, sym.line));
                    }
                    symbols.push(sym);
                }
            }
            _ => {}
        }
    }

    /// One import symbol per named binding, carrying the source module.
    fn extract_import(&self, node: Node, content: &str, file: &str, symbols: &mut Vec<Symbol>) {
        let source = node
            .child_by_field_name("source")
            .map(|n| strip_quotes(node_text(n, content)).to_string());
        let line = node.start_position().row + 1;

        let mut cursor = node.walk();
        let Some(clause) = node
            .children(&mut cursor)
            .find(|c| c.kind() == "import_clause")
        else {
            // side-effect import with no bindings
            return;
        };

        let mut push = |name: &str| {
            let mut sym = Symbol::new(name, SymbolKind::Import, file, line);
            sym.source_module = source.clone();
            symbols.push(sym);
        };

        let mut clause_cursor = clause.walk();
        for child in clause.children(&mut clause_cursor) {
            match child.kind() {
                "identifier" => push(node_text(child, content)),
                "namespace_import" => {
                    let mut ns_cursor = child.walk();
                    let ident = child
                        .children(&mut ns_cursor)
                        .find(|c| c.kind() == "identifier");
                    if let Some(ident) = ident {
                        push(node_text(ident, content));
                    }
                }
                "named_imports" => {
                    let mut spec_cursor = child.walk();
                    for spec in child.children(&mut spec_cursor) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        if let Some(name) = spec.child_by_field_name("name") {
                            push(node_text(name, content));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn function_symbol(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        file: &str,
    ) -> Option<Symbol> {
        let name = node_text(node.child_by_field_name("name")?, content).to_string();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| parameter_names(p, content))
            .unwrap_or_default();
        let is_async = has_keyword(node, "async");
        let line = node.start_position().row + 1;

        let mut sym = Symbol::new(&name, SymbolKind::Function, file, line);
        sym.is_async = is_async;
        sym.signature = Some(format!(
            "{}function {}({})",
            if is_async { "async " } else { "" },
            name,
            params.join(", ")
        ));
        sym.params = params;
        sym.documentation = doc_comment_above(lines, node.start_position().row);
        Some(sym)
    }

    fn extract_class(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        file: &str,
        symbols: &mut Vec<Symbol>,
        exported: bool,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let class_name = node_text(name_node, content).to_string();
        let line = node.start_position().row + 1;
        let extends = extract_heritage(node, content);

        let mut class_sym = Symbol::new(&class_name, SymbolKind::Class, file, line);
        class_sym.signature = Some(match &extends {
            Some(base) => format!("class {class_name} extends {base}"),
            None => format!("class {class_name}"),
        });
        class_sym.extends = extends;
        class_sym.documentation = doc_comment_above(lines, node.start_position().row);

        if exported {
            symbols.push(export_symbol(&class_name, file, line));
        }
        symbols.push(class_sym);

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                "method_definition" => {
                    if let Some(sym) =
                        self.method_symbol(member, content, lines, &class_name, file)
                    {
                        symbols.push(sym);
                    }
                }
                "field_definition" | "public_field_definition" => {
                    self.extract_class_field(member, content, lines, &class_name, file, symbols);
                }
                _ => {}
            }
        }
    }

    fn method_symbol(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        class_name: &str,
        file: &str,
    ) -> Option<Symbol> {
        let method_name = node_text(node.child_by_field_name("name")?, content).to_string();
        let qualified = format!("{class_name}.{method_name}");
        let params = node
            .child_by_field_name("parameters")
            .map(|p| parameter_names(p, content))
            .unwrap_or_default();
        let is_async = has_keyword(node, "async");
        let is_static = has_keyword(node, "static");
        let line = node.start_position().row + 1;

        let mut sym = Symbol::new(&qualified, SymbolKind::Method, file, line);
        sym.class_name = Some(class_name.to_string());
        sym.is_async = is_async;
        sym.is_static = is_static;
        sym.signature = Some(format!(
            "{}{}{}({})",
            if is_static { "static " } else { "" },
            if is_async { "async " } else { "" },
            qualified,
            params.join(", ")
        ));
        sym.params = params;
        sym.documentation = doc_comment_above(lines, node.start_position().row);
        Some(sym)
    }

    /// A class field is a variable unless it holds a function value.
    fn extract_class_field(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        class_name: &str,
        file: &str,
        symbols: &mut Vec<Symbol>,
    ) {
        let Some(name_node) = node.child_by_field_name("property") else {
            return;
        };
        let field_name = node_text(name_node, content).to_string();
        let qualified = format!("{class_name}.{field_name}");
        let line = node.start_position().row + 1;

        let value = node.child_by_field_name("value");
        let is_function = value.is_some_and(|v| is_function_value(v.kind()));

        let kind = if is_function {
            SymbolKind::Method
        } else {
            SymbolKind::Variable
        };
        let mut sym = Symbol::new(&qualified, kind, file, line);
        sym.class_name = Some(class_name.to_string());
        sym.is_static = has_keyword(node, "static");
        if let Some(value) = value.filter(|v| is_function_value(v.kind())) {
            sym.is_async = has_keyword(value, "async");
            sym.params = function_value_params(value, content);
            sym.signature = Some(format!("{}({})", qualified, sym.params.join(", ")));
        }
        sym.documentation = doc_comment_above(lines, node.start_position().row);
        symbols.push(sym);
    }

    fn extract_variables(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        file: &str,
        symbols: &mut Vec<Symbol>,
        exported: bool,
    ) {
        let decl_kind = node
            .child(0)
            .map_or("var", |c| node_text(c, content))
            .to_string();

        let mut cursor = node.walk();
        for declarator in node.children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let line = declarator.start_position().row + 1;

            if name_node.kind() != "identifier" {
                // destructured declaration: one variable per bound name
                for ident in pattern_identifiers(name_node, content) {
                    let mut sym = Symbol::new(&ident, SymbolKind::Variable, file, line);
                    sym.signature = Some(format!("{decl_kind} {ident}"));
                    if exported {
                        symbols.push(export_symbol(&ident, file, line));
                    }
                    symbols.push(sym);
                }
                continue;
            }

            let name = node_text(name_node, content).to_string();
            if exported {
                symbols.push(export_symbol(&name, file, line));
            }

            let value = declarator.child_by_field_name("value");
            match value {
                Some(value) if is_function_value(value.kind()) => {
                    let is_async = has_keyword(value, "async");
                    let params = function_value_params(value, content);
                    let mut sym = Symbol::new(&name, SymbolKind::Function, file, line);
                    sym.is_async = is_async;
                    sym.signature = Some(format!(
                        "{}{}({})",
                        if is_async { "async " } else { "" },
                        name,
                        params.join(", ")
                    ));
                    sym.params = params;
                    sym.documentation = doc_comment_above(lines, declarator.start_position().row);
                    symbols.push(sym);
                }
                Some(value) if value.kind() == "object" => {
                    let mut sym = Symbol::new(&name, SymbolKind::Variable, file, line);
                    sym.signature = Some(format!("{decl_kind} {name}"));
                    sym.documentation = doc_comment_above(lines, declarator.start_position().row);
                    symbols.push(sym);
                    self.extract_object_members(value, content, lines, &name, file, symbols);
                }
                _ => {
                    let mut sym = Symbol::new(&name, SymbolKind::Variable, file, line);
                    sym.signature = Some(format!("{decl_kind} {name}"));
                    sym.documentation = doc_comment_above(lines, declarator.start_position().row);
                    symbols.push(sym);
                }
            }
        }
    }

    /// Members of an object literal bound to a name: the object acts as a
    /// namespace, so its methods index like class members.
    fn extract_object_members(
        &self,
        object: Node,
        content: &str,
        lines: &[&str],
        owner: &str,
        file: &str,
        symbols: &mut Vec<Symbol>,
    ) {
        let mut cursor = object.walk();
        for member in object.children(&mut cursor) {
            match member.kind() {
                "method_definition" => {
                    if let Some(sym) = self.method_symbol(member, content, lines, owner, file) {
                        symbols.push(sym);
                    }
                }
                "pair" => {
                    let Some(key) = member.child_by_field_name("key") else {
                        continue;
                    };
                    let Some(value) = member.child_by_field_name("value") else {
                        continue;
                    };
                    if !is_function_value(value.kind()) {
                        continue;
                    }
                    let key_name = strip_quotes(node_text(key, content)).to_string();
                    let qualified = format!("{owner}.{key_name}");
                    let line = member.start_position().row + 1;
                    let is_async = has_keyword(value, "async");
                    let params = function_value_params(value, content);

                    let mut sym = Symbol::new(&qualified, SymbolKind::Method, file, line);
                    sym.class_name = Some(owner.to_string());
                    sym.is_async = is_async;
                    sym.signature = Some(format!(
                        "{}{}({})",
                        if is_async { "async " } else { "" },
                        qualified,
                        params.join(", ")
                    ));
                    sym.params = params;
                    sym.documentation = doc_comment_above(lines, member.start_position().row);
                    symbols.push(sym);
                }
                _ => {}
            }
        }
    }

    fn extract_export(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        file: &str,
        symbols: &mut Vec<Symbol>,
    ) {
        if let Some(decl) = node.child_by_field_name("declaration") {
            self.extract_statement(decl, content, lines, file, symbols, true);
            return;
        }

        let line = node.start_position().row + 1;
        let mut emitted = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "export_clause" {
                continue;
            }
            let mut spec_cursor = child.walk();
            for spec in child.children(&mut spec_cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let exported_name = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"));
                if let Some(name) = exported_name {
                    symbols.push(export_symbol(node_text(name, content), file, line));
                    emitted = true;
                }
            }
        }

        if !emitted && has_keyword(node, "default") {
            // `export default <expr>;` keeps the identifier name when there
            // is one, otherwise the synthetic "default"
            let name = node
                .child_by_field_name("value")
                .filter(|v| v.kind() == "identifier")
                .map_or("default", |v| node_text(v, content));
            symbols.push(export_symbol(name, file, line));
        }
    }

    fn named_symbol(
        &self,
        node: Node,
        content: &str,
        lines: &[&str],
        file: &str,
        kind: SymbolKind,
        keyword: &str,
    ) -> Option<Symbol> {
        let name = node_text(node.child_by_field_name("name")?, content).to_string();
        let line = node.start_position().row + 1;
        let mut sym = Symbol::new(&name, kind, file, line);
        sym.signature = Some(format!("{keyword} {name}"));
        sym.documentation = doc_comment_above(lines, node.start_position().row);
        Some(sym)
    }
}

fn export_symbol(name: &str, file: &str, line: usize) -> Symbol {
    Symbol::new(name, SymbolKind::Export, file, line)
}

fn node_text<'a>(node: Node, content: &'a str) -> &'a str {
    content.get(node.byte_range()).unwrap_or("")
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

fn has_keyword(node: Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == keyword);
    found
}

/// `class X extends Y` / TS `extends_clause`: the superclass reference.
fn extract_heritage(class_node: Node, content: &str) -> Option<String> {
    let mut cursor = class_node.walk();
    let heritage = class_node
        .children(&mut cursor)
        .find(|c| c.kind() == "class_heritage")?;

    let mut h_cursor = heritage.walk();
    for child in heritage.children(&mut h_cursor) {
        if child.kind() == "extends_clause" {
            let mut e_cursor = child.walk();
            return child
                .children(&mut e_cursor)
                .filter(|c| c.is_named())
                .last()
                .map(|c| node_text(c, content).to_string());
        }
    }

    let mut h_cursor = heritage.walk();
    heritage
        .children(&mut h_cursor)
        .filter(|c| c.is_named())
        .last()
        .map(|c| node_text(c, content).to_string())
}

fn is_function_value(kind: &str) -> bool {
    matches!(kind, "arrow_function" | "function_expression" | "function")
}

/// Every identifier bound by a destructuring pattern.
fn pattern_identifiers(node: Node, content: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_pattern_identifiers(node, content, &mut out);
    out
}

fn collect_pattern_identifiers(node: Node, content: &str, out: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            out.push(node_text(node, content).to_string());
            return;
        }
        // `{ key: renamed }` binds the value side only
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_pattern_identifiers(value, content, out);
            }
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_pattern_identifiers(child, content, out);
    }
}

/// Parameters of an arrow function or function expression; a bare
/// single-identifier arrow uses the `parameter` field.
fn function_value_params(value: Node, content: &str) -> Vec<String> {
    value
        .child_by_field_name("parameters")
        .or_else(|| value.child_by_field_name("parameter"))
        .map(|p| parameter_names(p, content))
        .unwrap_or_default()
}

/// Parameter names: default and rest forms keep their identifier,
/// destructured patterns reduce to a placeholder.
fn parameter_names(params: Node, content: &str) -> Vec<String> {
    if params.kind() == "identifier" {
        return vec![node_text(params, content).to_string()];
    }

    let mut out = Vec::new();
    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        if let Some(name) = single_parameter_name(child, content) {
            out.push(name);
        }
    }
    out
}

fn single_parameter_name(node: Node, content: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(node, content).to_string()),
        "assignment_pattern" => {
            let left = node.child_by_field_name("left")?;
            if left.kind() == "identifier" {
                Some(node_text(left, content).to_string())
            } else {
                Some("destructured".to_string())
            }
        }
        "rest_pattern" => {
            let mut cursor = node.walk();
            let inner = node
                .children(&mut cursor)
                .find(|c| c.kind() == "identifier")
                .map_or("args", |c| node_text(c, content));
            Some(format!("...{inner}"))
        }
        "object_pattern" | "array_pattern" => Some("destructured".to_string()),
        // TypeScript wraps every parameter
        "required_parameter" | "optional_parameter" => {
            let pattern = node.child_by_field_name("pattern")?;
            single_parameter_name(pattern, content)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_js(code: &str) -> Vec<Symbol> {
        let mut extractor = AstExtractor::new(Language::JavaScript).unwrap();
        extractor.extract(code, "test.js").unwrap()
    }

    fn extract_ts(code: &str) -> Vec<Symbol> {
        let mut extractor = AstExtractor::new(Language::TypeScript).unwrap();
        extractor.extract(code, "test.ts").unwrap()
    }

    #[test]
    fn test_function_with_docs_and_params() {
        let code = "// Doubles the input.\nasync function double(x, factor = 2, ...rest) {\n  return x * factor;\n}\n";
        let symbols = extract_js(code);
        let f = symbols
            .iter()
            .find(|s| s.kind == SymbolKind::Function)
            .unwrap();
        assert_eq!(f.name, "double");
        assert!(f.is_async);
        assert_eq!(f.params, vec!["x", "factor", "...rest"]);
        assert_eq!(f.documentation.as_deref(), Some("Doubles the input."));
        assert_eq!(
            f.signature.as_deref(),
            Some("async function double(x, factor, ...rest)")
        );
        assert_eq!(f.line, 2);
    }

    #[test]
    fn test_destructured_param_placeholder() {
        let code = "function configure({ host, port }) {}\n";
        let symbols = extract_js(code);
        assert_eq!(symbols[0].params, vec!["destructured"]);
    }

    #[test]
    fn test_class_with_methods() {
        let code = "class Queue extends Base {\n  push(item) {}\n  static async drain() {}\n}\n";
        let symbols = extract_js(code);

        let class = symbols.iter().find(|s| s.kind == SymbolKind::Class).unwrap();
        assert_eq!(class.name, "Queue");
        assert_eq!(class.extends.as_deref(), Some("Base"));

        let push = symbols.iter().find(|s| s.name == "Queue.push").unwrap();
        assert_eq!(push.kind, SymbolKind::Method);
        assert_eq!(push.class_name.as_deref(), Some("Queue"));
        assert!(!push.is_static);

        let drain = symbols.iter().find(|s| s.name == "Queue.drain").unwrap();
        assert!(drain.is_static);
        assert!(drain.is_async);
    }

    #[test]
    fn test_imports_per_binding() {
        let code = "import def, { alpha, beta as b } from './lib';\nimport * as ns from './ns';\nimport './side-effect';\n";
        let symbols = extract_js(code);
        let imports: Vec<&Symbol> = symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Import)
            .collect();
        let names: Vec<&str> = imports.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["def", "alpha", "beta", "ns"]);
        assert!(imports
            .iter()
            .take(3)
            .all(|s| s.source_module.as_deref() == Some("./lib")));
    }

    #[test]
    fn test_exports() {
        let code = "export function go() {}\nexport const limit = 10;\nexport { go as run };\nexport default go;\n";
        let symbols = extract_js(code);
        let exports: Vec<&str> = symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Export)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(exports, vec!["go", "limit", "run", "go"]);
    }

    #[test]
    fn test_object_literal_members() {
        let code = "export const helper = {\n  async doWork(job) {\n    return job;\n  },\n  sync: (x) => x,\n};\n";
        let symbols = extract_js(code);

        let do_work = symbols.iter().find(|s| s.name == "helper.doWork").unwrap();
        assert_eq!(do_work.kind, SymbolKind::Method);
        assert!(do_work.is_async);
        assert_eq!(do_work.class_name.as_deref(), Some("helper"));
        assert_eq!(do_work.params, vec!["job"]);

        let sync = symbols.iter().find(|s| s.name == "helper.sync").unwrap();
        assert_eq!(sync.kind, SymbolKind::Method);
    }

    #[test]
    fn test_arrow_function_binding() {
        let code = "const send = async (payload) => {\n  return post(payload);\n};\n";
        let symbols = extract_js(code);
        let send = symbols.iter().find(|s| s.name == "send").unwrap();
        assert_eq!(send.kind, SymbolKind::Function);
        assert!(send.is_async);
        assert_eq!(send.params, vec!["payload"]);
    }

    #[test]
    fn test_typescript_declarations() {
        let code = "export interface Job {\n  id: string;\n}\ntype Handler = (job: Job) => void;\nfunction handle(job: Job): void {}\n";
        let symbols = extract_ts(code);
        assert!(symbols
            .iter()
            .any(|s| s.kind == SymbolKind::Interface && s.name == "Job"));
        assert!(symbols
            .iter()
            .any(|s| s.kind == SymbolKind::TypeAlias && s.name == "Handler"));
        let handle = symbols.iter().find(|s| s.name == "handle").unwrap();
        assert_eq!(handle.params, vec!["job"]);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut extractor = AstExtractor::new(Language::JavaScript).unwrap();
        let result = extractor.extract("function broken( {", "broken.js");
        assert!(matches!(result, Err(ExtractError::ParseError(_))));
    }

    #[test]
    fn test_destructured_declaration() {
        let code = "const { host, port } = config;\n";
        let symbols = extract_js(code);
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"host"));
        assert!(names.contains(&"port"));
    }
}
