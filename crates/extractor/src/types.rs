use semindex_repair::FileFix;
use serde::{Deserialize, Serialize};

/// Kind of a named code entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Method,
    Variable,
    Import,
    Export,
    Interface,
    #[serde(rename = "type")]
    TypeAlias,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Import => "import",
            Self::Export => "export",
            Self::Interface => "interface",
            Self::TypeAlias => "type",
        }
    }
}

/// A named code entity with location and metadata.
///
/// Methods carry their qualified `Class.method` name in `name` so symbol
/// ids stay unique per class; the bare class lives in `class_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Path of the file this symbol was extracted from
    pub file: String,
    /// 1-indexed line of the declaration
    pub line: usize,
    /// Parameter names; destructured patterns reduce to a placeholder
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_static: bool,
    /// Enclosing class for methods and class fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Comment block immediately preceding the declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Reconstructed one-line signature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Import symbols: the module specifier the name comes from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_module: Option<String>,
    /// Class symbols: superclass reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, file: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
            line,
            params: Vec::new(),
            is_async: false,
            is_static: false,
            class_name: None,
            documentation: None,
            signature: None,
            source_module: None,
            extends: None,
        }
    }

    /// Stable id within one analysis run: `file::name`. Not unique across
    /// overloaded names; the graph merge keeps the last writer.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}::{}", self.file, self.name)
    }
}

/// Result of extracting one file: a symbol list (possibly empty, never an
/// error) and the syntax fix applied on the way, if any.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub symbols: Vec<Symbol>,
    pub fix: Option<FileFix>,
}

impl Extraction {
    #[must_use]
    pub fn clean(symbols: Vec<Symbol>) -> Self {
        Self { symbols, fix: None }
    }
}
