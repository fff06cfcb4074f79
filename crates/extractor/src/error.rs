use thiserror::Error;

/// Result type for extraction internals. The public [`crate::extract`]
/// entry point is total; these errors only drive the repair-and-retry
/// fallback chain.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The parser produced no tree or a tree containing error nodes
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No AST grammar for this language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}
