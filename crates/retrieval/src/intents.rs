//! Named intents: canned queries routed through the same retrieval path.

use crate::bundle::ContextBundle;
use crate::engine::{retrieve_context, RetrievalOptions};
use crate::error::Result;
use semindex_graph::SymbolGraph;
use semindex_vector::{Embedder, EmbeddingIndex};
use std::path::Path;

/// Review focus a caller can ask for by name instead of composing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Security,
    Performance,
    BugPatterns,
    BestPractices,
    DependencyReview,
    TestCoverage,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Security,
        Intent::Performance,
        Intent::BugPatterns,
        Intent::BestPractices,
        Intent::DependencyReview,
        Intent::TestCoverage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Performance => "performance",
            Self::BugPatterns => "bug-patterns",
            Self::BestPractices => "best-practices",
            Self::DependencyReview => "dependency-review",
            Self::TestCoverage => "test-coverage",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == name.to_lowercase())
    }

    /// The canned query this intent expands to.
    #[must_use]
    pub const fn query(self) -> &'static str {
        match self {
            Self::Security => {
                "authentication authorization input validation sanitization injection secrets tokens passwords vulnerability"
            }
            Self::Performance => {
                "performance optimization caching slow loops memory allocation batching latency throughput"
            }
            Self::BugPatterns => {
                "error handling null undefined exceptions retries race conditions resource leaks edge cases"
            }
            Self::BestPractices => {
                "naming conventions duplication dead code complexity structure maintainability refactoring"
            }
            Self::DependencyReview => {
                "imports dependencies modules coupling external packages versions"
            }
            Self::TestCoverage => {
                "tests specs assertions mocks fixtures coverage edge cases regressions"
            }
        }
    }
}

/// Retrieve context for a named intent with default options.
pub async fn retrieve_for_intent(
    index: &EmbeddingIndex,
    graph: &SymbolGraph,
    root_path: impl AsRef<Path>,
    intent: Intent,
    embedder: &dyn Embedder,
) -> Result<ContextBundle> {
    log::debug!("intent '{}' -> canned query", intent.as_str());
    let options = RetrievalOptions::for_query(intent.query());
    retrieve_context(index, graph, root_path, &options, embedder).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_name(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_name("SECURITY"), Some(Intent::Security));
        assert_eq!(Intent::from_name("unknown"), None);
    }

    #[test]
    fn test_queries_are_distinct() {
        let queries: std::collections::HashSet<&str> =
            Intent::ALL.iter().map(|i| i.query()).collect();
        assert_eq!(queries.len(), Intent::ALL.len());
    }
}
