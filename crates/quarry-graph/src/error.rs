//! Error types for quarry-graph.

/// Errors that can occur while building or persisting the dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// IO error reading or writing the graph artifact.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tree-sitter parsing error.
    #[error("parse failed: {0}")]
    Parse(String),
}

/// Result type alias using `GraphError`.
pub type Result<T> = std::result::Result<T, GraphError>;
