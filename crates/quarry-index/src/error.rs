//! Error types for quarry-index.

/// Errors that can occur while indexing or retrieving chunks.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Vector store operation failed.
    #[error("vector store error: {0}")]
    Qdrant(Box<qdrant_client::QdrantError>),

    /// Embedding or chat call failed.
    #[error(transparent)]
    Llm(#[from] quarry_llm::LlmError),

    /// IO error while reading project files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Point payload could not be built.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Embedding model produced unusable output.
    #[error("embedding error: {0}")]
    Embedding(String),
}

// Boxed by hand: QdrantError is large and would bloat every Result.
impl From<qdrant_client::QdrantError> for IndexError {
    fn from(e: qdrant_client::QdrantError) -> Self {
        Self::Qdrant(Box::new(e))
    }
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
