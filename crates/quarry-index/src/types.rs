//! Core retrieval data types.

/// A piece of indexed text together with the project-relative path of the
/// file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    pub content: String,
    pub source: String,
}

impl DocumentChunk {
    #[must_use]
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}
