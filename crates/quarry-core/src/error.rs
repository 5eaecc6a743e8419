//! Error types for quarry-core.

/// Errors surfaced by a pipeline run. Grading failures are not here: a
/// chunk whose verdict cannot be obtained is excluded, not fatal.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Retrieval stage failed.
    #[error("retrieval failed: {0}")]
    Retrieve(#[from] quarry_index::IndexError),

    /// Answer generation failed.
    #[error("generation failed: {0}")]
    Generate(#[from] quarry_llm::LlmError),
}

/// Result type alias using `PipelineError`.
pub type Result<T> = std::result::Result<T, PipelineError>;
