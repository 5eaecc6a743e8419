//! Pipeline request, shared state, and stage progression.

use std::path::PathBuf;

use quarry_index::DocumentChunk;

/// What the caller wants answered, plus the project artifacts the pipeline
/// may draw on.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub question: String,
    pub project_name: String,
    /// Rendered project layout, empty when unavailable.
    pub file_tree: String,
    /// Project data directory holding the dependency graph artifact.
    pub db_path: PathBuf,
}

/// State threaded through the stages. Each stage reads what it needs and
/// contributes a [`StateUpdate`]; nothing mutates state directly.
#[derive(Debug, Default, Clone)]
pub struct PipelineState {
    pub question: String,
    pub documents: Vec<DocumentChunk>,
    pub generation: Option<String>,
}

/// Partial state produced by one stage. `None` fields leave the current
/// value untouched.
#[derive(Debug, Default)]
pub struct StateUpdate {
    pub documents: Option<Vec<DocumentChunk>>,
    pub generation: Option<String>,
}

impl PipelineState {
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(documents) = update.documents {
            self.documents = documents;
        }
        if let Some(generation) = update.generation {
            self.generation = Some(generation);
        }
    }
}

/// The pipeline's stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieve,
    Grade,
    Generate,
    Done,
}

impl Stage {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Retrieve => Self::Grade,
            Self::Grade => Self::Generate,
            Self::Generate | Self::Done => Self::Done,
        }
    }
}
