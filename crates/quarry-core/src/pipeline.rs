//! The question-answering pipeline driver.

use quarry_index::Retriever;
use quarry_llm::LlmProvider;

use crate::augment::augment;
use crate::error::Result;
use crate::generate::{AnswerGenerator, NO_CONTEXT_ANSWER};
use crate::grade::RelevanceGrader;
use crate::state::{PipelineRequest, PipelineState, Stage, StateUpdate};

/// Final answer plus the chunks it was grounded on, for display as
/// supporting evidence.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub generation: String,
    pub documents: Vec<quarry_index::DocumentChunk>,
}

/// Drives the stages over a shared [`PipelineState`] until `Done`.
pub struct Pipeline<R, P> {
    retriever: R,
    grader: RelevanceGrader<P>,
    generator: AnswerGenerator<P>,
    top_k: usize,
}

impl<R: Retriever, P: LlmProvider> Pipeline<R, P> {
    #[must_use]
    pub fn new(
        retriever: R,
        grader: RelevanceGrader<P>,
        generator: AnswerGenerator<P>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            grader,
            generator,
            top_k,
        }
    }

    /// Runs retrieve, grade, and generate in order.
    ///
    /// # Errors
    ///
    /// Returns an error when retrieval or generation fails. Grading
    /// problems only shrink the evidence set.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutcome> {
        let mut state = PipelineState {
            question: request.question.clone(),
            ..PipelineState::default()
        };
        tracing::info!(project = %request.project_name, "pipeline run started");
        let mut stage = Stage::Retrieve;
        while stage != Stage::Done {
            tracing::debug!(?stage, "entering stage");
            let update = match stage {
                Stage::Retrieve => self.retrieve(&state, request).await?,
                Stage::Grade => self.grade(&state).await,
                Stage::Generate => self.generate(&state, request).await?,
                Stage::Done => StateUpdate::default(),
            };
            state.apply(update);
            stage = stage.next();
        }
        let generation = state
            .generation
            .unwrap_or_else(|| NO_CONTEXT_ANSWER.to_string());
        Ok(PipelineOutcome {
            generation,
            documents: state.documents,
        })
    }

    async fn retrieve(
        &self,
        state: &PipelineState,
        request: &PipelineRequest,
    ) -> Result<StateUpdate> {
        let mut documents = self.retriever.search(&state.question, self.top_k).await?;
        augment(&mut documents, &request.db_path);
        tracing::info!(count = documents.len(), "retrieval complete");
        Ok(StateUpdate {
            documents: Some(documents),
            ..StateUpdate::default()
        })
    }

    async fn grade(&self, state: &PipelineState) -> StateUpdate {
        let total = state.documents.len();
        let kept = self
            .grader
            .filter(&state.question, state.documents.clone())
            .await;
        tracing::info!(kept = kept.len(), total, "grading complete");
        StateUpdate {
            documents: Some(kept),
            ..StateUpdate::default()
        }
    }

    async fn generate(
        &self,
        state: &PipelineState,
        request: &PipelineRequest,
    ) -> Result<StateUpdate> {
        let generation = self
            .generator
            .answer(&state.question, &state.documents, &request.file_tree)
            .await?;
        Ok(StateUpdate {
            generation: Some(generation),
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use quarry_index::{DocumentChunk, IndexError};
    use quarry_llm::MockProvider;

    use super::*;

    struct StaticRetriever {
        chunks: Vec<DocumentChunk>,
        fail: bool,
    }

    impl StaticRetriever {
        fn with(chunks: Vec<DocumentChunk>) -> Self {
            Self { chunks, fail: false }
        }

        fn failing() -> Self {
            Self {
                chunks: Vec::new(),
                fail: true,
            }
        }
    }

    impl Retriever for StaticRetriever {
        async fn search(&self, _query: &str, k: usize) -> quarry_index::Result<Vec<DocumentChunk>> {
            if self.fail {
                return Err(IndexError::Embedding("retriever down".into()));
            }
            Ok(self.chunks.iter().take(k).cloned().collect())
        }
    }

    fn request() -> PipelineRequest {
        PipelineRequest {
            question: "how does startup work?".into(),
            project_name: "demo".into(),
            file_tree: String::new(),
            db_path: PathBuf::from("/nonexistent"),
        }
    }

    fn pipeline(
        retriever: StaticRetriever,
        provider: MockProvider,
    ) -> Pipeline<StaticRetriever, MockProvider> {
        Pipeline::new(
            retriever,
            RelevanceGrader::new(provider.clone()),
            AnswerGenerator::new(provider, "", ""),
            5,
        )
    }

    #[tokio::test]
    async fn empty_retrieval_yields_refusal_and_no_evidence() {
        let p = pipeline(StaticRetriever::with(Vec::new()), MockProvider::default());
        let outcome = p.run(&request()).await.unwrap();
        assert_eq!(outcome.generation, NO_CONTEXT_ANSWER);
        assert!(outcome.documents.is_empty());
    }

    #[tokio::test]
    async fn surviving_chunks_ground_the_answer() {
        let provider = MockProvider::with_responses(vec![
            r#"{"relevant": "yes"}"#.into(),
            r#"{"relevant": "no"}"#.into(),
            r#"{"relevant": "yes"}"#.into(),
            "It starts in main.".into(),
        ]);
        let chunks = vec![
            DocumentChunk::new("fn main() {}", "src/main.rs"),
            DocumentChunk::new("# readme", "README.md"),
            DocumentChunk::new("fn boot() {}", "src/boot.rs"),
        ];
        let p = pipeline(StaticRetriever::with(chunks), provider);
        let outcome = p.run(&request()).await.unwrap();
        assert_eq!(outcome.generation, "It starts in main.");
        assert_eq!(outcome.documents.len(), 2);
        assert_eq!(outcome.documents[0].source, "src/main.rs");
        assert_eq!(outcome.documents[1].source, "src/boot.rs");
    }

    #[tokio::test]
    async fn everything_graded_irrelevant_yields_refusal() {
        let provider = MockProvider::with_responses(vec![
            r#"{"relevant": "no"}"#.into(),
            r#"{"relevant": "no"}"#.into(),
        ]);
        let chunks = vec![
            DocumentChunk::new("a", "a.py"),
            DocumentChunk::new("b", "b.py"),
        ];
        let p = pipeline(StaticRetriever::with(chunks), provider);
        let outcome = p.run(&request()).await.unwrap();
        assert_eq!(outcome.generation, NO_CONTEXT_ANSWER);
        assert!(outcome.documents.is_empty());
    }

    #[tokio::test]
    async fn retrieval_failure_fails_the_run() {
        let p = pipeline(StaticRetriever::failing(), MockProvider::default());
        let err = p.run(&request()).await.unwrap_err();
        assert!(matches!(err, crate::PipelineError::Retrieve(_)));
    }

    #[tokio::test]
    async fn provider_outage_still_produces_a_refusal() {
        // Every grading call fails, so no chunk survives and generation
        // short-circuits without touching the provider again.
        let chunks = vec![DocumentChunk::new("a", "a.py")];
        let p = pipeline(StaticRetriever::with(chunks), MockProvider::failing());
        let outcome = p.run(&request()).await.unwrap();
        assert_eq!(outcome.generation, NO_CONTEXT_ANSWER);
    }

    #[tokio::test]
    async fn top_k_caps_retrieval() {
        let chunks: Vec<DocumentChunk> = (0..10)
            .map(|i| DocumentChunk::new(format!("chunk {i}"), format!("f{i}.py")))
            .collect();
        let provider = MockProvider::with_responses(
            std::iter::repeat_n(r#"{"relevant": "yes"}"#.to_string(), 5)
                .chain(std::iter::once("answer".to_string()))
                .collect(),
        );
        let p = pipeline(StaticRetriever::with(chunks), provider);
        let outcome = p.run(&request()).await.unwrap();
        assert_eq!(outcome.documents.len(), 5);
    }
}
