//! Grounded answer generation.

use quarry_index::DocumentChunk;
use quarry_llm::{LlmError, LlmProvider, Message};

use crate::persona::stack_persona;

/// Returned instead of calling the model when no relevant context survived
/// retrieval and grading.
pub const NO_CONTEXT_ANSWER: &str = "I could not find anything relevant to that question in \
    the indexed project. Try asking about a specific file, function, or feature.";

/// Produces the final answer from the surviving chunks, under a persona
/// matching the project's technology stack.
pub struct AnswerGenerator<P> {
    provider: P,
    persona: &'static str,
    /// Natural language to answer in, empty for the model's default.
    language: String,
}

impl<P: LlmProvider> AnswerGenerator<P> {
    #[must_use]
    pub fn new(provider: P, stack: &str, language: impl Into<String>) -> Self {
        Self {
            provider,
            persona: stack_persona(stack),
            language: language.into(),
        }
    }

    /// Answers `question` strictly from `documents`. With no documents the
    /// model is never called and the refusal answer is returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat call fails.
    pub async fn answer(
        &self,
        question: &str,
        documents: &[DocumentChunk],
        file_tree: &str,
    ) -> Result<String, LlmError> {
        if documents.is_empty() {
            tracing::info!("no context survived, returning refusal answer");
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let context: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let mut prompt = format!(
            "Answer the question based strictly on the context provided. Do not invent \
             content that is not present in the context.\n\nContext:\n{}\n",
            context.join("\n\n")
        );
        if !file_tree.is_empty() {
            prompt.push_str(&format!("\nProject layout:\n{file_tree}\n"));
        }
        prompt.push_str(&format!("\nQuestion: {question}"));
        if !self.language.is_empty() {
            prompt.push_str(&format!("\n\nAnswer in {}.", self.language));
        }

        let messages = [Message::system(self.persona), Message::user(prompt)];
        let answer = self.provider.chat(&messages).await?;
        Ok(answer.trim().to_string())
    }
}
