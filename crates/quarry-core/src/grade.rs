//! Per-chunk relevance grading.

use quarry_index::DocumentChunk;
use quarry_llm::{LlmProvider, Message};
use serde::Deserialize;

const GRADER_SYSTEM_PROMPT: &str = "You assess whether a document is relevant to a user question. \
A document is relevant when it contains keywords or semantic meaning related to the question. \
Reply with JSON of the form {\"relevant\": \"yes\"} or {\"relevant\": \"no\"} and nothing else.";

#[derive(Deserialize)]
struct Verdict {
    relevant: String,
}

/// Asks the model for a yes/no relevance verdict on each retrieved chunk
/// and keeps only the chunks graded relevant.
pub struct RelevanceGrader<P> {
    provider: P,
}

impl<P: LlmProvider> RelevanceGrader<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Grades every chunk in order and returns the relevant ones, original
    /// order preserved. A chunk whose verdict cannot be obtained or parsed
    /// is excluded; grading never fails the pipeline.
    pub async fn filter(
        &self,
        question: &str,
        documents: Vec<DocumentChunk>,
    ) -> Vec<DocumentChunk> {
        let mut kept = Vec::new();
        for document in documents {
            match self.grade(question, &document).await {
                Some(true) => kept.push(document),
                Some(false) => {
                    tracing::debug!(source = %document.source, "chunk graded irrelevant");
                }
                None => {
                    tracing::debug!(source = %document.source, "no usable verdict, chunk dropped");
                }
            }
        }
        kept
    }

    async fn grade(&self, question: &str, document: &DocumentChunk) -> Option<bool> {
        let messages = [
            Message::system(GRADER_SYSTEM_PROMPT),
            Message::user(format!(
                "Document:\n{}\n\nQuestion: {question}",
                document.content
            )),
        ];
        let reply = self.provider.chat(&messages).await.ok()?;
        parse_verdict(&reply)
    }
}

/// Pulls the verdict out of a model reply. Tolerates prose or code fences
/// around the JSON object.
fn parse_verdict(reply: &str) -> Option<bool> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    let verdict: Verdict = serde_json::from_str(&reply[start..=end]).ok()?;
    match verdict.relevant.trim().to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use quarry_llm::MockProvider;

    use super::*;

    #[test]
    fn verdicts_parse_from_plain_and_decorated_json() {
        assert_eq!(parse_verdict(r#"{"relevant": "yes"}"#), Some(true));
        assert_eq!(parse_verdict(r#"{"relevant": "no"}"#), Some(false));
        assert_eq!(parse_verdict("```json\n{\"relevant\": \"YES\"}\n```"), Some(true));
        assert_eq!(
            parse_verdict(r#"Sure! Here you go: {"relevant": "no"} Hope that helps."#),
            Some(false)
        );
    }

    #[test]
    fn malformed_verdicts_are_rejected() {
        assert_eq!(parse_verdict("yes"), None);
        assert_eq!(parse_verdict(r#"{"score": "yes"}"#), None);
        assert_eq!(parse_verdict(r#"{"relevant": "maybe"}"#), None);
        assert_eq!(parse_verdict("} backwards {"), None);
    }

    #[tokio::test]
    async fn filter_keeps_relevant_chunks_in_order() {
        let grader = RelevanceGrader::new(MockProvider::with_responses(vec![
            r#"{"relevant": "yes"}"#.into(),
            r#"{"relevant": "no"}"#.into(),
            r#"{"relevant": "yes"}"#.into(),
        ]));
        let documents = vec![
            DocumentChunk::new("a", "a.py"),
            DocumentChunk::new("b", "b.py"),
            DocumentChunk::new("c", "c.py"),
        ];
        let kept = grader.filter("question", documents).await;
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].source, "a.py");
        assert_eq!(kept[1].source, "c.py");
    }

    #[tokio::test]
    async fn chat_failure_excludes_the_chunk() {
        let grader = RelevanceGrader::new(MockProvider::failing());
        let kept = grader
            .filter("question", vec![DocumentChunk::new("a", "a.py")])
            .await;
        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn unparseable_reply_excludes_the_chunk() {
        let grader = RelevanceGrader::new(MockProvider::with_responses(vec![
            "no idea".into(),
            r#"{"relevant": "yes"}"#.into(),
        ]));
        let documents = vec![
            DocumentChunk::new("a", "a.py"),
            DocumentChunk::new("b", "b.py"),
        ];
        let kept = grader.filter("question", documents).await;
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, "b.py");
    }
}
