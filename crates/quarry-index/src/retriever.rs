//! Retrieval contract and its vector-store implementation.

use quarry_llm::LlmProvider;

use crate::error::Result;
use crate::store::ChunkStore;
use crate::types::DocumentChunk;

/// Returns the chunks most relevant to a query, best first, at most `k` of
/// them. An empty result is a valid answer, not an error.
pub trait Retriever: Send + Sync {
    fn search(
        &self,
        query: &str,
        k: usize,
    ) -> impl Future<Output = Result<Vec<DocumentChunk>>> + Send;
}

/// Embeds the query and searches the project's vector collection.
pub struct SemanticRetriever<P> {
    provider: P,
    store: ChunkStore,
}

impl<P: LlmProvider> SemanticRetriever<P> {
    #[must_use]
    pub fn new(provider: P, store: ChunkStore) -> Self {
        Self { provider, store }
    }
}

impl<P: LlmProvider> Retriever for SemanticRetriever<P> {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<DocumentChunk>> {
        let vector = self.provider.embed(query).await?;
        let chunks = self.store.search(vector, k).await?;
        tracing::debug!(count = chunks.len(), k, "retrieved chunks");
        Ok(chunks)
    }
}
