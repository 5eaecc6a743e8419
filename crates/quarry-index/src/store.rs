//! Qdrant-backed chunk storage.

use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value, VectorParamsBuilder,
};
use uuid::Uuid;

use crate::error::Result;
use crate::types::DocumentChunk;

/// Vector store handle scoped to one project's collection.
pub struct ChunkStore {
    client: Qdrant,
    collection: String,
}

impl ChunkStore {
    /// Connects to Qdrant at `url`, addressing the collection derived from
    /// `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be configured.
    pub fn connect(url: &str, project: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build()?;
        Ok(Self {
            client,
            collection: collection_name(project),
        })
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Drops any existing collection and creates a fresh one sized for
    /// `vector_size`-dimensional cosine vectors. Reindexing always starts
    /// from an empty collection so stale chunks never survive.
    ///
    /// # Errors
    ///
    /// Returns an error if a Qdrant call fails.
    pub async fn recreate_collection(&self, vector_size: u64) -> Result<()> {
        if self.client.collection_exists(&self.collection).await? {
            self.client.delete_collection(&self.collection).await?;
        }
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await?;
        tracing::debug!(collection = %self.collection, vector_size, "collection recreated");
        Ok(())
    }

    /// Whether the project's collection exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the Qdrant call fails.
    pub async fn exists(&self) -> Result<bool> {
        Ok(self.client.collection_exists(&self.collection).await?)
    }

    /// Stores one embedded chunk under a fresh point id.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be built or the upsert fails.
    pub async fn upsert(
        &self,
        chunk: &DocumentChunk,
        chunk_index: usize,
        vector: Vec<f32>,
    ) -> Result<()> {
        let payload: Payload = serde_json::from_value(serde_json::json!({
            "content": chunk.content,
            "source": chunk.source,
            "chunk_index": chunk_index,
        }))?;
        let point = PointStruct::new(Uuid::new_v4().to_string(), vector, payload);
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await?;
        Ok(())
    }

    /// Nearest chunks to `vector`, best first. Points with a missing or
    /// malformed payload are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the search call fails.
    pub async fn search(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<DocumentChunk>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection,
                    vector,
                    u64::try_from(limit).unwrap_or(u64::MAX),
                )
                .with_payload(true),
            )
            .await?;
        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                let content = point.payload.get("content").and_then(Value::as_str)?.clone();
                let source = point
                    .payload
                    .get("source")
                    .and_then(Value::as_str)
                    .cloned()
                    .unwrap_or_default();
                Some(DocumentChunk { content, source })
            })
            .collect())
    }
}

/// Qdrant collection name for a project. Anything outside `[A-Za-z0-9_-]`
/// becomes an underscore.
fn collection_name(project: &str) -> String {
    let sanitized: String = project
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("quarry_{sanitized}")
}
