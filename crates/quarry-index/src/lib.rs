//! Semantic indexing and retrieval over a project's source files.
//!
//! Indexing walks the project, splits each file into overlapping chunks,
//! embeds them, and upserts the vectors into a per-project Qdrant
//! collection. Retrieval embeds a query and returns the nearest chunks.

pub mod error;
pub mod indexer;
pub mod retriever;
pub mod splitter;
pub mod store;
pub mod types;

pub use error::{IndexError, Result};
pub use indexer::{IndexReport, IndexerConfig, ProjectIndexer, render_file_tree};
pub use retriever::{Retriever, SemanticRetriever};
pub use splitter::TextSplitter;
pub use store::ChunkStore;
pub use types::DocumentChunk;
