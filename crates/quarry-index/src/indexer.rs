//! Project walking, chunking, and embedding into the vector store.

use std::path::Path;
use std::time::Instant;

use ignore::WalkBuilder;
use quarry_llm::LlmProvider;

use crate::error::{IndexError, Result};
use crate::splitter::TextSplitter;
use crate::store::ChunkStore;
use crate::types::DocumentChunk;

/// File extensions indexed when the configuration does not override them.
pub const DEFAULT_EXTENSIONS: [&str; 10] =
    ["py", "rs", "js", "jsx", "ts", "tsx", "java", "html", "css", "md"];

/// Knobs for a project indexing run.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub extensions: Vec<String>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Outcome of an indexing run. Per-file failures are collected here rather
/// than aborting the run.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub chunks_created: usize,
    pub errors: Vec<String>,
    pub duration_ms: u128,
}

/// Walks a project tree and loads its chunks into the vector store.
pub struct ProjectIndexer<P> {
    provider: P,
    store: ChunkStore,
    splitter: TextSplitter,
    extensions: Vec<String>,
}

impl<P: LlmProvider> ProjectIndexer<P> {
    #[must_use]
    pub fn new(provider: P, store: ChunkStore, config: &IndexerConfig) -> Self {
        Self {
            provider,
            store,
            splitter: TextSplitter::new(config.chunk_size, config.chunk_overlap),
            extensions: config.extensions.clone(),
        }
    }

    /// Reindexes the project rooted at `root` from scratch: the collection
    /// is recreated, then every matching file is split, embedded, and
    /// upserted. Files that cannot be read or embedded are reported and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding probe or collection setup fails;
    /// per-file failures only land in the report.
    pub async fn index_project(&self, root: &Path) -> Result<IndexReport> {
        let started = Instant::now();

        // One probe embedding determines the collection's vector size.
        let probe = self.provider.embed("dimension probe").await?;
        if probe.is_empty() {
            return Err(IndexError::Embedding(
                "embedding model returned an empty vector".into(),
            ));
        }
        self.store
            .recreate_collection(probe.len() as u64)
            .await?;

        let mut report = IndexReport::default();
        for entry in WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .build()
            .flatten()
        {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(rel) = self.matching_relative_path(entry.path(), root) else {
                continue;
            };
            report.files_scanned += 1;
            self.index_file(entry.path(), &rel, &mut report).await;
        }

        report.duration_ms = started.elapsed().as_millis();
        tracing::info!(
            files = report.files_indexed,
            chunks = report.chunks_created,
            errors = report.errors.len(),
            duration_ms = report.duration_ms,
            "project indexed"
        );
        Ok(report)
    }

    async fn index_file(&self, path: &Path, rel: &str, report: &mut IndexReport) {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                report.errors.push(format!("{rel}: {e}"));
                return;
            }
        };
        let chunks = self.splitter.split(&text);
        if chunks.is_empty() {
            return;
        }
        for (chunk_index, content) in chunks.into_iter().enumerate() {
            let chunk = DocumentChunk::new(content, rel);
            let result = async {
                let vector = self.provider.embed(&chunk.content).await?;
                self.store.upsert(&chunk, chunk_index, vector).await
            }
            .await;
            match result {
                Ok(()) => report.chunks_created += 1,
                Err(e) => {
                    report.errors.push(format!("{rel}: {e}"));
                    return;
                }
            }
        }
        report.files_indexed += 1;
    }

    fn matching_relative_path(&self, path: &Path, root: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?;
        if !self.extensions.iter().any(|e| e == ext) {
            return None;
        }
        let rel = path.strip_prefix(root).ok()?;
        Some(rel.to_string_lossy().replace('\\', "/"))
    }
}

/// Renders the indexable files under `root` as a sorted, newline-separated
/// list of project-relative paths. Used as prompt context so the model can
/// reason about project layout.
#[must_use]
pub fn render_file_tree(root: &Path, extensions: &[String]) -> String {
    let mut paths = Vec::new();
    for entry in WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
    {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !extensions.iter().any(|e| e == ext) {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            paths.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    paths.sort();
    paths.join("\n")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn default_config_matches_common_source_files() {
        let config = IndexerConfig::default();
        assert!(config.extensions.iter().any(|e| e == "py"));
        assert!(config.extensions.iter().any(|e| e == "rs"));
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
    }

    #[test]
    fn file_tree_lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/b.py", "pass\n");
        write(dir.path(), "src/a.py", "pass\n");
        write(dir.path(), "image.png", "binary\n");

        let extensions = vec!["py".to_string()];
        let tree = render_file_tree(dir.path(), &extensions);
        assert_eq!(tree, "src/a.py\nsrc/b.py");
    }

    #[test]
    fn file_tree_of_empty_project_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(render_file_tree(dir.path(), &["py".to_string()]), "");
    }
}
