//! Dependency-graph augmentation of retrieved chunks.

use std::collections::HashSet;
use std::path::Path;

use quarry_graph::{DependencyGraph, graph_path};
use quarry_index::DocumentChunk;

/// At most this many related files are cited per retrieved source.
const RELATED_LIMIT: usize = 3;

const HINT_HEADER: &str = "Dependency context:";

/// Appends dependency hints for the retrieved sources to the first chunk.
///
/// For every distinct source among `documents`, files directly connected to
/// it in the project's import graph become hint lines. The hints go into
/// one block at the end of the first chunk, so grading and generation see
/// them without the document list changing shape. Augmentation is best
/// effort: a missing or unreadable graph artifact leaves the documents
/// unchanged, and applying it twice adds nothing.
pub fn augment(documents: &mut [DocumentChunk], db_path: &Path) {
    if documents.is_empty() {
        return;
    }
    let graph = match DependencyGraph::load(&graph_path(db_path)) {
        Ok(Some(graph)) => graph,
        Ok(None) => {
            tracing::debug!("no dependency graph artifact, skipping augmentation");
            return;
        }
        Err(e) => {
            tracing::warn!("dependency graph unreadable, skipping augmentation: {e}");
            return;
        }
    };

    let mut seen = HashSet::new();
    let mut hints = Vec::new();
    for document in documents.iter() {
        for related in graph.related(&document.source, RELATED_LIMIT) {
            if seen.insert((document.source.clone(), related.clone())) {
                hints.push(format!("{} is connected to {related}", document.source));
            }
        }
    }
    if hints.is_empty() {
        return;
    }

    let block = format!("{HINT_HEADER}\n{}", hints.join("\n"));
    let first = &mut documents[0];
    if first.content.contains(&block) {
        return;
    }
    tracing::debug!(hints = hints.len(), "dependency hints attached");
    first.content.push_str("\n\n");
    first.content.push_str(&block);
}
