//! Dependency graph storage, queries, and JSON persistence.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the persisted graph artifact inside a project's data directory.
pub const GRAPH_FILE: &str = "depgraph.json";

/// Path of the graph artifact for a project's data directory.
#[must_use]
pub fn graph_path(db_path: &Path) -> PathBuf {
    db_path.join(GRAPH_FILE)
}

/// Directed file-level import graph.
///
/// Nodes are project-relative file paths with forward slashes. An edge
/// A → B means A imports B. Both endpoints of every edge are indexed files.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

/// Serialized form: sorted node list plus sorted edge list.
#[derive(Serialize, Deserialize)]
struct GraphArtifact {
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file node. Adding the same file twice is a no-op.
    pub fn add_file(&mut self, file: &str) {
        if !self.indices.contains_key(file) {
            let idx = self.graph.add_node(file.to_string());
            self.indices.insert(file.to_string(), idx);
        }
    }

    /// Adds an import edge `from` → `to`. The edge is only recorded when both
    /// files are already nodes; duplicate edges are dropped. Returns whether
    /// the edge was added.
    pub fn add_import(&mut self, from: &str, to: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.indices.get(from), self.indices.get(to)) else {
            return false;
        };
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    #[must_use]
    pub fn contains(&self, file: &str) -> bool {
        self.indices.contains_key(file)
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn import_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Files directly connected to `file` in either direction, sorted, capped
    /// at `limit`. Unknown files yield an empty list.
    #[must_use]
    pub fn related(&self, file: &str, limit: usize) -> Vec<String> {
        let Some(&idx) = self.indices.get(file) else {
            return Vec::new();
        };
        let mut neighbors = BTreeSet::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            for n in self.graph.neighbors_directed(idx, direction) {
                neighbors.insert(self.graph[n].clone());
            }
        }
        neighbors.remove(file);
        neighbors.into_iter().take(limit).collect()
    }

    /// Writes the graph as a JSON node/edge-list artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut nodes: Vec<String> = self.indices.keys().cloned().collect();
        nodes.sort();
        let mut edges: Vec<(String, String)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].clone(), self.graph[b].clone()))
            .collect();
        edges.sort();
        let artifact = GraphArtifact { nodes, edges };
        std::fs::write(path, serde_json::to_vec_pretty(&artifact)?)?;
        Ok(())
    }

    /// Loads a previously saved graph. A missing file is not an error: it
    /// means the project has no graph artifact yet and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        let artifact: GraphArtifact = serde_json::from_str(&raw)?;
        let mut graph = Self::new();
        for node in &artifact.nodes {
            graph.add_file(node);
        }
        for (from, to) in &artifact.edges {
            graph.add_import(from, to);
        }
        Ok(Some(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        let mut g = DependencyGraph::new();
        g.add_file("app.py");
        g.add_file("util.py");
        g.add_file("db.py");
        g.add_import("app.py", "util.py");
        g.add_import("app.py", "db.py");
        g
    }

    #[test]
    fn related_covers_both_directions() {
        let g = sample();
        assert_eq!(g.related("app.py", 10), vec!["db.py", "util.py"]);
        assert_eq!(g.related("util.py", 10), vec!["app.py"]);
    }

    #[test]
    fn related_respects_limit_and_unknown_files() {
        let g = sample();
        assert_eq!(g.related("app.py", 1).len(), 1);
        assert!(g.related("missing.py", 10).is_empty());
    }

    #[test]
    fn edges_require_both_endpoints() {
        let mut g = DependencyGraph::new();
        g.add_file("a.py");
        assert!(!g.add_import("a.py", "os.py"));
        assert_eq!(g.file_count(), 1);
        assert_eq!(g.import_count(), 0);
    }

    #[test]
    fn duplicate_files_and_edges_are_deduplicated() {
        let mut g = sample();
        g.add_file("app.py");
        assert!(!g.add_import("app.py", "util.py"));
        assert_eq!(g.file_count(), 3);
        assert_eq!(g.import_count(), 2);
    }

    #[test]
    fn cycles_are_allowed() {
        let mut g = DependencyGraph::new();
        g.add_file("a.py");
        g.add_file("b.py");
        g.add_import("a.py", "b.py");
        g.add_import("b.py", "a.py");
        assert_eq!(g.related("a.py", 10), vec!["b.py"]);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = graph_path(dir.path());
        sample().save(&path).unwrap();

        let loaded = DependencyGraph::load(&path).unwrap().unwrap();
        assert_eq!(loaded.file_count(), 3);
        assert_eq!(loaded.import_count(), 2);
        assert_eq!(loaded.related("app.py", 10), vec!["db.py", "util.py"]);
    }

    #[test]
    fn load_missing_artifact_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            DependencyGraph::load(&graph_path(dir.path()))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn load_malformed_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = graph_path(dir.path());
        std::fs::write(&path, "not json").unwrap();
        assert!(DependencyGraph::load(&path).is_err());
    }
}
