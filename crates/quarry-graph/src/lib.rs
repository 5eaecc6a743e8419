//! File-level import dependency graph.
//!
//! Walks a project tree, records one node per recognized source file, and
//! adds an edge A → B whenever A's import statements resolve to another
//! indexed file B. Unresolvable imports (standard library, third-party
//! packages) are dropped so the graph never grows dangling nodes. The graph
//! is persisted as a plain node/edge-list JSON artifact that query-time
//! consumers load read-only.

pub mod builder;
pub mod error;
pub mod graph;
pub(crate) mod imports;

pub use builder::build_graph;
pub use error::{GraphError, Result};
pub use graph::{DependencyGraph, GRAPH_FILE, graph_path};
