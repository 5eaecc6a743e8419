//! Walks a project tree and assembles its dependency graph.

use std::path::Path;

use ignore::WalkBuilder;

use crate::graph::DependencyGraph;
use crate::imports::{candidate_paths, detect_language, parse_imports};

/// Builds the import graph for the project rooted at `root`.
///
/// Hidden files and anything matched by `.gitignore` are skipped. A file
/// that cannot be read or parsed still gets a node; it just contributes no
/// outgoing edges. Building never fails outright.
#[must_use]
pub fn build_graph(root: &Path) -> DependencyGraph {
    let mut sources = Vec::new();
    for entry in WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
    {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Some(lang) = detect_language(entry.path()) else {
            continue;
        };
        let Some(rel) = relative_path(entry.path(), root) else {
            continue;
        };
        sources.push((entry.into_path(), rel, lang));
    }

    // Register every node before resolving imports so edge candidates can be
    // checked against the full file set.
    let mut graph = DependencyGraph::new();
    for (_, rel, _) in &sources {
        graph.add_file(rel);
    }

    for (path, rel, lang) in &sources {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::debug!(file = %rel, "skipping unreadable file: {e}");
                continue;
            }
        };
        let specifiers = match parse_imports(&source, *lang) {
            Ok(specifiers) => specifiers,
            Err(e) => {
                tracing::debug!(file = %rel, "skipping unparseable file: {e}");
                continue;
            }
        };
        for specifier in specifiers {
            for candidate in candidate_paths(*lang, &specifier, rel) {
                if candidate != *rel && graph.contains(&candidate) {
                    graph.add_import(rel, &candidate);
                }
            }
        }
    }

    tracing::info!(
        files = graph.file_count(),
        imports = graph.import_count(),
        "dependency graph built"
    );
    graph
}

/// Project-relative path with forward slashes, for platform-stable node ids.
fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
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
    fn python_imports_become_edges() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "import util\n\nutil.run()\n");
        write(dir.path(), "util.py", "def run():\n    pass\n");

        let graph = build_graph(dir.path());
        assert_eq!(graph.file_count(), 2);
        assert_eq!(graph.related("app.py", 10), vec!["util.py"]);
        assert_eq!(graph.related("util.py", 10), vec!["app.py"]);
    }

    #[test]
    fn external_imports_leave_no_dangling_nodes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "import os\nimport json\n");

        let graph = build_graph(dir.path());
        assert_eq!(graph.file_count(), 1);
        assert_eq!(graph.import_count(), 0);
    }

    #[test]
    fn nested_packages_resolve_with_forward_slashes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "from pkg.util import helper\n");
        write(dir.path(), "pkg/util.py", "def helper():\n    pass\n");

        let graph = build_graph(dir.path());
        assert!(graph.contains("pkg/util.py"));
        assert_eq!(graph.related("app.py", 10), vec!["pkg/util.py"]);
    }

    #[test]
    fn rust_module_declarations_resolve() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.rs", "mod config;\n\nfn main() {}\n");
        write(dir.path(), "src/config.rs", "pub struct Config;\n");

        let graph = build_graph(dir.path());
        assert_eq!(graph.related("src/main.rs", 10), vec!["src/config.rs"]);
    }

    #[test]
    fn javascript_relative_imports_resolve() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/app.js", "import { x } from './util';\n");
        write(dir.path(), "src/util.js", "export const x = 1;\n");

        let graph = build_graph(dir.path());
        assert_eq!(graph.related("src/app.js", 10), vec!["src/util.js"]);
    }

    #[test]
    fn unreadable_file_still_has_a_node() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ok.py", "import broken\n");
        fs::write(dir.path().join("broken.py"), [0xff, 0xfe, 0x00]).unwrap();

        let graph = build_graph(dir.path());
        assert_eq!(graph.file_count(), 2);
        assert_eq!(graph.related("ok.py", 10), vec!["broken.py"]);
    }

    #[test]
    fn unrecognized_extensions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "import util\n");

        let graph = build_graph(dir.path());
        assert_eq!(graph.file_count(), 0);
    }
}
