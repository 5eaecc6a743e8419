//! Per-language import extraction and candidate path resolution.
//!
//! Tree-sitter locates the top-level import statements; a small amount of
//! text processing then turns each statement into the module specifier it
//! names. Resolution maps a specifier to the project-relative file paths it
//! could refer to. The graph builder keeps only candidates that are indexed
//! files, so over-generating candidates here is harmless.

use std::path::Path;

use tree_sitter::Parser;

use crate::error::{GraphError, Result};

const JS_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lang {
    Python,
    JavaScript,
    TypeScript,
    Rust,
}

pub(crate) fn detect_language(path: &Path) -> Option<Lang> {
    match path.extension()?.to_str()? {
        "py" => Some(Lang::Python),
        "js" | "jsx" | "mjs" | "cjs" => Some(Lang::JavaScript),
        "ts" | "tsx" => Some(Lang::TypeScript),
        "rs" => Some(Lang::Rust),
        _ => None,
    }
}

impl Lang {
    fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    fn import_node_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Python => &["import_statement", "import_from_statement"],
            Self::JavaScript | Self::TypeScript => &["import_statement"],
            Self::Rust => &["use_declaration", "mod_item"],
        }
    }

    fn specifiers_from(self, statement: &str) -> Vec<String> {
        match self {
            Self::Python => python_specifiers(statement),
            Self::JavaScript | Self::TypeScript => {
                quoted_specifier(statement).into_iter().collect()
            }
            Self::Rust => rust_specifier(statement).into_iter().collect(),
        }
    }
}

/// Extracts the module specifiers named by the top-level import statements
/// of `source`.
pub(crate) fn parse_imports(source: &str, lang: Lang) -> Result<Vec<String>> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.grammar())
        .map_err(|e| GraphError::Parse(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GraphError::Parse("tree-sitter produced no tree".into()))?;
    let root = tree.root_node();

    let mut specifiers = Vec::new();
    for i in 0..root.named_child_count() {
        let Some(node) = root.named_child(u32::try_from(i).unwrap()) else {
            continue;
        };
        if !lang.import_node_kinds().contains(&node.kind()) {
            continue;
        }
        let text = &source[node.byte_range()];
        specifiers.extend(lang.specifiers_from(text));
    }
    Ok(specifiers)
}

/// `import a.b, c as d` → `["a.b", "c"]`; `from .x import y` → `[".x"]`.
fn python_specifiers(statement: &str) -> Vec<String> {
    let statement = statement.trim();
    if let Some(rest) = statement.strip_prefix("from ") {
        return rest
            .split_whitespace()
            .next()
            .map(str::to_string)
            .into_iter()
            .collect();
    }
    if let Some(rest) = statement.strip_prefix("import ") {
        return rest
            .split(',')
            .filter_map(|part| part.split_whitespace().next())
            .map(str::to_string)
            .collect();
    }
    Vec::new()
}

/// First quoted string of the statement, i.e. the `from "..."` specifier.
fn quoted_specifier(statement: &str) -> Option<String> {
    let start = statement.find(['"', '\''])?;
    let quote = statement.as_bytes()[start] as char;
    let rest = &statement[start + 1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

/// `use crate::a::b::C;` → `crate::a::b::C`; `mod foo;` → `self::foo`.
/// Module declarations with inline bodies are skipped.
fn rust_specifier(statement: &str) -> Option<String> {
    let statement = statement.trim();
    if let Some(pos) = statement.find("use ") {
        let mut path = statement[pos + 4..].trim().trim_end_matches(';').trim();
        if let Some((prefix, _)) = path.split_once('{') {
            path = prefix.trim().trim_end_matches("::");
        }
        if let Some((prefix, _)) = path.split_once(" as ") {
            path = prefix.trim();
        }
        return (!path.is_empty()).then(|| path.to_string());
    }
    if let Some(pos) = statement.find("mod ") {
        let rest = statement[pos + 4..].trim();
        // `mod foo { ... }` defines the module inline, nothing to resolve.
        if !rest.ends_with(';') {
            return None;
        }
        let name = rest.trim_end_matches(';').trim();
        return Some(format!("self::{name}"));
    }
    None
}

/// Project-relative file paths a specifier could resolve to, given the
/// importing file's relative path. External modules yield no candidates.
pub(crate) fn candidate_paths(lang: Lang, specifier: &str, importer: &str) -> Vec<String> {
    let importer_dir = importer.rsplit_once('/').map_or("", |(dir, _)| dir);
    match lang {
        Lang::Python => python_candidates(specifier, importer_dir),
        Lang::JavaScript | Lang::TypeScript => js_candidates(specifier, importer_dir),
        Lang::Rust => rust_candidates(specifier, importer_dir),
    }
}

fn python_candidates(specifier: &str, importer_dir: &str) -> Vec<String> {
    let dots = specifier.chars().take_while(|&c| c == '.').count();
    let rest = &specifier[dots..];
    if dots == 0 {
        let base = rest.replace('.', "/");
        return vec![format!("{base}.py"), format!("{base}/__init__.py")];
    }
    // Relative import: one dot is the importer's package, each further dot
    // climbs one package up.
    let mut dir = importer_dir.to_string();
    for _ in 1..dots {
        let Some((parent, _)) = dir.rsplit_once('/') else {
            if dir.is_empty() {
                return Vec::new();
            }
            dir.clear();
            continue;
        };
        dir = parent.to_string();
    }
    if rest.is_empty() {
        return vec![join(&dir, "__init__.py")];
    }
    let base = join(&dir, &rest.replace('.', "/"));
    vec![format!("{base}.py"), format!("{base}/__init__.py")]
}

fn js_candidates(specifier: &str, importer_dir: &str) -> Vec<String> {
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        return Vec::new();
    }
    let Some(base) = normalize(importer_dir, specifier) else {
        return Vec::new();
    };
    if let Some((_, ext)) = base.rsplit_once('.')
        && JS_EXTENSIONS.contains(&ext)
    {
        return vec![base];
    }
    let mut candidates: Vec<String> = JS_EXTENSIONS
        .iter()
        .map(|ext| format!("{base}.{ext}"))
        .collect();
    candidates.push(format!("{base}/index.js"));
    candidates.push(format!("{base}/index.ts"));
    candidates
}

fn rust_candidates(specifier: &str, importer_dir: &str) -> Vec<String> {
    let segments: Vec<&str> = specifier.split("::").filter(|s| !s.is_empty()).collect();
    let Some((&first, rest)) = segments.split_first() else {
        return Vec::new();
    };
    let base_dir = match first {
        "crate" => "src".to_string(),
        "self" => importer_dir.to_string(),
        "super" => importer_dir.rsplit_once('/').map_or_else(String::new, |(parent, _)| {
            parent.to_string()
        }),
        // External crate, never a project file.
        _ => return Vec::new(),
    };
    if rest.is_empty() {
        return Vec::new();
    }
    // The specifier may end in an item name rather than a module, so every
    // path prefix is a candidate module file.
    let mut candidates = Vec::new();
    for depth in 1..=rest.len() {
        let module = join(&base_dir, &rest[..depth].join("/"));
        candidates.push(format!("{module}.rs"));
        candidates.push(format!("{module}/mod.rs"));
    }
    candidates
}

/// Resolves `.` and `..` components of `relative` against `dir`. Returns
/// `None` when the path escapes the project root.
fn normalize(dir: &str, relative: &str) -> Option<String> {
    let mut stack: Vec<&str> = dir.split('/').filter(|c| !c.is_empty()).collect();
    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }
    Some(stack.join("/"))
}

fn join(dir: &str, path: &str) -> String {
    if dir.is_empty() {
        path.to_string()
    } else {
        format!("{dir}/{path}")
    }
}
