//! TOML configuration with environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use quarry_index::indexer::DEFAULT_EXTENSIONS;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub index: IndexConfig,
    pub answer: AnswerConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
}

#[derive(Debug, Deserialize)]
pub struct IndexConfig {
    pub qdrant_url: String,
    /// Directory holding per-project artifacts (graph, file tree).
    pub data_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub extensions: Vec<String>,
    pub top_k: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnswerConfig {
    /// Technology stack used to pick the answering persona.
    pub stack: String,
    /// Natural language to answer in; empty leaves it to the model.
    pub language: String,
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("QUARRY_OLLAMA_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("QUARRY_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("QUARRY_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("QUARRY_QDRANT_URL") {
            self.index.qdrant_url = v;
        }
        if let Ok(v) = std::env::var("QUARRY_DATA_DIR") {
            self.index.data_dir = PathBuf::from(v);
        }
    }

    fn default() -> Self {
        Self {
            llm: LlmConfig {
                base_url: "http://localhost:11434".into(),
                model: "llama3.1:8b".into(),
                embedding_model: "nomic-embed-text".into(),
            },
            index: IndexConfig {
                qdrant_url: "http://localhost:6334".into(),
                data_dir: PathBuf::from(".quarry"),
                chunk_size: 1000,
                chunk_overlap: 200,
                extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
                top_k: 5,
            },
            answer: AnswerConfig {
                stack: String::new(),
                language: String::new(),
            },
        }
    }

    /// Data directory for one project's artifacts.
    #[must_use]
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.index.data_dir.join(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/quarry.toml")).unwrap();
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.index.chunk_size, 1000);
        assert_eq!(config.index.top_k, 5);
        assert!(config.index.extensions.iter().any(|e| e == "py"));
    }

    #[test]
    fn toml_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quarry.toml");
        std::fs::write(
            &path,
            r#"
[llm]
base_url = "http://ollama:11434"
model = "qwen2.5-coder:7b"
embedding_model = "nomic-embed-text"

[index]
qdrant_url = "http://qdrant:6334"
data_dir = "/var/lib/quarry"
chunk_size = 800
chunk_overlap = 100
extensions = ["py"]
top_k = 3

[answer]
stack = "flask"
language = "English"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.llm.model, "qwen2.5-coder:7b");
        assert_eq!(config.index.chunk_size, 800);
        assert_eq!(config.answer.stack, "flask");
        assert_eq!(
            config.project_dir("demo"),
            PathBuf::from("/var/lib/quarry/demo")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quarry.toml");
        std::fs::write(&path, "not toml [").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
