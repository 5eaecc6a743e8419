//! quarry — code-aware question answering over an indexed project.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use quarry_core::{AnswerGenerator, Pipeline, PipelineRequest, RelevanceGrader};
use quarry_graph::{build_graph, graph_path};
use quarry_index::{
    ChunkStore, IndexerConfig, ProjectIndexer, SemanticRetriever, render_file_tree,
};
use quarry_llm::OllamaProvider;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const FILE_TREE_FILE: &str = "file_tree.txt";

#[derive(Parser)]
#[command(name = "quarry", version, about = "Ask questions about your codebase")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "quarry.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a project so it can be queried.
    Index {
        /// Name the project is stored under.
        #[arg(long)]
        project: String,
        /// Root directory of the project.
        root: PathBuf,
    },
    /// Ask a question about an indexed project.
    Ask {
        /// Name the project was indexed under.
        #[arg(long)]
        project: String,
        question: String,
        /// Technology stack used to pick the answering persona.
        #[arg(long)]
        stack: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Index { project, root } => index(&config, &project, &root).await,
        Command::Ask {
            project,
            question,
            stack,
        } => ask(&config, &project, &question, stack.as_deref()).await,
    }
}

fn provider(config: &Config) -> OllamaProvider {
    OllamaProvider::new(
        &config.llm.base_url,
        config.llm.model.clone(),
        config.llm.embedding_model.clone(),
    )
}

async fn index(config: &Config, project: &str, root: &Path) -> anyhow::Result<()> {
    if !root.is_dir() {
        bail!("project root {} is not a directory", root.display());
    }

    let provider = provider(config);
    if let Err(e) = provider.health_check().await {
        tracing::warn!("{e}");
    }

    let store = ChunkStore::connect(&config.index.qdrant_url, project)?;
    let indexer_config = IndexerConfig {
        extensions: config.index.extensions.clone(),
        chunk_size: config.index.chunk_size,
        chunk_overlap: config.index.chunk_overlap,
    };
    let indexer = ProjectIndexer::new(provider, store, &indexer_config);
    let report = indexer.index_project(root).await?;

    let db_path = config.project_dir(project);
    std::fs::create_dir_all(&db_path).context("failed to create project data directory")?;
    build_graph(root)
        .save(&graph_path(&db_path))
        .context("failed to save dependency graph")?;
    std::fs::write(
        db_path.join(FILE_TREE_FILE),
        render_file_tree(root, &config.index.extensions),
    )
    .context("failed to write file tree")?;

    println!(
        "indexed {} of {} files ({} chunks) in {} ms",
        report.files_indexed, report.files_scanned, report.chunks_created, report.duration_ms
    );
    for error in &report.errors {
        println!("warning: {error}");
    }
    Ok(())
}

async fn ask(
    config: &Config,
    project: &str,
    question: &str,
    stack: Option<&str>,
) -> anyhow::Result<()> {
    let db_path = config.project_dir(project);
    if !db_path.is_dir() {
        bail!("project {project} is not indexed yet, run `quarry index` first");
    }

    let provider = provider(config);
    let store = ChunkStore::connect(&config.index.qdrant_url, project)?;
    if !store.exists().await? {
        bail!("no vector collection for project {project}, run `quarry index` first");
    }

    let retriever = SemanticRetriever::new(provider.clone(), store);
    let grader = RelevanceGrader::new(provider.clone());
    let generator = AnswerGenerator::new(
        provider,
        stack.unwrap_or(&config.answer.stack),
        config.answer.language.clone(),
    );
    let pipeline = Pipeline::new(retriever, grader, generator, config.index.top_k);

    let request = PipelineRequest {
        question: question.to_string(),
        project_name: project.to_string(),
        file_tree: std::fs::read_to_string(db_path.join(FILE_TREE_FILE)).unwrap_or_default(),
        db_path,
    };
    let outcome = pipeline.run(&request).await?;

    println!("{}", outcome.generation);
    if !outcome.documents.is_empty() {
        println!("\nSources:");
        for document in &outcome.documents {
            println!("  {}", document.source);
        }
    }
    Ok(())
}
