mod cli;
mod config;
mod db;
mod embedding;
mod error;
mod gallery;
mod pipeline;
mod reasoning;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::gallery::Gallery;
use crate::pipeline::Curator;
use crate::reasoning::gemini::GeminiClient;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "curio", version, about = "Mood-based art recommendation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Index an image dataset into the gallery (offline, one-time)
    Ingest {
        /// Dataset root, laid out as Movement/artist_title-YYYY.jpg
        dir: PathBuf,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Check that the store, model files, and API key are in place
    Doctor,
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.curio/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::CurioConfig::load()?;

    // Log to stderr so stdout stays clean for the interactive transcript.
    let filter = EnvFilter::try_new(&config.session.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => {
            run_session(config).await?;
        }
        Some(Command::Ingest { dir }) => {
            cli::ingest::ingest(&config, &dir).await?;
        }
        Some(Command::Model { action }) => match action {
            ModelAction::Download => {
                cli::model_download(&config.embedding).await?;
            }
        },
        Some(Command::Doctor) => {
            cli::doctor::doctor(&config)?;
        }
    }

    Ok(())
}

/// One-time initialization, then the interactive loop. Any failure here is
/// fatal and exits non-zero before the first prompt.
async fn run_session(config: config::CurioConfig) -> Result<()> {
    let gallery = Gallery::open_readonly(config.resolved_db_path())
        .context("failed to open the gallery store")?;

    let provider = embedding::create_provider(&config.embedding)
        .context("failed to load the embedding model")?;
    let embedder: Arc<dyn embedding::EmbeddingProvider> = Arc::from(provider);

    let reasoning = GeminiClient::new(&config.reasoning)
        .context("failed to construct the reasoning provider")?;

    let curator = Curator::new(reasoning, embedder, gallery, config.session.candidates);
    println!("Gallery loaded with {} artworks.", curator.collection_size()?);
    let mut session = Session::new(curator, config.session.exit_keyword.as_str());

    session
        .run(std::io::stdin().lock(), std::io::stdout())
        .await
}
