//! Subcommands that prepare the gallery for the interactive session.

pub mod doctor;
pub mod ingest;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Hosted artifacts for the all-MiniLM-L6-v2 encoder.
const ENCODER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// On-disk locations of the encoder artifacts inside the cache directory.
/// `LocalEmbedder` and `doctor` look for these exact filenames.
pub fn artifact_paths(cache_dir: &Path) -> (PathBuf, PathBuf) {
    (
        cache_dir.join("model.onnx"),
        cache_dir.join("tokenizer.json"),
    )
}

/// Fetch the encoder and tokenizer into the cache directory. Artifacts
/// already in place are skipped, so the command is safe to re-run.
pub async fn model_download(config: &crate::config::EmbeddingConfig) -> Result<()> {
    let cache_dir = crate::config::expand_tilde(&config.cache_dir);
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

    let (encoder_path, tokenizer_path) = artifact_paths(&cache_dir);

    if encoder_path.exists() {
        println!("Encoder already cached at {}", encoder_path.display());
    } else {
        println!("Fetching the {} encoder (~90 MB)...", config.model);
        download_file(ENCODER_URL, &encoder_path).await?;
        println!("Encoder cached at {}", encoder_path.display());
    }

    if tokenizer_path.exists() {
        println!("Tokenizer already cached at {}", tokenizer_path.display());
    } else {
        println!("Fetching the tokenizer...");
        download_file(TOKENIZER_URL, &tokenizer_path).await?;
        println!("Tokenizer cached at {}", tokenizer_path.display());
    }

    println!("Curio can now embed captions and recipes offline.");
    Ok(())
}

/// Stream a URL to `dest`, advancing the progress bar per chunk. The body
/// lands in a sibling `.tmp` file and is renamed into place only once
/// complete, so an interrupted download never leaves a half-written artifact
/// where the embedder would find it.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let mut response = reqwest::get(url)
        .await
        .with_context(|| format!("request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("error reading response body")?
    {
        file.write_all(&chunk)
            .await
            .context("error writing artifact")?;
        pb.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .with_context(|| format!("failed to move artifact into {}", dest.display()))?;

    pb.finish_and_clear();
    Ok(())
}
