//! CLI `doctor` command — check everything the interactive session needs.

use anyhow::{Context, Result};

use crate::config::CurioConfig;
use crate::db;

/// Print a startup-readiness report: store, model files, API key.
pub fn doctor(config: &CurioConfig) -> Result<()> {
    println!("Curio Health Report");
    println!("===================");
    println!();

    // Gallery store
    let db_path = config.resolved_db_path();
    if db_path.exists() {
        let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
        let conn = db::open_database_readonly(&db_path)
            .context("failed to open database (may be corrupt)")?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM artworks", [], |r| r.get(0))?;
        let vec_version: String = conn.query_row("SELECT vec_version()", [], |r| r.get(0))?;

        println!("Gallery:           {}", db_path.display());
        println!("File size:         {}", format_bytes(file_size));
        println!("Artworks indexed:  {count}");
        println!("sqlite-vec:        v{vec_version}");
        if count == 0 {
            println!("  WARNING: the gallery is empty. Run `curio ingest <dir>`.");
        }
    } else {
        println!("Gallery:           not found at {}", db_path.display());
        println!("  Run `curio ingest <dir>` to build it.");
    }
    println!();

    // Embedding model files
    let cache_dir = crate::config::expand_tilde(&config.embedding.cache_dir);
    let (encoder_path, tokenizer_path) = super::artifact_paths(&cache_dir);
    let model_ok = encoder_path.exists();
    let tokenizer_ok = tokenizer_path.exists();
    println!("Embedding model:   {}", config.embedding.model);
    println!("  model.onnx:      {}", if model_ok { "present" } else { "MISSING" });
    println!(
        "  tokenizer.json:  {}",
        if tokenizer_ok { "present" } else { "MISSING" }
    );
    if !model_ok || !tokenizer_ok {
        println!("  Run `curio model download` to fetch them.");
    }
    println!();

    // Reasoning provider credential — presence only, never the value
    println!("Reasoning model:   {}", config.reasoning.model);
    if config.reasoning.api_key.is_empty() {
        println!("  API key:         MISSING (set GEMINI_API_KEY)");
    } else {
        println!("  API key:         present");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_scales() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
