//! CLI `ingest` command — offline ETL from an image dataset into the gallery.
//!
//! Walks a dataset directory laid out as `Movement/artist_title-YYYY.ext`,
//! parses metadata out of each path, synthesizes a caption per artwork,
//! embeds captions in batches, and populates the store. Paths already indexed
//! are skipped, so re-running after adding images is cheap.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing::debug;

use crate::config::CurioConfig;
use crate::embedding::EmbeddingProvider;
use crate::gallery::{Artwork, Gallery};

/// Captions embedded per inference call.
const BATCH_SIZE: usize = 32;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Ingest every image under `dir` into the gallery database.
pub async fn ingest(config: &CurioConfig, dir: &Path) -> Result<()> {
    anyhow::ensure!(
        dir.is_dir(),
        "dataset directory not found: {}",
        dir.display()
    );

    let images = scan_images(dir)?;
    anyhow::ensure!(
        !images.is_empty(),
        "no images found under {} (looked for {})",
        dir.display(),
        IMAGE_EXTENSIONS.join("/")
    );
    println!("Found {} images under {}", images.len(), dir.display());

    let db_path = config.resolved_db_path();
    let mut gallery = Gallery::create(&db_path)?;

    let provider = crate::embedding::create_provider(&config.embedding)?;
    let embedder: Arc<dyn EmbeddingProvider> = Arc::from(provider);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let mut indexed = 0u64;
    let mut skipped = 0u64;
    let mut failed = 0u64;

    for chunk in images.chunks(BATCH_SIZE) {
        // Parse metadata and drop anything already indexed before embedding.
        let mut pending: Vec<Artwork> = Vec::with_capacity(chunk.len());
        for path in chunk {
            let artwork = match parse_artwork(dir, path) {
                Some(artwork) => artwork,
                None => {
                    debug!(path = %path.display(), "unparseable path, skipped");
                    failed += 1;
                    pb.inc(1);
                    continue;
                }
            };
            if gallery.contains(&artwork.id)? {
                skipped += 1;
                pb.inc(1);
                continue;
            }
            pending.push(artwork);
        }

        if pending.is_empty() {
            continue;
        }

        let captions: Vec<String> = pending.iter().map(|a| a.caption()).collect();
        let ep = Arc::clone(&embedder);
        let embeddings = tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = captions.iter().map(|c| c.as_str()).collect();
            ep.embed_batch(&refs)
        })
        .await?
        .context("failed to embed caption batch")?;

        for (artwork, embedding) in pending.iter().zip(embeddings.iter()) {
            gallery.insert(artwork, embedding)?;
            indexed += 1;
            pb.inc(1);
        }
    }

    pb.finish_and_clear();

    println!("Ingest complete:");
    println!("  Indexed:  {indexed}");
    println!("  Skipped:  {skipped} (already in gallery)");
    if failed > 0 {
        println!("  Skipped:  {failed} (unparseable path)");
    }
    println!("The gallery now contains {} artworks.", gallery.count()?);

    Ok(())
}

/// Recursively collect image files under `root`, sorted for stable ingest order.
fn scan_images(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if has_image_extension(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Parse artwork metadata from a dataset path following the
/// `Movement/artist_title-YYYY.ext` convention. Falls back to
/// Unknown/Untitled when the filename does not match, and returns `None`
/// only when the path has no usable filename at all.
///
/// Titles keep whatever casing the filename carries beyond the first letter;
/// they are not lowercased the way a str.capitalize would.
pub fn parse_artwork(root: &Path, path: &Path) -> Option<Artwork> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let id = relative.to_string_lossy().into_owned();
    let filename = path.file_name()?.to_string_lossy().into_owned();

    let movement = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|m| title_case(&m.to_string_lossy().replace('_', " ")))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "N/A".to_string());

    // `artist_title-YYYY.ext`, with the year optional.
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^(.*?)_(.*?)(?:-(\d{4}))?\.[^.]+$").expect("valid pattern")
    });

    let (artist, title, year) = match pattern.captures(&filename) {
        Some(caps) => {
            let artist = title_case(&caps[1].replace('-', " "));
            let title = capitalize(caps[2].replace('-', " ").trim());
            let year = caps.get(3).map(|y| y.as_str().to_string());
            (artist, title, year)
        }
        None => {
            let stem = filename
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(&filename);
            ("Unknown".to_string(), stem.to_string(), None)
        }
    };

    Some(Artwork {
        id,
        title: if title.is_empty() {
            "Untitled".to_string()
        } else {
            title
        },
        artist: if artist.is_empty() {
            "Unknown".to_string()
        } else {
            artist
        },
        year,
        movement,
        image_path: path.to_string_lossy().into_owned(),
    })
}

/// Capitalize the first letter of every whitespace-separated word.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize the first letter, lowercase nothing else.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_convention() {
        let root = Path::new("/data/art");
        let path = Path::new(
            "/data/art/Post_Impressionism/vincent-van-gogh_the-starry-night-1889.jpg",
        );
        let artwork = parse_artwork(root, path).unwrap();

        assert_eq!(
            artwork.id,
            "Post_Impressionism/vincent-van-gogh_the-starry-night-1889.jpg"
        );
        assert_eq!(artwork.artist, "Vincent Van Gogh");
        assert_eq!(artwork.title, "The starry night");
        assert_eq!(artwork.year.as_deref(), Some("1889"));
        assert_eq!(artwork.movement, "Post Impressionism");
    }

    #[test]
    fn parses_without_year() {
        let root = Path::new("/data/art");
        let path = Path::new("/data/art/Impressionism/claude-monet_water-lilies.jpg");
        let artwork = parse_artwork(root, path).unwrap();

        assert_eq!(artwork.artist, "Claude Monet");
        assert_eq!(artwork.title, "Water lilies");
        assert!(artwork.year.is_none());
        assert_eq!(artwork.movement, "Impressionism");
    }

    #[test]
    fn malformed_filename_falls_back() {
        let root = Path::new("/data/art");
        let path = Path::new("/data/art/Baroque/IMG0042.jpg");
        let artwork = parse_artwork(root, path).unwrap();

        assert_eq!(artwork.artist, "Unknown");
        assert_eq!(artwork.title, "IMG0042");
        assert!(artwork.year.is_none());
        assert_eq!(artwork.movement, "Baroque");
    }

    #[test]
    fn mixed_case_title_is_preserved() {
        let root = Path::new("/data/art");
        let path =
            Path::new("/data/art/Baroque/artemisia-gentileschi_Judith-and-HOLOFERNES-1620.jpg");
        let artwork = parse_artwork(root, path).unwrap();

        assert_eq!(artwork.artist, "Artemisia Gentileschi");
        assert_eq!(artwork.title, "Judith and HOLOFERNES");
        assert_eq!(artwork.year.as_deref(), Some("1620"));
    }

    #[test]
    fn image_extension_filter() {
        assert!(has_image_extension(Path::new("a/b.jpg")));
        assert!(has_image_extension(Path::new("a/b.JPEG")));
        assert!(has_image_extension(Path::new("a/b.png")));
        assert!(!has_image_extension(Path::new("a/b.txt")));
        assert!(!has_image_extension(Path::new("a/b")));
    }

    #[test]
    fn title_case_handles_multiword() {
        assert_eq!(title_case("post impressionism"), "Post Impressionism");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn scan_finds_nested_images() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("Cubism");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("pablo-picasso_guernica-1937.jpg"), b"x").unwrap();
        std::fs::write(nested.join("notes.txt"), b"x").unwrap();

        let images = scan_images(tmp.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].ends_with("pablo-picasso_guernica-1937.jpg"));
    }
}
