//! Artwork record types.

use serde::{Deserialize, Serialize};

/// One indexed artwork, matching the `artworks` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    /// Image path relative to the dataset root — unique by construction.
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Four-digit creation year, when the dataset filename carried one.
    pub year: Option<String>,
    pub movement: String,
    /// Path to the image asset on disk.
    pub image_path: String,
}

impl Artwork {
    /// The caption string that stands in for the image in embedding space.
    /// Indexed once at ingest time; query recipes are embedded into the same
    /// space at recommendation time.
    pub fn caption(&self) -> String {
        let mut caption = format!(
            "{} by {}, {} movement",
            self.title, self.artist, self.movement
        );
        if let Some(year) = &self.year {
            caption.push_str(&format!(", {year}"));
        }
        caption
    }

    /// `"Title" (year)` or just `"Title"` when the year is unknown.
    pub fn display_title(&self) -> String {
        match &self.year {
            Some(year) => format!("\"{}\" ({})", self.title, year),
            None => format!("\"{}\"", self.title),
        }
    }
}

/// An artwork paired with its distance from a query vector.
#[derive(Debug, Clone)]
pub struct ScoredArtwork {
    pub artwork: Artwork,
    /// L2 distance reported by sqlite-vec — smaller is closer.
    pub distance: f64,
}
