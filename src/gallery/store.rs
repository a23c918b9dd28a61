//! The sqlite-vec backed artwork store.
//!
//! [`Gallery`] wraps a [`Connection`] opened once at startup. The interactive
//! path opens it read-only and only ever calls [`Gallery::nearest`] and
//! [`Gallery::count`]; the write path ([`Gallery::insert`]) exists for the
//! offline `ingest` command.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

use super::{embedding_to_bytes, Artwork, ScoredArtwork};
use crate::db;

#[derive(Debug)]
pub struct Gallery {
    conn: Connection,
}

impl Gallery {
    /// Open an existing gallery read-only. Fails if the database file does
    /// not exist — the session cannot run against an unpopulated store.
    pub fn open_readonly(path: impl AsRef<Path>) -> Result<Self> {
        let conn = db::open_database_readonly(path)?;
        Ok(Self { conn })
    }

    /// Open (or create) the gallery read-write with schema applied.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let conn = db::open_database(path)?;
        Ok(Self { conn })
    }

    /// In-memory gallery with schema applied, for tests.
    #[allow(dead_code)]
    pub fn in_memory() -> Result<Self> {
        let conn = db::open_memory_database()?;
        Ok(Self { conn })
    }

    /// Number of indexed artworks. Used for startup diagnostics.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM artworks", [], |row| row.get(0))
            .context("failed to count artworks")?;
        Ok(count as u64)
    }

    /// Whether an artwork id is already indexed.
    pub fn contains(&self, id: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM artworks WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Nearest-neighbor lookup: up to `k` artworks by ascending distance,
    /// skipping any id in `exclude`.
    ///
    /// sqlite-vec reports equal-distance results in its native order; to keep
    /// the output deterministic, ties are broken by ascending artwork id.
    pub fn nearest(
        &self,
        query: &[f32],
        k: usize,
        exclude: &[String],
    ) -> Result<Vec<ScoredArtwork>> {
        // Over-fetch so the exclusion filter cannot starve the result set.
        let fetch = k + exclude.len();

        let query_bytes = embedding_to_bytes(query);
        let mut stmt = self.conn.prepare(
            "SELECT id, distance FROM artworks_vec \
             WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
        )?;
        let knn: Vec<(String, f64)> = stmt
            .query_map(params![query_bytes, fetch as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut hits: Vec<(String, f64)> = knn
            .into_iter()
            .filter(|(id, _)| !exclude.iter().any(|e| e == id))
            .collect();

        // Ascending distance, id as the stable secondary key.
        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        hits.truncate(k);

        let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
        let mut records = self.fetch_artworks(&ids)?;

        let results = hits
            .into_iter()
            .filter_map(|(id, distance)| {
                records
                    .remove(id.as_str())
                    .map(|artwork| ScoredArtwork { artwork, distance })
            })
            .collect();

        Ok(results)
    }

    /// Insert one artwork and its caption embedding, atomically.
    pub fn insert(&mut self, artwork: &Artwork, embedding: &[f32]) -> Result<()> {
        let tx = self.conn.transaction()?;

        let now = chrono::Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO artworks (id, title, artist, year, movement, image_path, indexed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                artwork.id,
                artwork.title,
                artwork.artist,
                artwork.year,
                artwork.movement,
                artwork.image_path,
                now,
            ],
        )?;

        tx.execute(
            "INSERT INTO artworks_vec (id, embedding) VALUES (?1, ?2)",
            params![artwork.id, embedding_to_bytes(embedding)],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Batch-fetch artwork rows by id.
    fn fetch_artworks(&self, ids: &[&str]) -> Result<HashMap<String, Artwork>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT id, title, artist, year, movement, image_path \
             FROM artworks WHERE id IN ({})",
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let sql_params: Vec<&dyn rusqlite::types::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();

        let rows = stmt
            .query_map(sql_params.as_slice(), |row| {
                Ok(Artwork {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    artist: row.get(2)?,
                    year: row.get(3)?,
                    movement: row.get(4)?,
                    image_path: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut map = HashMap::new();
        for artwork in rows {
            map.insert(artwork.id.clone(), artwork);
        }
        Ok(map)
    }
}
