//! The end-to-end recommendation pipeline.
//!
//! [`Curator`] owns the three leaves — reasoning provider, embedding
//! provider, gallery store — and runs one mood through
//! recipe → query vector → nearest artwork → explanation. Each step is a hard
//! dependency on the previous one succeeding, and the explanation is only
//! ever generated after an artwork has been selected.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::CurioError;
use crate::gallery::{Artwork, Gallery};
use crate::reasoning::ReasoningProvider;

/// One pipeline output: an artwork, why it was chosen, and how close it was.
/// Constructed fresh per request, never persisted.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub artwork: Artwork,
    pub explanation: String,
    pub distance: f64,
}

pub struct Curator<R: ReasoningProvider> {
    reasoning: R,
    embedding: Arc<dyn EmbeddingProvider>,
    gallery: Gallery,
    /// Neighbors fetched per query. Headroom above 1 so the exclude list
    /// cannot starve the result.
    candidates: usize,
}

impl<R: ReasoningProvider> Curator<R> {
    pub fn new(
        reasoning: R,
        embedding: Arc<dyn EmbeddingProvider>,
        gallery: Gallery,
        candidates: usize,
    ) -> Self {
        Self {
            reasoning,
            embedding,
            gallery,
            candidates: candidates.max(1),
        }
    }

    /// Number of indexed artworks, for startup diagnostics.
    pub fn collection_size(&self) -> anyhow::Result<u64> {
        self.gallery.count()
    }

    /// Run one recommendation. Stateless across calls; `exclude` lists
    /// artwork ids the caller does not want back (the session passes the
    /// artworks already shown this run — an empty slice gives the plain
    /// stateless operation).
    pub async fn recommend(
        &self,
        mood: &str,
        exclude: &[String],
    ) -> Result<Recommendation, CurioError> {
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(CurioError::InvalidInput);
        }

        let recipe = self.reasoning.derive_recipe(mood).await?;
        debug!(%recipe, "recipe derived");

        let query_text = recipe.as_query();
        let embedder = Arc::clone(&self.embedding);
        let query = tokio::task::spawn_blocking(move || embedder.embed(&query_text))
            .await
            .map_err(|e| CurioError::Embedding(format!("embedding task failed: {e}")))?
            .map_err(|e| CurioError::Embedding(e.to_string()))?;

        let results = self
            .gallery
            .nearest(&query, self.candidates, exclude)
            .map_err(|e| CurioError::StoreUnavailable(e.to_string()))?;

        let Some(top) = results.into_iter().next() else {
            warn!("gallery returned no candidates");
            return Err(CurioError::NoMatch);
        };
        debug!(id = %top.artwork.id, distance = top.distance, "nearest artwork selected");

        // Selection is final before any explanation is written.
        let explanation = self.reasoning.explain(mood, &top.artwork).await?;

        Ok(Recommendation {
            artwork: top.artwork,
            explanation,
            distance: top.distance,
        })
    }
}
