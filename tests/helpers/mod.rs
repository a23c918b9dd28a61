#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use curio::embedding::{EmbeddingProvider, EMBEDDING_DIM};
use curio::error::CurioError;
use curio::gallery::{Artwork, Gallery};
use curio::reasoning::{Recipe, ReasoningProvider};

/// Deterministic unit vector with a spike at position `dim`.
/// Distinct dims produce orthogonal vectors.
pub fn spike(dim: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    v[dim % EMBEDDING_DIM] = 1.0;
    v
}

/// A plausible artwork record for seeding galleries.
pub fn artwork(id: &str, title: &str) -> Artwork {
    Artwork {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Test Artist".into(),
        year: Some("1900".into()),
        movement: "Testism".into(),
        image_path: format!("art/{id}"),
    }
}

/// In-memory gallery seeded with `n` artworks at orthogonal embeddings
/// spike(0)..spike(n-1), ids "work-0.jpg".."work-{n-1}.jpg".
pub fn seeded_gallery(n: usize) -> Gallery {
    let mut gallery = Gallery::in_memory().unwrap();
    for i in 0..n {
        let a = artwork(&format!("work-{i}.jpg"), &format!("Work {i}"));
        gallery.insert(&a, &spike(i)).unwrap();
    }
    gallery
}

// ── Mock reasoning provider ───────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum ReasoningMode {
    /// Fixed recipe and explanation.
    Ok,
    /// Every call fails with `ProviderUnavailable`.
    Unavailable,
    /// Every call fails with `ProviderRefusal`.
    Refusal,
}

/// Scripted reasoning provider with shared call counters, so tests can assert
/// which operations ran after the provider moved into the pipeline.
pub struct MockReasoning {
    mode: ReasoningMode,
    pub recipe_calls: Arc<AtomicUsize>,
    pub explain_calls: Arc<AtomicUsize>,
}

impl MockReasoning {
    pub fn new(mode: ReasoningMode) -> Self {
        Self {
            mode,
            recipe_calls: Arc::new(AtomicUsize::new(0)),
            explain_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn ok() -> Self {
        Self::new(ReasoningMode::Ok)
    }

    pub fn unavailable() -> Self {
        Self::new(ReasoningMode::Unavailable)
    }

    /// Clones of the counters, taken before the mock moves into a `Curator`.
    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (
            Arc::clone(&self.recipe_calls),
            Arc::clone(&self.explain_calls),
        )
    }
}

#[async_trait]
impl ReasoningProvider for MockReasoning {
    async fn derive_recipe(&self, _mood: &str) -> Result<Recipe, CurioError> {
        self.recipe_calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ReasoningMode::Ok => Ok(Recipe::parse("calm sea, golden light").unwrap()),
            ReasoningMode::Unavailable => {
                Err(CurioError::ProviderUnavailable("mock offline".into()))
            }
            ReasoningMode::Refusal => Err(CurioError::ProviderRefusal("mock refused".into())),
        }
    }

    async fn explain(&self, mood: &str, artwork: &Artwork) -> Result<String, CurioError> {
        self.explain_calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ReasoningMode::Ok => Ok(format!(
                "{} suits a mood of {mood}.",
                artwork.title
            )),
            ReasoningMode::Unavailable => {
                Err(CurioError::ProviderUnavailable("mock offline".into()))
            }
            ReasoningMode::Refusal => Err(CurioError::ProviderRefusal("mock refused".into())),
        }
    }
}

// ── Mock embedding provider ───────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum EmbeddingMode {
    /// Always return spike(dim).
    Fixed(usize),
    /// Every call fails.
    Failing,
}

pub struct MockEmbedding {
    mode: EmbeddingMode,
    pub embed_calls: Arc<AtomicUsize>,
}

impl MockEmbedding {
    pub fn fixed(dim: usize) -> Self {
        Self {
            mode: EmbeddingMode::Fixed(dim),
            embed_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            mode: EmbeddingMode::Failing,
            embed_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.embed_calls)
    }
}

impl EmbeddingProvider for MockEmbedding {
    fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            EmbeddingMode::Fixed(dim) => Ok(spike(dim)),
            EmbeddingMode::Failing => anyhow::bail!("mock embedder failure"),
        }
    }
}
