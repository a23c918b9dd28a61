//! Mood reasoning via a hosted language model.
//!
//! Provides the [`ReasoningProvider`] trait with its two operations — derive
//! a visual search recipe from a mood, and write an explanation for a chosen
//! artwork — plus the [`Recipe`] intermediate type. The production
//! implementation is the Gemini REST client in [`gemini`]; tests substitute
//! their own implementations.

pub mod gemini;

use async_trait::async_trait;

use crate::error::CurioError;
use crate::gallery::Artwork;

/// Keyword cap applied to model output before embedding. Longer lists dilute
/// the query vector without adding signal.
pub const MAX_RECIPE_KEYWORDS: usize = 7;

/// A visual "antidote" recipe derived from a mood: a short keyword list
/// suitable for embedding. Ephemeral, recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    keywords: Vec<String>,
}

impl Recipe {
    /// Parse a raw model response into a recipe: split on commas, trim, drop
    /// empties, cap at [`MAX_RECIPE_KEYWORDS`]. Returns `None` when nothing
    /// usable remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let keywords: Vec<String> = raw
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .take(MAX_RECIPE_KEYWORDS)
            .collect();

        if keywords.is_empty() {
            None
        } else {
            Some(Self { keywords })
        }
    }

    /// The textual form fed to the embedding model.
    pub fn as_query(&self) -> String {
        self.keywords.join(", ")
    }

    #[allow(dead_code)]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_query())
    }
}

/// The two language-model operations the pipeline depends on.
///
/// Both are single-attempt: failures map to [`CurioError::ProviderUnavailable`]
/// (transport, auth, HTTP) or [`CurioError::ProviderRefusal`] (model answered
/// with nothing usable) and surface as one per-turn error line.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Translate a mood into a short visual description for similarity search.
    async fn derive_recipe(&self, mood: &str) -> Result<Recipe, CurioError>;

    /// Write an empathetic one-paragraph explanation connecting the artwork
    /// to the mood. Only called after an artwork has been selected.
    async fn explain(&self, mood: &str, artwork: &Artwork) -> Result<String, CurioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_and_trims() {
        let recipe = Recipe::parse("calm sea,  golden light , soft horizon").unwrap();
        assert_eq!(
            recipe.keywords(),
            &["calm sea", "golden light", "soft horizon"]
        );
        assert_eq!(recipe.as_query(), "calm sea, golden light, soft horizon");
    }

    #[test]
    fn parse_caps_keyword_count() {
        let raw = "one, two, three, four, five, six, seven, eight, nine, ten";
        let recipe = Recipe::parse(raw).unwrap();
        assert_eq!(recipe.keywords().len(), MAX_RECIPE_KEYWORDS);
        assert_eq!(recipe.keywords().last().unwrap(), "seven");
    }

    #[test]
    fn parse_drops_empty_segments() {
        let recipe = Recipe::parse("warm colors,, ,sunrise").unwrap();
        assert_eq!(recipe.keywords(), &["warm colors", "sunrise"]);
    }

    #[test]
    fn parse_rejects_blank_input() {
        assert!(Recipe::parse("").is_none());
        assert!(Recipe::parse("   ").is_none());
        assert!(Recipe::parse(", , ,").is_none());
    }

    #[test]
    fn single_phrase_is_a_valid_recipe() {
        let recipe = Recipe::parse("a quiet forest clearing at dusk").unwrap();
        assert_eq!(recipe.keywords().len(), 1);
        assert_eq!(recipe.as_query(), "a quiet forest clearing at dusk");
    }
}
