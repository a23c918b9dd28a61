//! Gemini REST implementation of [`ReasoningProvider`].
//!
//! Talks to the `generateContent` endpoint with the API key in the
//! `x-goog-api-key` header. One attempt per call; retry policy is the
//! caller's problem (the session just re-prompts).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Recipe, ReasoningProvider};
use crate::config::ReasoningConfig;
use crate::error::CurioError;
use crate::gallery::Artwork;

pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

// ── Client ────────────────────────────────────────────────────────────────────

impl GeminiClient {
    /// Build a client from config. The API key must already be resolved
    /// (config file or `GEMINI_API_KEY`); an empty key is a startup error,
    /// not a per-turn one.
    pub fn new(config: &ReasoningConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !config.api_key.is_empty(),
            "no Gemini API key configured. Set GEMINI_API_KEY or add it to the config file."
        );

        Ok(Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Send one prompt, return the first candidate's text.
    async fn generate(&self, prompt: &str) -> Result<String, CurioError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CurioError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurioError::ProviderUnavailable(format!(
                "HTTP {status} from {}",
                self.model
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CurioError::ProviderRefusal(format!("unparseable response: {e}")))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CurioError::ProviderRefusal(
                "model returned no candidates".into(),
            ));
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl ReasoningProvider for GeminiClient {
    async fn derive_recipe(&self, mood: &str) -> Result<Recipe, CurioError> {
        let prompt = recipe_prompt(mood);
        let raw = self.generate(&prompt).await?;

        let recipe = Recipe::parse(&raw).ok_or_else(|| {
            CurioError::ProviderRefusal(format!("no usable keywords in response: {raw:?}"))
        })?;

        debug!(recipe = %recipe, "derived search recipe");
        Ok(recipe)
    }

    async fn explain(&self, mood: &str, artwork: &Artwork) -> Result<String, CurioError> {
        let prompt = explain_prompt(mood, artwork);
        self.generate(&prompt).await
    }
}

// ── Prompt templates ──────────────────────────────────────────────────────────

fn recipe_prompt(mood: &str) -> String {
    format!(
        "You are an art therapist. A user is feeling: '{mood}'. \
         Respond with a list of up to 10 comma-separated keywords \
         that describe the visual antidote."
    )
}

fn explain_prompt(mood: &str, artwork: &Artwork) -> String {
    format!(
        "You are an empathetic and concise art critic. \
         A user is feeling '{mood}'. The chosen artwork for them is \
         {} by {}, from the {} movement. \
         Write a personal and touching explanation (2-3 sentences max), \
         without repeating the info you already know.",
        artwork.display_title(),
        artwork.artist,
        artwork.movement,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork() -> Artwork {
        Artwork {
            id: "Impressionism/claude-monet_water-lilies-1906.jpg".into(),
            title: "Water lilies".into(),
            artist: "Claude Monet".into(),
            year: Some("1906".into()),
            movement: "Impressionism".into(),
            image_path: "art/Impressionism/claude-monet_water-lilies-1906.jpg".into(),
        }
    }

    #[test]
    fn recipe_prompt_embeds_mood() {
        let prompt = recipe_prompt("anxious and restless");
        assert!(prompt.contains("'anxious and restless'"));
        assert!(prompt.contains("comma-separated keywords"));
    }

    #[test]
    fn explain_prompt_embeds_artwork_metadata() {
        let prompt = explain_prompt("a bit lost", &artwork());
        assert!(prompt.contains("'a bit lost'"));
        assert!(prompt.contains("\"Water lilies\" (1906)"));
        assert!(prompt.contains("Claude Monet"));
        assert!(prompt.contains("Impressionism movement"));
    }

    #[test]
    fn client_requires_api_key() {
        let config = ReasoningConfig::default();
        assert!(config.api_key.is_empty());
        assert!(GeminiClient::new(&config).is_err());

        let config = ReasoningConfig {
            api_key: "k".into(),
            ..ReasoningConfig::default()
        };
        assert!(GeminiClient::new(&config).is_ok());
    }

    #[test]
    fn response_parsing_reaches_first_candidate_text() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "calm sea, golden light"}], "role": "model"}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap();
        assert_eq!(text, "calm sea, golden light");
    }

    #[test]
    fn response_parsing_tolerates_missing_candidates() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
