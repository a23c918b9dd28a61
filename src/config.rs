use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CurioConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub reasoning: ReasoningConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReasoningConfig {
    pub api_base: String,
    pub model: String,
    /// Normally left empty and supplied via `GEMINI_API_KEY`. A populated
    /// config file is the untracked-local-file alternative.
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub log_level: String,
    pub exit_keyword: String,
    /// How many neighbors to request per query. Must leave headroom for the
    /// shown-this-session exclude list.
    pub candidates: usize,
}

impl Default for CurioConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            reasoning: ReasoningConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_curio_dir()
            .join("gallery.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_curio_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
        }
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-1.5-flash-latest".into(),
            api_key: String::new(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            exit_keyword: "exit".into(),
            candidates: 5,
        }
    }
}

/// Returns `~/.curio/`
pub fn default_curio_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".curio")
}

/// Returns the default config file path: `~/.curio/config.toml`
pub fn default_config_path() -> PathBuf {
    default_curio_dir().join("config.toml")
}

impl CurioConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CurioConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (CURIO_DB, CURIO_LOG_LEVEL, GEMINI_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CURIO_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("CURIO_LOG_LEVEL") {
            self.session.log_level = val;
        }
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            self.reasoning.api_key = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
