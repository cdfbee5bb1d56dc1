use crate::ai::Provider;
use crate::error::{Result, SortError};
use crate::labels::MatchPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the candidate label set comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "labels", rename_all = "snake_case")]
pub enum LabelSource {
    /// Use the store's top-level container names.
    AutoDetect,
    /// Use this explicit list.
    Explicit(Vec<String>),
}

/// Immutable configuration for a single sorting run.
///
/// A value of this type is passed into `run(...)`; nothing in the core
/// mutates it. Persistence is an explicit load/save step owned by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // Provider selection
    pub provider: Provider,

    // Per-provider credentials and models
    pub openai_api_key: String,
    pub openai_model: String,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub gemini_api_key: String,
    pub gemini_model: String,

    // Source and labels
    pub source_scope: String,
    pub label_source: LabelSource,
    pub match_policy: MatchPolicy,

    // Batch behavior
    pub concurrency: usize,
    pub excerpt_chars: usize,
    pub window_pause_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,

            openai_api_key: String::new(),
            openai_model: "gpt-4o-mini".to_string(),
            anthropic_api_key: String::new(),
            anthropic_model: "claude-3-5-haiku-latest".to_string(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-1.5-flash".to_string(),

            source_scope: String::new(),
            label_source: LabelSource::AutoDetect,
            match_policy: MatchPolicy::Exact,

            concurrency: 3,
            excerpt_chars: 4000,
            window_pause_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl RunConfig {
    pub const MAX_CONCURRENCY: usize = 20;

    /// Load configuration from disk with environment variable overrides
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides, credentials especially
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("LEXISORT_OPENAI_API_KEY") {
            self.openai_api_key = key;
        }
        if let Ok(key) = std::env::var("LEXISORT_ANTHROPIC_API_KEY") {
            self.anthropic_api_key = key;
        }
        if let Ok(key) = std::env::var("LEXISORT_GEMINI_API_KEY") {
            self.gemini_api_key = key;
        }
        if let Ok(provider) = std::env::var("LEXISORT_PROVIDER") {
            match provider.to_lowercase().as_str() {
                "openai" => self.provider = Provider::OpenAi,
                "anthropic" => self.provider = Provider::Anthropic,
                "gemini" => self.provider = Provider::Gemini,
                other => {
                    tracing::warn!("Ignoring unknown LEXISORT_PROVIDER value '{}'", other);
                }
            }
        }
        if let Ok(value) = std::env::var("LEXISORT_CONCURRENCY") {
            match value.parse::<usize>() {
                Ok(concurrency) => self.concurrency = concurrency,
                Err(_) => {
                    tracing::warn!("Ignoring non-numeric LEXISORT_CONCURRENCY value '{}'", value);
                }
            }
        }
    }

    /// Rejects configurations the engine refuses to run with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.concurrency > Self::MAX_CONCURRENCY {
            return Err(SortError::Config {
                message: format!(
                    "concurrency must be between 1 and {}, got {}",
                    Self::MAX_CONCURRENCY,
                    self.concurrency
                ),
            });
        }
        if self.excerpt_chars == 0 {
            return Err(SortError::Config {
                message: "excerpt_chars must be greater than zero".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(SortError::Config {
                message: "request_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Credential for the selected provider.
    pub fn api_key(&self) -> &str {
        match self.provider {
            Provider::OpenAi => &self.openai_api_key,
            Provider::Anthropic => &self.anthropic_api_key,
            Provider::Gemini => &self.gemini_api_key,
        }
    }

    /// Model name for the selected provider.
    pub fn model(&self) -> &str {
        match self.provider {
            Provider::OpenAi => &self.openai_model,
            Provider::Anthropic => &self.anthropic_model,
            Provider::Gemini => &self.gemini_model,
        }
    }
}
