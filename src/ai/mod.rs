pub mod anthropic;
pub mod gemini;
pub mod openai;


use crate::config::RunConfig;
use crate::error::{Result, SortError};
use crate::labels::CandidateLabelSet;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The closed set of supported classification providers.
///
/// Variants differ only in endpoint, auth carriage and response field layout;
/// behind `ClassifierClient` they are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote classification capability.
///
/// `Ok(None)` means the provider answered but produced no usable completion
/// text; the caller treats that as a soft failure, not an error. Transport
/// timeouts are owned by the underlying HTTP client, the core imposes none.
#[async_trait]
pub trait ClassifierClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn classify(
        &self,
        content: &str,
        labels: &CandidateLabelSet,
    ) -> Result<Option<String>>;
}

/// Builds the client for the configured provider.
///
/// The credential check happens here, once per run: an empty key for the
/// selected provider fails before any network call is attempted.
pub fn client_for(config: &RunConfig) -> Result<Box<dyn ClassifierClient>> {
    match config.provider {
        Provider::OpenAi => Ok(Box::new(openai::OpenAiClient::new(config)?)),
        Provider::Anthropic => Ok(Box::new(anthropic::AnthropicClient::new(config)?)),
        Provider::Gemini => Ok(Box::new(gemini::GeminiClient::new(config)?)),
    }
}

pub(crate) fn require_credential(provider: Provider, api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(SortError::MissingCredential {
            provider: provider.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(SortError::from)
}

/// Bounded prefix of the content, safe on char boundaries. Longer content is
/// silently truncated, never summarized.
pub(crate) fn excerpt(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// Single natural-language instruction embedding the literal candidate labels
/// and a bounded content excerpt. Built fresh per document.
pub(crate) fn build_prompt(
    content: &str,
    labels: &CandidateLabelSet,
    max_chars: usize,
) -> String {
    format!(
        "You are a document classifier. Assign the document below to exactly one \
         of the following categories: {}.\n\
         Respond with the category name only, with no explanation and no punctuation.\n\n\
         Document:\n{}",
        labels.labels().join(", "),
        excerpt(content, max_chars)
    )
}

/// Checks an HTTP response status, mapping non-success to a transport error.
pub(crate) fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(SortError::Transport {
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Normalizes an extracted completion: trimmed text, or `None` when empty.
pub(crate) fn non_empty(text: Option<&str>) -> Option<String> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
