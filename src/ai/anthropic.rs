use crate::ai::{
    build_prompt, check_status, http_client, non_empty, require_credential, ClassifierClient,
    Provider,
};
use crate::config::RunConfig;
use crate::error::Result;
use crate::labels::CandidateLabelSet;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic messages variant; key in the `x-api-key` header.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    excerpt_chars: usize,
}

impl AnthropicClient {
    pub fn new(config: &RunConfig) -> Result<Self> {
        require_credential(Provider::Anthropic, &config.anthropic_api_key)?;

        Ok(Self {
            client: http_client(config.request_timeout_secs)?,
            api_key: config.anthropic_api_key.trim().to_string(),
            model: config.anthropic_model.clone(),
            excerpt_chars: config.excerpt_chars,
        })
    }
}

/// First completion text at `content[0].text`.
pub(crate) fn extract_label(response: &Value) -> Option<String> {
    non_empty(response.get("content")?.get(0)?.get("text")?.as_str())
}

#[async_trait]
impl ClassifierClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn classify(
        &self,
        content: &str,
        labels: &CandidateLabelSet,
    ) -> Result<Option<String>> {
        let prompt = build_prompt(content, labels, self.excerpt_chars);
        let body = json!({
            "model": self.model,
            "max_tokens": 20,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        check_status(&response)?;

        let payload: Value = response.json().await?;
        let label = extract_label(&payload);
        debug!("Anthropic returned label: {:?}", label);
        Ok(label)
    }
}
