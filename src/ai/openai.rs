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

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI chat-completions variant; Bearer token in the Authorization header.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    excerpt_chars: usize,
}

impl OpenAiClient {
    pub fn new(config: &RunConfig) -> Result<Self> {
        require_credential(Provider::OpenAi, &config.openai_api_key)?;

        Ok(Self {
            client: http_client(config.request_timeout_secs)?,
            api_key: config.openai_api_key.trim().to_string(),
            model: config.openai_model.clone(),
            excerpt_chars: config.excerpt_chars,
        })
    }
}

/// First completion text at `choices[0].message.content`.
pub(crate) fn extract_label(response: &Value) -> Option<String> {
    non_empty(
        response
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str(),
    )
}

#[async_trait]
impl ClassifierClient for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn classify(
        &self,
        content: &str,
        labels: &CandidateLabelSet,
    ) -> Result<Option<String>> {
        let prompt = build_prompt(content, labels, self.excerpt_chars);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0,
            "max_tokens": 20,
        });

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        check_status(&response)?;

        let payload: Value = response.json().await?;
        let label = extract_label(&payload);
        debug!("OpenAI returned label: {:?}", label);
        Ok(label)
    }
}
