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

const GENERATE_CONTENT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini variant; key carried as the `key` query parameter.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    excerpt_chars: usize,
}

impl GeminiClient {
    pub fn new(config: &RunConfig) -> Result<Self> {
        require_credential(Provider::Gemini, &config.gemini_api_key)?;

        Ok(Self {
            client: http_client(config.request_timeout_secs)?,
            api_key: config.gemini_api_key.trim().to_string(),
            model: config.gemini_model.clone(),
            excerpt_chars: config.excerpt_chars,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GENERATE_CONTENT_BASE, self.model)
    }
}

/// First completion text at `candidates[0].content.parts[0].text`.
pub(crate) fn extract_label(response: &Value) -> Option<String> {
    non_empty(
        response
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str(),
    )
}

#[async_trait]
impl ClassifierClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn classify(
        &self,
        content: &str,
        labels: &CandidateLabelSet,
    ) -> Result<Option<String>> {
        let prompt = build_prompt(content, labels, self.excerpt_chars);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0, "maxOutputTokens": 20 },
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        check_status(&response)?;

        let payload: Value = response.json().await?;
        let label = extract_label(&payload);
        debug!("Gemini returned label: {:?}", label);
        Ok(label)
    }
}
