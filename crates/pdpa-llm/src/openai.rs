use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use pdpa_core::llm::{CompletionBackend, CompletionRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Calls an OpenAI-compatible chat-completions endpoint.
///
/// Models are tried in the configured order: when the service reports the
/// model as unavailable the next one is tried, any other failure aborts.
pub struct OpenAiBackend {
    pub base_url: String,
    pub api_key: String,
    /// Fallback order; must not be empty.
    pub models: Vec<String>,
    pub timeout_secs: u64,
}

impl OpenAiBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            models,
            timeout_secs: 120,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// A 404 or an error body naming the model means "try the next model";
/// everything else is a real failure.
fn is_model_unavailable(status: reqwest::StatusCode, body: &str) -> bool {
    status == reqwest::StatusCode::NOT_FOUND
        || body.contains("model_not_found")
        || body.contains("does not exist")
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if self.models.is_empty() {
            bail!("no models configured");
        }

        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()?;

        let messages: Vec<WireMessage> = request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect();

        for model in &self.models {
            let body = ChatCompletionRequest {
                model: model.clone(),
                messages: messages
                    .iter()
                    .map(|m| WireMessage {
                        role: m.role.clone(),
                        content: m.content.clone(),
                    })
                    .collect(),
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            };

            info!(model = %model, url = %url, "calling chat completions API");

            let response = client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                if is_model_unavailable(status, &text) {
                    warn!(model = %model, %status, "model unavailable, trying next");
                    continue;
                }
                bail!("chat completions error {status}: {text}");
            }

            let parsed: ChatCompletionResponse = response.json().await?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| anyhow!("chat completions response had no choices"))?;

            info!(model = %model, output_len = content.len(), "completion received");
            return Ok(content.trim().to_string());
        }

        bail!("none of the configured models are available")
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_moves_to_next_model() {
        assert!(is_model_unavailable(reqwest::StatusCode::NOT_FOUND, ""));
    }

    #[test]
    fn model_not_found_body_moves_to_next_model() {
        assert!(is_model_unavailable(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"model_not_found"}}"#
        ));
        assert!(is_model_unavailable(
            reqwest::StatusCode::BAD_REQUEST,
            "The model `gpt-x` does not exist"
        ));
    }

    #[test]
    fn other_errors_abort() {
        assert!(!is_model_unavailable(
            reqwest::StatusCode::UNAUTHORIZED,
            "invalid api key"
        ));
    }
}
