//! OpenAI-compatible chat completions client.
//!
//! Talks to `POST {base_url}/chat/completions` with bearer authentication.
//! OpenAI, Groq and Mistral all expose this wire format, so the same client
//! serves all three; only the base URL and provider label differ.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base_llm::{block_on, BaseLLM, LLMMessage, DEFAULT_TIMEOUT_SECS};
use crate::utilities::errors::LLMError;

/// Default OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions client.
#[derive(Clone)]
pub struct OpenAICompletion {
    /// Model name sent in the request body.
    pub model: String,
    /// Provider label reported by [`BaseLLM::provider`].
    pub provider: String,
    api_key: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    /// Request timeout in seconds.
    pub timeout: f64,
    /// Retries on transport errors, 429 and 5xx. Zero disables retrying.
    pub max_retries: u32,
}

impl fmt::Debug for OpenAICompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICompletion")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAICompletion {
    /// Create a new client.
    ///
    /// `base_url` defaults to the OpenAI endpoint.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            model: model.into(),
            provider: "openai".to_string(),
            api_key: api_key.into(),
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            max_tokens: None,
            temperature: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }

    /// Set the provider label (e.g. "groq" for the Groq endpoint).
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the request body for the chat completions API.
    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temp) = self.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }

    /// Extract `choices[0].message.content` from a response.
    pub fn parse_response(response: &Value) -> Result<String, LLMError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        Ok(message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string())
    }
}

#[async_trait]
impl BaseLLM for OpenAICompletion {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn call(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
        log::debug!(
            "OpenAICompletion.call: provider={}, model={}, messages={}",
            self.provider,
            self.model,
            messages.len(),
        );
        block_on(self.acall(messages))
    }

    async fn acall(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
        let body = self.build_request_body(messages);
        let endpoint = self.endpoint();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(self.timeout))
            .build()?;

        let mut last_error: Option<LLMError> = None;
        let mut retry_delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "{} API retry attempt {} after {:?}",
                    self.provider,
                    attempt,
                    retry_delay
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(LLMError::Transport(e));
                    continue;
                }
            };

            let status = response.status();
            let text = response.text().await?;

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(LLMError::Api {
                    provider: self.provider.clone(),
                    status: status.as_u16(),
                    body: text,
                });
                continue;
            }

            if !status.is_success() {
                return Err(LLMError::Api {
                    provider: self.provider.clone(),
                    status: status.as_u16(),
                    body: text,
                });
            }

            let json: Value = serde_json::from_str(&text).map_err(|e| {
                LLMError::InvalidResponse(format!(
                    "{} - Body: {}",
                    e,
                    text.chars().take(500).collect::<String>()
                ))
            })?;
            return Self::parse_response(&json);
        }

        Err(last_error.unwrap_or_else(|| {
            LLMError::InvalidResponse("request failed after all retries".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let llm = OpenAICompletion::new("gpt-4o", "sk-test", None);
        assert_eq!(llm.base_url, OPENAI_BASE_URL);
        assert_eq!(llm.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(llm.provider(), "openai");
        assert_eq!(llm.max_retries, 0);
    }

    #[test]
    fn test_groq_base_url() {
        let llm = OpenAICompletion::new(
            "llama-3.1-8b-instant",
            "gsk",
            Some("https://api.groq.com/openai/v1/".to_string()),
        )
        .with_provider("groq");
        assert_eq!(llm.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(llm.provider(), "groq");
    }

    #[test]
    fn test_request_body() {
        let llm = OpenAICompletion::new("gpt-4o", "k", None)
            .with_max_tokens(4096)
            .with_temperature(0.7);
        let body = llm.build_request_body(&[LLMMessage::system("s"), LLMMessage::user("u")]);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["temperature"], 0.7);
    }

    #[test]
    fn test_parse_response() {
        let resp = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        });
        assert_eq!(OpenAICompletion::parse_response(&resp).unwrap(), "hello");
        assert!(OpenAICompletion::parse_response(&serde_json::json!({})).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let llm = OpenAICompletion::new("gpt-4o", "sk-secret", None);
        let dbg = format!("{:?}", llm);
        assert!(!dbg.contains("sk-secret"));
    }
}
