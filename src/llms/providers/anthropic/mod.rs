//! Anthropic Messages API client.
//!
//! Anthropic takes system instructions as a separate top-level `system`
//! field rather than as a message, and answers with an array of content
//! blocks. Only `text` blocks are read.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base_llm::{block_on, BaseLLM, LLMMessage, DEFAULT_TIMEOUT_SECS};
use crate::utilities::errors::LLMError;

/// Default Anthropic API base URL.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// `max_tokens` is mandatory for the Messages API.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct AnthropicCompletion {
    pub model: String,
    api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Request timeout in seconds.
    pub timeout: f64,
    pub max_retries: u32,
}

impl fmt::Debug for AnthropicCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicCompletion")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AnthropicCompletion {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    /// Split system messages out of the conversation.
    ///
    /// Multiple system messages are joined with a blank line.
    fn extract_system_and_messages(messages: &[LLMMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut formatted: Vec<Value> = Vec::new();

        for msg in messages {
            if msg.role == "system" {
                system_parts.push(&msg.content);
            } else {
                formatted.push(serde_json::json!({
                    "role": msg.role,
                    "content": msg.content,
                }));
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };
        (system, formatted)
    }

    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let (system, formatted) = Self::extract_system_and_messages(messages);

        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": formatted,
        });
        if let Some(system) = system {
            body["system"] = Value::String(system);
        }
        if let Some(temp) = self.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }

    /// Concatenate the `text` blocks of a Messages API response.
    pub fn parse_response(response: &Value) -> Result<String, LLMError> {
        if response.get("type").and_then(|t| t.as_str()) == Some("error") {
            let msg = response
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown Anthropic API error");
            return Err(LLMError::InvalidResponse(msg.to_string()));
        }

        let content = response
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                LLMError::InvalidResponse("No content array in Anthropic response".to_string())
            })?;

        let text = content
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "Anthropic token usage: input={}, output={}",
                usage.get("input_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("output_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        Ok(text)
    }
}

#[async_trait]
impl BaseLLM for AnthropicCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "anthropic"
    }

    fn call(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
        log::debug!(
            "AnthropicCompletion.call: model={}, messages={}",
            self.model,
            messages.len()
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
                    "Anthropic API retry attempt {} after {:?}",
                    attempt,
                    retry_delay
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match client
                .post(&endpoint)
                .header("content-type", "application/json")
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
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

            // 529 is Anthropic's "overloaded"
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(LLMError::Api {
                    provider: "anthropic".to_string(),
                    status: status.as_u16(),
                    body: text,
                });
                continue;
            }

            if !status.is_success() {
                return Err(LLMError::Api {
                    provider: "anthropic".to_string(),
                    status: status.as_u16(),
                    body: text,
                });
            }

            let json: Value = serde_json::from_str(&text).map_err(|e| {
                LLMError::InvalidResponse(format!(
                    "Failed to parse Anthropic response: {} - Body: {}",
                    e,
                    text.chars().take(500).collect::<String>()
                ))
            })?;
            return Self::parse_response(&json);
        }

        Err(last_error.unwrap_or_else(|| {
            LLMError::InvalidResponse(
                "Anthropic API call failed after all retries".to_string(),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_is_extracted() {
        let llm = AnthropicCompletion::new("claude-3-haiku-20240307", "k", None);
        let body = llm.build_request_body(&[
            LLMMessage::system("one"),
            LLMMessage::system("two"),
            LLMMessage::user("hi"),
        ]);
        assert_eq!(body["system"], "one\n\ntwo");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn test_no_system_field_without_system_messages() {
        let llm = AnthropicCompletion::new("m", "k", None);
        let body = llm.build_request_body(&[LLMMessage::user("hi")]);
        assert!(body.get("system").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_concatenates_text_blocks() {
        let resp = serde_json::json!({
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "world"}
            ]
        });
        assert_eq!(AnthropicCompletion::parse_response(&resp).unwrap(), "Hello, world");
    }

    #[test]
    fn test_parse_error_payload() {
        let resp = serde_json::json!({
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "bad model"}
        });
        let err = AnthropicCompletion::parse_response(&resp).unwrap_err();
        assert!(err.to_string().contains("bad model"));
    }

    #[test]
    fn test_endpoint() {
        let llm = AnthropicCompletion::new("m", "k", None);
        assert_eq!(llm.endpoint(), "https://api.anthropic.com/v1/messages");
        assert_eq!(llm.provider(), "anthropic");
    }
}
