//! Base LLM trait.
//!
//! Every model client the spawner talks to implements [`BaseLLM`]: given an
//! ordered list of role/content messages it returns the completion text.
//! The task parser and the sequential crew engine only ever see this trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::LLMError;

/// Default request timeout for provider clients, in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role of the message sender ("system", "user", "assistant").
    pub role: String,
    /// Content of the message.
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Interface of a text-completion model client.
///
/// `call` is blocking; the spawner pipeline is synchronous and request
/// scoped. Implementations backed by async HTTP clients should implement
/// `acall` and drive it from `call` with [`block_on`].
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Model identifier.
    fn model(&self) -> &str;

    /// Provider name (e.g. "openai").
    fn provider(&self) -> &str {
        "openai"
    }

    /// Run a completion request and return the response text.
    fn call(&self, messages: &[LLMMessage]) -> Result<String, LLMError>;

    /// Async variant. Defaults to the blocking call.
    async fn acall(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
        self.call(messages)
    }
}

/// Drive a future to completion on a private current-thread runtime.
///
/// Must not be called from inside an async task; server handlers reach the
/// pipeline through `spawn_blocking`.
pub fn block_on<F, T>(future: F) -> Result<T, LLMError>
where
    F: std::future::Future<Output = Result<T, LLMError>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LLMError::Runtime(e.to_string()))?;
    rt.block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EchoLLM;

    impl BaseLLM for EchoLLM {
        fn model(&self) -> &str {
            "echo"
        }

        fn call(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
            Ok(messages
                .iter()
                .map(|m| format!("{}:{}", m.role, m.content))
                .collect::<Vec<_>>()
                .join("|"))
        }
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(LLMMessage::system("s").role, "system");
        assert_eq!(LLMMessage::user("u").role, "user");
        assert_eq!(LLMMessage::assistant("a").role, "assistant");
    }

    #[test]
    fn test_default_provider_and_call() {
        let llm = EchoLLM;
        assert_eq!(llm.provider(), "openai");
        let out = llm
            .call(&[LLMMessage::system("be brief"), LLMMessage::user("hi")])
            .unwrap();
        assert_eq!(out, "system:be brief|user:hi");
    }

    #[test]
    fn test_block_on_drives_acall() {
        let llm = EchoLLM;
        let msgs = vec![LLMMessage::user("x")];
        let out = block_on(async { llm.acall(&msgs).await }).unwrap();
        assert_eq!(out, "user:x");
    }
}
