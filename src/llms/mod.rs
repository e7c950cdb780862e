//! Language model clients.
//!
//! - [`base_llm`] - The trait every model client implements
//! - [`providers`] - HTTP clients for the supported providers

pub mod base_llm;
pub mod providers;

pub use base_llm::{BaseLLM, LLMMessage};
pub use providers::anthropic::AnthropicCompletion;
pub use providers::openai::OpenAICompletion;
