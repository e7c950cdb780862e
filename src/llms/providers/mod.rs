//! Model client implementations.
//!
//! | Provider | Module |
//! |----------|--------|
//! | OpenAI, Groq, Mistral | [`openai`] (OpenAI-compatible chat completions) |
//! | Anthropic | [`anthropic`] |

pub mod anthropic;
pub mod openai;
