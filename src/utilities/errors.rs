//! Error types for the crew spawner.
//!
//! Configuration and template errors are fatal to the current call and are
//! surfaced verbatim. Enrichment failures never appear here: the task parser
//! downgrades them to data inside the analysis.

use thiserror::Error;

/// Provider / model selection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The provider name is not in the registry.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// No credential could be resolved for a known provider.
    #[error("Missing API key for {provider}. Set {env_var} environment variable.")]
    MissingCredential { provider: String, env_var: String },

    /// The model is not offered by the provider.
    #[error("Unsupported model {model} for provider {provider}")]
    UnsupportedModel { provider: String, model: String },

    /// None of the providers has a credential.
    #[error("No LLM providers are configured. Please set at least one API key.")]
    NoProviderConfigured,

    /// A spawner was asked to work before a model was configured.
    #[error("No LLM configured. Please configure an LLM provider first.")]
    NoLLMConfigured,
}

/// Catalog lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Unknown agent type: {0}")]
    UnknownAgentType(String),
}

/// Failures raised by a model client.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Network / HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The blocking wrapper could not drive the request.
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Errors raised while executing a crew.
#[derive(Debug, Error)]
pub enum CrewError {
    #[error("The task '{task}' has no agent assigned")]
    NoAgentForTask { task: String },

    #[error("Agent '{0}' has no language model bound")]
    AgentWithoutLLM(String),

    #[error("No valid task outputs available to create crew output.")]
    EmptyOutput,

    #[error(transparent)]
    LLM(#[from] LLMError),

    /// Failure reported by a custom execution engine.
    #[error("{0}")]
    Engine(String),
}

/// Top-level errors of the crew spawner.
#[derive(Debug, Error)]
pub enum SpawnerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Crew(#[from] CrewError),

    /// Any failure of the full analyze → synthesize → execute pipeline,
    /// carrying the original message.
    #[error("Error processing task: {0}")]
    TaskProcessing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_messages() {
        let err = ConfigurationError::MissingCredential {
            provider: "openai".into(),
            env_var: "OPENAI_API_KEY".into(),
        };
        assert_eq!(
            err.to_string(),
            "Missing API key for openai. Set OPENAI_API_KEY environment variable."
        );
        assert_eq!(
            ConfigurationError::UnsupportedProvider("foo".into()).to_string(),
            "Unsupported provider: foo"
        );
    }

    #[test]
    fn test_task_processing_wraps_message() {
        let inner = CrewError::Engine("boom".into());
        let err = SpawnerError::TaskProcessing(inner.to_string());
        assert_eq!(err.to_string(), "Error processing task: boom");
    }

    #[test]
    fn test_transparent_configuration() {
        let err: SpawnerError = ConfigurationError::NoLLMConfigured.into();
        assert_eq!(
            err.to_string(),
            "No LLM configured. Please configure an LLM provider first."
        );
    }
}
