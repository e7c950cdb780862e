//! Provider registry.
//!
//! A static catalog of the supported language-model providers, the models
//! each one offers, and where each one's credential comes from. The
//! registry answers three questions: which providers are usable right now,
//! what the full configuration for a provider/model pair is, and which
//! provider to fall back to when the caller names none.
//!
//! Credentials are looked up through a [`CredentialSource`] so the
//! registry can be driven from the process environment in production and
//! from an in-memory map in tests.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::llms::base_llm::BaseLLM;
use crate::llms::providers::anthropic::AnthropicCompletion;
use crate::llms::providers::openai::OpenAICompletion;
use crate::utilities::errors::ConfigurationError;

/// Default completion budget for a provider configuration.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature for a provider configuration.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

// ---------------------------------------------------------------------------
// Provider catalog
// ---------------------------------------------------------------------------

/// A supported language-model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Groq,
    Mistral,
}

impl Provider {
    /// All providers in default-selection preference order.
    pub const ALL: [Provider; 4] = [
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Groq,
        Provider::Mistral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Groq => "groq",
            Provider::Mistral => "mistral",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
        }
    }

    /// Models offered by this provider. The first entry is the default.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAI => &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"],
            Provider::Anthropic => &[
                "claude-3-5-sonnet-20241022",
                "claude-3-haiku-20240307",
                "claude-3-opus-20240229",
            ],
            Provider::Groq => &[
                "llama-3.1-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
            ],
            Provider::Mistral => &[
                "mistral-large-latest",
                "mistral-medium-latest",
                "mistral-small-latest",
            ],
        }
    }

    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.models().contains(&model)
    }

    /// API base URL used when a configuration does not override it.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::Mistral => "https://api.mistral.ai/v1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "groq" => Ok(Provider::Groq),
            "mistral" => Ok(Provider::Mistral),
            other => Err(ConfigurationError::UnsupportedProvider(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration values
// ---------------------------------------------------------------------------

/// Fully resolved configuration for one provider/model pair.
///
/// The API key is never serialized and is redacted from `Debug` output.
#[derive(Clone, Serialize)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub model: String,
    #[serde(skip)]
    api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ProviderConfig {
    pub fn new(provider: Provider, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The configured base URL, or the provider's default.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Availability summary for one provider, as listed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub models: Vec<String>,
    pub default_model: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Lookup of API keys by environment variable name.
pub trait CredentialSource: Send + Sync {
    /// Return the credential stored under `env_var`, if any.
    fn get(&self, env_var: &str) -> Option<String>;
}

/// Reads credentials from the process environment. Empty values count as
/// absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, env_var: &str) -> Option<String> {
        std::env::var(env_var).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MapCredentials {
    values: HashMap<String, String>,
}

impl MapCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, env_var: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(env_var.into(), value.into());
        self
    }
}

impl CredentialSource for MapCredentials {
    fn get(&self, env_var: &str) -> Option<String> {
        self.values.get(env_var).filter(|v| !v.is_empty()).cloned()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Catalog of providers bound to a credential source.
#[derive(Clone)]
pub struct ProviderRegistry {
    credentials: Arc<dyn CredentialSource>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry").finish_non_exhaustive()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ProviderRegistry {
    pub fn new(credentials: Arc<dyn CredentialSource>) -> Self {
        Self { credentials }
    }

    /// Registry backed by the process environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvCredentials))
    }

    fn credential(&self, provider: Provider) -> Option<String> {
        self.credentials.get(provider.env_var())
    }

    /// Every provider, in preference order, with its availability.
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        Provider::ALL
            .iter()
            .map(|p| {
                let available = self.credential(*p).is_some();
                ProviderInfo {
                    name: p.as_str().to_string(),
                    models: p.models().iter().map(|m| m.to_string()).collect(),
                    default_model: p.default_model().to_string(),
                    available,
                    error: if available {
                        None
                    } else {
                        Some(format!("Missing {} environment variable", p.env_var()))
                    },
                }
            })
            .collect()
    }

    /// Resolve the configuration for `provider` and optional `model`.
    ///
    /// An absent or empty model selects the provider's default.
    pub fn resolve_config(
        &self,
        provider: &str,
        model: Option<&str>,
    ) -> Result<ProviderConfig, ConfigurationError> {
        let provider: Provider = provider.parse()?;

        let api_key = self
            .credential(provider)
            .ok_or_else(|| ConfigurationError::MissingCredential {
                provider: provider.as_str().to_string(),
                env_var: provider.env_var().to_string(),
            })?;

        let model = match model {
            Some(m) if !m.is_empty() => m,
            _ => provider.default_model(),
        };

        if !provider.supports_model(model) {
            return Err(ConfigurationError::UnsupportedModel {
                provider: provider.as_str().to_string(),
                model: model.to_string(),
            });
        }

        Ok(ProviderConfig::new(provider, model, api_key))
    }

    /// Whether `provider` is known and has a credential.
    pub fn validate_provider(&self, provider: &str) -> bool {
        provider
            .parse::<Provider>()
            .map(|p| self.credential(p).is_some())
            .unwrap_or(false)
    }

    /// First provider, in preference order, that has a credential.
    pub fn default_provider(&self) -> Result<Provider, ConfigurationError> {
        Provider::ALL
            .iter()
            .copied()
            .find(|p| self.credential(*p).is_some())
            .ok_or(ConfigurationError::NoProviderConfigured)
    }
}

// ---------------------------------------------------------------------------
// Client construction
// ---------------------------------------------------------------------------

/// Builds a model client from a resolved configuration.
pub trait LLMFactory: Send + Sync {
    fn create(&self, config: &ProviderConfig) -> Arc<dyn BaseLLM>;
}

/// Factory producing the built-in HTTP clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLLMFactory;

impl LLMFactory for NativeLLMFactory {
    fn create(&self, config: &ProviderConfig) -> Arc<dyn BaseLLM> {
        let base_url = Some(config.effective_base_url().to_string());
        match config.provider {
            Provider::Anthropic => Arc::new(
                AnthropicCompletion::new(&config.model, config.api_key(), base_url)
                    .with_max_tokens(config.max_tokens)
                    .with_temperature(config.temperature),
            ),
            Provider::OpenAI | Provider::Groq | Provider::Mistral => Arc::new(
                OpenAICompletion::new(&config.model, config.api_key(), base_url)
                    .with_provider(config.provider.as_str())
                    .with_max_tokens(config.max_tokens)
                    .with_temperature(config.temperature),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(creds: MapCredentials) -> ProviderRegistry {
        ProviderRegistry::new(Arc::new(creds))
    }

    #[test]
    fn test_provider_parse_and_display() {
        assert_eq!("groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!(Provider::Anthropic.to_string(), "anthropic");
        assert_eq!(
            "OpenAI".parse::<Provider>().unwrap_err(),
            ConfigurationError::UnsupportedProvider("OpenAI".into())
        );
    }

    #[test]
    fn test_list_providers_marks_missing_credentials() {
        let reg = registry(MapCredentials::new().with("GROQ_API_KEY", "gsk"));
        let list = reg.list_providers();
        let names: Vec<_> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["openai", "anthropic", "groq", "mistral"]);

        assert!(!list[0].available);
        assert_eq!(
            list[0].error.as_deref(),
            Some("Missing OPENAI_API_KEY environment variable")
        );
        assert!(list[2].available);
        assert!(list[2].error.is_none());
        assert_eq!(list[2].default_model, "llama-3.1-70b-versatile");
    }

    #[test]
    fn test_resolve_config_errors() {
        let reg = registry(MapCredentials::new().with("OPENAI_API_KEY", "sk"));
        assert!(matches!(
            reg.resolve_config("openai", Some("gpt-9")),
            Err(ConfigurationError::UnsupportedModel { .. })
        ));
        assert!(matches!(
            reg.resolve_config("unknown", None),
            Err(ConfigurationError::UnsupportedProvider(_))
        ));

        let empty = registry(MapCredentials::new());
        assert_eq!(
            empty.resolve_config("openai", None).unwrap_err(),
            ConfigurationError::MissingCredential {
                provider: "openai".into(),
                env_var: "OPENAI_API_KEY".into(),
            }
        );
    }

    #[test]
    fn test_resolve_config_defaults() {
        let reg = registry(MapCredentials::new().with("ANTHROPIC_API_KEY", "ak"));
        let cfg = reg.resolve_config("anthropic", None).unwrap();
        assert_eq!(cfg.model, "claude-3-5-sonnet-20241022");
        assert_eq!(cfg.api_key(), "ak");
        assert_eq!(cfg.max_tokens, 4096);
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.effective_base_url(), "https://api.anthropic.com");

        let cfg = reg.resolve_config("anthropic", Some("")).unwrap();
        assert_eq!(cfg.model, "claude-3-5-sonnet-20241022");
    }

    #[test]
    fn test_default_provider_preference() {
        let reg = registry(
            MapCredentials::new()
                .with("MISTRAL_API_KEY", "m")
                .with("ANTHROPIC_API_KEY", "a"),
        );
        assert_eq!(reg.default_provider().unwrap(), Provider::Anthropic);
        assert!(reg.validate_provider("mistral"));
        assert!(!reg.validate_provider("openai"));
        assert!(!reg.validate_provider("bogus"));

        let none = registry(MapCredentials::new().with("OPENAI_API_KEY", ""));
        assert_eq!(
            none.default_provider().unwrap_err(),
            ConfigurationError::NoProviderConfigured
        );
    }

    #[test]
    fn test_config_never_leaks_key() {
        let cfg = ProviderConfig::new(Provider::OpenAI, "gpt-4o", "sk-secret");
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!format!("{:?}", cfg).contains("sk-secret"));
    }

    #[test]
    fn test_native_factory_routes_providers() {
        let factory = NativeLLMFactory;
        let groq = factory.create(&ProviderConfig::new(
            Provider::Groq,
            "llama-3.1-8b-instant",
            "k",
        ));
        assert_eq!(groq.provider(), "groq");
        assert_eq!(groq.model(), "llama-3.1-8b-instant");

        let claude = factory.create(&ProviderConfig::new(
            Provider::Anthropic,
            "claude-3-haiku-20240307",
            "k",
        ));
        assert_eq!(claude.provider(), "anthropic");
    }
}
