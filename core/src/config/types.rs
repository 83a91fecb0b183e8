//! Minimal configuration types for filemate core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported LLM protocols
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Groq's OpenAI-compatible endpoint
    #[serde(rename = "groq")]
    Groq,
    /// Any other OpenAI-compatible API (OpenAI, proxies, local models)
    #[serde(rename = "openai_compat")]
    OpenAICompat,
}

impl Protocol {
    /// Get the protocol name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Groq => "groq",
            Protocol::OpenAICompat => "openai_compat",
        }
    }

    /// Parse a protocol name as written in config files and flags
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "groq" => Some(Protocol::Groq),
            "openai" | "openai_compat" => Some(Protocol::OpenAICompat),
            _ => None,
        }
    }

    /// Get the default base URL for this protocol
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Protocol::Groq => "https://api.groq.com/openai/v1",
            Protocol::OpenAICompat => "https://api.openai.com/v1",
        }
    }

    /// Get the default model for this protocol
    pub fn default_model(&self) -> &'static str {
        match self {
            Protocol::Groq => "gemma2-9b-it",
            Protocol::OpenAICompat => "gpt-4o-mini",
        }
    }

    /// Environment variable holding the API key for this protocol
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Protocol::Groq => "GROQ_API_KEY",
            Protocol::OpenAICompat => "OPENAI_API_KEY",
        }
    }

    /// Where a user can obtain an API key
    pub fn key_help_url(&self) -> &'static str {
        match self {
            Protocol::Groq => "https://console.groq.com/keys",
            Protocol::OpenAICompat => "https://platform.openai.com/api-keys",
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::Groq
    }
}

/// Secret API key. Its `Debug` output never shows the key itself.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    /// The raw key, for building request headers
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Presence check: the only validation done locally
    pub fn is_present(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            f.write_str("ApiKey(***)")
        } else {
            f.write_str("ApiKey(<empty>)")
        }
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Model parameters for LLM requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Top-p sampling parameter
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

/// A fully resolved LLM configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLlmConfig {
    /// The protocol to use
    pub protocol: Protocol,
    /// Base URL for the API
    pub base_url: String,
    /// API key for authentication
    pub api_key: ApiKey,
    /// Model name/identifier
    pub model: String,
    /// Model parameters
    #[serde(default)]
    pub params: ModelParams,
}

impl ResolvedLlmConfig {
    /// Create a new resolved LLM config
    pub fn new(protocol: Protocol, base_url: String, api_key: ApiKey, model: String) -> Self {
        Self {
            protocol,
            base_url,
            api_key,
            model,
            params: ModelParams::default(),
        }
    }

    /// Set model parameters
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.api_key.is_present() {
            return Err("API key cannot be empty".to_string());
        }

        if self.model.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        // Validate URL format
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        // Validate temperature range
        if let Some(temp) = self.params.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        // Validate top_p range
        if let Some(top_p) = self.params.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err("Top-p must be between 0.0 and 1.0".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groq_config(key: &str) -> ResolvedLlmConfig {
        ResolvedLlmConfig::new(
            Protocol::Groq,
            Protocol::Groq.default_base_url().to_string(),
            ApiKey::new(key),
            Protocol::Groq.default_model().to_string(),
        )
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("gsk_super_secret");
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("gsk_super_secret"));
        assert_eq!(rendered, "ApiKey(***)");

        let config = groq_config("gsk_super_secret");
        assert!(!format!("{:?}", config).contains("gsk_super_secret"));
    }

    #[test]
    fn test_validate_requires_key() {
        assert!(groq_config("gsk_abc").validate().is_ok());
        assert!(groq_config("").validate().is_err());
        assert!(groq_config("   ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let config = groq_config("gsk_abc").with_params(ModelParams {
            temperature: Some(3.5),
            ..Default::default()
        });
        assert_eq!(
            config.validate(),
            Err("Temperature must be between 0.0 and 2.0".to_string())
        );
    }

    #[test]
    fn test_protocol_parse() {
        assert_eq!(Protocol::parse("GROQ"), Some(Protocol::Groq));
        assert_eq!(Protocol::parse("openai"), Some(Protocol::OpenAICompat));
        assert_eq!(Protocol::parse("anthropic"), None);
        assert_eq!(
            Protocol::default().default_base_url(),
            "https://api.groq.com/openai/v1"
        );
    }
}
