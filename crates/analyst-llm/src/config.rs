//! Configuration for narrative providers

use crate::error::{NarrativeError, Result};
use analyst_utils::{env_parse, env_var};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MODEL: &str = "grok-beta";

/// Wire protocol spoken by the narrative endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiStyle {
    /// POST `{"query": .., "api_key": ..}`, read `analysis` from the reply
    #[default]
    Query,
    /// OpenAI-compatible `/chat/completions`
    OpenAi,
}

impl FromStr for ApiStyle {
    type Err = NarrativeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "openai" | "chat" => Ok(Self::OpenAi),
            other => Err(NarrativeError::ConfigurationError(format!(
                "Unknown narrative API style: {other} (expected query or openai)"
            ))),
        }
    }
}

/// Configuration for a narrative provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Endpoint URL (query style) or API base (OpenAI style)
    pub api_base: Option<String>,

    /// API key sent with each request
    pub api_key: Option<String>,

    /// Model name, used by the OpenAI style only
    pub model: String,

    /// Wire protocol
    pub style: ApiStyle,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            style: ApiStyle::Query,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl NarrativeConfig {
    /// Create a config for the given endpoint with default settings
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: Some(api_base.into()),
            ..Self::default()
        }
    }

    /// Create config from environment variables
    ///
    /// Reads `NARRATIVE_API_BASE`, `NARRATIVE_API_KEY`, `NARRATIVE_MODEL`,
    /// `NARRATIVE_API_STYLE` and `NARRATIVE_TIMEOUT_SECS`. Everything is
    /// optional; without an endpoint the provider is left unconfigured.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let style = match env_var("NARRATIVE_API_STYLE") {
            Some(raw) => raw.parse()?,
            None => defaults.style,
        };

        Ok(Self {
            api_base: env_var("NARRATIVE_API_BASE"),
            api_key: env_var("NARRATIVE_API_KEY"),
            model: env_var("NARRATIVE_MODEL").unwrap_or(defaults.model),
            style,
            timeout_secs: env_parse("NARRATIVE_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        })
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the wire protocol
    pub fn with_style(mut self, style: ApiStyle) -> Self {
        self.style = style;
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Parsed endpoint URL, if one is configured
    pub fn endpoint(&self) -> Result<Option<Url>> {
        self.api_base
            .as_deref()
            .map(|base| {
                Url::parse(base).map_err(|e| {
                    NarrativeError::ConfigurationError(format!("Invalid endpoint {base}: {e}"))
                })
            })
            .transpose()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(NarrativeError::ConfigurationError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(url) = self.endpoint()? {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(NarrativeError::ConfigurationError(format!(
                    "Unsupported endpoint scheme: {}",
                    url.scheme()
                )));
            }
        }

        Ok(())
    }
}
