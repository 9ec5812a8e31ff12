//! Concrete narrative provider implementations

pub mod openai;
pub mod query;

pub use openai::OpenAiCompatibleProvider;
pub use query::QueryEndpointProvider;

use crate::{ApiStyle, NarrativeConfig, NarrativeError, NarrativeProvider, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Build the provider described by `config`
///
/// A config without an endpoint yields an [`UnconfiguredProvider`], so the
/// pipeline still runs and every narrative degrades to its fallback text.
pub fn build_provider(config: &NarrativeConfig) -> Result<Arc<dyn NarrativeProvider>> {
    config.validate()?;

    let Some(endpoint) = config.endpoint()? else {
        info!("No narrative endpoint configured, commentary will use fallback text");
        return Ok(Arc::new(UnconfiguredProvider));
    };

    let provider: Arc<dyn NarrativeProvider> = match config.style {
        ApiStyle::Query => Arc::new(QueryEndpointProvider::new(
            endpoint,
            config.api_key.clone(),
            config.timeout_secs,
        )?),
        ApiStyle::OpenAi => Arc::new(OpenAiCompatibleProvider::new(
            endpoint,
            config.api_key.clone(),
            config.model.clone(),
            config.timeout_secs,
        )?),
    };

    info!(provider = provider.name(), "Narrative provider ready");
    Ok(provider)
}

/// Provider used when no endpoint is configured; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredProvider;

#[async_trait]
impl NarrativeProvider for UnconfiguredProvider {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(NarrativeError::ConfigurationError(
            "no narrative endpoint configured".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

/// Classify a transport error, surfacing timeouts explicitly
pub(crate) fn transport_error(err: reqwest::Error, timeout_secs: u64) -> NarrativeError {
    if err.is_timeout() {
        NarrativeError::Timeout(timeout_secs)
    } else {
        NarrativeError::HttpError(err)
    }
}
