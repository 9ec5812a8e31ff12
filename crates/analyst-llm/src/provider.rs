//! Narrative provider trait definition

use crate::Result;
use async_trait::async_trait;

/// Trait for narrative text providers
///
/// Implementations send a single prompt to an external text service and
/// return its commentary. Any failure (transport, timeout, non-2xx status,
/// malformed body) is reported as an error; providers never retry.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generate commentary for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the provider name (e.g., "query", "openai")
    fn name(&self) -> &str;
}
