//! Provider for simple JSON query endpoints
//!
//! The endpoint accepts `{"query": "<prompt>", "api_key": "<key>"}` and
//! answers with an object whose `analysis` field holds the commentary.

use super::transport_error;
use crate::{NarrativeError, NarrativeProvider, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Narrative provider for `{"query", "api_key"}` endpoints
pub struct QueryEndpointProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
    timeout_secs: u64,
}

impl QueryEndpointProvider {
    /// Create a new provider for `endpoint`
    pub fn new(endpoint: Url, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.unwrap_or_default(),
            timeout_secs,
        })
    }

    /// The endpoint requests are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl NarrativeProvider for QueryEndpointProvider {
    #[instrument(skip(self, prompt), fields(endpoint = %self.endpoint))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Posting narrative query");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&QueryRequest {
                query: prompt,
                api_key: &self.api_key,
            })
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::from_status(status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NarrativeError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        extract_analysis(&body)
    }

    fn name(&self) -> &'static str {
        "query"
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    api_key: &'a str,
}

/// Pull the commentary out of a reply body
fn extract_analysis(body: &Value) -> Result<String> {
    body.get("analysis")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| NarrativeError::UnexpectedResponse("missing analysis field".to_string()))
}
