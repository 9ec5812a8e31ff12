//! OpenAI-compatible chat completions provider
//!
//! Works with OpenAI itself and with local servers exposing the same API
//! (LM Studio, vLLM, llama.cpp). The prompt is sent as a single user message.

use super::transport_error;
use crate::{NarrativeError, NarrativeProvider, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const MAX_TOKENS: usize = 512;
const TEMPERATURE: f32 = 0.2;

/// Narrative provider for `/chat/completions` APIs
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_base: Url,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider
    pub fn new(
        api_base: Url,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base,
            api_key,
            model: model.into(),
            timeout_secs,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl NarrativeProvider for OpenAiCompatibleProvider {
    #[instrument(skip(self, prompt), fields(model = %self.model, api_base = %self.api_base))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Sending chat completion request");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::from_status(status, body));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        first_choice_text(reply)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

fn first_choice_text(reply: ChatResponse) -> Result<String> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| NarrativeError::UnexpectedResponse("No content in response".to_string()))
}
