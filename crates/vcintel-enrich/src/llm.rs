//! Chat-completion client that turns page text into raw enrichment JSON.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vcintel_core::config::{DEFAULT_OPENAI_API_URL, DEFAULT_OPENAI_MODEL};
use vcintel_core::{AppConfig, FetchedPage};

use crate::error::{EnrichError, LlmError};
use crate::fetch::truncate_chars;

/// Upper bound on page characters sent to the model.
pub const MAX_PROMPT_CHARS: usize = 20_000;
/// Upper bound on upstream error body characters kept in error messages.
const MAX_ERROR_DETAIL_CHARS: usize = 240;
const TEMPERATURE: f64 = 0.2;
const SYSTEM_PROMPT: &str = "You are a senior analyst that outputs only valid JSON.";

/// Produces raw (unvalidated) enrichment JSON for a page.
pub trait EnrichmentModel: Send + Sync {
    fn extract(&self, page: &FetchedPage) -> impl Future<Output = Result<Value, LlmError>> + Send;

    /// Whether a credential is available. Used for health reporting only.
    fn is_configured(&self) -> bool;
}

/// Connection settings for the chat-completion endpoint.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            endpoint: config.openai_api_url.clone(),
            timeout_secs: config.llm_timeout_secs,
        }
    }

    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            endpoint: DEFAULT_OPENAI_API_URL.to_string(),
            timeout_secs: 20,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f64,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat-completion client in JSON-object mode.
///
/// One request per call, no retries. A 429 maps to
/// [`LlmError::QuotaExceeded`] so the pipeline can fall back.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: LlmConfig) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

impl EnrichmentModel for OpenAiClient {
    async fn extract(&self, page: &FetchedPage) -> Result<Value, LlmError> {
        let api_key = self.config.credential().ok_or(LlmError::MissingCredential)?;

        let prompt = build_prompt(page);
        let request = ChatCompletionRequest {
            model: &self.config.model,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        tracing::debug!(
            model = %self.config.model,
            url = %page.url,
            prompt_chars = prompt.chars().count(),
            "requesting enrichment from model"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::QuotaExceeded);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed {
                status: status.as_u16(),
                details: truncate_chars(body.trim(), MAX_ERROR_DETAIL_CHARS),
            });
        }

        let body = response.text().await?;
        parse_completion(&body)
    }

    fn is_configured(&self) -> bool {
        self.config.credential().is_some()
    }
}

fn build_prompt(page: &FetchedPage) -> String {
    let source_line = format!("Source URL: {}", page.url);
    let text = truncate_chars(&page.text, MAX_PROMPT_CHARS);

    [
        "Extract VC-relevant intelligence from this public company homepage text.",
        "Return strict JSON with keys exactly:",
        "summary, what_they_do, keywords, derived_signals.",
        "Rules:",
        "- summary: 1-2 sentences",
        "- what_they_do: 3-6 bullet strings",
        "- keywords: 5-10 strings",
        "- derived_signals: 2-4 objects with keys label, value (High, Medium, or Low), rationale",
        "Do not include markdown.",
        "",
        source_line.as_str(),
        "",
        text.as_str(),
    ]
    .join("\n")
}

/// Pull the first choice's message content out of a completion body and
/// decode it as JSON.
fn parse_completion(body: &str) -> Result<Value, LlmError> {
    let completion: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        LlmError::MalformedResponse(format!("OpenAI response body was not valid JSON: {e}"))
    })?;

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            LlmError::MalformedResponse("OpenAI response did not include content".to_string())
        })?;

    serde_json::from_str(&content)
        .map_err(|_| LlmError::MalformedResponse("OpenAI response was not valid JSON".to_string()))
}
