//! Google Gemini API provider
//!
//! https://ai.google.dev/api/generate-content

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{Completion, CompletionProvider, CompletionRequest, ProviderError};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-pro";

fn default_base_url() -> String {
    GEMINI_API_BASE.to_string()
}

fn default_model() -> String {
    GEMINI_DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_top_p() -> f32 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

/// Connection and sampling settings for [`GeminiProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            top_p: default_top_p(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, GeminiConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, request: &CompletionRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let payload = self.build_request(&request);
        tracing::debug!(model = %self.config.model, "sending request to gemini");

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "gemini api returned an error");
            return Err(format_api_error(status, &text));
        }

        let body = resp.text().await?;
        let text = extract_text(&body)?;
        tracing::info!(chars = text.len(), "received response from gemini");
        Ok(Completion { text })
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(body: &str) -> Result<String, ProviderError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("invalid json: {e}")))?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| ProviderError::Malformed("response carries no candidate text".to_string()))
}

fn format_api_error(status: StatusCode, text: &str) -> ProviderError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(text)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| "AI service error".to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited(message)
    } else {
        ProviderError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

// ============================================================
// Gemini API Types
// ============================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}
