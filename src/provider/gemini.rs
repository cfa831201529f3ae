use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeminiConfig;

use super::{AnswerProvider, ProviderError};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_OUTPUT_TOKENS: u32 = 20;
const TEMPERATURE: f32 = 0.1;
const NOT_RESPONDING: &str = "AI service not responding";

/// Answers questions with Google's Gemini `generateContent` API.
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build Gemini HTTP client")?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(question: &str) -> ApiRequest {
        ApiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: format!(
                        "Answer this question with a single word or very short phrase \
                         (maximum 3 words): {question}"
                    ),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: 1.0,
                top_k: 1,
            },
        }
    }

    /// First non-blank text in the response, checking the candidate's content
    /// parts, then the legacy `output` field, then a top-level `text`.
    fn extract_text(response: &ApiResponse) -> Option<&str> {
        let candidate = response.candidates.first();
        let from_parts = candidate
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref());
        let from_output = candidate.and_then(|c| c.output.as_deref());

        [from_parts, from_output, response.text.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// Pull the provider's own explanation out of an error body.
    fn error_message(body: &serde_json::Value) -> String {
        body.pointer("/error/message")
            .or_else(|| body.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string()
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        warn!(error = %err, "Gemini request failed");
        ProviderError::Unavailable(NOT_RESPONDING.to_string())
    }
}

#[async_trait]
impl AnswerProvider for GeminiProvider {
    async fn answer(&self, question: &str) -> Result<String, ProviderError> {
        let body = Self::build_request(question);

        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = Self::error_message(&body);
            warn!(%status, %message, "Gemini API error");
            return Err(ProviderError::Unavailable(message));
        }

        let api_resp: ApiResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })?;

        if let Some(usage) = &api_resp.usage {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                model = %self.config.model,
                "Gemini token usage"
            );
        }

        Self::extract_text(&api_resp)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Malformed("no text in Gemini response".to_string()))
    }
}

// --- API types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize, Default)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    text: Option<String>,
    #[serde(rename = "usageMetadata")]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    output: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Usage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
