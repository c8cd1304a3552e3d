/// LLM Client — the single point of entry for all text-completion calls.
///
/// No other module talks to the completion service directly; everything goes through
/// the `TextGenerator` trait so callers can be exercised against scripted stubs.
///
/// Model: gemini-2.0-flash-001 (hardcoded to prevent drift between deployments)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all completion calls.
pub const MODEL: &str = "gemini-2.0-flash-001";
const MAX_OUTPUT_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const TOP_K: u32 = 40;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Http(e.without_url())
    }
}

/// Black-box text completion: one prompt in, free text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

/// Response envelope. Every level is optional: a malformed envelope is "no content",
/// never a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<PartIn>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartIn {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts `candidates[0].content.parts[0].text`.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP client for the Gemini `generateContent` endpoint.
/// Single-shot: retry policy belongs to the caller (see `tailoring::bullet_generator`).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // The key travels in a header only; it must never appear in the URL.
    fn endpoint(&self) -> String {
        format!("{}/{MODEL}:generateContent", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            system_instruction: Content {
                parts: vec![PartOut { text: system }],
            },
            contents: vec![Content {
                parts: vec![PartOut { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: TOP_P,
                top_k: TOP_K,
            },
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_DANGEROUS_CONTENT",
                threshold: "BLOCK_ONLY_HIGH",
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        extract_text(&body)
    }
}

/// Parses a raw response body down to its completion text.
pub(crate) fn extract_text(body: &str) -> Result<String, LlmError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)?;
    let text = envelope
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyContent)?;

    debug!(chars = text.len(), "Completion received");
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_reads_first_part() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":">>Built things"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), ">>Built things");
    }

    #[test]
    fn test_extract_text_missing_candidates_is_empty_content() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(extract_text(body), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_extract_text_missing_parts_is_empty_content() {
        let body = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        assert!(matches!(extract_text(body), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_extract_text_whitespace_only_is_empty_content() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"   \n"}]}}]}"#;
        assert!(matches!(extract_text(body), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_extract_text_garbage_is_parse_error() {
        assert!(matches!(extract_text("<html>"), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_endpoint_does_not_carry_api_key() {
        let client = LlmClient::new("SECRET-GEMINI-KEY".to_string()).unwrap();
        let endpoint = client.endpoint();
        assert!(endpoint.ends_with(":generateContent"));
        assert!(!endpoint.contains("SECRET-GEMINI-KEY"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        // Nothing listens on port 9; the connection is refused.
        let client =
            LlmClient::with_base_url("SECRET-GEMINI-KEY".to_string(), "http://127.0.0.1:9/models")
                .unwrap();

        let err = client.complete("prompt", "system").await.unwrap_err();

        assert!(matches!(err, LlmError::Http(_)));
        let rendered = format!("{err} {err:?}");
        assert!(!rendered.contains("SECRET-GEMINI-KEY"));
    }
}
