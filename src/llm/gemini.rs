//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};
use crate::error::LlmError;

const PROVIDER: &str = "gemini";

/// Public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini API client.
pub struct GeminiProvider {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Map our conversation onto Gemini's shape: system text becomes the
/// system instruction, consecutive same-role turns share one content block.
fn build_request(request: &CompletionRequest) -> GenerateRequest {
    let system: Vec<Part> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| Part {
            text: m.content.clone(),
        })
        .collect();

    let mut contents: Vec<Content> = Vec::new();
    for msg in request.messages.iter().filter(|m| m.role != Role::System) {
        let role = wire_role(msg);
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(Part {
                text: msg.content.clone(),
            }),
            _ => contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![Part {
                    text: msg.content.clone(),
                }],
            }),
        }
    }

    let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
        Some(GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        })
    } else {
        None
    };

    GenerateRequest {
        system_instruction: (!system.is_empty()).then(|| Content {
            role: None,
            parts: system,
        }),
        contents,
        generation_config,
    }
}

fn wire_role(msg: &ChatMessage) -> &'static str {
    match msg.role {
        Role::Model => "model",
        Role::User | Role::System => "user",
    }
}

fn finish_reason(raw: Option<&str>) -> FinishReason {
    match raw {
        Some("STOP") | None => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") => FinishReason::Safety,
        Some(_) => FinishReason::Other,
    }
}

fn parse_response(body: GenerateResponse) -> Result<CompletionResponse, LlmError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "no candidates in response".to_string(),
        })?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join(""))
        .unwrap_or_default();
    let reason = finish_reason(candidate.finish_reason.as_deref());
    if text.is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: format!("empty candidate (finish reason {reason:?})"),
        });
    }

    let usage = body.usage_metadata.unwrap_or_default();
    Ok(CompletionResponse {
        content: text,
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
        finish_reason: reason,
    })
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = build_request(&request);
        debug!(
            model = %self.model,
            turns = body.contents.len(),
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthFailed {
                    provider: PROVIDER.to_string(),
                },
                StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
                    provider: PROVIDER.to_string(),
                    retry_after,
                },
                _ => LlmError::RequestFailed {
                    provider: PROVIDER.to_string(),
                    reason: format!("HTTP {status}: {text}"),
                },
            });
        }

        let raw = response.text().await.map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("reading body: {e}"),
        })?;
        let body: GenerateResponse =
            serde_json::from_str(&raw).map_err(|source| LlmError::Json {
                provider: PROVIDER.to_string(),
                source,
            })?;
        parse_response(body)
    }
}
