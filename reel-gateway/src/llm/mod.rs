//! Qwen (DashScope) scoring engine.
//!
//! Sends the script to the DashScope text-generation API and validates the
//! returned report against the same schema the rule engine produces. Any
//! failure surfaces as an error so the caller can fall back.

mod prompt;

pub use prompt::{system_prompt, user_prompt};

use async_trait::async_trait;
use reel_common::config::LlmConfig;
use reel_core::{
    validate_report, AnalysisMode, AnalyzeResponse, Meta, SchemaError, Scorer, ScorerError,
    API_VERSION,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Engine name stamped by default into LLM reports.
pub const LLM_ENGINE: &str = "llm-qwen";

/// Failure modes of the LLM engine.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("response body is not JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("response has no content")]
    MissingContent,

    #[error("content is not valid JSON: {0}")]
    InvalidContent(#[source] serde_json::Error),

    #[error("unexpected content type: {0}")]
    UnexpectedContent(&'static str),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<LlmError> for ScorerError {
    fn from(err: LlmError) -> Self {
        let status = match &err {
            LlmError::Status { status, .. } => Some(*status),
            LlmError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        };
        let scorer_err = ScorerError::new(LLM_ENGINE, &err);
        match status {
            Some(code) => scorer_err.with_status(code),
            None => scorer_err,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationInput {
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f64,
    max_tokens: u32,
}

// ============================================================================
// Scorer
// ============================================================================

/// Scores scripts with a Qwen model.
pub struct QwenScorer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl QwenScorer {
    /// Create a scorer from the LLM section of the configuration.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: config.endpoint().to_string(),
            api_key: config.api_key().map(ToString::to_string),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Request and validate a report for `script`.
    pub async fn request_report(&self, script: &str) -> Result<AnalyzeResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let payload = GenerationRequest {
            model: &self.model,
            input: GenerationInput {
                messages: vec![
                    Message {
                        role: "system",
                        content: system_prompt(),
                    },
                    Message {
                        role: "user",
                        content: user_prompt(script),
                    },
                ],
            },
            parameters: GenerationParameters {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let body: Value = serde_json::from_str(&body).map_err(LlmError::InvalidBody)?;
        let content = extract_content(body)?;

        Ok(validate_report(
            content,
            script,
            &Meta::new(API_VERSION, LLM_ENGINE),
        )?)
    }
}

#[async_trait]
impl Scorer for QwenScorer {
    fn name(&self) -> &str {
        LLM_ENGINE
    }

    async fn score(&self, text: &str, _mode: AnalysisMode) -> Result<AnalyzeResponse, ScorerError> {
        match self.request_report(text).await {
            Ok(report) => {
                tracing::info!(model = %self.model, score = report.score, "LLM report accepted");
                Ok(report)
            }
            Err(LlmError::MissingApiKey) => {
                tracing::warn!("LLM API key is not configured, skipping LLM call");
                Err(LlmError::MissingApiKey.into())
            }
            Err(e) => {
                tracing::error!(model = %self.model, error = %e, "LLM scoring failed");
                Err(e.into())
            }
        }
    }
}

/// Pull the report object out of a generation response.
///
/// The report is normally a JSON string at `output.choices[0].message.content`,
/// possibly inside a ```json fence. A response that already carries `score`
/// and `risk_level` at the top level is used as-is.
pub fn extract_content(body: Value) -> Result<Value, LlmError> {
    let content = body
        .pointer("/output/choices/0/message/content")
        .filter(|value| !is_blank(value))
        .cloned();

    match content {
        Some(Value::String(raw)) => {
            serde_json::from_str(strip_fence(&raw)).map_err(LlmError::InvalidContent)
        }
        Some(object @ Value::Object(_)) => Ok(object),
        Some(other) => Err(LlmError::UnexpectedContent(kind(&other))),
        None if body.get("score").is_some() && body.get("risk_level").is_some() => Ok(body),
        None => Err(LlmError::MissingContent),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        _ => "other",
    }
}
