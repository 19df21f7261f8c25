//! Route definitions for Reel Gateway.
//!
//! Provides the analyze endpoint, health checks, and a configuration diagnosis.

use crate::fallback::FallbackScorer;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use reel_common::config::{key_preview, Config, EngineKind, LimitsConfig};
use reel_common::Error;
use reel_core::{text, AnalysisMode, AnalyzeResponse, Scorer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scorer: Arc<dyn Scorer>,
}

impl AppState {
    /// State with the engine selected by `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_scorer(config, Arc::new(FallbackScorer::from_config(config)))
    }

    pub fn with_scorer(config: &Config, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            scorer,
        }
    }
}

/// Analyze request body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    AnalysisMode::default().as_str().to_string()
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        Self {
            error: err.detail(),
            code: err.code().to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: Error) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.into()))
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub service: String,
}

/// Engine selection diagnosis.
#[derive(Debug, Serialize, Deserialize)]
pub struct DebugConfigResponse {
    pub config: ConfigSnapshot,
    pub environment_variables: EnvironmentSnapshot,
    pub diagnosis: Diagnosis,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub enable_llm: bool,
    pub has_api_key: bool,
    pub api_key_preview: String,
    pub default_engine: EngineKind,
    pub llm_api_url: String,
    pub llm_model: String,
}

/// Raw values of the variables that drive engine selection. Keys are
/// previewed, never shown in full.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    #[serde(rename = "ENABLE_LLM")]
    pub enable_llm: String,
    #[serde(rename = "LLM_ENABLED")]
    pub llm_enabled: String,
    #[serde(rename = "QWEN_API_KEY")]
    pub qwen_api_key: String,
    #[serde(rename = "LLM_API_KEY")]
    pub llm_api_key: String,
    #[serde(rename = "LLM_API_URL")]
    pub llm_api_url: String,
}

const UNSET: &str = "未设置";

impl EnvironmentSnapshot {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let plain = |key: &str| lookup(key).unwrap_or_else(|| UNSET.into());
        let secret = |key: &str| lookup(key).map_or_else(|| UNSET.into(), |v| key_preview(&v));
        Self {
            enable_llm: plain("ENABLE_LLM"),
            llm_enabled: plain("LLM_ENABLED"),
            qwen_api_key: secret("QWEN_API_KEY"),
            llm_api_key: secret("LLM_API_KEY"),
            llm_api_url: plain("LLM_API_URL"),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Diagnosis {
    pub llm_enabled_check: String,
    pub api_key_check: String,
    pub engine_selection: String,
    pub expected_engine: EngineKind,
}

/// Build the complete router with all routes.
pub fn build_all_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/debug/config", get(debug_config_handler))
        .with_state(state)
        .merge(health_routes())
}

/// Build health check routes.
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: reel_core::API_VERSION.into(),
        service: "reel-gateway".into(),
    })
}

async fn debug_config_handler(State(state): State<AppState>) -> Json<DebugConfigResponse> {
    let config = &state.config;
    let llm = &config.llm;
    let has_api_key = llm.api_key().is_some();
    let engine = config.engine();

    Json(DebugConfigResponse {
        config: ConfigSnapshot {
            enable_llm: llm.enabled,
            has_api_key,
            api_key_preview: llm.api_key_preview().unwrap_or_else(|| UNSET.into()),
            default_engine: engine,
            llm_api_url: llm
                .api_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| "使用默认URL".into()),
            llm_model: llm.model.clone(),
        },
        environment_variables: EnvironmentSnapshot::from_env(),
        diagnosis: Diagnosis {
            llm_enabled_check: check(llm.enabled, "✅ 通过", "❌ 未启用"),
            api_key_check: check(has_api_key, "✅ 已设置", "❌ 未设置"),
            engine_selection: state.scorer.name().to_string(),
            expected_engine: engine,
        },
    })
}

fn check(passed: bool, pass: &str, fail: &str) -> String {
    let label = if passed { pass } else { fail };
    label.to_string()
}

async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| api_error(rejection_error(&rejection)))?;
    let mode: AnalysisMode = request
        .mode
        .parse()
        .map_err(|e: String| api_error(Error::InvalidInput(e)))?;
    let script = validate_text(&request.text, &state.config.limits).map_err(api_error)?;

    tracing::info!(
        engine = state.scorer.name(),
        chars = text::char_len(script),
        mode = mode.as_str(),
        "Analyzing script"
    );

    let report = state.scorer.score(script, mode).await.map_err(|e| {
        tracing::error!(error = %e, "Scoring failed");
        api_error(Error::Scoring(e.to_string()))
    })?;

    Ok(Json(report))
}

/// An unreadable body as an API error. Bodies cut off by the size limit
/// keep their 413.
fn rejection_error(rejection: &JsonRejection) -> Error {
    let detail = rejection.body_text();
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(detail)
    } else {
        Error::InvalidInput(detail)
    }
}

/// Trim `raw` and check its length in characters.
pub fn validate_text<'a>(raw: &'a str, limits: &LimitsConfig) -> Result<&'a str, Error> {
    let script = raw.trim();
    if script.is_empty() {
        return Err(Error::InvalidInput("文本内容不能为空".into()));
    }

    let len = text::char_len(script);
    if len < limits.min_text_length {
        return Err(Error::InvalidInput(format!(
            "文本长度过短，至少需要 {} 个字符",
            limits.min_text_length
        )));
    }
    if len > limits.max_text_length {
        return Err(Error::PayloadTooLarge(format!(
            "文本长度超过限制，最多支持 {} 个字符",
            limits.max_text_length
        )));
    }
    Ok(script)
}
