//! Integration tests for Reel Gateway.
//!
//! Tests the HTTP API end to end, with a mock DashScope server standing in
//! for the LLM engine.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use reel_common::config::{Config, LlmConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{bearer_token, method, path};
use std::time::Duration;
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCRIPT: &str = "她突然停下脚步，明明说好不哭却红了眼。原来他一直都在等她，终于明白了。";

fn create_test_app() -> axum::Router {
    reel_gateway::build_router(&Config::default())
}

fn llm_config(server: &MockServer) -> Config {
    Config {
        llm: LlmConfig {
            enabled: true,
            api_key: Some("sk-test-key-123456".into()),
            api_url: Some(format!("{}/generation", server.uri())),
            timeout_secs: 5,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Helper to make a request and get the JSON response.
async fn request_json(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = if let Some(b) = body {
        request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        request.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    (status, json)
}

fn llm_report() -> Value {
    json!({
        "score": 82,
        "risk_level": "safe",
        "summary": ["结尾落点可以更有力"],
        "issues_high": [],
        "issues_mid": [{"text": "结尾落点可以更有力", "reason": "收束略平"}],
        "risky_section": "后段",
        "viewer_reaction": "如果我是观众，我会看完并点赞",
        "directions": ["强化结尾的情绪收束或思考点"],
        "evidence": [
            {"text": "她突然停下脚步", "position": "前段", "reason": "转折开场"},
            {"text": "不存在的句子", "position": "中段", "reason": "编造"}
        ]
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Health Check Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, json) = request_json(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["service"], "reel-gateway");
}

#[tokio::test]
async fn test_health_check_api_path() {
    let app = create_test_app();
    let (status, json) = request_json(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
}

// ─────────────────────────────────────────────────────────────────────────────
// Analyze Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_analyze_rule_engine() {
    let app = create_test_app();
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["engine"], "rule");
    assert_eq!(json["meta"]["version"], "1.0.0");
    assert!(json["score"].as_u64().unwrap() <= 100);
    let expected = serde_json::to_value(reel_core::analyze(SCRIPT)).unwrap();
    assert_eq!(json, expected);
}

#[tokio::test]
async fn test_analyze_trims_text() {
    let app = create_test_app();
    let padded = format!("  \n{SCRIPT}\n  ");
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": padded}))).await;

    assert_eq!(status, StatusCode::OK);
    let expected = serde_json::to_value(reel_core::analyze(SCRIPT)).unwrap();
    assert_eq!(json, expected);
}

#[tokio::test]
async fn test_analyze_empty_text() {
    let app = create_test_app();
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "文本内容不能为空");
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_analyze_too_short() {
    let app = create_test_app();
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": "一二三四五六七八九"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("10"));
}

#[tokio::test]
async fn test_analyze_length_counts_characters() {
    // Ten CJK characters are thirty bytes but still exactly the minimum.
    let app = create_test_app();
    let (status, _) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": "一二三四五六七八九十"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request_json(
        &app,
        Method::POST,
        "/api/analyze",
        Some(json!({"text": "字".repeat(5000)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_too_long() {
    let app = create_test_app();
    let (status, json) = request_json(
        &app,
        Method::POST,
        "/api/analyze",
        Some(json!({"text": "字".repeat(5001)})),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_analyze_unknown_mode() {
    let app = create_test_app();
    let (status, json) = request_json(
        &app,
        Method::POST,
        "/api/analyze",
        Some(json!({"text": SCRIPT, "mode": "comedy"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Debug Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_debug_config_defaults() {
    let app = create_test_app();
    let (status, json) = request_json(&app, Method::GET, "/debug/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["enable_llm"], false);
    assert_eq!(json["config"]["has_api_key"], false);
    assert_eq!(json["config"]["api_key_preview"], "未设置");
    assert_eq!(json["config"]["llm_api_url"], "使用默认URL");
    assert_eq!(json["diagnosis"]["expected_engine"], "rule");
    assert_eq!(json["diagnosis"]["engine_selection"], "rule");

    let env = json["environment_variables"].as_object().unwrap();
    for key in ["ENABLE_LLM", "LLM_ENABLED", "QWEN_API_KEY", "LLM_API_KEY", "LLM_API_URL"] {
        assert!(env[key].is_string(), "missing {key}");
    }
}

#[tokio::test]
async fn test_debug_config_never_leaks_key() {
    let server = MockServer::start().await;
    let app = reel_gateway::build_router(&llm_config(&server));
    let (_, json) = request_json(&app, Method::GET, "/debug/config", None).await;

    assert_eq!(json["config"]["api_key_preview"], "sk-test-...");
    assert_eq!(json["diagnosis"]["expected_engine"], "llm");
    assert_eq!(json["diagnosis"]["engine_selection"], "llm-qwen");
    assert!(!json.to_string().contains("sk-test-key-123456"));
}

// ─────────────────────────────────────────────────────────────────────────────
// LLM Engine Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_llm_report_is_validated_and_returned() {
    let server = MockServer::start().await;
    let content = format!("```json\n{}\n```", llm_report());
    Mock::given(method("POST"))
        .and(path("/generation"))
        .and(bearer_token("sk-test-key-123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"choices": [{"message": {"role": "assistant", "content": content}}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = reel_gateway::build_router(&llm_config(&server));
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 82);
    assert_eq!(json["meta"]["engine"], "llm-qwen");
    assert_eq!(json["meta"]["version"], "1.0.0");
    // Fabricated evidence is dropped.
    assert_eq!(json["evidence"].as_array().unwrap().len(), 1);
    assert_eq!(json["evidence"][0]["text"], "她突然停下脚步");
}

#[tokio::test]
async fn test_llm_request_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(llm_report()))
        .expect(1)
        .mount(&server)
        .await;

    let app = reel_gateway::build_router(&llm_config(&server));
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 82);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "qwen-plus");
    assert_eq!(body["parameters"]["max_tokens"], 1500);
    assert_eq!(body["input"]["messages"][0]["role"], "system");
    assert_eq!(body["input"]["messages"][1]["role"], "user");
    assert!(body["input"]["messages"][1]["content"]
        .as_str()
        .unwrap()
        .ends_with(SCRIPT));
}

#[tokio::test]
async fn test_llm_http_error_falls_back_to_rules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let app = reel_gateway::build_router(&llm_config(&server));
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["engine"], "rule");
    let expected = serde_json::to_value(reel_core::analyze(SCRIPT)).unwrap();
    assert_eq!(json, expected);
}

#[tokio::test]
async fn test_llm_schema_mismatch_falls_back_to_rules() {
    let server = MockServer::start().await;
    let mut report = llm_report();
    report["directions"] = json!([]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"choices": [{"message": {"content": report.to_string()}}]}
        })))
        .mount(&server)
        .await;

    let app = reel_gateway::build_router(&llm_config(&server));
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["engine"], "rule");
}

#[tokio::test]
async fn test_llm_garbage_content_falls_back_to_rules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"choices": [{"message": {"content": "抱歉，我无法评分。"}}]}
        })))
        .mount(&server)
        .await;

    let app = reel_gateway::build_router(&llm_config(&server));
    let (_, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;
    assert_eq!(json["meta"]["engine"], "rule");
}

#[tokio::test]
async fn test_llm_timeout_falls_back_to_rules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(llm_report())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = llm_config(&server);
    config.llm.timeout_secs = 1;
    let app = reel_gateway::build_router(&config);
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["engine"], "rule");
    assert_eq!(json, serde_json::to_value(reel_core::analyze(SCRIPT)).unwrap());
}

#[tokio::test]
async fn test_llm_enabled_without_key_uses_rules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(llm_report()))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = llm_config(&server);
    config.llm.api_key = Some("   ".into());
    let app = reel_gateway::build_router(&config);
    let (status, json) =
        request_json(&app, Method::POST, "/api/analyze", Some(json!({"text": SCRIPT}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["engine"], "rule");
}

#[tokio::test]
async fn test_malformed_body_gets_error_json() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "INVALID_INPUT");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_missing_text_gets_error_json() {
    let app = create_test_app();
    let (status, json) = request_json(
        &app,
        Method::POST,
        "/api/analyze",
        Some(json!({"mode": "drama_emotion"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_INPUT");
    assert!(json["error"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = create_test_app();
    let body = json!({"text": "字".repeat(100_000)}).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
}
