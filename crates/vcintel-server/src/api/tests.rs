use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use tower::ServiceExt;
use vcintel_enrich::LlmConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn test_state(llm_endpoint: &str, api_key: Option<&str>) -> AppState {
    let fetcher = HttpPageFetcher::new(2, "vcintel-test/0.1").expect("fetcher");
    let model = OpenAiClient::new(LlmConfig {
        api_key: api_key.map(str::to_string),
        endpoint: llm_endpoint.to_string(),
        timeout_secs: 2,
        ..LlmConfig::default()
    })
    .expect("model client");
    AppState {
        enricher: Arc::new(Enricher::new(fetcher, model)),
    }
}

fn open_app(state: AppState) -> Router {
    let auth = AuthState::from_keys("", true).expect("auth");
    build_app(state, auth, RateLimitState::per_minute(30))
}

fn offline_app() -> Router {
    open_app(test_state("http://127.0.0.1:9/v1/chat/completions", None))
}

fn enrich_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn completion(content: &Value) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content.to_string() } }]
    })
}

async fn mount_homepage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Acme</h1><p>Payment rails for marketplaces.</p></body></html>",
            "text/html",
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn api_error_serializes_flat_error_body() {
    let response = ApiError::new(StatusCode::BAD_GATEWAY, "nope").into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(response).await, json!({ "error": "nope" }));
}

#[test]
fn api_error_maps_invalid_input_to_bad_request() {
    let err = ApiError::from_enrich("req-1", &EnrichError::InvalidInput);
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Invalid website payload");
}

#[test]
fn api_error_maps_model_failures_to_internal_error() {
    let err = ApiError::from_enrich(
        "req-1",
        &EnrichError::Model(vcintel_enrich::LlmError::MissingCredential),
    );
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message, "Missing OPENAI_API_KEY in server environment");
}

#[tokio::test]
async fn health_reports_missing_credential_and_echoes_request_id() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-health")
    );
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["llm"], "missing_credential");
    assert_eq!(json["meta"]["request_id"], "req-health");
}

#[tokio::test]
async fn health_reports_configured_model() {
    let app = open_app(test_state(
        "http://127.0.0.1:9/v1/chat/completions",
        Some("test-key"),
    ));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = json_body(response).await;
    assert_eq!(json["data"]["llm"], "configured");
}

#[tokio::test]
async fn enrich_rejects_invalid_website() {
    let response = offline_app()
        .oneshot(enrich_request("/enrich", r#"{"website":"https://"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Invalid website payload" })
    );
}

#[tokio::test]
async fn enrich_rejects_missing_website() {
    let response = offline_app()
        .oneshot(enrich_request("/api/enrich", r#"{"name":"Acme"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Invalid website payload" })
    );
}

#[tokio::test]
async fn enrich_treats_null_or_non_string_website_as_invalid_website() {
    for body in [
        r#"{"website":null}"#,
        r#"{"website":123}"#,
        r#"{"website":{"host":"acme.io"},"name":"Acme"}"#,
    ] {
        let response = offline_app()
            .oneshot(enrich_request("/enrich", body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid website payload" }),
            "body: {body}"
        );
    }
}

#[tokio::test]
async fn enrich_rejects_malformed_json() {
    let response = offline_app()
        .oneshot(enrich_request("/enrich", "{not json"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Invalid enrichment payload" })
    );
}

#[tokio::test]
async fn enrich_rejects_unknown_stage() {
    let response = offline_app()
        .oneshot(enrich_request(
            "/enrich",
            r#"{"website":"acme.io","stage":"Series Z"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Invalid enrichment payload" })
    );
}

#[tokio::test]
async fn enrich_requires_bearer_token_when_auth_enabled() {
    let auth = AuthState::from_keys("secret-key", false).expect("auth");
    let app = build_app(
        test_state("http://127.0.0.1:9/v1/chat/completions", None),
        auth,
        RateLimitState::per_minute(30),
    );

    let response = app
        .clone()
        .oneshot(enrich_request("/enrich", r#"{"website":""}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "missing or invalid bearer token" })
    );

    let mut authorized = enrich_request("/enrich", r#"{"website":""}"#);
    authorized.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer secret-key".parse().expect("header value"),
    );
    let response = app.oneshot(authorized).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public_when_auth_enabled() {
    let auth = AuthState::from_keys("secret-key", false).expect("auth");
    let app = build_app(
        test_state("http://127.0.0.1:9/v1/chat/completions", None),
        auth,
        RateLimitState::per_minute(30),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn enrich_is_rate_limited_per_window() {
    let auth = AuthState::from_keys("", true).expect("auth");
    let app = build_app(
        test_state("http://127.0.0.1:9/v1/chat/completions", None),
        auth,
        RateLimitState::new(1, Duration::from_secs(60)),
    );

    let first = app
        .clone()
        .oneshot(enrich_request("/enrich", r#"{"website":""}"#))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app
        .oneshot(enrich_request("/enrich", r#"{"website":""}"#))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json_body(second).await,
        json!({ "error": "rate limit exceeded" })
    );
}

#[tokio::test]
async fn enrich_returns_validated_model_output() {
    let server = MockServer::start().await;
    mount_homepage(&server).await;
    let output = json!({
        "summary": "Acme builds payment rails for marketplaces.",
        "what_they_do": ["Payments API", "Ledger", "Payouts", "Risk scoring"],
        "keywords": ["payments", "fintech", "api", "ledger", "payouts", "b2b"],
        "derived_signals": [
            { "label": "B2B Focus", "value": "High", "rationale": "Sells to marketplaces." },
            { "label": "Technical Depth", "value": "Medium", "rationale": "API-first product." },
            { "label": "Traction", "value": "Low", "rationale": "No customer logos." }
        ]
    });
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&output)))
        .expect(1)
        .mount(&server)
        .await;

    let app = open_app(test_state(
        &format!("{}{COMPLETIONS_PATH}", server.uri()),
        Some("test-key"),
    ));
    let body = json!({
        "website": server.uri(),
        "companyId": "co_42",
        "sector": "Fintech",
        "stage": "Series A"
    });
    let response = app
        .oneshot(enrich_request("/enrich", body.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["company_id"], "co_42");
    assert_eq!(json["what_they_do"], output["what_they_do"]);
    assert_eq!(json["keywords"], output["keywords"]);
    assert_eq!(json["derived_signals"], output["derived_signals"]);
    let sources = json["sources"].as_array().expect("sources array");
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["url"], format!("http://{}", server.address()));
}

#[tokio::test]
async fn enrich_falls_back_to_heuristic_on_quota() {
    let server = MockServer::start().await;
    mount_homepage(&server).await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let app = open_app(test_state(
        &format!("{}{COMPLETIONS_PATH}", server.uri()),
        Some("test-key"),
    ));
    let body = json!({ "website": server.uri(), "name": "Acme", "stage": "Pre-Seed" });
    let response = app
        .oneshot(enrich_request("/api/enrich", body.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["summary"]
        .as_str()
        .expect("summary")
        .starts_with("Acme appears to be a Pre-Seed company"));
    assert_eq!(
        json["keywords"],
        json!(["acme", "technology", "startup", "b2b", "growth"])
    );
    assert_eq!(json["derived_signals"][1]["value"], "Low");
}

#[tokio::test]
async fn enrich_surfaces_upstream_failure_as_internal_error() {
    let server = MockServer::start().await;
    mount_homepage(&server).await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let app = open_app(test_state(
        &format!("{}{COMPLETIONS_PATH}", server.uri()),
        Some("test-key"),
    ));
    let body = json!({ "website": server.uri() });
    let response = app
        .oneshot(enrich_request("/enrich", body.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    let message = json["error"].as_str().expect("error message");
    assert!(message.contains("OpenAI request failed (500)"), "got: {message}");
}
