use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pylearn_backend::config::Config;
use pylearn_backend::routes::build_router;
use pylearn_backend::services::catalog_service::QuizCatalog;
use pylearn_backend::services::result_store::MemoryResultStore;
use pylearn_backend::AppState;

fn app(piston: &MockServer) -> Router {
    app_with_rps(piston, 100)
}

fn app_with_rps(piston: &MockServer, run_code_rps: u32) -> Router {
    let config = Config {
        piston_api_url: format!("{}/api/v2/piston/execute", piston.uri()),
        run_code_rps,
        ..Config::default()
    };
    let state = AppState::new(
        config,
        QuizCatalog::builtin().expect("builtin catalog"),
        Arc::new(MemoryResultStore::new()),
    )
    .expect("app state");
    build_router(state)
}

async fn run_code(app: &Router, body: JsonValue) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("POST")
        .uri("/run-code")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn run_code_proxies_to_piston() {
    let piston = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/piston/execute"))
        .and(body_partial_json(json!({
            "language": "python",
            "files": [{ "content": "print(sum([1, 2]))" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "language": "python",
            "version": "3.10.0",
            "run": { "stdout": "3\n", "stderr": "", "code": 0, "output": "3\n" }
        })))
        .expect(1)
        .mount(&piston)
        .await;

    let (status, body) = run_code(&app(&piston), json!({ "code": "print(sum([1, 2]))" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "3\n");
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn missing_code_is_a_bad_request() {
    let piston = MockServer::start().await;
    let app = app(&piston);

    let (status, body) = run_code(&app, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No code provided");

    let (status, _) = run_code(&app, json!({ "code": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn piston_failure_is_a_server_error() {
    let piston = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&piston)
        .await;

    let (status, body) = run_code(&app(&piston), json!({ "code": "print(1)" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("API request failed"));
}

#[tokio::test]
async fn run_code_is_rate_limited() {
    let piston = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "run": { "stdout": "ok\n", "stderr": "" }
        })))
        .expect(1)
        .mount(&piston)
        .await;
    let app = app_with_rps(&piston, 1);

    let (status, _) = run_code(&app, json!({ "code": "print('ok')" })).await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .method("POST")
        .uri("/run-code")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "code": "print('ok')" }).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers()["retry-after"], "1");
}
