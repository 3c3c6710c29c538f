use super::*;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use runpad_core::{ExecutionError, ExecutionResult, ResolvedExecution};
use serde_json::{json, Value};
use std::sync::Mutex;
use tower::ServiceExt; // for `oneshot`

/// Executor that answers from a fixed script and remembers what it was asked.
struct ScriptedExecutor {
    outcome: std::result::Result<ExecutionResult, ExecutionError>,
    seen: Mutex<Vec<ResolvedExecution>>,
}

impl ScriptedExecutor {
    fn new(outcome: std::result::Result<ExecutionResult, ExecutionError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn hello_world() -> Arc<Self> {
        Self::new(Ok(ExecutionResult {
            stdout: "Hello, World!\n".to_string(),
            stderr: String::new(),
            exit_code: 0,
            execution_time_ms: Some(12.0),
        }))
    }
}

#[async_trait]
impl CodeExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        request: &ResolvedExecution,
    ) -> std::result::Result<ExecutionResult, ExecutionError> {
        self.seen.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

fn app(executor: Arc<ScriptedExecutor>) -> Router {
    let state = AppState::new(executor).unwrap();
    RunpadServer::new(state).build_router()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_execute_returns_normalized_result() {
    let executor = ScriptedExecutor::hello_world();
    let body = json!({ "language": "python", "version": "latest", "code": "print('Hello, World!')" });

    let (status, body) = send(
        app(executor.clone()),
        post_json("/api/execute", body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "stdout": "Hello, World!\n", "stderr": "", "exitCode": 0, "executionTime": 12.0 })
    );

    let seen = executor.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].version, "3.10.0");
    assert_eq!(seen[0].code, "print('Hello, World!')");
}

#[tokio::test]
async fn test_execute_failing_program_is_still_ok() {
    let executor = ScriptedExecutor::new(Ok(ExecutionResult {
        stdout: String::new(),
        stderr: "NameError: name 'x' is not defined\n".to_string(),
        exit_code: 1,
        execution_time_ms: None,
    }));
    let (status, body) = send(
        app(executor),
        post_json("/api/execute", r#"{"language":"python","code":"x"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exitCode"], 1);
    assert!(body.get("executionTime").is_none());
}

#[tokio::test]
async fn test_execute_validation_failure_is_folded_into_500() {
    let executor = ScriptedExecutor::hello_world();
    let (status, body) = send(
        app(executor.clone()),
        post_json("/api/execute", r#"{"code":"print(1)"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["stdout"], "");
    assert_eq!(body["exitCode"], 1);
    assert!(body["stderr"].as_str().unwrap().contains("language"));
    assert!(executor.seen.lock().unwrap().is_empty(), "engine must not be called");
}

#[tokio::test]
async fn test_execute_non_json_body_is_folded_into_500() {
    let executor = ScriptedExecutor::hello_world();
    let (status, body) = send(app(executor.clone()), post_json("/api/execute", "print(1)")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["exitCode"], 1);
    assert!(executor.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_execute_remote_rejection_surfaces_message() {
    let executor = ScriptedExecutor::new(Err(ExecutionError::rejected("Invalid version")));
    let (status, body) = send(
        app(executor),
        post_json("/api/execute", r#"{"language":"python","version":"9.9.9","code":"1"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "stdout": "", "stderr": "Invalid version", "exitCode": 1 }));
}

#[tokio::test]
async fn test_execute_unknown_language_reaches_engine() {
    let executor = ScriptedExecutor::new(Err(ExecutionError::rejected(
        "klingon-* runtime is unknown",
    )));
    let (status, _) = send(
        app(executor.clone()),
        post_json("/api/execute", r#"{"language":"klingon","code":"Qapla'"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let seen = executor.seen.lock().unwrap();
    assert_eq!(seen[0].language, "klingon");
    assert_eq!(seen[0].version, "*");
}

#[tokio::test]
async fn test_execute_transport_failure() {
    let executor = ScriptedExecutor::new(Err(ExecutionError::transport("connection refused")));
    let (status, body) = send(
        app(executor),
        post_json("/api/execute", r#"{"language":"go","code":"package main"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["stderr"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_share_and_fetch_round_trip() {
    let router = app(ScriptedExecutor::hello_world());

    let (status, body) = send(
        router.clone(),
        post_json("/api/share", r#"{"language":"rust","code":"fn main() {}"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body.as_object().unwrap().len(), 1);

    let (status, body) = send(router, get_request(&format!("/api/share/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["language"], "rust");
    assert_eq!(body["code"], "fn main() {}");
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_share_validation_failure_is_400() {
    let (status, body) = send(
        app(ScriptedExecutor::hello_world()),
        post_json("/api/share", r#"{"language":"rust"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("code"));
}

#[tokio::test]
async fn test_unknown_share_id_is_404() {
    let (status, body) = send(
        app(ScriptedExecutor::hello_world()),
        get_request("/api/share/doesnotexist"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Shared code not found" }));
}

#[tokio::test]
async fn test_store_is_injected() {
    let store = Arc::new(InMemorySnippetStore::new());
    let seeded = store.create("c".to_string(), "int main(){}".to_string()).await;
    let state = AppState::with_store(ScriptedExecutor::hello_world(), store.clone()).unwrap();
    let router = RunpadServer::new(state).build_router();

    let (status, body) = send(router, get_request(&format!("/api/share/{}", seeded.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "int main(){}");
}

#[tokio::test]
async fn test_languages_endpoint() {
    let (status, body) = send(app(ScriptedExecutor::hello_world()), get_request("/api/languages")).await;

    assert_eq!(status, StatusCode::OK);
    let languages = body.as_array().unwrap();
    assert_eq!(languages.len(), 8);
    assert_eq!(languages[0]["id"], "python");
    assert_eq!(languages[0]["defaultVersion"], "3.10.0");
    assert!(languages.iter().any(|l| l["displayName"] == "C++"));
}

#[tokio::test]
async fn test_health_endpoint_counts_snippets() {
    let router = app(ScriptedExecutor::hello_world());
    send(
        router.clone(),
        post_json("/api/share", r#"{"language":"go","code":"package main"}"#),
    )
    .await;

    let (status, body) = send(router, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["snippets"], 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let state = AppState::new(ScriptedExecutor::hello_world()).unwrap();
    let router = RunpadServer::with_config(state, ServerConfig::new().with_max_body_size(64))
        .build_router();
    let code = "x".repeat(1024);
    let body = json!({ "language": "python", "code": code }).to_string();

    let response = router.oneshot(post_json("/api/share", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

fn origin_request(origin: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/languages")
        .header("origin", origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let state = AppState::new(ScriptedExecutor::hello_world()).unwrap();
    let config = ServerConfig::new().with_cors_origins(vec!["http://localhost:5173".to_string()]);
    let router = RunpadServer::with_config(state, config).build_router();

    let response = router
        .clone()
        .oneshot(origin_request("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );

    let response = router
        .oneshot(origin_request("http://evil.example"))
        .await
        .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_disabled_sends_no_headers() {
    let state = AppState::new(ScriptedExecutor::hello_world()).unwrap();
    let router = RunpadServer::with_config(state, ServerConfig::new().with_cors(false))
        .build_router();

    let response = router
        .oneshot(origin_request("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[test]
fn test_server_config_from_settings() {
    let settings = ServerSettings {
        bind_addr: "0.0.0.0:8080".to_string(),
        enable_cors: false,
        cors_origins: Some(vec!["http://localhost:5173".to_string()]),
        max_body_size: 4096,
        enable_logging: false,
    };
    let config = ServerConfig::from_settings(&settings).unwrap();
    assert_eq!(config.bind_addr.port(), 8080);
    assert!(!config.enable_cors);
    assert_eq!(config.max_body_size, 4096);

    let bad = ServerSettings {
        bind_addr: "localhost".to_string(),
        ..ServerSettings::default()
    };
    assert!(matches!(
        ServerConfig::from_settings(&bad),
        Err(ServerError::Config(_))
    ));
}
