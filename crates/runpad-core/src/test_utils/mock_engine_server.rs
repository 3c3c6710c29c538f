// src/test_utils/mock_engine_server.rs
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A canned answer from the mock engine. The body is sent verbatim so tests
/// can return malformed JSON.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct MockEngineState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn execute_handler(
    State(state): State<MockEngineState>,
    Json(payload): Json<Value>,
) -> Response {
    log::debug!("Mock engine received request: {}", payload);
    state.requests.lock().unwrap().push(payload);

    let next = state.responses.lock().unwrap().pop_front();
    match next {
        Some(canned) => {
            if let Some(delay) = canned.delay {
                tokio::time::sleep(delay).await;
            }
            let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::OK);
            (
                status,
                [("content-type", "application/json")],
                canned.body,
            )
                .into_response()
        }
        None => {
            log::error!("Mock engine ran out of responses!");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

pub struct MockEngineServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub recorded_requests: Arc<Mutex<Vec<Value>>>,
}

impl MockEngineServer {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let state = MockEngineState {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let recorded_requests = state.requests.clone();

        let app = Router::new()
            .route("/execute", post(execute_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock engine to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock engine listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock engine error: {}", e));
        });

        MockEngineServer {
            addr,
            shutdown_tx,
            recorded_requests,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock engine shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    pub fn get_requests(&self) -> Vec<Value> {
        self.recorded_requests.lock().unwrap().clone()
    }
}
