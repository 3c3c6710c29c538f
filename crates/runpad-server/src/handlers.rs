//! Request handlers for the runpad HTTP API.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use runpad_core::languages::{self, LanguageDescriptor};
use runpad_core::{ExecutionResult, RequestValidator, SharedSnippet, ValidationError};
use serde::Serialize;

use crate::error::{Result, ServerError};
use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub snippets: usize,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub id: String,
}

/// Handler for the /api/execute POST endpoint.
///
/// Every failure, including a malformed request, is reported as a 500 whose
/// body has the same shape as a successful result, with the message in
/// `stderr`. The web client renders both the same way.
pub async fn execute_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ExecutionResult>) {
    let request = match parse_and_validate(&body, |raw| {
        state.validator.validate_execution_request(raw)
    }) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected execution request: {}", e);
            return execution_failure(e.to_string());
        }
    };

    match state.gateway.execute_request(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(e) => {
            log::error!("Error executing code: {}", e);
            execution_failure(e.to_string())
        }
    }
}

fn execution_failure(message: String) -> (StatusCode, Json<ExecutionResult>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ExecutionResult::failed(message)),
    )
}

/// Handler for the /api/share POST endpoint.
pub async fn share_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShareResponse>> {
    let request = parse_and_validate(&body, |raw| state.validator.validate_share_request(raw))?;

    let snippet = state.snippets.create(request.language, request.code).await;
    log::info!("Shared {} snippet as {}", snippet.language, snippet.id);

    Ok(Json(ShareResponse { id: snippet.id }))
}

/// Handler for the /api/share/{id} GET endpoint.
pub async fn get_share_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SharedSnippet>> {
    match state.snippets.get(&id).await {
        Some(snippet) => Ok(Json(snippet)),
        None => {
            log::debug!("Shared snippet {} not found", id);
            Err(ServerError::not_found("Shared code not found"))
        }
    }
}

/// Handler for the /api/languages GET endpoint.
pub async fn languages_handler() -> Json<&'static [LanguageDescriptor]> {
    Json(languages::all())
}

/// Handler for the /health GET endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        snippets: state.snippets.len().await,
    })
}

fn parse_and_validate<T>(
    body: &[u8],
    validate: impl FnOnce(&serde_json::Value) -> std::result::Result<T, ValidationError>,
) -> std::result::Result<T, ValidationError> {
    let raw = RequestValidator::parse_body(body)?;
    validate(&raw)
}
