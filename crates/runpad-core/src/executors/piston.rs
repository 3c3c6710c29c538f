//! Client for Piston-compatible execution engines.

use crate::config::EngineConfig;
use crate::errors::{ConfigError, ExecutionError};
use crate::executors::{CodeExecutor, ExecutionResult, ResolvedExecution};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct PistonExecutor {
    client: Client,
    execute_url: String,
}

impl PistonExecutor {
    /// Build a client for the engine rooted at `config.url`. Every call is
    /// bounded by `config.timeout_secs`.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build engine client: {}", e)))?;

        Ok(Self {
            client,
            execute_url: format!("{}/execute", config.url.trim_end_matches('/')),
        })
    }

    pub fn execute_url(&self) -> &str {
        &self.execute_url
    }

    fn build_request_body(request: &ResolvedExecution) -> Value {
        json!({
            "language": request.language,
            "version": request.version,
            "files": [{ "content": request.code }],
            "stdin": request.stdin.as_deref().unwrap_or(""),
        })
    }
}

#[async_trait]
impl CodeExecutor for PistonExecutor {
    async fn execute(&self, request: &ResolvedExecution) -> Result<ExecutionResult, ExecutionError> {
        let body = Self::build_request_body(request);
        log::debug!("Piston request to {}: {}", self.execute_url, body);

        let response = self
            .client
            .post(&self.execute_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        log::debug!("Piston response ({}): {}", status, response_text);

        normalize_response(status, &response_text)
    }
}

/// Map an engine response onto [`ExecutionResult`].
///
/// A body that is not a JSON object is a transport failure regardless of
/// status. A `message` field or a non-2xx status means the engine refused
/// the request.
pub fn normalize_response(status: StatusCode, body: &str) -> Result<ExecutionResult, ExecutionError> {
    let data: Value = serde_json::from_str(body).map_err(|e| {
        ExecutionError::transport(format!("Invalid JSON from execution engine: {}", e))
    })?;
    if !data.is_object() {
        return Err(ExecutionError::transport(format!(
            "Expected a JSON object from execution engine, got: {}",
            data
        )));
    }

    let message = remote_message(&data);
    if message.is_some() || !status.is_success() {
        let message = message.unwrap_or_else(|| {
            format!(
                "Piston API error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        });
        return Err(ExecutionError::rejected(message));
    }

    let stdout = run_field(&data, "stdout").and_then(Value::as_str).unwrap_or_default();
    let stderr = run_field(&data, "stderr").and_then(Value::as_str).unwrap_or_default();
    let exit_code = run_field(&data, "code")
        .and_then(|code| code.as_i64().or_else(|| code.as_f64().map(|f| f as i64)))
        .unwrap_or(0);
    let execution_time_ms = run_field(&data, "time")
        .and_then(Value::as_f64)
        .filter(|time| *time != 0.0);

    Ok(ExecutionResult {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        exit_code,
        execution_time_ms,
    })
}

fn run_field<'a>(data: &'a Value, name: &str) -> Option<&'a Value> {
    data.get("run")?.get(name)
}

/// The engine's rejection message, if it sent a truthy one.
fn remote_message(data: &Value) -> Option<String> {
    match data.get("message")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
