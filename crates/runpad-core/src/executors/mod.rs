//! Code execution through a remote engine.
//!
//! Code is never run locally. A [`CodeExecutor`] forwards a request whose
//! runtime version is already resolved, and the [`ExecutionGateway`] sits in
//! front of it to apply the version policy and log what happened. Failing user
//! programs are ordinary results: only an unreachable or refusing engine is an
//! error.

use crate::errors::ExecutionError;
use crate::validation::ExecutionRequest;
use crate::versions::resolve_version;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod piston;

pub use piston::PistonExecutor;

/// Normalized outcome of running a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
    #[serde(
        rename = "executionTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_time_ms: Option<f64>,
}

impl ExecutionResult {
    /// A result that reports `message` as if the program had written it to stderr.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_code: 1,
            execution_time_ms: None,
        }
    }
}

/// An execution request with a concrete runtime version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecution {
    pub language: String,
    pub version: String,
    pub code: String,
    pub stdin: Option<String>,
}

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, request: &ResolvedExecution) -> Result<ExecutionResult, ExecutionError>;
}

/// Front door for execution: resolves the version, then delegates to the executor.
#[derive(Clone)]
pub struct ExecutionGateway {
    executor: Arc<dyn CodeExecutor>,
}

impl ExecutionGateway {
    pub fn new(executor: Arc<dyn CodeExecutor>) -> Self {
        Self { executor }
    }

    pub async fn execute(
        &self,
        language: &str,
        version: Option<&str>,
        code: &str,
        stdin: Option<&str>,
    ) -> Result<ExecutionResult, ExecutionError> {
        let version = resolve_version(language, version);
        log::info!("Executing {} with version: {}", language, version);

        let request = ResolvedExecution {
            language: language.to_string(),
            version,
            code: code.to_string(),
            stdin: stdin.map(str::to_string),
        };

        let result = self.executor.execute(&request).await;
        match &result {
            Ok(result) => log::debug!("Execution result for {}: {:?}", language, result),
            Err(e) => log::warn!("Execution of {} failed ({}): {}", language, e.kind(), e),
        }
        result
    }

    pub async fn execute_request(
        &self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, ExecutionError> {
        self.execute(
            &request.language,
            request.version.as_deref(),
            &request.code,
            request.stdin.as_deref(),
        )
        .await
    }
}
