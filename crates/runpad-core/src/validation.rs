//! Schema validation for inbound execute and share requests
//!
//! Requests are checked against a JSON schema before anything else happens,
//! so malformed input never reaches the execution engine or the snippet store.
//! The language is deliberately not checked against the registry here:
//! unknown languages are forwarded and rejected by the engine itself.

use crate::errors::{ConfigError, ValidationError};
use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A request to run a snippet of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub language: String,
    #[serde(default)]
    pub version: Option<String>,
    pub code: String,
    #[serde(default)]
    pub stdin: Option<String>,
}

/// A request to publish a snippet under a shareable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub language: String,
    pub code: String,
}

fn execution_request_schema() -> Value {
    json!({
        "type": "object",
        "required": ["language", "code"],
        "properties": {
            "language": { "type": "string" },
            "version": { "type": "string" },
            "code": { "type": "string" },
            "stdin": { "type": "string" }
        }
    })
}

fn share_request_schema() -> Value {
    json!({
        "type": "object",
        "required": ["language", "code"],
        "properties": {
            "language": { "type": "string" },
            "code": { "type": "string" }
        }
    })
}

/// Compiled schemas for every request kind the HTTP surface accepts.
#[derive(Debug)]
pub struct RequestValidator {
    execution_schema: JSONSchema,
    share_schema: JSONSchema,
}

impl RequestValidator {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            execution_schema: compile(&execution_request_schema())?,
            share_schema: compile(&share_request_schema())?,
        })
    }

    pub fn validate_execution_request(&self, raw: &Value) -> Result<ExecutionRequest, ValidationError> {
        check(&self.execution_schema, raw)?;
        serde_json::from_value(raw.clone()).map_err(|e| ValidationError::body(e.to_string()))
    }

    pub fn validate_share_request(&self, raw: &Value) -> Result<ShareRequest, ValidationError> {
        check(&self.share_schema, raw)?;
        serde_json::from_value(raw.clone()).map_err(|e| ValidationError::body(e.to_string()))
    }

    /// Parse a raw request body. Bodies that are not JSON fail like any other malformed input.
    pub fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
        serde_json::from_slice(body)
            .map_err(|e| ValidationError::body(format!("is not valid JSON: {}", e)))
    }
}

fn compile(schema: &Value) -> Result<JSONSchema, ConfigError> {
    JSONSchema::compile(schema)
        .map_err(|e| ConfigError::Invalid(format!("Invalid request schema: {}", e)))
}

fn check(schema: &JSONSchema, raw: &Value) -> Result<(), ValidationError> {
    let result = schema.validate(raw);
    let Err(mut errors) = result else {
        return Ok(());
    };

    let Some(error) = errors.next() else {
        return Ok(());
    };

    let validation_error = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let field = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            ValidationError::new(field, "is required")
        }
        _ => {
            let path = error.instance_path.to_string();
            let field = path.trim_start_matches('/');
            if field.is_empty() {
                ValidationError::body(error.to_string())
            } else {
                ValidationError::new(field, error.to_string())
            }
        }
    };

    log::debug!("Request rejected by schema: {}", validation_error);
    Err(validation_error)
}
