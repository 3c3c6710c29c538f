//! Core of the runpad code playground backend.
//!
//! This crate holds everything behind the HTTP surface: the registry of
//! supported languages, schema validation of inbound requests, the runtime
//! version policy, the gateway to the remote execution engine, and the
//! in-memory store of shared snippets.
//!
//! # Architecture Overview
//!
//! - **Language registry**: pinned runtime versions and editor metadata per language
//! - **Request validation**: JSON schema checks before any outbound call
//! - **Version resolution**: placeholder versions mapped to known-good runtimes
//! - **Execution gateway**: Piston-compatible client with response normalization
//! - **Snippet store**: opaque identifiers for shared code, process-lifetime storage
//! - **Configuration**: YAML-backed settings for the server and the engine client

pub mod config;
pub mod errors;
pub mod executors;
pub mod languages;
pub mod snippets;
pub mod validation;
pub mod versions;

pub use config::{ConfigLoader, EngineConfig, RunpadConfig, ServerSettings};
pub use errors::{ConfigError, ExecutionError, ValidationError};
pub use executors::{
    CodeExecutor, ExecutionGateway, ExecutionResult, PistonExecutor, ResolvedExecution,
};
pub use languages::{LanguageDescriptor, LanguageId};
pub use snippets::{InMemorySnippetStore, SharedSnippet, SnippetStore};
pub use validation::{ExecutionRequest, RequestValidator, ShareRequest};
pub use versions::resolve_version;

#[cfg(test)]
pub mod test_utils;
