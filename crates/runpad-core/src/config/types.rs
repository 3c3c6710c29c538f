//! Configuration type definitions

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunpadConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_true")]
    pub enable_cors: bool,
    /// Allowed CORS origins; any origin when unset.
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    #[serde(default = "default_true")]
    pub enable_logging: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_cors: true,
            cors_origins: None,
            max_body_size: default_max_body_size(),
            enable_logging: true,
        }
    }
}

/// Where the remote execution engine lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_engine_url")]
    pub url: String,
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RunpadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_size must be greater than 0".to_string(),
            ));
        }

        let url = self.engine.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("engine.url cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "engine.url must be an http(s) URL, got '{}'",
                url
            )));
        }

        if self.engine.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "engine.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|e| {
            ConfigError::Invalid(format!("Invalid bind address '{}': {}", self.bind_addr, e))
        })
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_engine_url() -> String {
    "https://emkc.org/api/v2/piston".to_string()
}

fn default_engine_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_true() -> bool {
    true
}
