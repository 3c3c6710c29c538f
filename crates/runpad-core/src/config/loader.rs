//! Configuration loader for YAML files

use crate::config::types::RunpadConfig;
use crate::errors::ConfigError;
use std::path::Path;
use tokio::fs;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<RunpadConfig, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        log::debug!("Read {} bytes of configuration from {}", content.len(), path.display());
        Self::from_str(&content)
    }

    /// Parse and validate configuration from YAML text. Empty text yields the defaults.
    pub fn from_str(content: &str) -> Result<RunpadConfig, ConfigError> {
        let config: RunpadConfig = if content.trim().is_empty() {
            RunpadConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the defaults.
    pub async fn load(path: Option<&Path>) -> Result<RunpadConfig, ConfigError> {
        match path {
            Some(path) => Self::from_file(path).await,
            None => {
                let config = RunpadConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }
}
