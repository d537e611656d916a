mod cli;
pub mod sections;
mod validation;

use crate::backend::{ConsoleBackend, ConsoleConfig, SearchIndexBackend};
use crate::error::MultilogError;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub use cli::Cli;
pub use sections::SearchIndexSection;

/// Environment variable holding an inline TOML configuration.
pub const CONFIG_ENV: &str = "MULTILOG_CONFIG";

/// Method names the configured backends are registered under.
pub const CONSOLE_METHOD: &str = "console";
pub const SEARCH_INDEX_METHOD: &str = "elasticsearch";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Backends to set up at start-up. Each section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultilogConfig {
    pub console: Option<ConsoleConfig>,
    pub search_index: Option<SearchIndexSection>,
}

impl MultilogConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MultilogConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the inline TOML in `MULTILOG_CONFIG`, if set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(content) => Self::from_toml_str(&content).map(Some),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::EnvError(format!("{CONFIG_ENV}: {e}"))),
        }
    }

    /// Register and initialize every configured backend.
    pub async fn build_registry(&self) -> Result<Registry, MultilogError> {
        let registry = Registry::new();

        if let Some(console) = &self.console {
            registry
                .register(CONSOLE_METHOD, ConsoleBackend::new(console.clone()))
                .await?;
        }

        if let Some(search_index) = &self.search_index {
            let backend_config = search_index.to_backend_config()?;
            registry
                .register(SEARCH_INDEX_METHOD, SearchIndexBackend::new(backend_config))
                .await?;
        }

        info!("Configured {} backend(s): {:?}", registry.len(), registry.methods());
        Ok(registry)
    }
}
