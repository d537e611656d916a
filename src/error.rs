use crate::config::ConfigError;
use crate::domain::RegistryError;
use thiserror::Error;

/// Top-level error type for building a logging setup from configuration.
///
/// Sits above both `config` and `domain`, so neither depends on the other.
#[derive(Error, Debug)]
pub enum MultilogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registration error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}
