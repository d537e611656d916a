use super::ConfigError;
use crate::backend::{ConnectionConfig, SearchIndexConfig};
use crate::domain::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// `[search_index]` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchIndexSection {
    pub addresses: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// File holding the password (Docker Secrets); wins over `password`
    pub password_file: Option<PathBuf>,
    pub index: String,
    pub mapping: Option<String>,
    pub insecure_skip_verify: bool,
    pub timeout_secs: u64,
    pub min_level: LogLevel,
    pub drop_patterns: Vec<String>,
}

impl Default for SearchIndexSection {
    fn default() -> Self {
        Self {
            addresses: vec!["http://localhost:9200".to_string()],
            username: None,
            password: None,
            password_file: None,
            index: String::new(),
            mapping: None,
            insecure_skip_verify: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_level: LogLevel::Trace,
            drop_patterns: Vec::new(),
        }
    }
}

impl SearchIndexSection {
    fn resolve_password(&self) -> Result<Option<String>, ConfigError> {
        match &self.password_file {
            Some(path) => std::fs::read_to_string(path)
                .map(|content| Some(content.trim().to_string()))
                .map_err(|e| {
                    ConfigError::EnvError(format!(
                        "Failed to read password file {}: {e}",
                        path.display()
                    ))
                }),
            None => Ok(self.password.clone()),
        }
    }

    pub fn to_backend_config(&self) -> Result<SearchIndexConfig, ConfigError> {
        Ok(SearchIndexConfig {
            min_level: self.min_level,
            connection: ConnectionConfig {
                addresses: self.addresses.clone(),
                username: self.username.clone(),
                password: self.resolve_password()?,
                insecure_skip_verify: self.insecure_skip_verify,
                timeout: Duration::from_secs(self.timeout_secs),
            },
            index: self.index.clone(),
            mapping: self.mapping.clone(),
            drop_patterns: self.drop_patterns.iter().cloned().map(Some).collect(),
        })
    }
}
