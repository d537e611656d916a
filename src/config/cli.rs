use super::{ConfigError, MultilogConfig};
use crate::backend::{ConsoleConfig, OutputFormat};
use crate::domain::{LogLevel, Payload};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Send one log event to every configured backend", long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML); overrides MULTILOG_CONFIG
    #[arg(long, env = "MULTILOG_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Console output format, used when no configuration is given
    #[arg(long, env = "MULTILOG_FORMAT", default_value = "text")]
    pub format: OutputFormat,

    /// Console minimum level, used when no configuration is given
    #[arg(long, env = "MULTILOG_MIN_LEVEL", default_value = "trace")]
    pub min_level: LogLevel,

    /// Console drop pattern (repeatable), used when no configuration is given
    #[arg(long = "drop-pattern")]
    pub drop_patterns: Vec<String>,

    /// Level of multilog's own diagnostics on stderr
    #[arg(long, env = "MULTILOG_DIAGNOSTICS", default_value = "warn")]
    pub diagnostics: LogLevel,

    /// Event level (trace, debug, info, warn, error, fatal)
    pub level: LogLevel,

    /// Event group
    pub group: String,

    /// Event message
    pub message: String,

    /// Event payload as JSON
    #[arg(long)]
    pub data: Option<String>,
}

impl Cli {
    /// Pick the configuration: file, then `MULTILOG_CONFIG`, then the console flags.
    pub fn resolve_config(&self) -> Result<MultilogConfig, ConfigError> {
        if let Some(path) = &self.config_file {
            return MultilogConfig::from_file(path);
        }
        if let Some(config) = MultilogConfig::from_env()? {
            return Ok(config);
        }
        Ok(MultilogConfig {
            console: Some(self.console_config()),
            search_index: None,
        })
    }

    pub fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            min_level: self.min_level,
            format: self.format,
            drop_patterns: self.drop_patterns.iter().cloned().map(Some).collect(),
        }
    }

    pub fn payload(&self) -> Result<Payload, serde_json::Error> {
        match &self.data {
            Some(raw) => serde_json::from_str(raw),
            None => Ok(Payload::Null),
        }
    }
}
