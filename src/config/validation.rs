use super::{ConfigError, MultilogConfig, SearchIndexSection};
use url::Url;

impl MultilogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(search_index) = &self.search_index {
            search_index.validate()?;
        }
        Ok(())
    }
}

impl SearchIndexSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.addresses.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Search index requires at least one address".to_string(),
            ));
        }

        for address in &self.addresses {
            Url::parse(address).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid search index address '{address}': {e}"))
            })?;
        }

        if self.index.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Search index name cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Search index timeout must be greater than 0".to_string(),
            ));
        }

        if (self.password.is_some() || self.password_file.is_some()) && self.username.is_none() {
            return Err(ConfigError::InvalidConfig(
                "Search index password given without a username".to_string(),
            ));
        }

        Ok(())
    }
}
