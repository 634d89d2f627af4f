//! Config management use case

use crate::error::{BlockmarkError, Result};
use crate::infrastructure::config::parse_page_size;
use crate::infrastructure::{Config, FileSystemStore};

/// Service for managing store configuration
pub struct ConfigService {
    store: FileSystemStore,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(store: FileSystemStore) -> Self {
        ConfigService { store }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.store.load_config()?;

        match key {
            "page_size" => Ok(config.page_size.to_string()),
            "site_url" => Ok(config.site_url.clone()),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(BlockmarkError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: page_size, site_url, created",
                key
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.store.load_config()?;

        match key {
            "page_size" => {
                config.page_size = parse_page_size(value)?;
            }
            "site_url" => {
                config.site_url = value.trim_end_matches('/').to_string();
            }
            "created" => {
                return Err(BlockmarkError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(BlockmarkError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: page_size, site_url",
                    key
                )));
            }
        }

        self.store.save_config(&config)?;
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.store.load_config()
    }
}
