//! Configuration management

use crate::error::{BlockmarkError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the store directory holding config, items and terms
pub const STORE_DIR: &str = ".blockmark";

/// Items requested per page when scanning
pub const DEFAULT_PAGE_SIZE: usize = 1000;

const DEFAULT_SITE_URL: &str = "http://localhost";

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_site_url")]
    pub site_url: String,
    pub created: DateTime<Utc>,
}

impl Config {
    /// Create a new config with default values
    pub fn new(site_url: Option<String>) -> Self {
        Config {
            page_size: DEFAULT_PAGE_SIZE,
            site_url: site_url.unwrap_or_else(default_site_url),
            created: Utc::now(),
        }
    }

    /// Load config from .blockmark/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(STORE_DIR).join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlockmarkError::NotBlockmarkDirectory(path.to_path_buf())
            } else {
                BlockmarkError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| BlockmarkError::Config(format!("Failed to parse config.toml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .blockmark/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let store_dir = path.join(STORE_DIR);
        let config_path = store_dir.join("config.toml");

        if !store_dir.exists() {
            fs::create_dir(&store_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| BlockmarkError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the scan page size, checking BLOCKMARK_PAGE_SIZE first
    pub fn get_page_size(&self) -> Result<usize> {
        match std::env::var("BLOCKMARK_PAGE_SIZE") {
            Ok(raw) => parse_page_size(&raw),
            Err(_) => Ok(self.page_size),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(BlockmarkError::Config(
                "Invalid page_size: 0 in config.toml".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a positive page size
pub fn parse_page_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(BlockmarkError::Config(format!(
            "Invalid page_size: '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new(None);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.site_url, "http://localhost");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::new(Some("https://example.com".to_string()));
        config.page_size = 250;

        config.save_to_dir(temp.path()).unwrap();
        assert!(temp.path().join(".blockmark/config.toml").exists());

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.page_size, 250);
        assert_eq!(loaded.site_url, "https://example.com");
        assert_eq!(loaded.created, config.created);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();

        match Config::load_from_dir(temp.path()).unwrap_err() {
            BlockmarkError::NotBlockmarkDirectory(_) => {}
            other => panic!("Expected NotBlockmarkDirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_fills_missing_fields_with_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(STORE_DIR)).unwrap();
        fs::write(
            temp.path().join(".blockmark/config.toml"),
            "created = \"2025-01-17T10:00:00Z\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(loaded.site_url, DEFAULT_SITE_URL);
    }

    #[test]
    fn test_load_rejects_zero_page_size() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(STORE_DIR)).unwrap();
        fs::write(
            temp.path().join(".blockmark/config.toml"),
            "page_size = 0\ncreated = \"2025-01-17T10:00:00Z\"\n",
        )
        .unwrap();

        assert!(matches!(
            Config::load_from_dir(temp.path()),
            Err(BlockmarkError::Config(_))
        ));
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("500").unwrap(), 500);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("many").is_err());
    }
}
