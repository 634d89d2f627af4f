//! Initialize store use case

use crate::error::Result;
use crate::infrastructure::{Config, FileSystemStore};
use std::fs;
use std::path::Path;

/// Initialize a new content store at the specified path.
pub fn init(path: &Path, site_url: Option<String>) -> Result<Config> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let store = FileSystemStore::new(path.to_path_buf());
    store.initialize()?;

    let config = Config::new(site_url);
    store.save_config(&config)?;

    tracing::info!(path = %path.display(), "store initialized");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_store_in_new_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("site");

        let config = init(&target, Some("https://example.com".to_string())).unwrap();

        assert_eq!(config.site_url, "https://example.com");
        assert!(target.join(".blockmark/config.toml").exists());
        assert!(FileSystemStore::new(target).is_initialized());
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        init(temp.path(), None).unwrap();
        assert!(init(temp.path(), None).is_err());
    }
}
