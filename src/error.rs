//! Error types for blockmark

use crate::domain::ContentId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for blockmark
#[derive(Debug, Error)]
pub enum BlockmarkError {
    #[error("Not a blockmark directory: {0}")]
    NotBlockmarkDirectory(PathBuf),

    #[error("Invalid --{flag} format: '{value}'. Please use YYYY-MM-DD.")]
    InvalidDate { flag: String, value: String },

    #[error("Content not found: {0}")]
    ContentNotFound(ContentId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl BlockmarkError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BlockmarkError::NotBlockmarkDirectory(_) => 2,
            BlockmarkError::InvalidDate { .. } => 3,
            BlockmarkError::ContentNotFound(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            BlockmarkError::NotBlockmarkDirectory(path) => {
                format!(
                    "Not a blockmark directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'blockmark init' in this directory to create a content store\n\
                    • Navigate to an existing blockmark directory\n\
                    • Set BLOCKMARK_ROOT environment variable to your store path",
                    path.display()
                )
            }
            BlockmarkError::ContentNotFound(id) => {
                format!(
                    "No content item with id {}\n\n\
                    Suggestions:\n\
                    • Check the id against the files in .blockmark/items\n\
                    • Create it with 'blockmark save {} --title ...'",
                    id, id
                )
            }
            BlockmarkError::Config(msg) if msg.contains("page_size") => {
                format!(
                    "{}\n\n\
                    page_size must be a positive integer\n\
                    Example: blockmark config page_size 500",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using BlockmarkError
pub type Result<T> = std::result::Result<T, BlockmarkError>;
