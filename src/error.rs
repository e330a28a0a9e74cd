//! Error types shared by the three tools

use std::path::PathBuf;

/// Result type for chore-kit library operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error types for chore-kit operations
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] fancy_regex::Error),

    /// The fetched page does not have the expected structure
    #[error("Malformed page payload: {0}")]
    Payload(String),

    #[error("Encoder failed: {0}")]
    Encoder(String),

    #[error("Target already exists: {}", .0.display())]
    Conflict(PathBuf),

    #[error("Rule '{rule}' still changes names after {passes} passes")]
    NotConverging { rule: String, passes: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ToolError {
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload(message.into())
    }
}
