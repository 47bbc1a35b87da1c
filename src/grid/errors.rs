//! Grid-specific error types

use thiserror::Error;

/// Errors that can occur in grid trading operations
#[derive(Error, Debug, Clone)]
pub enum GridError {
    #[error("Invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("Exchange error: {0}")]
    Exchange(String),

    #[error("Order submission failed: {0}")]
    Submission(String),

    #[error("Order cancellation failed: {0}")]
    Cancellation(String),

    #[error("Unknown strategy type: {0}")]
    UnknownStrategy(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Price tape error: {0}")]
    PriceTape(String),

    #[error("Channel send error: {0}")]
    ChannelSend(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::JsonParse(err.to_string())
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for GridError {
    fn from(err: config::ConfigError) -> Self {
        GridError::Settings(err.to_string())
    }
}

/// Result type for grid operations
pub type GridResult<T> = std::result::Result<T, GridError>;
