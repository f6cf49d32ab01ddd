//! Error types shared across pomobar crates

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid duration input: {0}")]
    InvalidDurationInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
