//! Error types for vegscan

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Field format error on line {line}: {message}")]
    FieldFormat { line: usize, message: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn field_format(line: usize, message: impl Into<String>) -> Self {
        Self::FieldFormat { line, message: message.into() }
    }
}
