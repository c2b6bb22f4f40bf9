//! Error types shared by every stage of poster generation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Invalid {dimension} '{token}' (valid: {valid})")]
    InvalidSelection {
        dimension: &'static str,
        token: String,
        valid: String,
    },

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Image error at {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PosterError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::InvalidSelection { .. })
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;
