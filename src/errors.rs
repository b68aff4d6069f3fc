//! Error types for rikuesuto

use thiserror::Error;

use crate::mime::ContentTypeKind;

/// Main error type for rikuesuto
#[derive(Error, Debug)]
pub enum RikuesutoError {
    #[error("Request cannot carry more than one payload (found {first} and {second})")]
    ConflictingPayloads {
        first: ContentTypeKind,
        second: ContentTypeKind,
    },

    #[error("Invalid multipart boundary {0:?}")]
    InvalidBoundary(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Form encoding error: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Coarse classification of a [`RikuesutoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request description itself is invalid
    Configuration,
    /// A payload could not be serialized, or a part stream failed while being copied
    Encoding,
    /// The HTTP client failed to send the request or read the response
    Transport,
}

impl RikuesutoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RikuesutoError::ConflictingPayloads { .. }
            | RikuesutoError::InvalidBoundary(_)
            | RikuesutoError::InvalidMethod(_)
            | RikuesutoError::InvalidHeader { .. }
            | RikuesutoError::UrlParse(_)
            | RikuesutoError::Config(_) => ErrorKind::Configuration,
            RikuesutoError::Json(_)
            | RikuesutoError::Form(_)
            | RikuesutoError::Io(_)
            | RikuesutoError::Encoding(_) => ErrorKind::Encoding,
            RikuesutoError::Request(_) => ErrorKind::Transport,
        }
    }
}

pub type Result<T> = std::result::Result<T, RikuesutoError>;
