//! Errors raised while talking to the content service

use thiserror::Error;

/// Content service error
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("No master ref advertised by {endpoint}")]
    MissingMasterRef { endpoint: String },
}

impl CmsError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

/// Result alias for content service operations
pub type CmsResult<T> = Result<T, CmsError>;
