use il2_keys::{DecodeError, KeyError};
use thiserror::Error;

use crate::models::ErrorDetails;

/// Errors returned by [`crate::IL2Client`] and its APIs
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a 4xx/5xx status
    #[error("Node returned an error: {0}")]
    Remote(ErrorDetails),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] DecodeError),

    #[error("Key error: {0}")]
    Keys(#[from] KeyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status reported by the node, for [`ClientError::Remote`]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote(details) => details.status,
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
