//! Error types shared by the REST clients and the tool catalog.

use serde::Deserialize;
use std::path::PathBuf;

/// Result type for core operations.
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Errors raised while talking to upstream services or reading local data.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload could not be decoded into text.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Local file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Tool definitions file is malformed.
    #[error("Tool catalog error: {0}")]
    Catalog(String),
}

impl AssistantError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an API error from a status code and response body.
    ///
    /// GitLab answers with `{"message": ...}`, Asana with
    /// `{"errors": [{"message": ...}]}`. Anything else is kept verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| message.to_string()),
            Ok(ErrorBody { errors, .. }) if !errors.is_empty() => errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
            _ => body.trim().to_string(),
        };

        Self::Api { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
