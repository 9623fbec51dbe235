//! Chat API client error types.

use hrsync_core::DirectoryError;
use serde::Deserialize;

/// Errors from chat API calls.
#[derive(Debug, thiserror::Error)]
pub enum ChatApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The chat API returned a non-2xx status.
    #[error("chat API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

/// The platform's error document: `{"id": "...", "message": "...", "status_code": 400}`.
#[derive(Debug, Deserialize)]
struct AppError {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
}

impl ChatApiError {
    fn app_error(&self) -> Option<AppError> {
        match self {
            Self::ApiError { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// True when account creation was refused because the username exists.
    pub fn is_username_taken(&self) -> bool {
        matches!(self, Self::ApiError { status: 400, .. })
            && self
                .app_error()
                .is_some_and(|e| e.id.contains("username_exists"))
    }

    /// The platform's human-readable message, falling back to the raw body.
    pub fn message(&self) -> String {
        match (self.app_error(), self) {
            (Some(app), _) if !app.message.is_empty() => app.message,
            (_, Self::ApiError { body, .. }) => body.clone(),
            (_, other) => other.to_string(),
        }
    }
}

impl From<ChatApiError> for DirectoryError {
    fn from(err: ChatApiError) -> Self {
        match err {
            ChatApiError::Http { endpoint, source } => DirectoryError::Transport {
                endpoint,
                reason: source.to_string(),
            },
            ChatApiError::ApiError {
                endpoint,
                status,
                body,
            } => DirectoryError::Remote {
                endpoint,
                status,
                body,
            },
            ChatApiError::Deserialization { endpoint, source } => DirectoryError::Decode {
                endpoint,
                reason: source.to_string(),
            },
            ChatApiError::Config(e) => DirectoryError::Transport {
                endpoint: "client_init".into(),
                reason: e.to_string(),
            },
        }
    }
}
