//! HR API client error types.

use hrsync_core::DirectoryError;

/// Errors from HR API calls.
#[derive(Debug, thiserror::Error)]
pub enum ErpApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The HR API returned a non-2xx status.
    #[error("HR API {endpoint} returned {status}: {body}")]
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
    /// The response decoded but carried an unusable value.
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ErpApiError {
    /// True when the remote refused a create because the document already
    /// exists: HTTP 409, or a Frappe `DuplicateEntryError` in the body.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::ApiError { status, body, .. } => {
                *status == 409 || body.contains("DuplicateEntryError")
            }
            _ => false,
        }
    }
}

impl From<ErpApiError> for DirectoryError {
    fn from(err: ErpApiError) -> Self {
        match err {
            ErpApiError::Http { endpoint, source } => DirectoryError::Transport {
                endpoint,
                reason: source.to_string(),
            },
            ErpApiError::ApiError {
                endpoint,
                status,
                body,
            } => DirectoryError::Remote {
                endpoint,
                status,
                body,
            },
            ErpApiError::Deserialization { endpoint, source } => DirectoryError::Decode {
                endpoint,
                reason: source.to_string(),
            },
            ErpApiError::InvalidResponse { endpoint, reason } => {
                DirectoryError::Decode { endpoint, reason }
            }
            ErpApiError::Config(e) => DirectoryError::Transport {
                endpoint: "client_init".into(),
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, body: &str) -> ErpApiError {
        ErpApiError::ApiError {
            endpoint: "POST /api/resource/Custom Field".into(),
            status,
            body: body.into(),
        }
    }

    #[test]
    fn duplicate_detection() {
        assert!(api(409, "").is_duplicate());
        assert!(api(417, r#"{"exc_type":"DuplicateEntryError"}"#).is_duplicate());
        assert!(!api(417, r#"{"exc_type":"ValidationError"}"#).is_duplicate());
    }

    #[test]
    fn api_error_maps_to_remote_with_body() {
        let err: DirectoryError = api(500, "boom").into();
        assert_eq!(
            err,
            DirectoryError::Remote {
                endpoint: "POST /api/resource/Custom Field".into(),
                status: 500,
                body: "boom".into(),
            }
        );
    }
}
