//! Chat API client configuration.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for connecting to the chat platform's REST API.
///
/// Custom `Debug` implementation redacts the `access_token` field.
#[derive(Clone)]
pub struct ChatApiConfig {
    /// Base URL of the chat server, e.g. `https://chat.example.com`.
    pub base_url: Url,
    /// Personal access or bot token, sent as `Authorization: Bearer`.
    pub access_token: Zeroizing<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Result limit for the fuzzy search fallback.
    pub search_limit: usize,
    /// Public site URL quoted in credential messages. Defaults to `base_url`.
    pub site_url: Option<Url>,
}

impl std::fmt::Debug for ChatApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatApiConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("search_limit", &self.search_limit)
            .field("site_url", &self.site_url)
            .finish()
    }
}

impl ChatApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CHAT_URL` (required)
    /// - `CHAT_TOKEN` (required)
    /// - `CHAT_TIMEOUT_SECS` (default: 30)
    /// - `CHAT_SEARCH_LIMIT` (default: 10)
    /// - `CHAT_SITE_URL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url("CHAT_URL", &required("CHAT_URL")?)?;
        let access_token = Zeroizing::new(required("CHAT_TOKEN")?);
        let site_url = match std::env::var("CHAT_SITE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_url("CHAT_SITE_URL", &raw)?),
            _ => None,
        };

        Ok(Self {
            base_url,
            access_token,
            timeout_secs: std::env::var("CHAT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(30),
            search_limit: std::env::var("CHAT_SEARCH_LIMIT")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(10),
            site_url,
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            access_token: Zeroizing::new("test-token".into()),
            timeout_secs: 5,
            search_limit: 10,
            site_url: None,
        })
    }

    /// The URL quoted to users in credential messages.
    pub fn public_url(&self) -> &Url {
        self.site_url.as_ref().unwrap_or(&self.base_url)
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn parse_url(what: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(what.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent or blank.
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    /// A URL could not be parsed.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The token cannot be encoded as an HTTP header.
    #[error("access token contains characters not allowed in a header")]
    InvalidToken,
}
