//! HR API client configuration.
//!
//! Connection settings come from environment variables so credentials never
//! live in the run-policy file. Override via explicit construction for tests.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for connecting to the HR REST API.
///
/// Custom `Debug` implementation redacts the `api_secret` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ErpApiConfig {
    /// Base URL of the HR site, e.g. `https://erp.example.com`.
    pub base_url: Url,
    /// API key half of the `token <key>:<secret>` header.
    pub api_key: String,
    /// API secret half of the `token <key>:<secret>` header.
    pub api_secret: Zeroizing<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Records requested per list page.
    pub page_size: usize,
    /// Hard ceiling on list pages per enumeration.
    pub max_pages: usize,
}

impl std::fmt::Debug for ErpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErpApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default list page size.
pub const DEFAULT_PAGE_SIZE: usize = 200;
/// Default page ceiling (20 x 200 = 4000 employees).
pub const DEFAULT_MAX_PAGES: usize = 20;

impl ErpApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ERP_URL` (required)
    /// - `ERP_API_KEY` (required)
    /// - `ERP_API_SECRET` (required)
    /// - `ERP_TIMEOUT_SECS` (default: 30)
    /// - `ERP_PAGE_SIZE` (default: 200)
    /// - `ERP_MAX_PAGES` (default: 20)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("ERP_URL")?;
        let api_key = required("ERP_API_KEY")?;
        let api_secret = Zeroizing::new(required("ERP_API_SECRET")?);

        Ok(Self {
            base_url,
            api_key,
            api_secret,
            timeout_secs: env_number("ERP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            page_size: env_number("ERP_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            max_pages: env_number("ERP_MAX_PAGES", DEFAULT_MAX_PAGES),
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?,
            api_key: "test-key".into(),
            api_secret: Zeroizing::new("test-secret".into()),
            timeout_secs: 5,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// The `Authorization` header value.
    pub(crate) fn authorization(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("token {}:{}", self.api_key, self.api_secret.as_str()))
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn env_url(var: &'static str) -> Result<Url, ConfigError> {
    let raw = required(var)?;
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
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
    /// The credentials cannot be encoded as an HTTP header.
    #[error("API credentials contain characters not allowed in a header")]
    InvalidCredentials,
}
