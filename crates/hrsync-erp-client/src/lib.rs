//! # hrsync-erp-client -- Typed client for the HR REST API
//!
//! Blocking, typed access to an ERPNext-style HR system:
//! - **Employees** via `/api/resource/Employee` (list, lookup, create,
//!   partial update, count)
//! - **Metadata** via `/api/resource/Custom Field` and `/api/resource/Role Profile`
//!   (idempotent schema bootstrap)
//! - **Login users** via `/api/resource/User`
//!
//! [`ErpClient`] implements [`hrsync_core::EmployeeDirectory`], which is how
//! the reconciliation engine sees it.
//!
//! ## Wire Conventions
//!
//! Every request carries `Authorization: token <key>:<secret>`. List endpoints
//! take `limit_start` / `limit_page_length` offsets, a JSON array of field names
//! in `fields`, and a JSON array of `[field, op, value]` triples in `filters`.
//! Non-2xx answers surface as [`ErpApiError::ApiError`] with the body verbatim.
//! Nothing is retried at this layer.

pub mod config;
mod directory;
pub mod employees;
pub mod error;
pub mod metadata;
mod transport;
pub mod users;

pub use config::ErpApiConfig;
pub use error::ErpApiError;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

/// Top-level HR API client. Holds sub-clients for each resource family.
#[derive(Debug, Clone)]
pub struct ErpClient {
    employees: employees::EmployeeClient,
    metadata: metadata::MetadataClient,
    users: users::UserClient,
}

impl ErpClient {
    /// Create a new HR API client from configuration.
    pub fn new(config: ErpApiConfig) -> Result<Self, ErpApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = HeaderMap::new();
                let mut auth = HeaderValue::from_str(config.authorization().as_str())
                    .map_err(|_| ErpApiError::Config(config::ConfigError::InvalidCredentials))?;
                auth.set_sensitive(true);
                headers.insert(AUTHORIZATION, auth);
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers
            })
            .build()
            .map_err(|e| ErpApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            employees: employees::EmployeeClient::new(
                http.clone(),
                config.base_url.clone(),
                config.page_size,
                config.max_pages,
            ),
            metadata: metadata::MetadataClient::new(http.clone(), config.base_url.clone()),
            users: users::UserClient::new(http, config.base_url),
        })
    }

    /// Access the employee client.
    pub fn employees(&self) -> &employees::EmployeeClient {
        &self.employees
    }

    /// Access the metadata (custom field, role profile) client.
    pub fn metadata(&self) -> &metadata::MetadataClient {
        &self.metadata
    }

    /// Access the login-user client.
    pub fn users(&self) -> &users::UserClient {
        &self.users
    }
}
