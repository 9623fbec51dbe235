//! # hrsync-chat-client -- Typed client for the chat platform REST API
//!
//! Blocking, typed access to a Mattermost-style REST v4 API:
//! - **Users** via `/api/v4/users` (paged listing, lookups, fuzzy search, create)
//! - **Messaging** via `/api/v4/channels/direct` and `/api/v4/posts`
//!   (credential hand-off to newly created accounts)
//!
//! [`ChatClient`] implements [`hrsync_core::ChatDirectory`] and
//! [`hrsync_core::CredentialDelivery`].
//!
//! A username collision on create (HTTP 400 with an error id naming
//! `username_exists`) surfaces as [`hrsync_core::DirectoryError::UsernameTaken`];
//! every other non-2xx answer keeps its status and body.

pub mod config;
mod directory;
pub mod error;
pub mod messaging;
mod transport;
pub mod users;

pub use config::ChatApiConfig;
pub use error::ChatApiError;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

/// Top-level chat API client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    users: users::UserClient,
    messaging: messaging::MessagingClient,
    search_limit: usize,
}

impl ChatClient {
    /// Create a new chat API client from configuration.
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = HeaderMap::new();
                let mut auth =
                    HeaderValue::from_str(&format!("Bearer {}", config.access_token.as_str()))
                        .map_err(|_| ChatApiError::Config(config::ConfigError::InvalidToken))?;
                auth.set_sensitive(true);
                headers.insert(AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| ChatApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            users: users::UserClient::new(http.clone(), config.base_url.clone()),
            messaging: messaging::MessagingClient::new(
                http,
                config.base_url.clone(),
                config.public_url().clone(),
            ),
            search_limit: config.search_limit,
        })
    }

    /// Access the users client.
    pub fn users(&self) -> &users::UserClient {
        &self.users
    }

    /// Access the messaging client.
    pub fn messaging(&self) -> &messaging::MessagingClient {
        &self.messaging
    }

    /// Configured result limit for fuzzy search.
    pub fn search_limit(&self) -> usize {
        self.search_limit
    }
}
