//! Typed client for chat platform accounts.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/v4/users?page&per_page&active=true` | List active accounts |
//! | GET    | `/api/v4/users/{id}` | Get by id |
//! | GET    | `/api/v4/users/email/{email}` | Exact e-mail lookup |
//! | GET    | `/api/v4/users/username/{username}` | Exact username lookup |
//! | POST   | `/api/v4/users/search` | Fuzzy search |
//! | POST   | `/api/v4/users` | Create |

use hrsync_core::{ChatAccount, ChatAccountDraft, ChatAccountId, PageRequest};
use serde::Serialize;
use url::Url;

use crate::error::ChatApiError;
use crate::transport::{decode, send, send_optional, v4_url};

/// Body of `POST /api/v4/users/search`.
#[derive(Debug, Serialize)]
struct UserSearch<'a> {
    term: &'a str,
    allow_inactive: bool,
    limit: usize,
}

/// Body of `POST /api/v4/users`.
#[derive(Serialize)]
struct CreateUser<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    email_verified: bool,
}

/// Client for chat accounts.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

impl UserClient {
    pub(crate) fn new(http: reqwest::blocking::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// One page of active accounts.
    pub fn list_active(&self, page: PageRequest) -> Result<Vec<ChatAccount>, ChatApiError> {
        let endpoint = "GET /api/v4/users";
        let url = v4_url(&self.base_url, &["users"])?;
        let query = [
            ("page", page.index.to_string()),
            ("per_page", page.size.to_string()),
            ("active", "true".to_string()),
        ];
        let resp = send(endpoint, self.http.get(url).query(&query))?;
        decode(endpoint, resp)
    }

    /// Get an account by id. `None` on 404.
    pub fn get(&self, id: &ChatAccountId) -> Result<Option<ChatAccount>, ChatApiError> {
        let endpoint = format!("GET /api/v4/users/{id}");
        let url = v4_url(&self.base_url, &["users", id.as_str()])?;
        send_optional(&endpoint, self.http.get(url))
    }

    /// Exact lookup by e-mail. `None` on 404.
    pub fn get_by_email(&self, email: &str) -> Result<Option<ChatAccount>, ChatApiError> {
        let endpoint = "GET /api/v4/users/email/{email}";
        let url = v4_url(&self.base_url, &["users", "email", email.trim()])?;
        send_optional(endpoint, self.http.get(url))
    }

    /// Exact lookup by username. `None` on 404.
    pub fn get_by_username(&self, username: &str) -> Result<Option<ChatAccount>, ChatApiError> {
        let endpoint = "GET /api/v4/users/username/{username}";
        let url = v4_url(&self.base_url, &["users", "username", username])?;
        send_optional(endpoint, self.http.get(url))
    }

    /// Fuzzy search, active accounts only.
    pub fn search(&self, term: &str, limit: usize) -> Result<Vec<ChatAccount>, ChatApiError> {
        let endpoint = "POST /api/v4/users/search";
        let url = v4_url(&self.base_url, &["users", "search"])?;
        let body = UserSearch {
            term: term.trim(),
            allow_inactive: false,
            limit,
        };
        let resp = send(endpoint, self.http.post(url).json(&body))?;
        decode(endpoint, resp)
    }

    /// Create an account.
    pub fn create(&self, draft: &ChatAccountDraft) -> Result<ChatAccount, ChatApiError> {
        let endpoint = "POST /api/v4/users";
        let url = v4_url(&self.base_url, &["users"])?;
        let body = CreateUser {
            email: &draft.email,
            username: &draft.username,
            password: draft.password.as_str(),
            first_name: &draft.first_name,
            last_name: &draft.last_name,
            email_verified: draft.email_verified,
        };
        let resp = send(endpoint, self.http.post(url).json(&body))?;
        let account: ChatAccount = decode(endpoint, resp)?;
        tracing::info!(account = %account.id, username = %account.username, "created chat account");
        Ok(account)
    }
}
