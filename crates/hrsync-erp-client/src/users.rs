//! The HR system's own login users (the `User` doctype), distinct from
//! employee records.

use hrsync_core::{LoginUser, LoginUserDraft};
use serde_json::json;
use url::Url;

use crate::error::ErpApiError;
use crate::transport::{decode, fields_param, resource_url, send, DataEnvelope, NamedDoc};

const USER_DOCTYPE: &str = "User";

const USER_FIELDS: [&str; 7] = [
    "name",
    "email",
    "first_name",
    "last_name",
    "username",
    "enabled",
    "role_profile_name",
];

/// Client for HR login users.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

impl UserClient {
    pub(crate) fn new(http: reqwest::blocking::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Find a login user by e-mail.
    ///
    /// Calls `GET {base_url}/api/resource/User`.
    pub fn find_by_email(&self, email: &str) -> Result<Option<LoginUser>, ErpApiError> {
        let endpoint = "GET /api/resource/User";
        let url = resource_url(&self.base_url, &[USER_DOCTYPE])?;
        let query = [
            ("filters", json!([["email", "=", email.trim()]]).to_string()),
            ("fields", fields_param(&USER_FIELDS)),
        ];

        let resp = send(endpoint, self.http.get(url).query(&query))?;
        let envelope: DataEnvelope<Vec<LoginUser>> = decode(endpoint, resp)?;
        Ok(envelope.data.into_iter().next())
    }

    /// Create a login user.
    ///
    /// Calls `POST {base_url}/api/resource/User`.
    pub fn create(&self, draft: &LoginUserDraft) -> Result<LoginUser, ErpApiError> {
        let endpoint = "POST /api/resource/User";
        let url = resource_url(&self.base_url, &[USER_DOCTYPE])?;
        let body = json!({
            "doctype": USER_DOCTYPE,
            "email": draft.email,
            "first_name": draft.first_name,
            "last_name": draft.last_name,
            "username": draft.username,
            "enabled": u8::from(draft.enabled),
            "role_profile_name": draft.role_profile_name,
            "send_welcome_email": u8::from(draft.send_welcome_email),
        });

        let resp = send(endpoint, self.http.post(url).json(&body))?;
        let envelope: DataEnvelope<NamedDoc> = decode(endpoint, resp)?;
        if envelope.data.name.trim().is_empty() {
            return Err(ErpApiError::InvalidResponse {
                endpoint: endpoint.into(),
                reason: "created user has no name".into(),
            });
        }

        Ok(LoginUser {
            id: envelope.data.name,
            email: Some(draft.email.clone()),
            username: Some(draft.username.clone()),
            enabled: draft.enabled,
            role_profile_name: Some(draft.role_profile_name.clone()),
        })
    }
}
