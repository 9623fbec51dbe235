//! Credential delivery as a direct message from the acting bot account.

use hrsync_core::{ChatAccount, ChatAccountId, TemporaryCredentials};
use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::error::ChatApiError;
use crate::transport::{decode, send, v4_url};

#[derive(Debug, Deserialize)]
struct Channel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Me {
    id: ChatAccountId,
}

#[derive(Serialize)]
struct NewPost<'a> {
    channel_id: &'a str,
    message: &'a str,
}

/// Client for direct messages.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    site_url: Url,
}

impl MessagingClient {
    pub(crate) fn new(http: reqwest::blocking::Client, base_url: Url, site_url: Url) -> Self {
        Self {
            http,
            base_url,
            site_url,
        }
    }

    /// Id of the account the token belongs to.
    ///
    /// Calls `GET /api/v4/users/me`.
    pub fn me(&self) -> Result<ChatAccountId, ChatApiError> {
        let endpoint = "GET /api/v4/users/me";
        let url = v4_url(&self.base_url, &["users", "me"])?;
        let resp = send(endpoint, self.http.get(url))?;
        let me: Me = decode(endpoint, resp)?;
        Ok(me.id)
    }

    /// Open (or reuse) the direct channel between two accounts.
    ///
    /// Calls `POST /api/v4/channels/direct`.
    pub fn direct_channel(&self, a: &ChatAccountId, b: &ChatAccountId) -> Result<String, ChatApiError> {
        let endpoint = "POST /api/v4/channels/direct";
        let url = v4_url(&self.base_url, &["channels", "direct"])?;
        let resp = send(endpoint, self.http.post(url).json(&[a.as_str(), b.as_str()]))?;
        let channel: Channel = decode(endpoint, resp)?;
        Ok(channel.id)
    }

    /// Post `message` to a channel.
    ///
    /// Calls `POST /api/v4/posts`.
    pub fn post(&self, channel_id: &str, message: &str) -> Result<(), ChatApiError> {
        let endpoint = "POST /api/v4/posts";
        let url = v4_url(&self.base_url, &["posts"])?;
        send(endpoint, self.http.post(url).json(&NewPost { channel_id, message }))?;
        Ok(())
    }

    /// Send `credentials` to `account` as a direct message.
    pub fn send_credentials(
        &self,
        account: &ChatAccount,
        credentials: &TemporaryCredentials,
    ) -> Result<(), ChatApiError> {
        let me = self.me()?;
        let channel = self.direct_channel(&me, &account.id)?;
        let message = credential_message(&self.site_url, credentials);
        self.post(&channel, &message)?;
        tracing::info!(account = %account.id, "credentials delivered");
        Ok(())
    }
}

/// The text of a credential hand-off message.
pub fn credential_message(site: &Url, credentials: &TemporaryCredentials) -> Zeroizing<String> {
    Zeroizing::new(format!(
        "An account has been created for you. Here are your login details:\n\n\
         Site: {site}\n\
         Username: {}\n\
         Password: {}\n\n\
         Please log in and change your password at your earliest convenience.\n\n\
         This is an automated message.",
        credentials.username,
        credentials.password.as_str(),
    ))
}
