#![allow(dead_code)]

//! Shared harness for the chat client contract tests.

use hrsync_chat_client::{ChatApiConfig, ChatClient};
use wiremock::MockServer;

/// Run `f` against a `ChatClient` pointed at `server`, on a blocking thread.
pub async fn with_client<T, F>(server: &MockServer, f: F) -> T
where
    F: FnOnce(&ChatClient) -> T + Send + 'static,
    T: Send + 'static,
{
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let config = ChatApiConfig::local_mock(&uri).unwrap();
        let client = ChatClient::new(config).unwrap();
        f(&client)
    })
    .await
    .unwrap()
}

/// A chat account as the platform returns it.
pub fn account_json(id: &str, username: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": email,
        "first_name": "Test",
        "last_name": username,
        "is_bot": false,
        "delete_at": 0
    })
}
