#![allow(dead_code)]

//! Shared harness: the blocking client must be built, used and dropped on a
//! blocking thread, never on the async test runtime.

use hrsync_erp_client::{ErpApiConfig, ErpClient};
use wiremock::MockServer;

/// Run `f` against an `ErpClient` pointed at `server`.
pub async fn with_client<T, F>(server: &MockServer, f: F) -> T
where
    F: FnOnce(&ErpClient) -> T + Send + 'static,
    T: Send + 'static,
{
    with_config(server, |_| {}, f).await
}

/// Like [`with_client`], with a hook to adjust the configuration first.
pub async fn with_config<T, C, F>(server: &MockServer, configure: C, f: F) -> T
where
    C: FnOnce(&mut ErpApiConfig) + Send + 'static,
    F: FnOnce(&ErpClient) -> T + Send + 'static,
    T: Send + 'static,
{
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let mut config = ErpApiConfig::local_mock(&uri).unwrap();
        configure(&mut config);
        let client = ErpClient::new(config).unwrap();
        f(&client)
    })
    .await
    .unwrap()
}

/// A minimal employee document as the HR API returns it.
pub fn employee_json(name: &str, email: &str, chat_id: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "company_email": email,
        "first_name": "Test",
        "last_name": name,
        "gender": "Female",
        "date_of_birth": "1991-02-03",
        "date_of_joining": "2020-01-06",
        "status": "Active",
        "custom_chat_id": chat_id
    })
}
