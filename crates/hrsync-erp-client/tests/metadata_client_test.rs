//! Contract tests for the schema bootstrap and login-user clients.

mod common;

use common::with_client;
use hrsync_core::{CustomFieldSpec, LoginUserDraft};
use hrsync_erp_client::metadata::Ensured;
use hrsync_erp_client::ErpApiError;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOM_FIELD_PATH: &str = "/api/resource/Custom%20Field";
const ROLE_PROFILE_PATH: &str = "/api/resource/Role%20Profile";

async fn mount_lookup(server: &MockServer, resource: &str, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(resource))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
        .mount(server)
        .await;
}

// ── Custom Field ─────────────────────────────────────────────────────

#[tokio::test]
async fn existing_custom_field_is_not_recreated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CUSTOM_FIELD_PATH))
        .and(query_param(
            "filters",
            r#"[["fieldname","=","custom_chat_id"],["dt","=","Employee"]]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"name": "Employee-custom_chat_id"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CUSTOM_FIELD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ensured = with_client(&server, |c| {
        c.metadata()
            .ensure_custom_field(&CustomFieldSpec::cross_reference("Chat User ID"))
    })
    .await
    .unwrap();
    assert_eq!(ensured, Ensured::Existing);
}

#[tokio::test]
async fn missing_custom_field_is_created_after_employee_name() {
    let server = MockServer::start().await;
    mount_lookup(&server, CUSTOM_FIELD_PATH, serde_json::json!([])).await;

    Mock::given(method("POST"))
        .and(path(CUSTOM_FIELD_PATH))
        .and(body_partial_json(serde_json::json!({
            "doctype": "Custom Field",
            "dt": "Employee",
            "fieldname": "custom_chat_id",
            "label": "Chat User ID",
            "fieldtype": "Data",
            "insert_after": "employee_name",
            "reqd": 0,
            "in_standard_filter": 1,
            "in_global_search": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"name": "Employee-custom_chat_id"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ensured = with_client(&server, |c| {
        c.metadata()
            .ensure_custom_field(&CustomFieldSpec::cross_reference("Chat User ID"))
    })
    .await
    .unwrap();
    assert_eq!(ensured, Ensured::Created);
}

#[tokio::test]
async fn duplicate_entry_on_create_counts_as_present() {
    let server = MockServer::start().await;
    mount_lookup(&server, CUSTOM_FIELD_PATH, serde_json::json!([])).await;

    Mock::given(method("POST"))
        .and(path(CUSTOM_FIELD_PATH))
        .respond_with(
            ResponseTemplate::new(417)
                .set_body_string(r#"{"exc_type":"DuplicateEntryError","exception":"exists"}"#),
        )
        .mount(&server)
        .await;

    let ensured = with_client(&server, |c| {
        c.metadata()
            .ensure_custom_field(&CustomFieldSpec::cross_reference("Chat User ID"))
    })
    .await
    .unwrap();
    assert_eq!(ensured, Ensured::Existing);
}

#[tokio::test]
async fn custom_field_create_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_lookup(&server, CUSTOM_FIELD_PATH, serde_json::json!([])).await;

    Mock::given(method("POST"))
        .and(path(CUSTOM_FIELD_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("not permitted"))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| {
        c.metadata()
            .ensure_custom_field(&CustomFieldSpec::cross_reference("Chat User ID"))
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ErpApiError::ApiError { status: 403, .. }));
}

// ── Role Profile ─────────────────────────────────────────────────────

#[tokio::test]
async fn missing_role_profile_is_created_with_requested_roles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROLE_PROFILE_PATH))
        .and(query_param("filters", r#"[["role_profile","=","Default"]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ROLE_PROFILE_PATH))
        .and(body_partial_json(serde_json::json!({
            "doctype": "Role Profile",
            "role_profile": "Default"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": {"name": "Default"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let granted = vec!["Employee".to_string(), "Employee Self Service".to_string()];
    let requested = granted.clone();
    let ensured = with_client(&server, move |c| {
        c.metadata().ensure_role_profile("Default", &requested)
    })
    .await
    .unwrap();
    assert_eq!(ensured, Ensured::Created);

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    let roles: Vec<&str> = body["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, granted);
}

#[tokio::test]
async fn role_profile_conflict_counts_as_present() {
    let server = MockServer::start().await;
    mount_lookup(&server, ROLE_PROFILE_PATH, serde_json::json!([])).await;

    Mock::given(method("POST"))
        .and(path(ROLE_PROFILE_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let ensured = with_client(&server, |c| {
        c.metadata()
            .ensure_role_profile("Default", &["Employee".to_string()])
    })
    .await
    .unwrap();
    assert_eq!(ensured, Ensured::Existing);
}

// ── User ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_user_lookup_decodes_int_flags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/User"))
        .and(query_param("filters", r#"[["email","=","an@example.com"]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "name": "an@example.com",
                "email": "an@example.com",
                "username": "an",
                "enabled": 1,
                "role_profile_name": "Default"
            }]
        })))
        .mount(&server)
        .await;

    let user = with_client(&server, |c| c.users().find_by_email("an@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert!(user.enabled);
    assert_eq!(user.username.as_deref(), Some("an"));
    assert_eq!(user.role_profile_name.as_deref(), Some("Default"));
}

#[tokio::test]
async fn login_user_create_sends_flags_as_ints() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/resource/User"))
        .and(body_partial_json(serde_json::json!({
            "doctype": "User",
            "email": "an@example.com",
            "username": "an",
            "enabled": 1,
            "role_profile_name": "Default",
            "send_welcome_email": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"name": "an@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = with_client(&server, |c| {
        c.users().create(&LoginUserDraft {
            email: "an@example.com".into(),
            first_name: "An".into(),
            last_name: "Nguyen".into(),
            username: "an".into(),
            enabled: true,
            role_profile_name: "Default".into(),
            send_welcome_email: false,
        })
    })
    .await
    .unwrap();
    assert_eq!(user.id, "an@example.com");
    assert!(user.enabled);
}
