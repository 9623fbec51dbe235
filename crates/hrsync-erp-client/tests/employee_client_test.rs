//! Contract tests for EmployeeClient against the HR employee resource.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/resource/Employee` | `list_*`, `find_by_email_*` |
//! | GET    | `/api/resource/Employee/{name}` | `get_*` |
//! | POST   | `/api/resource/Employee` | `create_*` |
//! | PUT    | `/api/resource/Employee/{name}` | `update_*` |
//! | GET    | `/api/method/frappe.client.get_count` | `count_*` |

mod common;

use common::{employee_json, with_client, with_config};
use hrsync_core::{
    ChatAccountId, DirectoryError, EmployeeDirectory, EmployeeDraft, EmployeeFilter, EmployeeId,
    EmployeePatch, EmployeeStatus,
};
use hrsync_erp_client::ErpApiError;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page(names: &[&str]) -> serde_json::Value {
    let data: Vec<_> = names
        .iter()
        .map(|n| employee_json(n, &format!("{n}@example.com"), ""))
        .collect();
    serde_json::json!({ "data": data })
}

async fn mount_page(server: &MockServer, start: &str, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/resource/Employee"))
        .and(query_param("limit_start", start))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(names)))
        .expect(1)
        .mount(server)
        .await;
}

// ── GET /api/resource/Employee (list) ────────────────────────────────

#[tokio::test]
async fn list_sends_auth_projection_and_paging() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee"))
        .and(header("authorization", "token test-key:test-secret"))
        .and(query_param("limit_start", "0"))
        .and(query_param("limit_page_length", "200"))
        .and(query_param(
            "fields",
            r#"["name","company_email","first_name","last_name","gender","date_of_birth","date_of_joining","status","custom_chat_id"]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["E1", "E2"])))
        .expect(1)
        .mount(&server)
        .await;

    let paged = with_client(&server, |c| c.employees().list(&EmployeeFilter::all()))
        .await
        .unwrap();
    assert_eq!(paged.items.len(), 2);
    assert_eq!(paged.pages_fetched, 1);
    assert!(!paged.truncated);
    assert_eq!(paged.items[0].id.as_str(), "E1");
    assert!(paged.items[0].chat_account_id.is_none());
}

#[tokio::test]
async fn list_stops_on_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, "0", &["E1", "E2"]).await;
    mount_page(&server, "2", &["E3"]).await;

    let paged = with_config(
        &server,
        |cfg| cfg.page_size = 2,
        |c| c.employees().list(&EmployeeFilter::all()),
    )
    .await
    .unwrap();
    assert_eq!(paged.items.len(), 3);
    assert_eq!(paged.pages_fetched, 2);
}

#[tokio::test]
async fn list_of_exact_multiple_ends_on_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "0", &["E1", "E2"]).await;
    mount_page(&server, "2", &["E3", "E4"]).await;
    mount_page(&server, "4", &[]).await;

    let paged = with_config(
        &server,
        |cfg| cfg.page_size = 2,
        |c| c.employees().list(&EmployeeFilter::all()),
    )
    .await
    .unwrap();
    assert_eq!(paged.items.len(), 4);
    assert_eq!(paged.pages_fetched, 3);
    assert!(!paged.truncated);
}

#[tokio::test]
async fn list_truncates_at_page_ceiling() {
    let server = MockServer::start().await;
    mount_page(&server, "0", &["E1", "E2"]).await;
    mount_page(&server, "2", &["E3", "E4"]).await;

    let paged = with_config(
        &server,
        |cfg| {
            cfg.page_size = 2;
            cfg.max_pages = 2;
        },
        |c| c.employees().list(&EmployeeFilter::all()),
    )
    .await
    .unwrap();
    assert_eq!(paged.items.len(), 4);
    assert!(paged.truncated);
}

#[tokio::test]
async fn list_pushes_filter_to_remote() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee"))
        .and(query_param("filters", r#"[["status","=","Active"]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["E1"])))
        .expect(1)
        .mount(&server)
        .await;

    let paged = with_client(&server, |c| c.employees().list(&EmployeeFilter::status("Active")))
        .await
        .unwrap();
    assert_eq!(paged.items.len(), 1);
}

#[tokio::test]
async fn list_surfaces_error_body_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"exc_type":"PermissionError"}"#),
        )
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.employees().list(&EmployeeFilter::all()))
        .await
        .unwrap_err();
    match err {
        ErpApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 403);
            assert_eq!(body, r#"{"exc_type":"PermissionError"}"#);
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

// ── GET /api/resource/Employee (find by e-mail) ──────────────────────

#[tokio::test]
async fn find_by_email_returns_first_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee"))
        .and(query_param(
            "filters",
            r#"[["company_email","=","an@example.com"]]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                employee_json("HR-EMP-1", "an@example.com", "u1"),
                employee_json("HR-EMP-2", "an@example.com", "")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = with_client(&server, |c| c.employees().find_by_email("an@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id.as_str(), "HR-EMP-1");
    assert_eq!(found.chat_account_id.unwrap().as_str(), "u1");
}

#[tokio::test]
async fn find_by_email_returns_none_when_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;

    let found = with_client(&server, |c| c.employees().find_by_email("nobody@example.com"))
        .await
        .unwrap();
    assert!(found.is_none());
}

// ── GET /api/resource/Employee/{name} ────────────────────────────────

#[tokio::test]
async fn get_returns_none_on_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee/HR-EMP-404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let result = with_client(&server, |c| {
        c.employees().get(&EmployeeId::new("HR-EMP-404").unwrap())
    })
    .await
    .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn get_decodes_single_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/resource/Employee/HR-EMP-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": employee_json("HR-EMP-7", "seven@example.com", "u7")
        })))
        .mount(&server)
        .await;

    let rec = with_client(&server, |c| c.employees().get(&EmployeeId::new("HR-EMP-7").unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rec.email.as_deref(), Some("seven@example.com"));
    assert_eq!(rec.gender.as_deref(), Some("Female"));
}

// ── POST /api/resource/Employee ──────────────────────────────────────

#[tokio::test]
async fn create_sends_doctype_and_cross_reference() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/resource/Employee"))
        .and(body_partial_json(serde_json::json!({
            "doctype": "Employee",
            "company_email": "new@example.com",
            "gender": "Male",
            "date_of_birth": "2000-01-01",
            "status": "Active",
            "custom_chat_id": "u42"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": {"name": "HR-EMP-00042"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = with_client(&server, |c| {
        let draft = EmployeeDraft {
            email: "new@example.com".into(),
            first_name: "New".into(),
            last_name: "Hire".into(),
            gender: "Male".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            date_of_joining: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            status: EmployeeStatus::Active,
            chat_account_id: ChatAccountId::new("u42").unwrap(),
        };
        c.employees().create(&draft)
    })
    .await
    .unwrap();
    assert_eq!(id.as_str(), "HR-EMP-00042");
}

#[tokio::test]
async fn create_rejects_blank_assigned_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/resource/Employee"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"data": {"name": ""}})),
        )
        .mount(&server)
        .await;

    let err = with_client(&server, |c| {
        let draft = EmployeeDraft {
            email: "new@example.com".into(),
            first_name: "New".into(),
            last_name: "Hire".into(),
            gender: "Male".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            date_of_joining: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            status: EmployeeStatus::Active,
            chat_account_id: ChatAccountId::new("u42").unwrap(),
        };
        c.employees().create(&draft)
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ErpApiError::InvalidResponse { .. }));
}

// ── PUT /api/resource/Employee/{name} ────────────────────────────────

#[tokio::test]
async fn update_sends_only_the_cross_reference() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/resource/Employee/HR-EMP-1"))
        .and(body_json(serde_json::json!({"custom_chat_id": "u9"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    with_client(&server, |c| {
        c.employees().update(
            &EmployeeId::new("HR-EMP-1").unwrap(),
            &EmployeePatch::link(ChatAccountId::new("u9").unwrap()),
        )
    })
    .await
    .unwrap();
}

// ── GET /api/method/frappe.client.get_count ──────────────────────────

#[tokio::test]
async fn count_reads_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/method/frappe.client.get_count"))
        .and(query_param("doctype", "Employee"))
        .and(query_param("filters", r#"[["status","=","Active"]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let n = with_client(&server, |c| c.employees().count(&EmployeeFilter::status("Active")))
        .await
        .unwrap();
    assert_eq!(n, 42);
}

// ── EmployeeDirectory ────────────────────────────────────────────────

#[tokio::test]
async fn directory_maps_errors_to_remote() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/resource/Employee/HR-EMP-1"))
        .respond_with(ResponseTemplate::new(417).set_body_string("locked"))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| {
        let dir: &dyn EmployeeDirectory = c;
        dir.update_employee(
            &EmployeeId::new("HR-EMP-1").unwrap(),
            &EmployeePatch::link(ChatAccountId::new("u9").unwrap()),
        )
    })
    .await
    .unwrap_err();
    assert_eq!(
        err,
        DirectoryError::Remote {
            endpoint: "PUT /api/resource/Employee/HR-EMP-1".into(),
            status: 417,
            body: "locked".into(),
        }
    );
}

#[tokio::test]
async fn transport_failure_maps_to_transport() {
    // Reserve a free port, then release it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let uri = format!("http://127.0.0.1:{port}");

    let err = tokio::task::spawn_blocking(move || {
        let client = hrsync_erp_client::ErpClient::new(
            hrsync_erp_client::ErpApiConfig::local_mock(&uri).unwrap(),
        )
        .unwrap();
        let dir: &dyn EmployeeDirectory = &client;
        dir.count_employees(&EmployeeFilter::all())
    })
    .await
    .unwrap()
    .unwrap_err();
    assert!(matches!(err, DirectoryError::Transport { .. }));
}
