//! Typed client for the HR employee resource.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/resource/Employee` | List / find by e-mail |
//! | GET    | `/api/resource/Employee/{name}` | Get by id |
//! | POST   | `/api/resource/Employee` | Create |
//! | PUT    | `/api/resource/Employee/{name}` | Partial update |
//! | GET    | `/api/method/frappe.client.get_count` | Count |

use hrsync_core::{
    collect_pages, EmployeeDraft, EmployeeFilter, EmployeeId, EmployeePatch, EmployeeRecord,
    PageRequest, Paged, EMPLOYEE_DOCTYPE,
};
use url::Url;

use crate::error::ErpApiError;
use crate::transport::{
    decode, fields_param, method_url, resource_url, send, DataEnvelope, MessageEnvelope, NamedDoc,
    NewDoc,
};

/// Fields projected by every employee read.
pub const EMPLOYEE_FIELDS: [&str; 9] = [
    "name",
    "company_email",
    "first_name",
    "last_name",
    "gender",
    "date_of_birth",
    "date_of_joining",
    "status",
    hrsync_core::CROSS_REFERENCE_FIELD,
];

/// Client for the HR employee resource.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    page_size: usize,
    max_pages: usize,
}

impl EmployeeClient {
    pub(crate) fn new(
        http: reqwest::blocking::Client,
        base_url: Url,
        page_size: usize,
        max_pages: usize,
    ) -> Self {
        Self {
            http,
            base_url,
            page_size,
            max_pages,
        }
    }

    /// Enumerate every employee matching `filter`.
    ///
    /// Pages of `page_size` records are fetched until a short page arrives or
    /// `max_pages` is reached; in the latter case the result is marked
    /// truncated.
    pub fn list(&self, filter: &EmployeeFilter) -> Result<Paged<EmployeeRecord>, ErpApiError> {
        let paged = collect_pages(self.page_size, self.max_pages, |req| {
            self.list_page(filter, req)
        })?;
        tracing::info!(
            employees = paged.items.len(),
            pages = paged.pages_fetched,
            truncated = paged.truncated,
            "fetched employees from HR"
        );
        Ok(paged)
    }

    /// Fetch one page of employees.
    ///
    /// Calls `GET {base_url}/api/resource/Employee`.
    pub fn list_page(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<Vec<EmployeeRecord>, ErpApiError> {
        let endpoint = "GET /api/resource/Employee";
        let url = resource_url(&self.base_url, &[EMPLOYEE_DOCTYPE])?;

        let mut query = vec![
            ("fields", fields_param(&EMPLOYEE_FIELDS)),
            ("limit_start", page.offset.to_string()),
            ("limit_page_length", page.size.to_string()),
        ];
        if !filter.is_empty() {
            query.push(("filters", filter.to_json()));
        }

        let resp = send(endpoint, self.http.get(url).query(&query))?;
        let envelope: DataEnvelope<Vec<EmployeeRecord>> = decode(endpoint, resp)?;
        Ok(envelope.data)
    }

    /// Find an employee by company e-mail. First match wins; a warning is
    /// logged when the HR system holds more than one.
    ///
    /// Calls `GET {base_url}/api/resource/Employee` with an e-mail filter.
    pub fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, ErpApiError> {
        let endpoint = "GET /api/resource/Employee?company_email";
        let url = resource_url(&self.base_url, &[EMPLOYEE_DOCTYPE])?;
        let query = [
            ("fields", fields_param(&EMPLOYEE_FIELDS)),
            ("filters", EmployeeFilter::email(email.trim()).to_json()),
            ("limit_page_length", "2".to_string()),
        ];

        let resp = send(endpoint, self.http.get(url).query(&query))?;
        let envelope: DataEnvelope<Vec<EmployeeRecord>> = decode(endpoint, resp)?;
        if envelope.data.len() > 1 {
            tracing::warn!(email, "several employees share this e-mail; using the first");
        }
        Ok(envelope.data.into_iter().next())
    }

    /// Get an employee by id. Returns `None` on 404.
    ///
    /// Calls `GET {base_url}/api/resource/Employee/{id}`.
    pub fn get(&self, id: &EmployeeId) -> Result<Option<EmployeeRecord>, ErpApiError> {
        let endpoint = format!("GET /api/resource/Employee/{id}");
        let url = resource_url(&self.base_url, &[EMPLOYEE_DOCTYPE, id.as_str()])?;

        match send(&endpoint, self.http.get(url)) {
            Ok(resp) => {
                let envelope: DataEnvelope<EmployeeRecord> = decode(&endpoint, resp)?;
                Ok(Some(envelope.data))
            }
            Err(ErpApiError::ApiError { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create an employee and return the id the HR system assigned.
    ///
    /// Calls `POST {base_url}/api/resource/Employee`.
    pub fn create(&self, draft: &EmployeeDraft) -> Result<EmployeeId, ErpApiError> {
        let endpoint = "POST /api/resource/Employee";
        let url = resource_url(&self.base_url, &[EMPLOYEE_DOCTYPE])?;
        let body = NewDoc {
            doctype: EMPLOYEE_DOCTYPE,
            fields: draft,
        };

        let resp = send(endpoint, self.http.post(url).json(&body))?;
        let envelope: DataEnvelope<NamedDoc> = decode(endpoint, resp)?;
        EmployeeId::new(envelope.data.name).map_err(|e| ErpApiError::InvalidResponse {
            endpoint: endpoint.into(),
            reason: e.to_string(),
        })
    }

    /// Apply a partial update. Only the patch fields go on the wire.
    ///
    /// Calls `PUT {base_url}/api/resource/Employee/{id}`.
    pub fn update(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), ErpApiError> {
        let endpoint = format!("PUT /api/resource/Employee/{id}");
        let url = resource_url(&self.base_url, &[EMPLOYEE_DOCTYPE, id.as_str()])?;
        send(&endpoint, self.http.put(url).json(patch))?;
        Ok(())
    }

    /// Count employees matching `filter`.
    ///
    /// Calls `GET {base_url}/api/method/frappe.client.get_count`.
    pub fn count(&self, filter: &EmployeeFilter) -> Result<u64, ErpApiError> {
        let endpoint = "GET /api/method/frappe.client.get_count";
        let url = method_url(&self.base_url, "frappe.client.get_count")?;
        let mut query = vec![("doctype", EMPLOYEE_DOCTYPE.to_string())];
        if !filter.is_empty() {
            query.push(("filters", filter.to_json()));
        }

        let resp = send(endpoint, self.http.get(url).query(&query))?;
        let envelope: MessageEnvelope<u64> = decode(endpoint, resp)?;
        Ok(envelope.message)
    }
}
