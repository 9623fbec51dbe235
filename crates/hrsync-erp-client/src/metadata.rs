//! Schema bootstrap: custom fields and role profiles.
//!
//! Both `ensure_*` operations are check-then-create. A create that loses a
//! race against a concurrent bootstrap (HTTP 409 or `DuplicateEntryError`)
//! counts as success.

use hrsync_core::CustomFieldSpec;
use serde_json::json;
use url::Url;

use crate::error::ErpApiError;
use crate::transport::{decode, fields_param, resource_url, send, DataEnvelope, NamedDoc};

const CUSTOM_FIELD_DOCTYPE: &str = "Custom Field";
const ROLE_PROFILE_DOCTYPE: &str = "Role Profile";

/// Whether an `ensure_*` call had to create the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// The object was already there.
    Existing,
    /// The object was created by this call.
    Created,
}

/// Client for HR metadata resources.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

impl MetadataClient {
    pub(crate) fn new(http: reqwest::blocking::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Check whether `fieldname` exists on `doctype`.
    ///
    /// Calls `GET {base_url}/api/resource/Custom Field`.
    pub fn custom_field_exists(&self, fieldname: &str, doctype: &str) -> Result<bool, ErpApiError> {
        let endpoint = "GET /api/resource/Custom Field";
        let url = resource_url(&self.base_url, &[CUSTOM_FIELD_DOCTYPE])?;
        let filters = json!([["fieldname", "=", fieldname], ["dt", "=", doctype]]).to_string();
        let query = [("filters", filters), ("fields", fields_param(&["name"]))];

        let resp = send(endpoint, self.http.get(url).query(&query))?;
        let envelope: DataEnvelope<Vec<NamedDoc>> = decode(endpoint, resp)?;
        Ok(!envelope.data.is_empty())
    }

    /// Create a custom field.
    ///
    /// Calls `POST {base_url}/api/resource/Custom Field`.
    pub fn create_custom_field(&self, spec: &CustomFieldSpec) -> Result<(), ErpApiError> {
        let endpoint = "POST /api/resource/Custom Field";
        let url = resource_url(&self.base_url, &[CUSTOM_FIELD_DOCTYPE])?;
        let body = json!({
            "doctype": CUSTOM_FIELD_DOCTYPE,
            "dt": spec.doctype,
            "fieldname": spec.fieldname,
            "label": spec.label,
            "fieldtype": spec.fieldtype,
            "insert_after": spec.insert_after,
            "reqd": u8::from(spec.required),
            "in_list_view": 0,
            "in_standard_filter": 1,
            "in_global_search": 1,
            "allow_in_quick_entry": 1,
            "translatable": 0,
            "unique": 0,
            "no_copy": 0,
            "read_only": 0,
            "hide_display": 0,
        });

        send(endpoint, self.http.post(url).json(&body))?;
        Ok(())
    }

    /// Create the custom field unless it exists.
    pub fn ensure_custom_field(&self, spec: &CustomFieldSpec) -> Result<Ensured, ErpApiError> {
        if self.custom_field_exists(&spec.fieldname, &spec.doctype)? {
            tracing::debug!(field = %spec.fieldname, doctype = %spec.doctype, "custom field present");
            return Ok(Ensured::Existing);
        }
        match self.create_custom_field(spec) {
            Ok(()) => {
                tracing::info!(field = %spec.fieldname, doctype = %spec.doctype, "created custom field");
                Ok(Ensured::Created)
            }
            Err(e) if e.is_duplicate() => Ok(Ensured::Existing),
            Err(e) => Err(e),
        }
    }

    /// Check whether a role profile exists.
    ///
    /// Calls `GET {base_url}/api/resource/Role Profile`.
    pub fn role_profile_exists(&self, name: &str) -> Result<bool, ErpApiError> {
        let endpoint = "GET /api/resource/Role Profile";
        let url = resource_url(&self.base_url, &[ROLE_PROFILE_DOCTYPE])?;
        let filters = json!([["role_profile", "=", name]]).to_string();
        let query = [("filters", filters), ("fields", fields_param(&["name"]))];

        let resp = send(endpoint, self.http.get(url).query(&query))?;
        let envelope: DataEnvelope<Vec<NamedDoc>> = decode(endpoint, resp)?;
        Ok(!envelope.data.is_empty())
    }

    /// Create a role profile granting `roles`.
    ///
    /// Calls `POST {base_url}/api/resource/Role Profile`.
    pub fn create_role_profile(&self, name: &str, roles: &[String]) -> Result<(), ErpApiError> {
        let endpoint = "POST /api/resource/Role Profile";
        let url = resource_url(&self.base_url, &[ROLE_PROFILE_DOCTYPE])?;
        let roles: Vec<_> = roles.iter().map(|r| json!({ "role": r })).collect();
        let body = json!({
            "doctype": ROLE_PROFILE_DOCTYPE,
            "role_profile": name,
            "roles": roles,
        });

        send(endpoint, self.http.post(url).json(&body))?;
        Ok(())
    }

    /// Create the role profile granting `roles` unless it exists. The roles
    /// of an existing profile are not touched.
    pub fn ensure_role_profile(&self, name: &str, roles: &[String]) -> Result<Ensured, ErpApiError> {
        if self.role_profile_exists(name)? {
            tracing::debug!(role_profile = name, "role profile present");
            return Ok(Ensured::Existing);
        }
        match self.create_role_profile(name, roles) {
            Ok(()) => {
                tracing::info!(role_profile = name, "created role profile");
                Ok(Ensured::Created)
            }
            Err(e) if e.is_duplicate() => Ok(Ensured::Existing),
            Err(e) => Err(e),
        }
    }
}
