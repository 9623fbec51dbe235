//! Request plumbing shared by the sub-clients.
//!
//! Every call goes through [`send`], which maps transport failures and
//! non-2xx answers to [`ErpApiError`] with the body kept verbatim. There is
//! no retry here.

use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ErpApiError;

/// Frappe wraps document payloads as `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Frappe wraps whitelisted method results as `{"message": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope<T> {
    pub message: T,
}

/// The only field we read back from a create.
#[derive(Debug, Deserialize)]
pub(crate) struct NamedDoc {
    #[serde(default)]
    pub name: String,
}

/// A create payload: the document fields plus the `doctype` key Frappe
/// expects in the body.
#[derive(Debug, Serialize)]
pub(crate) struct NewDoc<'a, T: Serialize> {
    pub doctype: &'a str,
    #[serde(flatten)]
    pub fields: &'a T,
}

/// `{base}/api/resource/{doctype}[/{name}]`, each segment percent-encoded.
pub(crate) fn resource_url(base: &Url, segments: &[&str]) -> Result<Url, ErpApiError> {
    api_url(base, "resource", segments)
}

/// `{base}/api/method/{method}`.
pub(crate) fn method_url(base: &Url, method: &str) -> Result<Url, ErpApiError> {
    api_url(base, "method", &[method])
}

fn api_url(base: &Url, kind: &str, segments: &[&str]) -> Result<Url, ErpApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            crate::config::ConfigError::InvalidUrl(base.to_string(), "cannot be a base URL".into())
        })?
        .pop_if_empty()
        .extend(["api", kind])
        .extend(segments);
    Ok(url)
}

/// Send a request and reject any non-2xx answer.
pub(crate) fn send(endpoint: &str, request: RequestBuilder) -> Result<Response, ErpApiError> {
    let resp = request.send().map_err(|source| ErpApiError::Http {
        endpoint: endpoint.into(),
        source,
    })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        tracing::debug!(endpoint, status = status.as_u16(), "HR API call rejected");
        return Err(ErpApiError::ApiError {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body,
        });
    }
    tracing::debug!(endpoint, status = status.as_u16(), "HR API call succeeded");
    Ok(resp)
}

/// Decode a JSON body.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, ErpApiError> {
    resp.json().map_err(|source| ErpApiError::Deserialization {
        endpoint: endpoint.into(),
        source,
    })
}

/// Encode a list of field names for the `fields` query parameter.
pub(crate) fn fields_param(fields: &[&str]) -> String {
    serde_json::Value::from(fields.to_vec()).to_string()
}
