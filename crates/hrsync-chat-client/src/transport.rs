//! Request plumbing shared by the sub-clients.

use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ChatApiError;

/// `{base}/api/v4/{segments...}`, each segment percent-encoded.
pub(crate) fn v4_url(base: &Url, segments: &[&str]) -> Result<Url, ChatApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            crate::config::ConfigError::InvalidUrl(base.to_string(), "cannot be a base URL".into())
        })?
        .pop_if_empty()
        .extend(["api", "v4"])
        .extend(segments);
    Ok(url)
}

/// Send a request and reject any non-2xx answer.
pub(crate) fn send(endpoint: &str, request: RequestBuilder) -> Result<Response, ChatApiError> {
    let resp = request.send().map_err(|source| ChatApiError::Http {
        endpoint: endpoint.into(),
        source,
    })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(ChatApiError::ApiError {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body,
        });
    }
    tracing::debug!(endpoint, status = status.as_u16(), "chat API call succeeded");
    Ok(resp)
}

/// Send a single-object lookup, mapping 404 to `None`.
pub(crate) fn send_optional<T: DeserializeOwned>(
    endpoint: &str,
    request: RequestBuilder,
) -> Result<Option<T>, ChatApiError> {
    match send(endpoint, request) {
        Ok(resp) => decode(endpoint, resp).map(Some),
        Err(ChatApiError::ApiError { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Decode a JSON body.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, ChatApiError> {
    resp.json().map_err(|source| ChatApiError::Deserialization {
        endpoint: endpoint.into(),
        source,
    })
}
