//! Request description type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{HttpMethod, OutgoingBody, RequestPayload};
use crate::error::{DomainError, DomainResult};
use crate::id::RequestId;

/// Everything needed to issue one HTTP request.
///
/// The URL is optional so that a missing URL can be reported as a request
/// failure instead of being rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Identifier used to correlate log lines for this request.
    #[serde(default)]
    pub id: RequestId,
    /// Target URL.
    pub url: Option<String>,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Additional headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Body or query parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<RequestPayload>,
}

impl HttpRequest {
    /// Creates a request without headers or payload.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            url: Some(url.into()),
            method,
            headers: None,
            payload: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request carrying the given payload.
    #[must_use]
    pub fn post(url: impl Into<String>, payload: RequestPayload) -> Self {
        Self::new(HttpMethod::Post, url).with_payload(payload)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Adds a header, creating the header map if needed.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: RequestPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns the URL if it is present and not blank.
    #[must_use]
    pub fn target_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Parses the URL and appends any query parameters from the payload.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the URL is missing or malformed.
    pub fn full_url(&self) -> DomainResult<Url> {
        let raw = self
            .target_url()
            .ok_or_else(|| DomainError::InvalidUrl("URL is missing".to_string()))?;
        let mut url = Url::parse(raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;

        if let Some(params) = self
            .payload
            .as_ref()
            .and_then(RequestPayload::query_parameters)
            .filter(|params| !params.is_empty())
        {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Returns the body to send, if any.
    ///
    /// POST, PUT and PATCH always carry a body, falling back to a
    /// zero-length one. DELETE carries a body only when a string or empty
    /// payload is supplied. GET never carries one.
    #[must_use]
    pub fn body(&self) -> Option<OutgoingBody<'_>> {
        let explicit = match &self.payload {
            Some(RequestPayload::String { content_type, body }) => Some(OutgoingBody {
                content_type: content_type.as_deref(),
                content: body,
            }),
            Some(RequestPayload::Empty) => Some(OutgoingBody::EMPTY),
            Some(RequestPayload::UrlQueryParameters(_)) | None => None,
        };

        match self.method {
            HttpMethod::Get => None,
            method if method.requires_body() => Some(explicit.unwrap_or(OutgoingBody::EMPTY)),
            _ => explicit,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_request() {
        let req = HttpRequest::get("https://api.example.com/users");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.target_url(), Some("https://api.example.com/users"));
        assert_eq!(req.body(), None);
    }

    #[test]
    fn test_blank_url_is_missing() {
        let mut req = HttpRequest::get("   ");
        assert_eq!(req.target_url(), None);

        req.url = None;
        assert_eq!(req.target_url(), None);
        assert!(matches!(req.full_url(), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_full_url_appends_query_parameters() {
        let req = HttpRequest::get("https://x/y?keep=1")
            .with_payload(RequestPayload::query([("page", "2"), ("q", "a b")]));
        let url = req.full_url().unwrap();
        assert_eq!(url.as_str(), "https://x/y?keep=1&page=2&q=a+b");
        // Query parameters never become a body
        assert_eq!(req.body(), None);
    }

    #[test]
    fn test_full_url_rejects_malformed() {
        let req = HttpRequest::get("not a url");
        assert!(matches!(req.full_url(), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_post_without_payload_sends_empty_body() {
        let req = HttpRequest::new(HttpMethod::Post, "https://x/y");
        assert_eq!(req.body(), Some(OutgoingBody::EMPTY));

        let req = HttpRequest::new(HttpMethod::Patch, "https://x/y")
            .with_payload(RequestPayload::query([("a", "1")]));
        assert_eq!(req.body(), Some(OutgoingBody::EMPTY));
    }

    #[test]
    fn test_post_with_string_payload() {
        let req = HttpRequest::post("https://x/y", RequestPayload::json(r#"{"a":1}"#));
        assert_eq!(
            req.body(),
            Some(OutgoingBody {
                content_type: Some(RequestPayload::CONTENT_TYPE_APPLICATION_JSON),
                content: r#"{"a":1}"#,
            })
        );
    }

    #[test]
    fn test_delete_body_only_when_supplied() {
        let req = HttpRequest::delete("https://x/y");
        assert_eq!(req.body(), None);

        let req = HttpRequest::delete("https://x/y").with_payload(RequestPayload::Empty);
        assert_eq!(req.body(), Some(OutgoingBody::EMPTY));

        let req = HttpRequest::delete("https://x/y")
            .with_payload(RequestPayload::text("text/plain", "bye"));
        assert_eq!(req.body().map(|b| b.content), Some("bye"));
    }

    #[test]
    fn test_get_ignores_string_payload() {
        let req = HttpRequest::get("https://x/y").with_payload(RequestPayload::json("{}"));
        assert_eq!(req.body(), None);
    }

    #[test]
    fn test_with_header() {
        let req = HttpRequest::get("https://x/y")
            .with_header("Accept", "application/json")
            .with_header("X-Trace", "1");
        assert_eq!(req.headers.as_ref().map(BTreeMap::len), Some(2));
    }
}
