//! Request payload types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The request parameters carried alongside an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestPayload {
    /// A textual body sent with the given content type.
    String {
        /// Media type of the body, e.g. [`RequestPayload::CONTENT_TYPE_APPLICATION_JSON`].
        content_type: Option<String>,
        /// The body content.
        body: String,
    },
    /// Key-value pairs appended to the URL query string. Never sent as a body.
    UrlQueryParameters(BTreeMap<String, String>),
    /// An explicit zero-length body.
    Empty,
}

impl RequestPayload {
    /// JSON content type.
    pub const CONTENT_TYPE_APPLICATION_JSON: &'static str = "application/json; charset=utf-8";
    /// HTML content type.
    pub const CONTENT_TYPE_TEXT_HTML: &'static str = "text/html; charset=utf-8";
    /// XML content type.
    pub const CONTENT_TYPE_TEXT_XML: &'static str = "text/xml; charset=utf-8";

    /// Creates a JSON string payload.
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        Self::String {
            content_type: Some(Self::CONTENT_TYPE_APPLICATION_JSON.to_string()),
            body: body.into(),
        }
    }

    /// Creates a string payload with an explicit content type.
    #[must_use]
    pub fn text(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self::String {
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }

    /// Creates a query parameter payload from key-value pairs.
    #[must_use]
    pub fn query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::UrlQueryParameters(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the query parameters if this payload carries any.
    #[must_use]
    pub const fn query_parameters(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::UrlQueryParameters(params) => Some(params),
            _ => None,
        }
    }
}

/// A body ready to be written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingBody<'a> {
    /// Media type, if one was supplied.
    pub content_type: Option<&'a str>,
    /// The body content; may be empty.
    pub content: &'a str,
}

impl OutgoingBody<'static> {
    /// A zero-length body without a content type.
    pub const EMPTY: Self = Self {
        content_type: None,
        content: "",
    };
}
