//! Raw transport payloads

use std::collections::BTreeMap;

use super::StatusCode;

/// Response headers keyed by name. Repeated headers are joined with `", "`.
pub type ResponseHeaders = BTreeMap<String, String>;

/// A successful transport response before it is decoded into a domain type.
///
/// Consumed once by the decoding step and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseItem {
    /// A response with a non-empty textual body.
    StringBody {
        /// Response status.
        status: StatusCode,
        /// Raw body text.
        body: String,
        /// Response headers.
        headers: ResponseHeaders,
    },
    /// A response without a body.
    EmptyBody {
        /// Response status.
        status: StatusCode,
        /// Response headers.
        headers: ResponseHeaders,
    },
}

impl ResponseItem {
    /// Builds the item for a body, choosing [`ResponseItem::EmptyBody`]
    /// when the body is empty.
    #[must_use]
    pub fn from_body(status: StatusCode, body: String, headers: ResponseHeaders) -> Self {
        if body.is_empty() {
            Self::EmptyBody { status, headers }
        } else {
            Self::StringBody {
                status,
                body,
                headers,
            }
        }
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::StringBody { status, .. } | Self::EmptyBody { status, .. } => *status,
        }
    }

    /// Returns the response headers.
    #[must_use]
    pub const fn headers(&self) -> &ResponseHeaders {
        match self {
            Self::StringBody { headers, .. } | Self::EmptyBody { headers, .. } => headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_chooses_variant() {
        let item = ResponseItem::from_body(StatusCode::OK, String::new(), ResponseHeaders::new());
        assert!(matches!(item, ResponseItem::EmptyBody { .. }));

        let item = ResponseItem::from_body(
            StatusCode::new(201),
            "{}".to_string(),
            ResponseHeaders::new(),
        );
        assert!(matches!(item, ResponseItem::StringBody { ref body, .. } if body == "{}"));
        assert_eq!(item.status(), StatusCode::new(201));
    }
}
