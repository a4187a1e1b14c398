//! Failure taxonomy for a request attempt

use std::time::Duration;

use thiserror::Error;

use super::StatusCode;
use crate::error::TransportError;

/// The raw body of an unsuccessful HTTP response, carried as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .body.as_deref().unwrap_or_default())]
pub struct HttpException {
    /// Error body returned by the server, if it could be read.
    pub body: Option<String>,
}

impl HttpException {
    /// Wraps an error body.
    #[must_use]
    pub const fn new(body: Option<String>) -> Self {
        Self { body }
    }
}

/// Why a request failed without producing an HTTP error response.
#[derive(Debug, Error)]
pub enum FailureCause {
    /// The request had no URL, or a blank one.
    #[error("Url cannot be null or empty")]
    MissingUrl,

    /// The transport failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A successful response body could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Distinguishes an unsuccessful HTTP exchange from any other failure.
#[derive(Debug, Error)]
pub enum ErrorItem {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {cause}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Time between sending the request and receiving the response.
        response_time: Duration,
        /// The error body.
        #[source]
        cause: HttpException,
    },

    /// Transport, decoding or precondition failure.
    #[error(transparent)]
    Generic {
        /// What went wrong.
        cause: FailureCause,
    },
}

impl ErrorItem {
    /// Creates an HTTP error.
    #[must_use]
    pub const fn http(status: StatusCode, response_time: Duration, body: Option<String>) -> Self {
        Self::Http {
            status,
            response_time,
            cause: HttpException::new(body),
        }
    }

    /// Creates a generic error.
    pub fn generic(cause: impl Into<FailureCause>) -> Self {
        Self::Generic {
            cause: cause.into(),
        }
    }

    /// Returns true for [`ErrorItem::Http`].
    #[must_use]
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Returns the status code of an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Generic { .. } => None,
        }
    }

    /// Returns the underlying cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            Self::Http { cause, .. } => cause as &(dyn std::error::Error + Send + Sync),
            Self::Generic { cause } => cause,
        }
    }
}
