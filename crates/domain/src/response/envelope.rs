//! The caller-facing response envelope

use super::{ErrorItem, StatusCode};

/// Reports whether a decoded payload is logically empty.
///
/// Callers supply an empty instance of their payload type; it stands in for
/// the payload when a successful response carries no body. The empty
/// instance is a caller contract and is not validated.
pub trait EmptyStateInfo {
    /// Returns `true` if this value is an empty placeholder.
    fn is_empty(&self) -> bool;
}

impl EmptyStateInfo for () {
    fn is_empty(&self) -> bool {
        true
    }
}

impl EmptyStateInfo for String {
    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }
}

impl<T> EmptyStateInfo for Vec<T> {
    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }
}

impl<T> EmptyStateInfo for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl EmptyStateInfo for serde_json::Value {
    fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Object(map) => map.is_empty(),
            Self::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// A request that concluded with a decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T> {
    identifier: Option<String>,
    status: StatusCode,
    payload: T,
}

impl<T> Success<T> {
    /// Creates a success envelope.
    #[must_use]
    pub const fn new(identifier: Option<String>, status: StatusCode, payload: T) -> Self {
        Self {
            identifier,
            status,
            payload,
        }
    }

    /// Label of the request this envelope answers, if one was supplied.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Decoded payload.
    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.payload
    }

    /// Consumes the envelope and returns the payload.
    #[must_use]
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T: EmptyStateInfo> Success<T> {
    /// Returns true if the payload is the empty placeholder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// A request that failed.
#[derive(Debug)]
pub struct Failure {
    identifier: Option<String>,
    error: ErrorItem,
}

impl Failure {
    /// Creates a failure envelope.
    #[must_use]
    pub const fn new(identifier: Option<String>, error: ErrorItem) -> Self {
        Self { identifier, error }
    }

    /// Label of the request this envelope answers, if one was supplied.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// The error.
    #[must_use]
    pub const fn error(&self) -> &ErrorItem {
        &self.error
    }

    /// Consumes the envelope and returns the error.
    #[must_use]
    pub fn into_error(self) -> ErrorItem {
        self.error
    }
}

/// Outcome of one request attempt.
///
/// Created exactly once per attempt, delivered to the caller, then dropped.
#[derive(Debug)]
pub enum Response<T> {
    /// The request succeeded.
    Success(Success<T>),
    /// The request failed.
    Failure(Failure),
}

impl<T> Response<T> {
    /// Creates a success envelope.
    #[must_use]
    pub const fn success(identifier: Option<String>, status: StatusCode, payload: T) -> Self {
        Self::Success(Success::new(identifier, status, payload))
    }

    /// Creates a failure envelope.
    #[must_use]
    pub const fn failure(identifier: Option<String>, error: ErrorItem) -> Self {
        Self::Failure(Failure::new(identifier, error))
    }

    /// Returns true for [`Response::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Label of the request this envelope answers, if one was supplied.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Success(success) => success.identifier(),
            Self::Failure(failure) => failure.identifier(),
        }
    }

    /// Converts the envelope into a `Result`, dropping the identifier.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorItem`] of a failure.
    pub fn into_result(self) -> Result<T, ErrorItem> {
        match self {
            Self::Success(success) => Ok(success.into_payload()),
            Self::Failure(failure) => Err(failure.into_error()),
        }
    }
}
