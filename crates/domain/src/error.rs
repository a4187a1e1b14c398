//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A header could not be parsed from its textual form.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A query parameter could not be parsed from its textual form.
    #[error("invalid query parameter: {0}")]
    InvalidQueryParameter(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures reported by a transport when no HTTP response was obtained.
///
/// These are always delivered as the cause of a generic error, never as an
/// HTTP error: the exchange did not complete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be parsed by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value was rejected by the transport.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The connection was refused by the remote host.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Remote host.
        host: String,
        /// Remote port.
        port: u16,
    },

    /// A connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Configured redirect limit.
        max: usize,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_messages() {
        assert_eq!(
            TransportError::Timeout { timeout_ms: 5000 }.to_string(),
            "request timed out after 5000ms"
        );
        assert_eq!(
            TransportError::ConnectionRefused {
                host: "localhost".to_string(),
                port: 8080,
            }
            .to_string(),
            "connection refused by localhost:8080"
        );
    }

    #[test]
    fn test_domain_error_messages() {
        let err = DomainError::UnsupportedMethod("TRACE".to_string());
        assert_eq!(err.to_string(), "unsupported HTTP method: TRACE");
    }
}
