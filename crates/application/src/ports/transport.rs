//! Transport port

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use courier_domain::{HttpRequest, StatusCode, TransportError, response::ResponseHeaders};

/// Future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>>;

/// A completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Response body; `None` if it could not be read.
    pub body: Option<String>,
    /// When the request was sent.
    pub sent_at: DateTime<Utc>,
    /// When the response was received.
    pub received_at: DateTime<Utc>,
}

impl TransportResponse {
    /// Time between sending the request and receiving the response.
    ///
    /// Clamped to zero if the clock went backwards.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        (self.received_at - self.sent_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP library, so request execution is
/// independent of it. Implementations resolve with a response for every
/// completed exchange, including non-2xx ones, and with an error only when
/// no response was obtained.
pub trait Transport: Send + Sync {
    /// Sends the request and waits for the response.
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response_at(sent_ms: i64, received_ms: i64) -> TransportResponse {
        TransportResponse {
            status: StatusCode::OK,
            headers: ResponseHeaders::new(),
            body: None,
            sent_at: Utc.timestamp_millis_opt(sent_ms).unwrap(),
            received_at: Utc.timestamp_millis_opt(received_ms).unwrap(),
        }
    }

    #[test]
    fn test_elapsed() {
        assert_eq!(response_at(1_000, 1_250).elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_elapsed_never_negative() {
        assert_eq!(response_at(2_000, 1_000).elapsed(), Duration::ZERO);
    }
}
