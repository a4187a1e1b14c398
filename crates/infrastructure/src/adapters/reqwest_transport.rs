//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port with the reqwest library.
//! Every completed exchange resolves to a `TransportResponse`, whatever its
//! status; only failures to obtain a response become errors.

use std::sync::Arc;
use std::time::Duration;

use courier_application::ports::{Clock, Transport, TransportFuture, TransportResponse};
use courier_domain::{
    DomainError, HttpMethod, HttpRequest, StatusCode, TransportError, response::ResponseHeaders,
};
use parking_lot::RwLock;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, redirect};

use super::SystemClock;
use crate::settings::TransportConfig;

/// HTTP transport backed by a shared `reqwest::Client`.
///
/// The client can be rebuilt with [`reconfigure`](Self::reconfigure)
/// between calls; requests already in flight keep the client they started
/// with.
pub struct ReqwestTransport {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

struct Inner {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::from_config(TransportConfig::default())
    }

    /// Creates a transport from configuration, using the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn from_config(config: TransportConfig) -> Result<Self, TransportError> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Creates a transport from configuration and a clock used to stamp
    /// requests and responses.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_clock(config: TransportConfig, clock: Arc<dyn Clock>) -> Result<Self, TransportError> {
        let client = Self::build_client(&config)?;
        Ok(Self {
            inner: RwLock::new(Inner { client, config }),
            clock,
        })
    }

    /// Rebuilds the underlying client with new settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created; the previous
    /// client stays in use.
    pub fn reconfigure(&self, config: TransportConfig) -> Result<(), TransportError> {
        let client = Self::build_client(&config)?;
        tracing::debug!(?config, "transport reconfigured");
        *self.inner.write() = Inner { client, config };
        Ok(())
    }

    /// Returns the settings currently in use.
    #[must_use]
    pub fn config(&self) -> TransportConfig {
        self.inner.read().config.clone()
    }

    fn build_client(config: &TransportConfig) -> Result<Client, TransportError> {
        Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .https_only(config.https_only)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Validates the request headers into a reqwest header map.
    fn build_headers(request: &HttpRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in request.headers.iter().flatten() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidHeader(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidHeader(format!("{name}: {e}")))?;
            headers.append(header_name, header_value);
        }
        Ok(headers)
    }

    fn collect_headers(headers: &HeaderMap) -> ResponseHeaders {
        let mut collected = ResponseHeaders::new();
        for (name, value) in headers {
            let value = value.to_str().unwrap_or("<binary>");
            collected
                .entry(name.to_string())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        collected
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, config: &TransportConfig) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: config.timeout_ms,
            };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lowered = format!("{error:?}").to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return TransportError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects {
                max: config.max_redirects,
            };
        }

        TransportError::Other(error.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            let (client, config) = {
                let inner = self.inner.read();
                (inner.client.clone(), inner.config.clone())
            };

            let url = request.full_url().map_err(|e| match e {
                DomainError::InvalidUrl(message) => TransportError::InvalidUrl(message),
                other => TransportError::Other(other.to_string()),
            })?;
            let headers = Self::build_headers(request)?;
            let has_content_type = headers.contains_key(CONTENT_TYPE);

            tracing::debug!(id = %request.id, method = %request.method, %url, "sending request");

            let mut builder = client
                .request(Self::to_reqwest_method(request.method), url)
                .headers(headers);

            if let Some(body) = request.body() {
                if let Some(content_type) = body.content_type.filter(|_| !has_content_type) {
                    builder = builder.header(CONTENT_TYPE, content_type);
                }
                builder = builder.body(body.content.to_owned());
            }

            let sent_at = self.clock.now();
            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, &config))?;
            let received_at = self.clock.now();

            let status = StatusCode::new(response.status().as_u16());
            let headers = Self::collect_headers(response.headers());

            let body = match response.text().await {
                Ok(text) => Some(text),
                Err(e) if status.is_success() => {
                    return Err(TransportError::Body(e.to_string()));
                }
                Err(e) => {
                    tracing::warn!(id = %request.id, %status, "failed to read error response body: {e}");
                    None
                }
            };

            tracing::debug!(id = %request.id, %status, "response received");

            Ok(TransportResponse {
                status,
                headers,
                body,
                sent_at,
                received_at,
            })
        })
    }
}
