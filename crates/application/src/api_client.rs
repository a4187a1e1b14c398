//! Typed API client.
//!
//! [`ApiClient`] sits on top of a [`RequestExecutor`] and turns raw
//! outcomes into [`Success`] / [`Failure`] envelopes for a
//! [`ResponseCallback`]. String bodies are decoded as JSON into the
//! caller's type; body-less successes carry the caller's empty instance.

use std::sync::Arc;

use courier_domain::{
    EmptyStateInfo, ErrorItem, Failure, FailureCause, HttpRequest, RequestState, ResponseItem,
    Success,
};
use serde::de::DeserializeOwned;

use crate::callback::ResponseCallback;
use crate::executor::RequestExecutor;
use crate::ports::HttpResponseCallback;

/// Executes requests and decodes their bodies into caller types.
pub struct ApiClient {
    executor: RequestExecutor,
}

impl ApiClient {
    /// Wraps an executor.
    #[must_use]
    pub const fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Starts `request`; the outcome is delivered to `callback`.
    ///
    /// `identifier` is copied into the envelope so one callback can serve
    /// several requests. `empty` is delivered as the payload when a
    /// successful response has no body.
    pub fn execute<T, C>(
        &self,
        request: HttpRequest,
        identifier: Option<String>,
        empty: T,
        callback: Arc<C>,
    ) where
        T: DeserializeOwned + EmptyStateInfo + Clone + Send + Sync + 'static,
        C: ResponseCallback<T> + ?Sized + 'static,
    {
        let decoding = DecodingCallback {
            identifier,
            empty,
            callback,
        };
        self.executor.execute(request, Arc::new(decoding));
    }

    /// Cancels the in-flight request, if any.
    pub fn cancel(&self) {
        self.executor.cancel();
    }

    /// Returns the state of the current request.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.executor.state()
    }

    /// The underlying executor, for callers that want raw outcomes.
    #[must_use]
    pub const fn executor(&self) -> &RequestExecutor {
        &self.executor
    }
}

/// Adapts a typed callback to the executor's raw callback.
struct DecodingCallback<T, C: ?Sized> {
    identifier: Option<String>,
    empty: T,
    callback: Arc<C>,
}

impl<T, C> DecodingCallback<T, C>
where
    T: DeserializeOwned + Clone,
    C: ResponseCallback<T> + ?Sized,
{
    fn fail(&self, error: ErrorItem) {
        self.callback
            .on_failure(Failure::new(self.identifier.clone(), error));
    }
}

impl<T, C> HttpResponseCallback for DecodingCallback<T, C>
where
    T: DeserializeOwned + Clone + Send + Sync,
    C: ResponseCallback<T> + ?Sized,
{
    fn on_success(&self, response: ResponseItem) {
        match response {
            ResponseItem::StringBody { status, body, .. } => {
                match serde_json::from_str::<T>(&body) {
                    Ok(payload) => self.callback.on_success(Success::new(
                        self.identifier.clone(),
                        status,
                        payload,
                    )),
                    Err(e) => {
                        tracing::warn!(identifier = ?self.identifier, "failed to decode response body: {e}");
                        self.fail(ErrorItem::generic(FailureCause::Decode(e)));
                    }
                }
            }
            ResponseItem::EmptyBody { status, .. } => self.callback.on_success(Success::new(
                self.identifier.clone(),
                status,
                self.empty.clone(),
            )),
        }
    }

    fn on_failure(&self, error: ErrorItem) {
        self.fail(error);
    }

    fn on_cancelled(&self) {
        self.callback.on_cancelled();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use courier_domain::{Response, StatusCode, TransportError, response::ResponseHeaders};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tokio::sync::{Notify, mpsc};

    use crate::callback::{ChannelCallback, Delivery};
    use crate::dispatch::InlineDispatcher;
    use crate::ports::{Transport, TransportFuture, TransportResponse};

    #[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
    struct Decoded {
        a: i64,
    }

    impl EmptyStateInfo for Decoded {
        fn is_empty(&self) -> bool {
            *self == Self::default()
        }
    }

    struct StubTransport {
        result: Result<(u16, &'static str), TransportError>,
        gate: Option<Arc<Notify>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                result: Ok((status, body)),
                gate: None,
            }
        }
    }

    impl Transport for StubTransport {
        fn send<'a>(&'a self, _request: &'a HttpRequest) -> TransportFuture<'a> {
            Box::pin(async move {
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
                let (status, body) = self.result.clone()?;
                let now = Utc::now();
                Ok(TransportResponse {
                    status: StatusCode::new(status),
                    headers: ResponseHeaders::new(),
                    body: Some(body.to_string()),
                    sent_at: now,
                    received_at: now,
                })
            })
        }
    }

    fn client(transport: StubTransport) -> ApiClient {
        let executor =
            RequestExecutor::new(Arc::new(transport), Arc::new(InlineDispatcher)).unwrap();
        ApiClient::new(executor)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Delivery<Decoded>>) -> Delivery<Decoded> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    fn run(client: &ApiClient, request: HttpRequest) -> mpsc::UnboundedReceiver<Delivery<Decoded>> {
        let (callback, rx) = ChannelCallback::new();
        client.execute(
            request,
            Some("decoded".to_string()),
            Decoded::default(),
            Arc::new(callback),
        );
        rx
    }

    #[tokio::test]
    async fn test_decodes_json_body() {
        let client = client(StubTransport::new(200, r#"{"a":1}"#));
        let mut rx = run(&client, HttpRequest::get("https://x/y"));

        match next(&mut rx).await {
            Delivery::Response(Response::Success(success)) => {
                assert_eq!(success.identifier(), Some("decoded"));
                assert_eq!(success.status(), StatusCode::OK);
                assert_eq!(success.payload(), &Decoded { a: 1 });
                assert!(!success.is_empty());
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
        assert_eq!(client.state(), RequestState::Successful);
    }

    #[tokio::test]
    async fn test_empty_body_yields_empty_instance() {
        let client = client(StubTransport::new(204, ""));
        let mut rx = run(&client, HttpRequest::get("https://x/y"));

        match next(&mut rx).await {
            Delivery::Response(Response::Success(success)) => {
                assert_eq!(success.status(), StatusCode::NO_CONTENT);
                assert_eq!(success.payload(), &Decoded::default());
                assert!(success.is_empty());
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_generic_failure() {
        let client = client(StubTransport::new(200, "<html>oops</html>"));
        let mut rx = run(&client, HttpRequest::get("https://x/y"));

        match next(&mut rx).await {
            Delivery::Response(Response::Failure(failure)) => {
                assert_eq!(failure.identifier(), Some("decoded"));
                assert!(matches!(
                    failure.error(),
                    ErrorItem::Generic {
                        cause: FailureCause::Decode(_)
                    }
                ));
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_forwarded() {
        let client = client(StubTransport::new(404, "not found"));
        let mut rx = run(&client, HttpRequest::get("https://x/y"));

        match next(&mut rx).await.into_response().map(Response::into_result) {
            Some(Err(ErrorItem::Http { status, cause, .. })) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(cause.to_string().contains("not found"));
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_url_is_generic_failure() {
        let client = client(StubTransport::new(200, "{}"));
        let mut rx = run(&client, HttpRequest::get(""));

        assert!(matches!(
            rx.try_recv(),
            Ok(Delivery::Response(Response::Failure(_)))
        ));
    }

    #[tokio::test]
    async fn test_cancel_is_forwarded() {
        let gate = Arc::new(Notify::new());
        let client = client(StubTransport {
            result: Ok((200, "{}")),
            gate: Some(Arc::clone(&gate)),
        });
        let mut rx = run(&client, HttpRequest::get("https://x/y"));

        client.cancel();
        gate.notify_one();

        assert!(matches!(next(&mut rx).await, Delivery::Cancelled));
        assert_eq!(client.state(), RequestState::Cancelled);
    }
}
