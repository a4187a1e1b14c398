//! Typed response callbacks.

use std::marker::PhantomData;

use courier_domain::{Failure, Response, Success};
use tokio::sync::mpsc;

/// Receives the typed outcome of one request.
///
/// Exactly one method is called per request, on the executor's dispatcher.
/// One callback may be shared by several requests; the envelope's
/// identifier tells them apart.
pub trait ResponseCallback<T>: Send + Sync {
    /// The request concluded successfully.
    fn on_success(&self, response: Success<T>);

    /// The request failed.
    fn on_failure(&self, failure: Failure);

    /// The request was cancelled. Ignored unless overridden.
    fn on_cancelled(&self) {}
}

/// A [`ResponseCallback`] built from two closures.
///
/// ```ignore
/// let callback = FnCallback::new(
///     |success: Success<User>| println!("{:?}", success.payload()),
///     |failure: Failure| eprintln!("{}", failure.error()),
/// );
/// ```
pub struct FnCallback<T, S, F> {
    on_success: S,
    on_failure: F,
    _payload: PhantomData<fn(T)>,
}

impl<T, S, F> FnCallback<T, S, F>
where
    S: Fn(Success<T>) + Send + Sync,
    F: Fn(Failure) + Send + Sync,
{
    /// Wraps the two closures.
    pub const fn new(on_success: S, on_failure: F) -> Self {
        Self {
            on_success,
            on_failure,
            _payload: PhantomData,
        }
    }
}

impl<T, S, F> ResponseCallback<T> for FnCallback<T, S, F>
where
    S: Fn(Success<T>) + Send + Sync,
    F: Fn(Failure) + Send + Sync,
{
    fn on_success(&self, response: Success<T>) {
        (self.on_success)(response);
    }

    fn on_failure(&self, failure: Failure) {
        (self.on_failure)(failure);
    }
}

/// Everything a [`ChannelCallback`] can forward.
#[derive(Debug)]
pub enum Delivery<T> {
    /// The request concluded with a response envelope.
    Response(Response<T>),
    /// The request was cancelled.
    Cancelled,
}

impl<T> Delivery<T> {
    /// Returns the envelope, or `None` if the request was cancelled.
    #[must_use]
    pub fn into_response(self) -> Option<Response<T>> {
        match self {
            Self::Response(response) => Some(response),
            Self::Cancelled => None,
        }
    }
}

/// A [`ResponseCallback`] that forwards outcomes into a channel, for callers
/// that prefer awaiting a result over handling callbacks.
pub struct ChannelCallback<T> {
    sender: mpsc::UnboundedSender<Delivery<T>>,
}

impl<T> ChannelCallback<T> {
    /// Creates the callback and the receiving end.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery<T>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, delivery: Delivery<T>) {
        if self.sender.send(delivery).is_err() {
            tracing::debug!("response receiver dropped");
        }
    }
}

impl<T: Send> ResponseCallback<T> for ChannelCallback<T> {
    fn on_success(&self, response: Success<T>) {
        self.forward(Delivery::Response(Response::Success(response)));
    }

    fn on_failure(&self, failure: Failure) {
        self.forward(Delivery::Response(Response::Failure(failure)));
    }

    fn on_cancelled(&self) {
        self.forward(Delivery::Cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_domain::{ErrorItem, FailureCause, StatusCode};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_fn_callback_routes_outcomes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let on_success = Arc::clone(&seen);
        let on_failure = Arc::clone(&seen);
        let callback = FnCallback::new(
            move |success: Success<u32>| on_success.lock().push(format!("ok {}", success.payload())),
            move |failure: Failure| on_failure.lock().push(format!("err {}", failure.error())),
        );

        callback.on_success(Success::new(None, StatusCode::OK, 7));
        callback.on_failure(Failure::new(None, ErrorItem::generic(FailureCause::MissingUrl)));
        callback.on_cancelled();

        assert_eq!(
            *seen.lock(),
            vec!["ok 7".to_string(), "err Url cannot be null or empty".to_string()]
        );
    }

    #[test]
    fn test_channel_callback_forwards() {
        let (callback, mut rx) = ChannelCallback::<u32>::new();

        callback.on_success(Success::new(Some("id".to_string()), StatusCode::OK, 1));
        callback.on_cancelled();

        match rx.try_recv().ok().and_then(Delivery::into_response) {
            Some(Response::Success(success)) => {
                assert_eq!(success.identifier(), Some("id"));
                assert_eq!(*success.payload(), 1);
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
        assert!(matches!(rx.try_recv(), Ok(Delivery::Cancelled)));
    }

    #[test]
    fn test_channel_callback_tolerates_dropped_receiver() {
        let (callback, rx) = ChannelCallback::<u32>::new();
        drop(rx);
        callback.on_cancelled();
    }
}
