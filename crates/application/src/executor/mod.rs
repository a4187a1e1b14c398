//! Request executor.
//!
//! [`RequestExecutor`] runs one request at a time against a [`Transport`]
//! and delivers exactly one outcome per `execute` to the registered
//! [`HttpResponseCallback`], always through its [`Dispatcher`].

mod cleanup;

use std::sync::Arc;

use courier_domain::{ErrorItem, FailureCause, HttpRequest, RequestState, ResponseItem};
use futures_util::future::{AbortHandle, Abortable};
use tokio::runtime::Handle;
use tracing::Instrument;

pub use cleanup::{CleanupStrategy, Ticket};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Dispatcher, HttpResponseCallback, Transport, TransportResponse};

/// What a finished transport call produced.
enum Outcome {
    Success(ResponseItem),
    Failure(ErrorItem),
}

impl Outcome {
    fn from_response(response: TransportResponse) -> Self {
        if response.status.is_success() {
            Self::Success(ResponseItem::from_body(
                response.status,
                response.body.unwrap_or_default(),
                response.headers,
            ))
        } else {
            let elapsed = response.elapsed();
            Self::Failure(ErrorItem::http(response.status, elapsed, response.body))
        }
    }

    const fn final_state(&self) -> RequestState {
        match self {
            Self::Success(_) => RequestState::Successful,
            Self::Failure(_) => RequestState::Failed,
        }
    }
}

/// Executes requests against a transport and delivers outcomes on a
/// designated context.
///
/// One instance supports one in-flight request at a time. Calling
/// [`execute`](Self::execute) again before the previous request concluded
/// is not supported: the earlier request's outcome is dropped and it can no
/// longer be cancelled.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    dispatcher: Arc<dyn Dispatcher>,
    runtime: Handle,
    cleanup: Arc<CleanupStrategy>,
}

impl RequestExecutor {
    /// Creates an executor that runs transport calls on the current tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NoRuntime`] when called outside a tokio
    /// runtime.
    pub fn new(
        transport: Arc<dyn Transport>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> ApplicationResult<Self> {
        let runtime =
            Handle::try_current().map_err(|e| ApplicationError::NoRuntime(e.to_string()))?;
        Ok(Self::with_runtime(transport, dispatcher, runtime))
    }

    /// Creates an executor that runs transport calls on `runtime`.
    #[must_use]
    pub fn with_runtime(
        transport: Arc<dyn Transport>,
        dispatcher: Arc<dyn Dispatcher>,
        runtime: Handle,
    ) -> Self {
        Self {
            transport,
            dispatcher,
            runtime,
            cleanup: Arc::new(CleanupStrategy::new()),
        }
    }

    /// Returns the state of the current request.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.cleanup.current_state()
    }

    /// Starts `request` and returns immediately.
    ///
    /// A missing or blank URL fails the request before this returns,
    /// without touching the transport. Otherwise the transport call runs on
    /// the runtime and its outcome is posted to the dispatcher.
    pub fn execute(&self, request: HttpRequest, callback: Arc<dyn HttpResponseCallback>) {
        let ticket = self.cleanup.register(callback);

        if request.target_url().is_none() {
            tracing::warn!(request_id = %request.id, "request has no URL");
            deliver(
                &self.cleanup,
                self.dispatcher.as_ref(),
                ticket,
                Outcome::Failure(ErrorItem::generic(FailureCause::MissingUrl)),
            );
            return;
        }

        let (abort_handle, registration) = AbortHandle::new_pair();
        self.cleanup.attach_call(ticket, abort_handle);

        let transport = Arc::clone(&self.transport);
        let dispatcher = Arc::clone(&self.dispatcher);
        let cleanup = Arc::clone(&self.cleanup);
        let span = tracing::debug_span!(
            "request",
            id = %request.id,
            method = %request.method,
        );

        tracing::debug!(parent: &span, url = ?request.url, "dispatching request");
        self.runtime.spawn(
            async move {
                let outcome = match Abortable::new(transport.send(&request), registration).await {
                    Ok(Ok(response)) => {
                        tracing::debug!(status = %response.status, "response received");
                        Outcome::from_response(response)
                    }
                    Ok(Err(error)) => {
                        tracing::debug!(%error, "transport failed");
                        Outcome::Failure(ErrorItem::generic(error))
                    }
                    Err(_aborted) => {
                        tracing::debug!("transport call aborted");
                        return;
                    }
                };
                deliver(&cleanup, dispatcher.as_ref(), ticket, outcome);
            }
            .instrument(span),
        );
    }

    /// Cancels the in-flight request.
    ///
    /// Best effort: the transport call is aborted at its next suspension
    /// point, and the remote side may still have processed it. The
    /// callback's `on_cancelled` is posted once; any result that arrives
    /// later is dropped. Does nothing if no request is in flight.
    ///
    /// A `cancel` racing `execute` from another thread, before the
    /// transport call is attached, is a no-op and the request completes
    /// normally; call it from the thread that called `execute`.
    pub fn cancel(&self) {
        let Some(callback) = self.cleanup.cancel() else {
            tracing::trace!("nothing to cancel");
            return;
        };
        tracing::info!("request cancelled");
        self.dispatcher
            .dispatch(Box::new(move || callback.on_cancelled()));
    }
}

/// The single notification path for terminal outcomes.
fn deliver(
    cleanup: &CleanupStrategy,
    dispatcher: &dyn Dispatcher,
    ticket: Ticket,
    outcome: Outcome,
) {
    let Some(callback) = cleanup.settle(ticket, outcome.final_state()) else {
        tracing::warn!("request no longer wanted, dropping its outcome");
        return;
    };

    dispatcher.dispatch(Box::new(move || match outcome {
        Outcome::Success(item) => callback.on_success(item),
        Outcome::Failure(error) => callback.on_failure(error),
    }));
}
