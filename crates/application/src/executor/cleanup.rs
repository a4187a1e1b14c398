//! Per-request lifecycle tracking.

use std::sync::Arc;

use courier_domain::RequestState;
use futures_util::future::AbortHandle;
use parking_lot::Mutex;

use crate::ports::HttpResponseCallback;

/// Identifies one `execute` call on a [`CleanupStrategy`].
///
/// Outcomes carrying a stale ticket belong to an earlier request and are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// The single source of truth for whether a request is still wanted.
///
/// Holds the current [`RequestState`], the live transport call and the
/// registered callback. Completion ([`settle`](Self::settle)) and
/// cancellation ([`cancel`](Self::cancel)) both take the callback under the
/// same lock, so exactly one of them delivers.
#[derive(Default)]
pub struct CleanupStrategy {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    state: RequestState,
    generation: u64,
    call: Option<AbortHandle>,
    callback: Option<Arc<dyn HttpResponseCallback>>,
}

impl CleanupStrategy {
    /// Creates a strategy in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn current_state(&self) -> RequestState {
        self.inner.lock().state
    }

    /// Sets the state. Transitions are not validated; the last writer wins.
    pub fn on_state_changed(&self, state: RequestState) {
        let mut inner = self.inner.lock();
        tracing::trace!(from = %inner.state, to = %state, "request state changed");
        inner.state = state;
    }

    /// Registers the callback for a new request and marks it `Ongoing`.
    ///
    /// Any call handle left over from a previous request is forgotten, not
    /// aborted.
    pub fn register(&self, callback: Arc<dyn HttpResponseCallback>) -> Ticket {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.call = None;
        inner.callback = Some(callback);
        inner.state = RequestState::Ongoing;
        Ticket(inner.generation)
    }

    /// Records the transport call so it can be cancelled.
    pub fn attach_call(&self, ticket: Ticket, call: AbortHandle) {
        let mut inner = self.inner.lock();
        if inner.generation == ticket.0 {
            inner.call = Some(call);
        }
    }

    /// Moves the request to its final `state` and hands back the callback
    /// to deliver the outcome to.
    ///
    /// Returns `None` if the request was cancelled, already settled, or
    /// superseded by a newer request; the outcome must then be dropped.
    pub fn settle(
        &self,
        ticket: Ticket,
        state: RequestState,
    ) -> Option<Arc<dyn HttpResponseCallback>> {
        let mut inner = self.inner.lock();
        if inner.generation != ticket.0 || inner.state.is_cancelled() {
            return None;
        }
        let callback = inner.callback.take()?;
        inner.call = None;
        inner.state = state;
        Some(callback)
    }

    /// Aborts the live call, marks the request `Cancelled` and hands back
    /// the callback to notify.
    ///
    /// Returns `None` when there is no live call or it was already
    /// cancelled or completed.
    pub fn cancel(&self) -> Option<Arc<dyn HttpResponseCallback>> {
        let mut inner = self.inner.lock();
        let call = inner.call.take()?;
        if call.is_aborted() || inner.state.is_terminal() {
            return None;
        }
        call.abort();
        inner.state = RequestState::Cancelled;
        inner.callback.take()
    }
}
