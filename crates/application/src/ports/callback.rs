//! Raw outcome callback

use courier_domain::{ErrorItem, ResponseItem};

/// Receives the raw outcome of one request from the executor.
///
/// Exactly one of the three methods is called per `execute`, always on the
/// executor's dispatcher.
pub trait HttpResponseCallback: Send + Sync {
    /// The transport returned a 2xx response.
    fn on_success(&self, response: ResponseItem);

    /// The request failed with an HTTP error or any other error.
    fn on_failure(&self, error: ErrorItem);

    /// The request was cancelled before it concluded.
    fn on_cancelled(&self);
}
