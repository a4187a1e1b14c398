//! Port definitions (interfaces)
//!
//! Ports define the boundaries between request execution and the outside
//! world. Each port is a trait implemented by adapters in the
//! infrastructure layer, or by test doubles.

mod callback;
mod clock;
mod dispatcher;
mod transport;

pub use callback::HttpResponseCallback;
pub use clock::Clock;
pub use dispatcher::{Dispatcher, Job};
pub use transport::{Transport, TransportFuture, TransportResponse};
