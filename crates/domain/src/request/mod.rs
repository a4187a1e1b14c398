//! HTTP request domain types

mod method;
mod payload;
mod spec;

pub use method::HttpMethod;
pub use payload::{OutgoingBody, RequestPayload};
pub use spec::HttpRequest;
