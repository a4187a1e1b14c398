//! Response domain types
//!
//! Raw transport payloads ([`ResponseItem`]), the error taxonomy
//! ([`ErrorItem`]) and the caller-facing envelope ([`Response`]).

mod envelope;
mod error_item;
mod item;
mod status;

pub use envelope::{EmptyStateInfo, Failure, Response, Success};
pub use error_item::{ErrorItem, FailureCause, HttpException};
pub use item::{ResponseHeaders, ResponseItem};
pub use status::{StatusCategory, StatusCode};
