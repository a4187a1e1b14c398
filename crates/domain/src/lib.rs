//! Courier Domain - Core request and response types
//!
//! This crate defines the domain model for the Courier HTTP executor:
//! request descriptions, status classification, the response envelope
//! handed to callers, and the lifecycle state of one in-flight request.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod state;

pub use error::{DomainError, DomainResult, TransportError};
pub use id::RequestId;
pub use request::{HttpMethod, HttpRequest, RequestPayload};
pub use response::{
    EmptyStateInfo, ErrorItem, Failure, FailureCause, HttpException, Response, ResponseItem,
    StatusCategory, StatusCode, Success,
};
pub use state::RequestState;
