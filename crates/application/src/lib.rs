//! Courier Application - Request execution and response dispatch
//!
//! This crate defines the application layer with:
//! - Port traits for the transport, the clock and the delivery context
//! - The request executor and its cleanup strategy
//! - The typed API client that decodes bodies into caller types

pub mod api_client;
pub mod callback;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod ports;

pub use api_client::ApiClient;
pub use callback::{ChannelCallback, Delivery, FnCallback, ResponseCallback};
pub use dispatch::{EventLoop, EventLoopHandle, InlineDispatcher};
pub use error::{ApplicationError, ApplicationResult};
pub use executor::{CleanupStrategy, RequestExecutor};
pub use ports::{
    Clock, Dispatcher, HttpResponseCallback, Job, Transport, TransportFuture, TransportResponse,
};
