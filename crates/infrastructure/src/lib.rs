//! Courier Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, and runtime configuration.

pub mod adapters;
pub mod settings;

pub use adapters::{ReqwestTransport, SystemClock};
pub use settings::{ConfigError, ConfigLoader, CourierConfig, TransportConfig};
