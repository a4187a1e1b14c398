//! Request lifecycle state.
//!
//! One `RequestState` tracks one in-flight request. Transitions are
//! one-directional: `Idle → Ongoing → {Successful, Failed, Cancelled}`.

use serde::{Deserialize, Serialize};

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// No request has been issued yet.
    #[default]
    Idle,

    /// The request has been handed to the transport.
    Ongoing,

    /// The request concluded with a successful response.
    Successful,

    /// The request concluded with an error.
    Failed,

    /// The request was cancelled before it concluded.
    Cancelled,
}

impl RequestState {
    /// Returns true if the state is Idle.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if a request is in flight.
    #[must_use]
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::Ongoing)
    }

    /// Returns true if the request was cancelled.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true once the request has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::Failed | Self::Cancelled)
    }

    /// Returns a lowercase label for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ongoing => "ongoing",
            Self::Successful => "successful",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
