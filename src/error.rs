//! Error taxonomy for the provider.
//!
//! # Design Decisions
//! - Variants carry string payloads so the type stays `Clone`; the
//!   TaskGroup hands the recorded cause out to every caller of `wait()`
//! - `Cancelled` is the expected terminal condition of an ordinary
//!   shutdown, never surfaced to the user as a failure

use thiserror::Error;

/// Errors that can occur while constructing or running the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Network, timeout or decode failure for one endpoint in one cycle.
    #[error("could not fetch raw data from {endpoint}: {reason}")]
    Fetch { endpoint: String, reason: String },

    /// Upstream answered, but reported no routers or no services.
    #[error("received empty response from {endpoint}")]
    EmptyResponse { endpoint: String },

    /// Startup reachability probe failed. Fatal at construction.
    #[error("connectivity probe failed for {url}: {reason}")]
    Connectivity { url: String, reason: String },

    /// Invalid user settings. Fatal at construction.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// `provide` was called while the poll loop is already running.
    #[error("provider is already running")]
    AlreadyRunning,

    /// A cycle ran past its per-cycle deadline.
    #[error("cycle deadline exceeded")]
    DeadlineExceeded,

    /// The output sink was dropped by the consumer.
    #[error("output channel closed")]
    OutputClosed,

    /// Cooperative cancellation. Expected on shutdown.
    #[error("cancelled")]
    Cancelled,
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
