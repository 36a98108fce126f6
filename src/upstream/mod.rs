//! Upstream access subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     preflight.rs probes / on both ports of every endpoint
//!     → Vec<UpstreamClient> sharing one HTTP client
//!
//! Each cycle, per endpoint:
//!     client.rs GETs /api/rawdata
//!     → decode raw document
//!     → filter @internal, namespace with -<host>, rewrite backends
//!     → one normalized partial handed to the merge stage
//! ```

pub mod client;
pub(crate) mod preflight;

pub use client::UpstreamClient;
