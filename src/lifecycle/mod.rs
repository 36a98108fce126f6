//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Provider::provide
//!     → outer TaskGroup runs the poll loop
//!
//! Each poll cycle:
//!     fresh TaskGroup → fetch workers + merge worker
//!     first failure or deadline → cancel siblings → join → cause
//!
//! Provider::stop
//!     → cancel outer group → wait for every task to join
//! ```

pub mod group;

pub use group::{CancelSignal, TaskGroup};
