//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or host-provided settings
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProviderConfig (validated, immutable)
//!     → consumed once by Provider::new
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the provider's lifetime; no hot reload
//! - Durations are human-readable strings ("15s") in the file form
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{Endpoint, ProviderConfig};
pub use validation::{validate_config, ValidationError};
