//! Proxy federation provider.
//!
//! Aggregates dynamic routing configuration (routers, services,
//! middlewares) published by several independently-running reverse-proxy
//! instances into one unified configuration, re-published on a fixed
//! interval, so a front-facing proxy can treat the origin proxies as one
//! logical backend set.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │              FEDERATION PROVIDER              │
//!  origin proxy A │  ┌──────────┐                                 │
//!  /api/rawdata ──┼─▶│ upstream │──┐  one partial per endpoint    │
//!                 │  │  client  │  │                               │
//!  origin proxy B │  ├──────────┤  │   ┌───────┐    ┌──────────┐  │
//!  /api/rawdata ──┼─▶│ upstream │──┼──▶│ merge │───▶│  output  │──┼─▶ host
//!                 │  │  client  │  │   │ worker│    │  channel │  │
//!  origin proxy N │  ├──────────┤  │   └───────┘    └──────────┘  │
//!  /api/rawdata ──┼─▶│ upstream │──┘                               │
//!                 │  └──────────┘                                 │
//!                 │        ▲ one TaskGroup per cycle,             │
//!                 │        │ driven by the poll loop              │
//!                 │  ┌───────────┐  ┌────────┐  ┌─────────────┐   │
//!                 │  │ lifecycle │  │ config │  │   dynamic   │   │
//!                 │  │ TaskGroup │  │        │  │ wire model  │   │
//!                 │  └───────────┘  └────────┘  └─────────────┘   │
//!                 └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod dynamic;
pub mod provider;
pub mod upstream;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;

pub use config::{load_config, ConfigError, Endpoint, ProviderConfig};
pub use dynamic::DynamicConfiguration;
pub use error::{ProviderError, ProviderResult};
pub use lifecycle::TaskGroup;
pub use provider::Provider;
