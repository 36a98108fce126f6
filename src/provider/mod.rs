//! Federation provider: lifecycle surface and poll pipeline.
//!
//! # Data Flow
//! ```text
//! Provider::new
//!     validate settings → preflight probe → per-endpoint clients
//!
//! Provider::provide(out)
//!     outer TaskGroup ← poll loop (poll.rs)
//!         per tick: fresh TaskGroup
//!             N fetch workers (upstream::client) ──┐ one message each
//!             1 merge worker (merge.rs)          ◀─┘
//!         → at most one merged configuration on `out` per cycle
//!
//! Provider::stop
//!     cancel outer group → join everything → report shutdown cause
//! ```

mod merge;
mod poll;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{validate_config, ProviderConfig};
use crate::dynamic::DynamicConfiguration;
use crate::error::ProviderError;
use crate::lifecycle::TaskGroup;
use crate::provider::poll::PollLoop;
use crate::upstream::{preflight, UpstreamClient};

/// Aggregates the dynamic configuration of several origin proxy
/// instances into one unified configuration, re-published on a fixed
/// interval.
#[derive(Debug)]
pub struct Provider {
    config: ProviderConfig,
    clients: Arc<Vec<UpstreamClient>>,
    routine: TaskGroup,
    started: bool,
}

impl Provider {
    /// Validate the configuration, probe every endpoint and build the
    /// provider. Both validation and connectivity failures are terminal
    /// here; nothing starts running yet.
    pub async fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        validate_config(&config).map_err(config_error)?;

        let clients = preflight::prepare_clients(&config).await?;

        tracing::info!(
            endpoints = clients.len(),
            poll_interval = ?config.poll_interval,
            tls_resolver = config.tls_resolver.as_deref().unwrap_or("none"),
            "provider constructed"
        );

        Ok(Self {
            config,
            clients: Arc::new(clients),
            routine: TaskGroup::new(),
            started: false,
        })
    }

    /// Verify readiness. Cheap, synchronous, callable by the host before
    /// `provide`.
    pub fn init(&self) -> Result<(), ProviderError> {
        validate_config(&self.config).map_err(config_error)?;

        if self.clients.is_empty() {
            return Err(ProviderError::Config(
                "no upstream clients prepared".into(),
            ));
        }

        Ok(())
    }

    /// Start background polling. Returns immediately; one merged
    /// configuration is sent on `out` per completed cycle.
    pub fn provide(
        &mut self,
        out: mpsc::Sender<DynamicConfiguration>,
    ) -> Result<(), ProviderError> {
        if self.started {
            return Err(ProviderError::AlreadyRunning);
        }
        self.started = true;

        let poller = PollLoop::new(
            self.clients.clone(),
            self.config.poll_interval,
            out,
        );
        self.routine.spawn(move |signal| poller.run(signal));

        tracing::info!("provider polling started");
        Ok(())
    }

    /// Request shutdown and block until all background work has joined.
    /// Ordinary cancellation is not an error to the caller; any other
    /// recorded cause is.
    pub async fn stop(&mut self) -> Result<(), ProviderError> {
        self.routine.cancel(ProviderError::Cancelled);
        match self.routine.wait().await {
            ProviderError::Cancelled => Ok(()),
            cause => Err(cause),
        }
    }
}

fn config_error(errors: Vec<crate::config::ValidationError>) -> ProviderError {
    ProviderError::Config(
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    // Bypasses the preflight so lifecycle semantics can be tested
    // without a network.
    fn offline_provider(endpoints: usize) -> Provider {
        let config = ProviderConfig {
            conn_timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(20),
            endpoints: Vec::new(),
            tls_resolver: None,
        };
        let clients = (0..endpoints)
            .map(|i| {
                UpstreamClient::new(
                    reqwest::Client::new(),
                    crate::config::Endpoint {
                        host: format!("proxy-{i}"),
                        api_port: 1,
                        web_port: 1,
                    },
                    None,
                )
            })
            .collect();

        Provider {
            config,
            clients: Arc::new(clients),
            routine: TaskGroup::new(),
            started: false,
        }
    }

    #[tokio::test]
    async fn rejects_zero_endpoints_at_construction() {
        let config = ProviderConfig {
            conn_timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(100),
            endpoints: Vec::new(),
            tls_resolver: None,
        };

        let err = Provider::new(config).await.unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
        assert!(err.to_string().contains("empty endpoints"));
    }

    #[tokio::test]
    async fn provide_twice_is_rejected() {
        let mut provider = offline_provider(1);
        let (tx, _rx) = mpsc::channel(1);
        let (tx2, _rx2) = mpsc::channel(1);

        provider.provide(tx).unwrap();
        assert_eq!(
            provider.provide(tx2).unwrap_err(),
            ProviderError::AlreadyRunning
        );

        provider.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_without_provide_is_safe() {
        let mut provider = offline_provider(1);
        provider.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_unblocks_a_running_loop() {
        let mut provider = offline_provider(2);
        let (tx, _rx) = mpsc::channel(4);
        provider.provide(tx).unwrap();

        // The fetches hit unreachable hosts; stop must still return
        // within the cycle's deadline.
        tokio::time::timeout(Duration::from_secs(1), provider.stop())
            .await
            .expect("stop must not hang")
            .unwrap();
    }
}
