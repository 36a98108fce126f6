//! Startup connectivity preflight.
//!
//! Before any polling begins, every endpoint's reachability is verified
//! with a plain GET against the root path on both its admin and data
//! ports. A failure here is terminal at construction, not a per-cycle
//! condition. The whole probe is bounded by the configured connection
//! timeout.

use tokio::time;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::upstream::client::UpstreamClient;

/// Probe every endpoint and build the per-endpoint clients. One shared
/// HTTP client backs them all; its per-request timeout doubles as the
/// fetch timeout within a cycle.
pub(crate) async fn prepare_clients(
    config: &ProviderConfig,
) -> Result<Vec<UpstreamClient>, ProviderError> {
    let http = reqwest::Client::builder()
        .timeout(config.conn_timeout)
        .build()
        .map_err(|e| ProviderError::Config(format!("could not build HTTP client: {e}")))?;

    time::timeout(config.conn_timeout, probe_all(&http, config))
        .await
        .map_err(|_| ProviderError::Connectivity {
            url: "all endpoints".into(),
            reason: "preflight timed out".into(),
        })??;

    Ok(config
        .endpoints
        .iter()
        .map(|endpoint| {
            UpstreamClient::new(http.clone(), endpoint.clone(), config.tls_resolver.clone())
        })
        .collect())
}

async fn probe_all(http: &reqwest::Client, config: &ProviderConfig) -> Result<(), ProviderError> {
    for endpoint in &config.endpoints {
        for port in [endpoint.api_port, endpoint.web_port] {
            let url = Url::parse(&format!("http://{}:{}/", endpoint.host, port)).map_err(|e| {
                ProviderError::Connectivity {
                    url: format!("{}:{}", endpoint.host, port),
                    reason: e.to_string(),
                }
            })?;

            // Reachability only; the response status does not matter.
            http.get(url.clone())
                .send()
                .await
                .map_err(|e| ProviderError::Connectivity {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

            tracing::debug!(url = %url, "preflight probe succeeded");
        }
    }

    Ok(())
}
