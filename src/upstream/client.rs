//! Per-endpoint fetch and normalization.
//!
//! # Responsibilities
//! - GET the raw routing document from an endpoint's admin API
//! - Filter internal entries, namespace names with the endpoint host
//! - Rewrite backend addresses to the endpoint's data-plane address
//! - Inject the HTTPS-upgrade wiring when a resolver is configured
//!
//! # Design Decisions
//! - The raw document types are transient and private; only the
//!   normalized partial leaves this module
//! - Origin server count is preserved in the rewritten list as a
//!   load-balancing weight signal; every slot points at the one external
//!   address fronting the endpoint

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::config::Endpoint;
use crate::dynamic::{
    DynamicConfiguration, HttpConfiguration, LoadBalancer, Middleware, RedirectScheme, Router,
    RouterTls, Server, Service,
};
use crate::error::ProviderError;
use crate::lifecycle::CancelSignal;

pub(crate) const RAW_DATA_PATH: &str = "/api/rawdata";

const INTERNAL_PROVIDER_SUFFIX: &str = "@internal";
const REDIRECT_MIDDLEWARE: &str = "http2https";

/// Raw routing document as reported by one endpoint's admin API.
/// Discarded after normalization. Unknown upstream fields are tolerated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawHttpConfiguration {
    pub(crate) routers: BTreeMap<String, RawRouter>,
    pub(crate) services: BTreeMap<String, RawService>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRouter {
    pub(crate) rule: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawService {
    pub(crate) load_balancer: RawLoadBalancer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawLoadBalancer {
    pub(crate) servers: Vec<RawServer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawServer {
    pub(crate) url: String,
}

/// Client for one origin proxy instance. The HTTP client is shared
/// across all upstream clients and is safe for concurrent use.
#[derive(Clone)]
#[derive(Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    tls_resolver: Option<String>,
}

impl UpstreamClient {
    pub(crate) fn new(
        http: reqwest::Client,
        endpoint: Endpoint,
        tls_resolver: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoint,
            tls_resolver,
        }
    }

    /// Host identifying this client's endpoint.
    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    /// Fetch and normalize one partial configuration, racing against the
    /// cycle's cancellation scope.
    pub async fn fetch(
        &self,
        signal: &mut CancelSignal,
    ) -> Result<DynamicConfiguration, ProviderError> {
        tokio::select! {
            _ = signal.cancelled() => Err(ProviderError::Cancelled),
            res = self.fetch_and_normalize() => res,
        }
    }

    async fn fetch_and_normalize(&self) -> Result<DynamicConfiguration, ProviderError> {
        let raw = self.fetch_raw().await?;
        if raw.routers.is_empty() || raw.services.is_empty() {
            return Err(ProviderError::EmptyResponse {
                endpoint: self.endpoint.host.clone(),
            });
        }

        Ok(self.normalize(&raw))
    }

    async fn fetch_raw(&self) -> Result<RawHttpConfiguration, ProviderError> {
        let url = Url::parse(&format!(
            "http://{}:{}{}",
            self.endpoint.host, self.endpoint.api_port, RAW_DATA_PATH
        ))
        .map_err(|e| self.fetch_error(e))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Fetch {
                endpoint: self.endpoint.host.clone(),
                reason: format!("unexpected status {status}"),
            });
        }

        response.json().await.map_err(|e| self.fetch_error(e))
    }

    fn fetch_error(&self, err: impl std::fmt::Display) -> ProviderError {
        ProviderError::Fetch {
            endpoint: self.endpoint.host.clone(),
            reason: err.to_string(),
        }
    }

    /// Turn a raw document into this endpoint's namespaced partial.
    fn normalize(&self, raw: &RawHttpConfiguration) -> DynamicConfiguration {
        let mut http = HttpConfiguration::default();
        let data_plane = format!("http://{}:{}", self.endpoint.host, self.endpoint.web_port);

        for (key, router) in &raw.routers {
            if key.ends_with(INTERNAL_PROVIDER_SUFFIX) {
                continue;
            }

            // A router without a matching service is unroutable upstream
            // as well; drop it.
            let Some(service) = raw.services.get(key) else {
                continue;
            };

            let base = key.split('@').next().unwrap_or(key);
            let name = format!("{base}-{}", self.endpoint.host);

            let servers = service
                .load_balancer
                .servers
                .iter()
                .map(|_| Server {
                    url: data_plane.clone(),
                })
                .collect();
            http.services.insert(
                name.clone(),
                Service {
                    load_balancer: LoadBalancer { servers },
                },
            );

            let mut plain = Router {
                rule: router.rule.clone(),
                service: name.clone(),
                middlewares: Vec::new(),
                tls: None,
            };

            if let Some(resolver) = &self.tls_resolver {
                plain.middlewares.push(REDIRECT_MIDDLEWARE.into());

                http.routers.insert(
                    format!("{name}-secure"),
                    Router {
                        rule: router.rule.clone(),
                        service: name.clone(),
                        middlewares: Vec::new(),
                        tls: Some(RouterTls {
                            cert_resolver: resolver.clone(),
                        }),
                    },
                );

                http.middlewares.insert(
                    REDIRECT_MIDDLEWARE.into(),
                    Middleware {
                        redirect_scheme: Some(RedirectScheme {
                            scheme: "https".into(),
                            permanent: true,
                        }),
                    },
                );
            }

            http.routers.insert(name, plain);
        }

        DynamicConfiguration { http }
    }
}
