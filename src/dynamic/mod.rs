//! Dynamic-configuration wire model.
//!
//! # Responsibilities
//! - Mirror the hosting proxy's dynamic-configuration schema
//!   (`{http: {routers, services, middlewares}}`, camelCase keys)
//! - Serialize one merged configuration per completed cycle
//! - Union partial configurations during the fan-in stage
//!
//! # Design Decisions
//! - BTreeMap keys: deterministic serialization, stable test output
//! - Optional blocks are omitted from the wire form when absent
//! - Keys are disjoint by construction (namespacing); on a violation,
//!   last writer wins

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One full dynamic configuration as consumed by the hosting proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicConfiguration {
    pub http: HttpConfiguration,
}

/// HTTP section of the dynamic configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfiguration {
    pub routers: BTreeMap<String, Router>,
    pub services: BTreeMap<String, Service>,
    pub middlewares: BTreeMap<String, Middleware>,
}

impl HttpConfiguration {
    /// Union another partial into this one. Later writers overwrite on
    /// key collision.
    pub fn merge(&mut self, other: HttpConfiguration) {
        self.routers.extend(other.routers);
        self.services.extend(other.services);
        self.middlewares.extend(other.middlewares);
    }

    /// True when no routers, services or middlewares are present.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty() && self.services.is_empty() && self.middlewares.is_empty()
    }
}

/// A router entry: rule, target service and optional TLS wiring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Router {
    pub rule: String,
    pub service: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middlewares: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,
}

/// TLS block referencing a named certificate resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterTls {
    pub cert_resolver: String,
}

/// A service entry backed by a load-balanced server list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub load_balancer: LoadBalancer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

/// A middleware definition. Only the redirect-scheme kind is emitted by
/// this provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Middleware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_scheme: Option<RedirectScheme>,
}

/// Permanent scheme redirect, used for the HTTP-to-HTTPS upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectScheme {
    pub scheme: String,
    pub permanent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_host_schema_shape() {
        let mut http = HttpConfiguration::default();
        http.routers.insert(
            "whoami-proxy-a".into(),
            Router {
                rule: "Host(`whoami.example.com`)".into(),
                service: "whoami-proxy-a".into(),
                middlewares: vec!["http2https".into()],
                tls: None,
            },
        );
        http.services.insert(
            "whoami-proxy-a".into(),
            Service {
                load_balancer: LoadBalancer {
                    servers: vec![Server {
                        url: "http://proxy-a:80".into(),
                    }],
                },
            },
        );
        http.middlewares.insert(
            "http2https".into(),
            Middleware {
                redirect_scheme: Some(RedirectScheme {
                    scheme: "https".into(),
                    permanent: true,
                }),
            },
        );

        let value = serde_json::to_value(DynamicConfiguration { http }).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "http": {
                    "routers": {
                        "whoami-proxy-a": {
                            "rule": "Host(`whoami.example.com`)",
                            "service": "whoami-proxy-a",
                            "middlewares": ["http2https"],
                        }
                    },
                    "services": {
                        "whoami-proxy-a": {
                            "loadBalancer": {
                                "servers": [{"url": "http://proxy-a:80"}]
                            }
                        }
                    },
                    "middlewares": {
                        "http2https": {
                            "redirectScheme": {"scheme": "https", "permanent": true}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn optional_blocks_are_omitted() {
        let router = Router {
            rule: "Host(`a`)".into(),
            service: "svc".into(),
            middlewares: Vec::new(),
            tls: None,
        };
        let value = serde_json::to_value(router).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"rule": "Host(`a`)", "service": "svc"})
        );
    }

    #[test]
    fn merge_unions_all_three_maps() {
        let mut left = HttpConfiguration::default();
        left.routers.insert("r-a".into(), Router::default());
        left.services.insert("s-a".into(), Service::default());

        let mut right = HttpConfiguration::default();
        right.routers.insert("r-b".into(), Router::default());
        right.middlewares.insert("m-b".into(), Middleware::default());

        left.merge(right);
        assert_eq!(left.routers.len(), 2);
        assert_eq!(left.services.len(), 1);
        assert_eq!(left.middlewares.len(), 1);
    }
}
