//! Provider configuration schema.
//!
//! Field names on the wire are camelCase, matching the settings document
//! the hosting proxy hands to this provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One origin reverse-proxy instance.
///
/// Immutable after construction. The admin API is served on `api_port`,
/// the data plane on `web_port`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub host: String,
    pub api_port: u16,
    pub web_port: u16,
}

/// Root configuration for the federation provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Overall timeout for the startup connectivity probe, and the
    /// per-request timeout for upstream fetches.
    #[serde(with = "duration_str")]
    pub conn_timeout: Duration,

    /// Interval between poll cycles. Also bounds the duration of one
    /// cycle.
    #[serde(with = "duration_str")]
    pub poll_interval: Duration,

    /// Origin proxy instances to aggregate.
    pub endpoints: Vec<Endpoint>,

    /// Certificate resolver for the HTTPS-upgrade wiring. When absent, no
    /// "-secure" routers and no redirect middleware are produced.
    #[serde(default)]
    pub tls_resolver: Option<String>,
}

/// Serde adapter for human-readable duration strings ("15s", "1m30s",
/// "250ms"), the same notation the original settings format used.
pub(crate) mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(de)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse a sequence of `<integer><unit>` segments, units `h`, `m`,
    /// `s`, `ms`.
    pub fn parse_duration(raw: &str) -> Result<Duration, String> {
        let input = raw.trim();
        if input.is_empty() {
            return Err("empty duration".into());
        }

        let mut total = Duration::ZERO;
        let mut rest = input;
        while !rest.is_empty() {
            let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return Err(format!("invalid duration {raw:?}"));
            }
            let value: u64 = rest[..digits]
                .parse()
                .map_err(|_| format!("invalid duration {raw:?}"))?;
            rest = &rest[digits..];

            let unit = rest
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .count();
            let segment = match &rest[..unit] {
                "ms" => Duration::from_millis(value),
                "s" => Duration::from_secs(value),
                "m" => Duration::from_secs(value * 60),
                "h" => Duration::from_secs(value * 3600),
                _ => return Err(format!("invalid duration unit in {raw:?}")),
            };
            rest = &rest[unit..];
            total += segment;
        }

        Ok(total)
    }

    pub fn format_duration(d: Duration) -> String {
        let ms = d.as_millis();
        if ms == 0 {
            "0s".into()
        } else if ms % 1000 != 0 {
            format!("{ms}ms")
        } else if ms % 60_000 != 0 {
            format!("{}s", ms / 1000)
        } else {
            format!("{}m", ms / 60_000)
        }
    }
}
