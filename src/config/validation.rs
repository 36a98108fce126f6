//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Non-empty endpoint list, non-empty hosts, non-zero ports
//! - Positive timeout and poll interval
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the parsed config
//! - Runs once, before the provider is constructed

use thiserror::Error;

use crate::config::schema::ProviderConfig;

/// One semantic problem found in the provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty endpoints")]
    EmptyEndpoints,

    #[error("empty #{index} endpoint host")]
    EmptyHost { index: usize },

    #[error("empty #{index} endpoint apiPort")]
    InvalidApiPort { index: usize },

    #[error("empty #{index} endpoint webPort")]
    InvalidWebPort { index: usize },

    #[error("wrong connection timeout: must be positive")]
    NonPositiveConnTimeout,

    #[error("wrong poll interval: must be positive")]
    NonPositivePollInterval,
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &ProviderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.conn_timeout.is_zero() {
        errors.push(ValidationError::NonPositiveConnTimeout);
    }

    if config.poll_interval.is_zero() {
        errors.push(ValidationError::NonPositivePollInterval);
    }

    if config.endpoints.is_empty() {
        errors.push(ValidationError::EmptyEndpoints);
    }

    for (index, endpoint) in config.endpoints.iter().enumerate() {
        if endpoint.host.is_empty() {
            errors.push(ValidationError::EmptyHost { index });
        }
        if endpoint.api_port == 0 {
            errors.push(ValidationError::InvalidApiPort { index });
        }
        if endpoint.web_port == 0 {
            errors.push(ValidationError::InvalidWebPort { index });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::schema::Endpoint;

    fn valid_config() -> ProviderConfig {
        ProviderConfig {
            conn_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_secs(5),
            endpoints: vec![Endpoint {
                host: "proxy-a".into(),
                api_port: 8080,
                web_port: 80,
            }],
            tls_resolver: None,
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_empty_endpoint_list() {
        let mut config = valid_config();
        config.endpoints.clear();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptyEndpoints]
        );
    }

    #[test]
    fn collects_all_errors() {
        let mut config = valid_config();
        config.poll_interval = Duration::ZERO;
        config.endpoints[0].host.clear();
        config.endpoints[0].web_port = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NonPositivePollInterval));
        assert!(errors.contains(&ValidationError::EmptyHost { index: 0 }));
        assert!(errors.contains(&ValidationError::InvalidWebPort { index: 0 }));
    }
}
