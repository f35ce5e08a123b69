//! Configuration validation.
//!
//! Semantic checks on an already-parsed config. All errors are collected
//! and reported together, not just the first.

use std::net::SocketAddr;

use crate::config::schema::HostConfig;

/// A single semantic validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("platform.base_url {0:?} must start with http:// or https://")]
    InvalidPlatformUrl(String),

    #[error("platform.call_timeout_secs must be greater than zero")]
    ZeroPlatformTimeout,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("shutdown.grace_secs must be greater than zero")]
    ZeroGraceDelay,
}

/// Validate a configuration, returning every failure found.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let url = &config.platform.base_url;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(ValidationError::InvalidPlatformUrl(url.clone()));
    }

    if config.platform.call_timeout_secs == 0 {
        errors.push(ValidationError::ZeroPlatformTimeout);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.shutdown.grace_secs == 0 {
        errors.push(ValidationError::ZeroGraceDelay);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
