//! Configuration source backed by the process environment.
//!
//! Edge runtimes hand secrets to the application as bindings rather than
//! process variables. [`EnvSource`] consults an optional bindings bag first
//! and the process environment second, so the same `JWT_*_NAME` references
//! work in both settings.

use std::collections::HashMap;
use thiserror::Error;
use tollgate_jwt::{
    CommonConfig, ConfigSource, DEFAULT_LEEWAY_SECONDS, DEFAULT_TTL_SECONDS, JWT_AUD, JWT_ISS,
    JWT_LEEWAY, JWT_TTL_SECONDS,
};

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric variable did not parse as a non-negative integer
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Variable name
        name: String,
        /// Offending value
        value: String,
    },
}

/// Process environment with an optional bindings bag in front of it.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    bindings: HashMap<String, String>,
}

impl EnvSource {
    /// Read only the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `bindings` before the process environment.
    #[must_use]
    pub fn with_bindings(bindings: HashMap<String, String>) -> Self {
        Self { bindings }
    }

    /// Add one binding.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }
}

impl ConfigSource for EnvSource {
    fn var(&self, name: &str) -> Option<String> {
        self.bindings
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .or_else(|| std::env::var(name).ok())
            .filter(|value| !value.is_empty())
    }
}

fn number(source: &dyn ConfigSource, name: &str, default: u64) -> Result<u64, ConfigError> {
    match source.var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                name: name.to_string(),
                value: raw,
            }),
    }
}

/// Build a [`CommonConfig`] from `JWT_ISS`, `JWT_AUD`, `JWT_LEEWAY` and
/// `JWT_TTL_SECONDS`.
///
/// Missing issuer or audience become empty strings; the signer rejects them.
///
/// # Errors
///
/// [`ConfigError::InvalidNumber`] for an unparsable leeway or TTL.
pub fn common_config(source: &dyn ConfigSource) -> Result<CommonConfig, ConfigError> {
    let config = CommonConfig::new(
        source.var(JWT_ISS).unwrap_or_default(),
        source.var(JWT_AUD).unwrap_or_default(),
    )
    .with_leeway(number(source, JWT_LEEWAY, DEFAULT_LEEWAY_SECONDS)?)
    .with_ttl(number(source, JWT_TTL_SECONDS, DEFAULT_TTL_SECONDS)?);

    tracing::debug!(
        iss = %config.iss,
        aud = %config.aud,
        leeway = config.leeway_seconds,
        ttl = config.ttl_seconds,
        "loaded token configuration"
    );
    Ok(config)
}
