//! CLI error type

use thiserror::Error;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine failure
    #[error(transparent)]
    Jwt(#[from] tollgate_jwt::JwtError),

    /// Environment configuration failure
    #[error(transparent)]
    Config(#[from] tollgate_config::ConfigError),

    /// Bad `--claims` input
    #[error("invalid claims JSON: {0}")]
    Claims(serde_json::Error),

    /// Command output could not be rendered
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    /// Invalid command-line value
    #[error("{0}")]
    Usage(String),

    /// Token failed verification
    #[error("token not verified")]
    NotVerified,
}
