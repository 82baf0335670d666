//! Error types for token signing, verification and policy construction.
//!
//! Verification never surfaces token-caused failures through this type: a
//! forged, expired or malformed token is reported as `Ok(None)`. The variants
//! below reach callers only for producer-side and operator-side faults.

use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Token does not have exactly three dot-separated segments
    #[error("Malformed token: expected header.payload.signature")]
    MalformedToken,

    /// A header or payload segment is not valid base64url-encoded JSON
    #[error("Malformed segment: {0}")]
    MalformedSegment(String),

    /// Header algorithm is not the one expected, or is not recognised
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The requested operation is recognised but not available in this environment
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// No usable key material could be resolved
    #[error("Missing key material: {0}")]
    MissingKeyMaterial(String),

    /// Key material was resolved but is unusable
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Claims violate a producer-side invariant
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    /// Caller-supplied configuration is incomplete or inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Policy builder received an invalid requirement
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// The crypto provider call itself failed
    #[error("Crypto provider failure: {0}")]
    ProviderFailure(String),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JwtError {
    /// Create a malformed segment error
    #[inline]
    #[must_use]
    pub fn malformed_segment(msg: &str) -> Self {
        JwtError::MalformedSegment(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create an unsupported operation error
    #[inline]
    #[must_use]
    pub fn unsupported_operation(msg: &str) -> Self {
        JwtError::UnsupportedOperation(msg.to_string())
    }

    /// Create a missing key material error
    #[inline]
    #[must_use]
    pub fn missing_key(msg: &str) -> Self {
        JwtError::MissingKeyMaterial(msg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: &str) -> Self {
        JwtError::InvalidClaims(msg.to_string())
    }

    /// Create a configuration error
    #[inline]
    #[must_use]
    pub fn configuration(msg: &str) -> Self {
        JwtError::Configuration(msg.to_string())
    }

    /// Create an invalid policy error
    #[inline]
    #[must_use]
    pub fn invalid_policy(msg: &str) -> Self {
        JwtError::InvalidPolicy(msg.to_string())
    }

    /// Create a provider failure error
    #[inline]
    #[must_use]
    pub fn provider(msg: &str) -> Self {
        JwtError::ProviderFailure(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::serialization(&err.to_string())
    }
}
