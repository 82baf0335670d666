//! Per-call configuration supplied by the caller.

use crate::types::Role;

/// Default clock-skew tolerance in seconds
pub const DEFAULT_LEEWAY_SECONDS: u64 = 90;
/// Default token lifetime in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 900;

/// Issuer, audience and timing settings shared by producers and consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonConfig {
    /// Expected / default issuer
    pub iss: String,
    /// Expected / default audience
    pub aud: String,
    /// Tolerance applied to `exp` and `nbf` checks
    pub leeway_seconds: u64,
    /// Lifetime given to tokens that carry no `exp`
    pub ttl_seconds: u64,
}

impl CommonConfig {
    /// Configuration with default leeway and TTL
    pub fn new(iss: impl Into<String>, aud: impl Into<String>) -> Self {
        Self {
            iss: iss.into(),
            aud: aud.into(),
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Set the leeway.
    #[must_use]
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Set the TTL.
    #[must_use]
    pub fn with_ttl(mut self, seconds: u64) -> Self {
        self.ttl_seconds = seconds;
        self
    }
}

/// Per-call signing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Overrides [`CommonConfig::ttl_seconds`]
    pub ttl_seconds: Option<u64>,
    /// Role used for mode selection; producer unless stated otherwise
    pub role: Role,
    /// Add a random `jti` when the claims carry none
    pub with_jti: bool,
}

impl SignOptions {
    /// Set an explicit TTL.
    #[must_use]
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl_seconds = Some(seconds);
        self
    }

    /// Request a generated `jti`.
    #[must_use]
    pub fn generate_jti(mut self) -> Self {
        self.with_jti = true;
        self
    }

    /// Select the role used for mode resolution.
    #[must_use]
    pub fn for_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
