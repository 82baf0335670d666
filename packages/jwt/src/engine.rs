//! High-level engine tying the components to injected collaborators.

use crate::{
    claims::{Claims, PERMISSIONS, ROLES, SUB},
    clock::{Clock, SystemClock},
    config::{CommonConfig, SignOptions},
    crypto::RustCryptoProvider,
    delegate::delegated_claims,
    error::{JwtError, JwtResult},
    mode::select_mode,
    policy::{AuthDecision, PolicySpec, evaluate},
    provider::CryptoProvider,
    secret::generate_secret_with,
    signer, verifier,
    source::ConfigSource,
    types::{AlgorithmId, Role, Token},
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Token lifecycle engine.
///
/// Holds the crypto provider, the configuration source and a clock. The
/// engine keeps no other state; every call works on its own values, so a
/// clone can be shared freely across tasks.
#[derive(Clone)]
pub struct JwtEngine {
    provider: Arc<dyn CryptoProvider>,
    source: Arc<dyn ConfigSource>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEngine")
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}

impl JwtEngine {
    /// Engine over `source` using the system clock.
    pub fn new(provider: Arc<dyn CryptoProvider>, source: Arc<dyn ConfigSource>) -> Self {
        Self {
            provider,
            source,
            clock: Arc::new(SystemClock),
        }
    }

    /// Engine using [`RustCryptoProvider`] and the system clock.
    pub fn with_source(source: impl ConfigSource + 'static) -> Self {
        Self::new(Arc::new(RustCryptoProvider::new()), Arc::new(source))
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current time according to the engine clock
    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Generate a base64url secret of `len` bytes from the engine's crypto
    /// provider.
    ///
    /// # Errors
    ///
    /// [`JwtError::ProviderFailure`] from the provider.
    pub async fn generate_secret(&self, len: usize) -> JwtResult<String> {
        generate_secret_with(self.provider.as_ref(), len).await
    }

    /// Algorithm family `role` would use with the current configuration
    #[must_use]
    pub fn mode(&self, role: Role) -> AlgorithmId {
        select_mode(role, self.source.as_ref())
    }

    /// Sign as a producer with the configured TTL.
    ///
    /// # Errors
    ///
    /// See [`signer::sign`].
    pub async fn sign(&self, claims: Claims, config: &CommonConfig) -> JwtResult<Token> {
        self.sign_with(claims, config, &SignOptions::default()).await
    }

    /// Sign with explicit options.
    ///
    /// # Errors
    ///
    /// See [`signer::sign`].
    pub async fn sign_with(
        &self,
        claims: Claims,
        config: &CommonConfig,
        options: &SignOptions,
    ) -> JwtResult<Token> {
        signer::sign(
            self.provider.as_ref(),
            self.source.as_ref(),
            self.clock.now(),
            claims,
            config,
            options,
        )
        .await
    }

    /// Verify a token. `Ok(None)` means "not verified".
    ///
    /// # Errors
    ///
    /// See [`verifier::verify`].
    pub async fn verify(&self, token: &str, config: &CommonConfig) -> JwtResult<Option<Claims>> {
        verifier::verify(
            self.provider.as_ref(),
            self.source.as_ref(),
            self.clock.now(),
            token,
            config,
        )
        .await
    }

    /// Verify with the policy's base configuration, then evaluate the policy.
    ///
    /// # Errors
    ///
    /// [`JwtError::Configuration`] if the policy has no base configuration,
    /// otherwise as [`JwtEngine::verify`].
    pub async fn check_auth(
        &self,
        token: &str,
        policy: &PolicySpec,
    ) -> JwtResult<Option<AuthDecision>> {
        let config = policy
            .base()
            .ok_or_else(|| JwtError::configuration("policy has no base configuration"))?;
        Ok(self
            .verify(token, config)
            .await?
            .and_then(|claims| evaluate(&claims, policy)))
    }

    /// Mint an access token carrying `sub`, `permissions`, `roles` and any
    /// extra claims in `meta`. Reserved keys in `meta` do not override the
    /// explicit arguments.
    ///
    /// # Errors
    ///
    /// See [`signer::sign`].
    pub async fn mint_access_token(
        &self,
        subject: &str,
        permissions: &[&str],
        roles: &[&str],
        meta: Map<String, Value>,
        config: &CommonConfig,
    ) -> JwtResult<Token> {
        let mut claims = Claims::from(meta);
        claims.insert(SUB, subject);
        claims.insert(PERMISSIONS, permissions.to_vec());
        claims.insert(ROLES, roles.to_vec());
        self.sign(claims, config).await
    }

    /// Issue a token on behalf of the subject of an already-verified
    /// `original` payload, recording `actor` in the `act` chain.
    ///
    /// # Errors
    ///
    /// See [`signer::sign`].
    pub async fn create_delegated_token(
        &self,
        original: &Claims,
        actor: &str,
        config: &CommonConfig,
    ) -> JwtResult<Token> {
        tracing::info!(
            actor,
            sub = original.sub().unwrap_or_default(),
            "delegating token"
        );
        self.sign(delegated_claims(original, actor), config).await
    }
}
