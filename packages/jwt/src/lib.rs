//! Signed authorization tokens and the policies that consume them.
//!
//! `tollgate_jwt` mints and verifies compact `header.payload.signature`
//! tokens and evaluates declarative authorization policies against their
//! verified claims:
//!
//! - **Mode selection** picks HS512 or EdDSA from the configured key material
//! - **Signing** fills issuer, audience and timing defaults and signs HS512
//! - **Verification** checks algorithm, signature, issuer, audience, expiry
//!   and not-before, reporting every token fault as `Ok(None)`
//! - **Policies** require permissions, roles and custom predicates
//!
//! Cryptography is delegated to an injected [`CryptoProvider`];
//! configuration is read through a [`ConfigSource`]. The engine itself does
//! no I/O.
//!
//! ```no_run
//! use tollgate_jwt::{Claims, CommonConfig, JwtEngine, MapSource, PolicyBuilder, generate_secret};
//!
//! # async fn run() -> tollgate_jwt::JwtResult<()> {
//! let engine = JwtEngine::with_source(MapSource::hs512(generate_secret(64)));
//! let config = CommonConfig::new("svc", "api").with_ttl(60);
//!
//! let token = engine
//!     .sign(Claims::builder().subject("u1").permissions(["read"]).build(), &config)
//!     .await?;
//!
//! let policy = PolicyBuilder::new().base(config).need_all(["read"]).build()?;
//! let decision = engine.check_auth(token.as_str(), &policy).await?;
//! assert!(decision.is_some());
//! # Ok(())
//! # }
//! ```

mod claims;
mod clock;
mod codec;
mod config;
mod crypto;
mod delegate;
mod engine;
mod error;
mod mode;
mod policy;
mod provider;
mod secret;
pub mod signer;
mod source;
mod types;
mod validation;
pub mod verifier;

pub use claims::{Claims, ClaimsBuilder, is_expiring_soon};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{ParsedToken, decode_segment, encode_segment, inspect, parse};
pub use config::{CommonConfig, DEFAULT_LEEWAY_SECONDS, DEFAULT_TTL_SECONDS, SignOptions};
pub use crypto::RustCryptoProvider;
pub use delegate::{PRESERVED_CONTEXT, delegated_claims};
pub use engine::JwtEngine;
pub use error::{JwtError, JwtResult};
pub use mode::select_mode;
pub use policy::{AuthDecision, PolicyBuilder, PolicySpec, Predicate, evaluate};
pub use provider::{AlgorithmSpec, CryptoProvider, KeyHandle, KeyImport, KeyUsage};
pub use secret::{DEFAULT_SECRET_BYTES, generate_secret, generate_secret_with, is_valid_secret};
pub use source::{
    ConfigSource, JWT_AUD, JWT_ISS, JWT_JWKS_URL, JWT_JWKS_URL_NAME, JWT_LEEWAY,
    JWT_PRIVATE_JWK, JWT_PRIVATE_JWK_NAME, JWT_PRIVATE_JWK_PATH, JWT_PUBLIC_JWK,
    JWT_PUBLIC_JWK_NAME, JWT_SECRET, JWT_SECRET_NAME, JWT_TTL_SECONDS, KeySlot,
    MIN_HS512_KEY_BYTES, MapSource, is_configured, resolve, resolve_hmac_secret,
};
pub use types::{AlgorithmId, Header, Role, Token};

/// Reserved claim names
pub mod claim_names {
    pub use crate::claims::{ACT, AUD, EXP, IAT, ISS, JTI, NBF, PERMISSIONS, ROLES, SUB};
}
