//! Key-material slots and their resolution against an injected
//! configuration source.
//!
//! The engine never reads the environment itself. A [`ConfigSource`] answers
//! variable lookups; this module layers the slot semantics on top: a direct
//! value, a name-valued slot that points at another variable, and, for
//! private keys, a file-path slot.

use crate::{
    codec::B64URL,
    error::{JwtError, JwtResult},
};
use base64::Engine;
use std::collections::HashMap;
use zeroize::Zeroizing;

/// Issuer variable
pub const JWT_ISS: &str = "JWT_ISS";
/// Audience variable
pub const JWT_AUD: &str = "JWT_AUD";
/// Leeway variable (seconds)
pub const JWT_LEEWAY: &str = "JWT_LEEWAY";
/// TTL variable (seconds)
pub const JWT_TTL_SECONDS: &str = "JWT_TTL_SECONDS";
/// HS512 shared secret, base64url
pub const JWT_SECRET: &str = "JWT_SECRET";
/// Name of the variable holding the HS512 secret
pub const JWT_SECRET_NAME: &str = "JWT_SECRET_NAME";
/// Ed25519 private JWK
pub const JWT_PRIVATE_JWK: &str = "JWT_PRIVATE_JWK";
/// Name of the variable holding the private JWK
pub const JWT_PRIVATE_JWK_NAME: &str = "JWT_PRIVATE_JWK_NAME";
/// Path of a file holding the private JWK
pub const JWT_PRIVATE_JWK_PATH: &str = "JWT_PRIVATE_JWK_PATH";
/// Ed25519 public JWK
pub const JWT_PUBLIC_JWK: &str = "JWT_PUBLIC_JWK";
/// Name of the variable holding the public JWK
pub const JWT_PUBLIC_JWK_NAME: &str = "JWT_PUBLIC_JWK_NAME";
/// JWKS endpoint
pub const JWT_JWKS_URL: &str = "JWT_JWKS_URL";
/// Name of the variable holding the JWKS endpoint
pub const JWT_JWKS_URL_NAME: &str = "JWT_JWKS_URL_NAME";

/// Minimum HS512 key length: the SHA-512 output size.
pub const MIN_HS512_KEY_BYTES: usize = 64;

/// Answers configuration variable lookups.
///
/// Implementations decide where values come from (process environment, a
/// secret store binding, a map). Empty strings are treated as unset.
pub trait ConfigSource: Send + Sync {
    /// Look up a variable
    fn var(&self, name: &str) -> Option<String>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<T> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// In-memory [`ConfigSource`] for explicit configuration and tests.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    vars: HashMap<String, String>,
}

impl MapSource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Source holding only an HS512 secret.
    #[must_use]
    pub fn hs512(secret: impl Into<String>) -> Self {
        Self::new().with(JWT_SECRET, secret)
    }
}

impl ConfigSource for MapSource {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<S: std::hash::BuildHasher + Send + Sync> ConfigSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Where a piece of key material may be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySlot {
    /// HS512 shared secret
    HmacSecret,
    /// EdDSA private key
    PrivateJwk,
    /// EdDSA public key
    PublicJwk,
    /// Remote key set
    JwksUrl,
}

impl KeySlot {
    /// Variable holding the value directly
    #[must_use]
    pub const fn direct(self) -> &'static str {
        match self {
            KeySlot::HmacSecret => JWT_SECRET,
            KeySlot::PrivateJwk => JWT_PRIVATE_JWK,
            KeySlot::PublicJwk => JWT_PUBLIC_JWK,
            KeySlot::JwksUrl => JWT_JWKS_URL,
        }
    }

    /// Variable naming the variable that holds the value
    #[must_use]
    pub const fn by_name(self) -> &'static str {
        match self {
            KeySlot::HmacSecret => JWT_SECRET_NAME,
            KeySlot::PrivateJwk => JWT_PRIVATE_JWK_NAME,
            KeySlot::PublicJwk => JWT_PUBLIC_JWK_NAME,
            KeySlot::JwksUrl => JWT_JWKS_URL_NAME,
        }
    }

    /// Variable holding a file path, for slots that have one
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            KeySlot::PrivateJwk => Some(JWT_PRIVATE_JWK_PATH),
            _ => None,
        }
    }
}

fn non_empty(source: &dyn ConfigSource, name: &str) -> Option<String> {
    source.var(name).filter(|value| !value.is_empty())
}

/// Whether anything at all is configured for the slot: a direct value, a
/// name reference (resolved or not) or a path.
#[must_use]
pub fn is_configured(source: &dyn ConfigSource, slot: KeySlot) -> bool {
    non_empty(source, slot.direct()).is_some()
        || non_empty(source, slot.by_name()).is_some()
        || slot.path().is_some_and(|p| non_empty(source, p).is_some())
}

/// Resolve a slot's value.
///
/// A name reference is followed exactly one level. If the reference does
/// not resolve, the direct value is used instead.
#[must_use]
pub fn resolve(source: &dyn ConfigSource, slot: KeySlot) -> Option<String> {
    non_empty(source, slot.by_name())
        .and_then(|name| non_empty(source, &name))
        .or_else(|| non_empty(source, slot.direct()))
}

/// Resolve the HS512 secret into key bytes.
///
/// The value is expected to be base64url. A value that does not decode is
/// used as raw UTF-8 bytes, with a warning.
///
/// # Errors
///
/// - [`JwtError::MissingKeyMaterial`] if no secret is configured
/// - [`JwtError::InvalidKey`] if the key is shorter than [`MIN_HS512_KEY_BYTES`]
pub fn resolve_hmac_secret(source: &dyn ConfigSource) -> JwtResult<Zeroizing<Vec<u8>>> {
    let secret = Zeroizing::new(resolve(source, KeySlot::HmacSecret).ok_or_else(|| {
        JwtError::missing_key("set JWT_SECRET, or JWT_SECRET_NAME naming a bound secret")
    })?);

    let bytes = match B64URL.decode(secret.as_bytes()) {
        Ok(decoded) => Zeroizing::new(decoded),
        Err(_) => {
            tracing::warn!(
                "JWT secret is not valid base64url; using raw UTF-8 bytes (not recommended)"
            );
            Zeroizing::new(secret.as_bytes().to_vec())
        }
    };

    if bytes.len() < MIN_HS512_KEY_BYTES {
        return Err(JwtError::invalid_key(&format!(
            "JWT secret too short: {} bytes, need >= {MIN_HS512_KEY_BYTES} for HS512",
            bytes.len()
        )));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_bytes;

    #[test]
    fn name_reference_is_followed_one_level() {
        let source = MapSource::new()
            .with(JWT_SECRET_NAME, "BOUND_SECRET")
            .with("BOUND_SECRET", "from-binding")
            .with(JWT_SECRET, "direct");
        assert_eq!(
            resolve(&source, KeySlot::HmacSecret).as_deref(),
            Some("from-binding")
        );
    }

    #[test]
    fn name_reference_is_not_followed_twice() {
        let source = MapSource::new()
            .with(JWT_PUBLIC_JWK_NAME, "FIRST")
            .with("FIRST", "SECOND")
            .with("SECOND", "too-deep");
        assert_eq!(resolve(&source, KeySlot::PublicJwk).as_deref(), Some("SECOND"));
    }

    #[test]
    fn unresolved_name_falls_back_to_direct_value() {
        let source = MapSource::new()
            .with(JWT_PRIVATE_JWK_NAME, "MISSING")
            .with(JWT_PRIVATE_JWK, "{\"kty\":\"OKP\"}");
        assert_eq!(
            resolve(&source, KeySlot::PrivateJwk).as_deref(),
            Some("{\"kty\":\"OKP\"}")
        );
        assert_eq!(resolve(&MapSource::new(), KeySlot::PrivateJwk), None);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let source = MapSource::new().with(JWT_SECRET, "");
        assert!(!is_configured(&source, KeySlot::HmacSecret));
        assert!(matches!(
            resolve_hmac_secret(&source),
            Err(JwtError::MissingKeyMaterial(_))
        ));
    }

    #[test]
    fn path_counts_only_for_private_keys() {
        let source = MapSource::new().with(JWT_PRIVATE_JWK_PATH, "/keys/ed25519.json");
        assert!(is_configured(&source, KeySlot::PrivateJwk));
        assert!(!is_configured(&source, KeySlot::PublicJwk));
    }

    #[test]
    fn base64url_secret_is_decoded() {
        let raw = [7u8; 64];
        let source = MapSource::hs512(encode_bytes(&raw));
        assert_eq!(resolve_hmac_secret(&source).unwrap().as_slice(), &raw);
    }

    #[test]
    fn short_secret_is_rejected() {
        let source = MapSource::hs512(encode_bytes(&[1u8; 63]));
        assert!(matches!(
            resolve_hmac_secret(&source),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn non_base64_secret_falls_back_to_utf8() {
        let secret = format!("{}!", "s".repeat(70));
        let source = MapSource::hs512(secret.clone());
        assert_eq!(
            resolve_hmac_secret(&source).unwrap().as_slice(),
            secret.as_bytes()
        );
    }
}
