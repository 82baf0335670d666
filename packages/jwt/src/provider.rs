//! Crypto provider capability.
//!
//! The engine does not perform cryptography itself. It builds signing inputs
//! and asks a [`CryptoProvider`] to import keys, sign, verify and produce
//! random bytes. Every provider call is a suspension point.

use crate::error::JwtResult;
use async_trait::async_trait;
use std::fmt;
use zeroize::Zeroizing;

/// Algorithm parameters passed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmSpec {
    /// HMAC with SHA-512
    HmacSha512,
    /// Ed25519
    Ed25519,
}

/// What an imported key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    /// Produce signatures
    Sign,
    /// Check signatures
    Verify,
}

/// Key material handed to [`CryptoProvider::import_key`].
#[derive(Debug, Clone, Copy)]
pub enum KeyImport<'a> {
    /// Raw secret bytes
    Raw(&'a [u8]),
    /// A JSON Web Key
    Jwk(&'a serde_json::Value),
}

/// Opaque imported key. Material is wiped on drop.
pub struct KeyHandle {
    algorithm: AlgorithmSpec,
    usages: Vec<KeyUsage>,
    material: Zeroizing<Vec<u8>>,
}

impl KeyHandle {
    /// Wrap key material. Intended for provider implementations.
    #[must_use]
    pub fn new(algorithm: AlgorithmSpec, usages: &[KeyUsage], material: Vec<u8>) -> Self {
        Self {
            algorithm,
            usages: usages.to_vec(),
            material: Zeroizing::new(material),
        }
    }

    /// Algorithm the key was imported for
    #[must_use]
    pub fn algorithm(&self) -> AlgorithmSpec {
        self.algorithm
    }

    /// Whether the key was imported for `usage`
    #[must_use]
    pub fn allows(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }

    /// Key bytes. Intended for provider implementations.
    #[must_use]
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

impl fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHandle")
            .field("algorithm", &self.algorithm)
            .field("usages", &self.usages)
            .field("material", &"<redacted>")
            .finish()
    }
}

/// Host cryptographic primitives.
///
/// Errors returned here are surfaced to callers as
/// [`JwtError::ProviderFailure`](crate::JwtError::ProviderFailure) and are
/// never retried. A provider that caches imported keys must make a changed
/// secret effective on the next call.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Import key material for the given algorithm and usages
    async fn import_key(
        &self,
        key: KeyImport<'_>,
        algorithm: AlgorithmSpec,
        usages: &[KeyUsage],
    ) -> JwtResult<KeyHandle>;

    /// Sign `data`
    async fn sign(&self, algorithm: AlgorithmSpec, key: &KeyHandle, data: &[u8])
    -> JwtResult<Vec<u8>>;

    /// Check `signature` over `data`
    async fn verify(
        &self,
        algorithm: AlgorithmSpec,
        key: &KeyHandle,
        signature: &[u8],
        data: &[u8],
    ) -> JwtResult<bool>;

    /// Cryptographically secure random bytes
    async fn random_bytes(&self, len: usize) -> JwtResult<Vec<u8>>;
}

#[async_trait]
impl<T: CryptoProvider + ?Sized> CryptoProvider for std::sync::Arc<T> {
    async fn import_key(
        &self,
        key: KeyImport<'_>,
        algorithm: AlgorithmSpec,
        usages: &[KeyUsage],
    ) -> JwtResult<KeyHandle> {
        (**self).import_key(key, algorithm, usages).await
    }

    async fn sign(
        &self,
        algorithm: AlgorithmSpec,
        key: &KeyHandle,
        data: &[u8],
    ) -> JwtResult<Vec<u8>> {
        (**self).sign(algorithm, key, data).await
    }

    async fn verify(
        &self,
        algorithm: AlgorithmSpec,
        key: &KeyHandle,
        signature: &[u8],
        data: &[u8],
    ) -> JwtResult<bool> {
        (**self).verify(algorithm, key, signature, data).await
    }

    async fn random_bytes(&self, len: usize) -> JwtResult<Vec<u8>> {
        (**self).random_bytes(len).await
    }
}
