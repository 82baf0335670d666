//! Default crypto provider backed by RustCrypto HMAC-SHA512.

use crate::{
    error::{JwtError, JwtResult},
    provider::{AlgorithmSpec, CryptoProvider, KeyHandle, KeyImport, KeyUsage},
};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// In-process provider: HMAC-SHA512 and the thread-local CSPRNG.
///
/// Ed25519 is not available here; importing an Ed25519 key fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    /// Create the provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn require(key: &KeyHandle, algorithm: AlgorithmSpec, usage: KeyUsage) -> JwtResult<()> {
    if key.algorithm() != algorithm {
        return Err(JwtError::ProviderFailure(format!(
            "key imported for {:?}, used with {algorithm:?}",
            key.algorithm()
        )));
    }
    if !key.allows(usage) {
        return Err(JwtError::ProviderFailure(format!(
            "key not imported for {usage:?}"
        )));
    }
    Ok(())
}

fn mac_for(key: &KeyHandle) -> JwtResult<HmacSha512> {
    HmacSha512::new_from_slice(key.material())
        .map_err(|_| JwtError::provider("invalid HMAC key length"))
}

#[async_trait]
impl CryptoProvider for RustCryptoProvider {
    async fn import_key(
        &self,
        key: KeyImport<'_>,
        algorithm: AlgorithmSpec,
        usages: &[KeyUsage],
    ) -> JwtResult<KeyHandle> {
        match (algorithm, key) {
            (AlgorithmSpec::HmacSha512, KeyImport::Raw(bytes)) => {
                if bytes.is_empty() {
                    return Err(JwtError::provider("empty HMAC key"));
                }
                Ok(KeyHandle::new(algorithm, usages, bytes.to_vec()))
            }
            (AlgorithmSpec::HmacSha512, KeyImport::Jwk(_)) => Err(JwtError::provider(
                "HMAC keys must be imported as raw bytes",
            )),
            (AlgorithmSpec::Ed25519, _) => Err(JwtError::unsupported_algorithm("Ed25519")),
        }
    }

    async fn sign(
        &self,
        algorithm: AlgorithmSpec,
        key: &KeyHandle,
        data: &[u8],
    ) -> JwtResult<Vec<u8>> {
        require(key, algorithm, KeyUsage::Sign)?;
        let mut mac = mac_for(key)?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    async fn verify(
        &self,
        algorithm: AlgorithmSpec,
        key: &KeyHandle,
        signature: &[u8],
        data: &[u8],
    ) -> JwtResult<bool> {
        require(key, algorithm, KeyUsage::Verify)?;
        let mut mac = mac_for(key)?;
        mac.update(data);
        // constant-time comparison
        Ok(mac.verify_slice(signature).is_ok())
    }

    async fn random_bytes(&self, len: usize) -> JwtResult<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        rand::rng().fill_bytes(&mut bytes);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 64] = [0x0b; 64];

    #[tokio::test]
    async fn signs_and_verifies() {
        let provider = RustCryptoProvider::new();
        let key = provider
            .import_key(
                KeyImport::Raw(&KEY),
                AlgorithmSpec::HmacSha512,
                &[KeyUsage::Sign, KeyUsage::Verify],
            )
            .await
            .unwrap();

        let sig = provider
            .sign(AlgorithmSpec::HmacSha512, &key, b"payload")
            .await
            .unwrap();
        assert_eq!(sig.len(), 64);
        assert!(provider
            .verify(AlgorithmSpec::HmacSha512, &key, &sig, b"payload")
            .await
            .unwrap());
        assert!(!provider
            .verify(AlgorithmSpec::HmacSha512, &key, &sig, b"payloaD")
            .await
            .unwrap());
        assert!(!provider
            .verify(AlgorithmSpec::HmacSha512, &key, &sig[..63], b"payload")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn matches_rfc4231_case_2() {
        let provider = RustCryptoProvider::new();
        let key = provider
            .import_key(KeyImport::Raw(b"Jefe"), AlgorithmSpec::HmacSha512, &[KeyUsage::Sign])
            .await
            .unwrap();
        let sig = provider
            .sign(
                AlgorithmSpec::HmacSha512,
                &key,
                b"what do ya want for nothing?",
            )
            .await
            .unwrap();
        let expected = "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
                        9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737";
        let hex: String = sig.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, expected);
    }

    #[tokio::test]
    async fn enforces_declared_usage() {
        let provider = RustCryptoProvider::new();
        let verify_only = provider
            .import_key(KeyImport::Raw(&KEY), AlgorithmSpec::HmacSha512, &[KeyUsage::Verify])
            .await
            .unwrap();
        assert!(matches!(
            provider.sign(AlgorithmSpec::HmacSha512, &verify_only, b"x").await,
            Err(JwtError::ProviderFailure(_))
        ));
    }

    #[tokio::test]
    async fn ed25519_is_not_available() {
        let provider = RustCryptoProvider::new();
        let jwk = serde_json::json!({ "kty": "OKP", "crv": "Ed25519" });
        assert!(matches!(
            provider
                .import_key(KeyImport::Jwk(&jwk), AlgorithmSpec::Ed25519, &[KeyUsage::Sign])
                .await,
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[tokio::test]
    async fn random_bytes_have_requested_length() {
        let provider = RustCryptoProvider::new();
        let a = provider.random_bytes(32).await.unwrap();
        let b = provider.random_bytes(32).await.unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
