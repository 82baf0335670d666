//! Symmetric secret generation and validation.

use crate::{
    codec::{decode_bytes, encode_bytes},
    error::{JwtError, JwtResult},
    provider::CryptoProvider,
    source::MIN_HS512_KEY_BYTES,
};
use rand::RngCore;
use zeroize::Zeroizing;

/// Default secret length: matches the HS512 minimum.
pub const DEFAULT_SECRET_BYTES: usize = MIN_HS512_KEY_BYTES;

/// Generate `len` random bytes as an unpadded base64url string.
#[must_use]
pub fn generate_secret(len: usize) -> String {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    rand::rng().fill_bytes(&mut bytes);
    encode_bytes(&bytes)
}

/// Generate a secret from the provider's random source.
///
/// # Errors
///
/// [`JwtError::ProviderFailure`] if the provider fails or returns the wrong
/// number of bytes.
pub async fn generate_secret_with(provider: &dyn CryptoProvider, len: usize) -> JwtResult<String> {
    let bytes = Zeroizing::new(provider.random_bytes(len).await?);
    if bytes.len() != len {
        return Err(JwtError::provider(&format!(
            "requested {len} random bytes, provider returned {}",
            bytes.len()
        )));
    }
    Ok(encode_bytes(&bytes))
}

/// Whether `secret` base64url-decodes to at least `min_bytes` bytes.
///
/// Padded and unpadded input are both accepted. Anything that fails to
/// decode is invalid.
#[must_use]
pub fn is_valid_secret(secret: &str, min_bytes: usize) -> bool {
    decode_bytes(secret)
        .map(|bytes| Zeroizing::new(bytes).len() >= min_bytes)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secret_is_valid_at_its_length() {
        for _ in 0..32 {
            let secret = generate_secret(DEFAULT_SECRET_BYTES);
            assert!(!secret.contains('='));
            assert_eq!(secret.len(), 86);
            assert!(is_valid_secret(&secret, DEFAULT_SECRET_BYTES));
        }
    }

    #[test]
    fn one_byte_short_is_invalid() {
        let secret = generate_secret(DEFAULT_SECRET_BYTES);
        let mut bytes = decode_bytes(&secret).unwrap();
        bytes.pop();
        assert!(!is_valid_secret(&encode_bytes(&bytes), DEFAULT_SECRET_BYTES));
        assert!(is_valid_secret(&encode_bytes(&bytes), DEFAULT_SECRET_BYTES - 1));
    }

    #[test]
    fn undecodable_input_is_invalid() {
        assert!(!is_valid_secret("not base64 at all!", 1));
        assert!(!is_valid_secret("", 1));
        assert!(is_valid_secret("", 0));
    }

    #[tokio::test]
    async fn provider_backed_secret_is_valid() {
        let provider = crate::crypto::RustCryptoProvider::new();
        let secret = generate_secret_with(&provider, DEFAULT_SECRET_BYTES).await.unwrap();
        assert!(is_valid_secret(&secret, DEFAULT_SECRET_BYTES));
    }

    #[test]
    fn secrets_differ() {
        assert_ne!(generate_secret(32), generate_secret(32));
    }
}
