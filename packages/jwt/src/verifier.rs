//! Token verification.
//!
//! Anything wrong with the token itself (shape, algorithm, signature,
//! claims) yields `Ok(None)`. Only operator-side faults are errors.

use crate::{
    claims::Claims,
    codec::{decode_bytes, parse},
    config::CommonConfig,
    error::{JwtError, JwtResult},
    mode::select_mode,
    provider::{AlgorithmSpec, CryptoProvider, KeyImport, KeyUsage},
    source::{ConfigSource, resolve_hmac_secret},
    types::{AlgorithmId, Role},
    validation::validate_claims,
};

/// Verify `token` and return its full payload.
///
/// # Errors
///
/// - [`JwtError::UnsupportedAlgorithm`] when the consumer is configured for EdDSA
/// - [`JwtError::MissingKeyMaterial`] / [`JwtError::InvalidKey`] for the secret
/// - [`JwtError::ProviderFailure`] from the crypto provider
pub async fn verify(
    provider: &dyn CryptoProvider,
    source: &dyn ConfigSource,
    now: i64,
    token: &str,
    config: &CommonConfig,
) -> JwtResult<Option<Claims>> {
    let parsed = match parse(token) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(reason = %e, "token rejected");
            return Ok(None);
        }
    };

    let expected = select_mode(Role::Consumer, source);
    if parsed.header.alg() != expected {
        tracing::debug!(
            alg = %parsed.header.alg(),
            expected = %expected,
            "token rejected: algorithm mismatch"
        );
        return Ok(None);
    }

    let spec = match expected {
        AlgorithmId::Hs512 => AlgorithmSpec::HmacSha512,
        AlgorithmId::EdDsa => {
            return Err(JwtError::unsupported_algorithm(
                "EdDSA verification is not available in this runtime",
            ));
        }
    };

    let secret = resolve_hmac_secret(source)?;

    let signature = match decode_bytes(parsed.signature_segment) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => {
            tracing::debug!("token rejected: unreadable signature segment");
            return Ok(None);
        }
    };

    let key = provider
        .import_key(KeyImport::Raw(&secret), spec, &[KeyUsage::Verify])
        .await?;
    let input = parsed.signing_input();
    if !provider
        .verify(spec, &key, &signature, input.as_bytes())
        .await?
    {
        tracing::debug!("token rejected: bad signature");
        return Ok(None);
    }

    if let Err(reason) = validate_claims(&parsed.payload, config, now) {
        tracing::debug!(
            %reason,
            sub = parsed.payload.sub().unwrap_or_default(),
            "token rejected"
        );
        return Ok(None);
    }

    Ok(Some(parsed.payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::{encode_bytes, encode_segment},
        config::SignOptions,
        crypto::RustCryptoProvider,
        signer::sign,
        source::{JWT_JWKS_URL, MapSource},
        types::Header,
    };
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn source() -> MapSource {
        MapSource::hs512(encode_bytes(&[9u8; 64]))
    }

    fn config() -> CommonConfig {
        CommonConfig::new("svc", "api")
    }

    async fn mint(source: &MapSource) -> String {
        sign(
            &RustCryptoProvider::new(),
            source,
            NOW,
            Claims::builder().subject("u1").build(),
            &config(),
            &SignOptions::default(),
        )
        .await
        .unwrap()
        .into()
    }

    #[tokio::test]
    async fn accepts_own_token() {
        let source = source();
        let token = mint(&source).await;
        let claims = verify(&RustCryptoProvider::new(), &source, NOW, &token, &config())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(claims.sub(), Some("u1"));
    }

    #[tokio::test]
    async fn malformed_input_is_not_verified() {
        let source = source();
        for token in ["", "a.b", "a.b.c.d", "!!.??.xx"] {
            assert_eq!(
                verify(&RustCryptoProvider::new(), &source, NOW, token, &config())
                    .await
                    .unwrap(),
                None,
                "{token:?}"
            );
        }
    }

    #[tokio::test]
    async fn empty_signature_is_not_verified() {
        let source = source();
        let token = mint(&source).await;
        let stripped = &token[..=token.rfind('.').unwrap()];
        assert_eq!(
            verify(&RustCryptoProvider::new(), &source, NOW, stripped, &config())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn algorithm_mismatch_is_not_verified() {
        let source = source();
        let token = mint(&source).await;
        let (_, rest) = token.split_once('.').unwrap();
        let eddsa_header = encode_segment(&Header::new(AlgorithmId::EdDsa)).unwrap();
        let forged = format!("{eddsa_header}.{rest}");
        assert_eq!(
            verify(&RustCryptoProvider::new(), &source, NOW, &forged, &config())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn wrong_secret_is_not_verified() {
        let token = mint(&source()).await;
        let other = MapSource::hs512(encode_bytes(&[8u8; 64]));
        assert_eq!(
            verify(&RustCryptoProvider::new(), &other, NOW, &token, &config())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn payload_substitution_is_not_verified() {
        let source = source();
        let token = mint(&source).await;
        let parts: Vec<&str> = token.split('.').collect();
        let payload = encode_segment(&json!({
            "sub": "admin", "iss": "svc", "aud": "api", "iat": NOW, "exp": NOW + 900
        }))
        .unwrap();
        let forged = format!("{}.{payload}.{}", parts[0], parts[2]);
        assert_eq!(
            verify(&RustCryptoProvider::new(), &source, NOW, &forged, &config())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn eddsa_consumer_is_an_error() {
        let source = source();
        let token = mint(&source).await;
        let consumer = source.with(JWT_JWKS_URL, "https://issuer.example/jwks");
        let eddsa_header = encode_segment(&Header::new(AlgorithmId::EdDsa)).unwrap();
        let (_, rest) = token.split_once('.').unwrap();
        let result = verify(
            &RustCryptoProvider::new(),
            &consumer,
            NOW,
            &format!("{eddsa_header}.{rest}"),
            &config(),
        )
        .await;
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }

    #[tokio::test]
    async fn missing_secret_is_an_error() {
        let token = mint(&source()).await;
        let result = verify(
            &RustCryptoProvider::new(),
            &MapSource::new(),
            NOW,
            &token,
            &config(),
        )
        .await;
        assert!(matches!(result, Err(JwtError::MissingKeyMaterial(_))));
    }
}
