//! Token minting.

use crate::{
    claims::{AUD, Claims, EXP, IAT, ISS, JTI},
    codec::{encode_bytes, encode_segment, signing_input},
    config::{CommonConfig, SignOptions},
    error::{JwtError, JwtResult},
    mode::select_mode,
    provider::{AlgorithmSpec, CryptoProvider, KeyImport, KeyUsage},
    source::{ConfigSource, resolve_hmac_secret},
    types::{AlgorithmId, Header, Token},
};

/// Fill issuer, audience, issued-at, expiry and optionally `jti` where the
/// caller left them out, then check the result is signable.
pub(crate) fn apply_defaults(
    mut claims: Claims,
    config: &CommonConfig,
    options: &SignOptions,
    now: i64,
) -> JwtResult<Claims> {
    let ttl = options.ttl_seconds.unwrap_or(config.ttl_seconds);
    let ttl = i64::try_from(ttl)
        .map_err(|_| JwtError::configuration("ttl_seconds out of range"))?;

    claims.set_default(ISS, config.iss.as_str());
    claims.set_default(AUD, config.aud.as_str());
    claims.set_default(IAT, now);
    claims.set_default(EXP, now.saturating_add(ttl));
    if options.with_jti {
        claims.set_default(JTI, uuid::Uuid::new_v4().to_string());
    }

    if claims.iss().is_none_or(str::is_empty) {
        return Err(JwtError::configuration("issuer is empty after defaulting"));
    }
    if claims.aud().is_none_or(str::is_empty) {
        return Err(JwtError::configuration("audience is empty after defaulting"));
    }

    let (Some(iat), Some(exp)) = (claims.iat(), claims.exp()) else {
        return Err(JwtError::invalid_claims("iat and exp must be integers"));
    };
    if exp <= iat {
        return Err(JwtError::InvalidClaims(format!(
            "exp ({exp}) must be later than iat ({iat})"
        )));
    }

    Ok(claims)
}

/// Sign `claims` as the role given in `options`.
///
/// # Errors
///
/// - [`JwtError::UnsupportedOperation`] when the role resolves to EdDSA
/// - [`JwtError::MissingKeyMaterial`] / [`JwtError::InvalidKey`] for the secret
/// - [`JwtError::Configuration`] / [`JwtError::InvalidClaims`] for unsignable claims
/// - [`JwtError::ProviderFailure`] from the crypto provider, not retried
pub async fn sign(
    provider: &dyn CryptoProvider,
    source: &dyn ConfigSource,
    now: i64,
    claims: Claims,
    config: &CommonConfig,
    options: &SignOptions,
) -> JwtResult<Token> {
    let alg = select_mode(options.role, source);
    let claims = apply_defaults(claims, config, options, now)?;

    match alg {
        AlgorithmId::Hs512 => {
            let header_segment = encode_segment(&Header::new(alg))?;
            let payload_segment = encode_segment(&claims)?;
            let input = signing_input(&header_segment, &payload_segment);

            let secret = resolve_hmac_secret(source)?;
            let key = provider
                .import_key(
                    KeyImport::Raw(&secret),
                    AlgorithmSpec::HmacSha512,
                    &[KeyUsage::Sign],
                )
                .await?;
            let signature = provider
                .sign(AlgorithmSpec::HmacSha512, &key, input.as_bytes())
                .await?;
            if signature.is_empty() {
                return Err(JwtError::provider("provider returned an empty signature"));
            }

            tracing::info!(
                alg = %alg,
                sub = claims.sub().unwrap_or_default(),
                exp = claims.exp().unwrap_or_default(),
                "minted token"
            );
            Ok(Token::from_segments(
                &header_segment,
                &payload_segment,
                &encode_bytes(&signature),
            ))
        }
        AlgorithmId::EdDsa => Err(JwtError::unsupported_operation(
            "EdDSA signing is not available in this runtime; configure JWT_SECRET for HS512",
        )),
    }
}
