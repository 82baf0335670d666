//! Claims validation applied after a signature has been accepted.

use crate::{claims::Claims, config::CommonConfig};
use std::fmt;

/// Why a verified payload was refused. Logged, never returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    Issuer,
    Audience,
    Expired,
    NotYetValid,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::Issuer => "issuer mismatch",
            Rejection::Audience => "audience mismatch",
            Rejection::Expired => "expired",
            Rejection::NotYetValid => "not yet valid",
        })
    }
}

/// Check issuer, audience and the time window.
///
/// Both time bounds are inclusive: `now <= exp + leeway` and
/// `now + leeway >= nbf`. `nbf` falls back to `iat`, then to 0. A payload
/// without a numeric `exp` is treated as expired at epoch 0.
pub(crate) fn validate_claims(
    claims: &Claims,
    config: &CommonConfig,
    now: i64,
) -> Result<(), Rejection> {
    if claims.iss() != Some(config.iss.as_str()) {
        return Err(Rejection::Issuer);
    }
    if claims.aud() != Some(config.aud.as_str()) {
        return Err(Rejection::Audience);
    }

    let leeway = i64::try_from(config.leeway_seconds).unwrap_or(i64::MAX);
    let exp = claims.exp().unwrap_or(0);
    if now > exp.saturating_add(leeway) {
        return Err(Rejection::Expired);
    }

    let nbf = claims.nbf().or_else(|| claims.iat()).unwrap_or(0);
    if now.saturating_add(leeway) < nbf {
        return Err(Rejection::NotYetValid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn config() -> CommonConfig {
        CommonConfig::new("svc", "api").with_leeway(90)
    }

    fn claims() -> crate::claims::ClaimsBuilder {
        Claims::builder()
            .issuer("svc")
            .audience("api")
            .issued_at(NOW)
            .expires_at(NOW + 60)
    }

    #[test]
    fn accepts_matching_payload() {
        assert_eq!(validate_claims(&claims().build(), &config(), NOW), Ok(()));
    }

    #[test]
    fn issuer_and_audience_are_exact() {
        for (iss, aud, expected) in [
            ("svc ", "api", Rejection::Issuer),
            ("SVC", "api", Rejection::Issuer),
            ("svc", "API", Rejection::Audience),
            ("svc", "api\n", Rejection::Audience),
        ] {
            let payload = claims().issuer(iss).audience(aud).build();
            assert_eq!(validate_claims(&payload, &config(), NOW), Err(expected));
        }
    }

    #[test]
    fn missing_issuer_is_rejected() {
        let mut payload = claims().build();
        payload.remove("iss");
        assert_eq!(
            validate_claims(&payload, &config(), NOW),
            Err(Rejection::Issuer)
        );
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let at_edge = claims().issued_at(NOW - 600).expires_at(NOW - 90).build();
        assert_eq!(validate_claims(&at_edge, &config(), NOW), Ok(()));

        let past_edge = claims().issued_at(NOW - 600).expires_at(NOW - 91).build();
        assert_eq!(
            validate_claims(&past_edge, &config(), NOW),
            Err(Rejection::Expired)
        );
    }

    #[test]
    fn not_before_boundary_is_inclusive() {
        let at_edge = claims().not_before(NOW + 90).expires_at(NOW + 600).build();
        assert_eq!(validate_claims(&at_edge, &config(), NOW), Ok(()));

        let past_edge = claims().not_before(NOW + 91).expires_at(NOW + 600).build();
        assert_eq!(
            validate_claims(&past_edge, &config(), NOW),
            Err(Rejection::NotYetValid)
        );
    }

    #[test]
    fn not_before_falls_back_to_issued_at() {
        let future_iat = claims().issued_at(NOW + 91).expires_at(NOW + 600).build();
        assert_eq!(
            validate_claims(&future_iat, &config(), NOW),
            Err(Rejection::NotYetValid)
        );
    }

    #[test]
    fn missing_expiry_counts_as_expired() {
        let mut payload = claims().build();
        payload.remove("exp");
        assert_eq!(
            validate_claims(&payload, &config(), NOW),
            Err(Rejection::Expired)
        );
    }
}
