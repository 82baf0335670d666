//! Algorithm mode selection.

use crate::{
    source::{ConfigSource, KeySlot, is_configured},
    types::{AlgorithmId, Role},
};

/// Decide which algorithm family applies for `role` given the key material
/// configured in `source`.
///
/// Producers use EdDSA when any private-key slot is populated; consumers when
/// a public key or key-set URL is. Everything else falls back to HS512, and a
/// missing secret is reported later by the signer or verifier.
#[must_use]
pub fn select_mode(role: Role, source: &dyn ConfigSource) -> AlgorithmId {
    let asymmetric = match role {
        Role::Producer => is_configured(source, KeySlot::PrivateJwk),
        Role::Consumer => {
            is_configured(source, KeySlot::PublicJwk) || is_configured(source, KeySlot::JwksUrl)
        }
    };

    if asymmetric {
        AlgorithmId::EdDsa
    } else {
        AlgorithmId::Hs512
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::*;

    #[test]
    fn defaults_to_hs512() {
        let source = MapSource::new();
        assert_eq!(select_mode(Role::Producer, &source), AlgorithmId::Hs512);
        assert_eq!(select_mode(Role::Consumer, &source), AlgorithmId::Hs512);
    }

    #[test]
    fn producer_detects_every_private_key_slot() {
        for var in [JWT_PRIVATE_JWK, JWT_PRIVATE_JWK_NAME, JWT_PRIVATE_JWK_PATH] {
            let source = MapSource::new().with(var, "x");
            assert_eq!(select_mode(Role::Producer, &source), AlgorithmId::EdDsa, "{var}");
        }
    }

    #[test]
    fn consumer_detects_public_key_and_jwks_slots() {
        for var in [
            JWT_PUBLIC_JWK,
            JWT_PUBLIC_JWK_NAME,
            JWT_JWKS_URL,
            JWT_JWKS_URL_NAME,
        ] {
            let source = MapSource::new().with(var, "x");
            assert_eq!(select_mode(Role::Consumer, &source), AlgorithmId::EdDsa, "{var}");
        }
    }

    #[test]
    fn roles_ignore_the_other_side_keys() {
        let public_only = MapSource::new().with(JWT_PUBLIC_JWK, "{}");
        assert_eq!(select_mode(Role::Producer, &public_only), AlgorithmId::Hs512);

        let private_only = MapSource::new().with(JWT_PRIVATE_JWK, "{}");
        assert_eq!(select_mode(Role::Consumer, &private_only), AlgorithmId::Hs512);
    }
}
