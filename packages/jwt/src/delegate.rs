//! Actor-claim delegation (RFC 8693 `act`).

use crate::claims::{ACT, Claims, PERMISSIONS, ROLES, SUB};
use serde_json::{Map, Value};

/// User-context claims carried into a delegated token.
pub const PRESERVED_CONTEXT: [&str; 6] = ["email", "name", "groups", "tid", "org_id", "department"];

fn present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Build the payload of a token that `actor` issues on behalf of the subject
/// of `original`.
///
/// Subject, permissions and roles are kept. Issuer, audience and timing are
/// left for the signer to fill. An existing `act` is nested under the new one
/// so the full delegation chain stays visible.
#[must_use]
pub fn delegated_claims(original: &Claims, actor: &str) -> Claims {
    let mut out = Claims::new();

    if let Some(sub) = original.get(SUB).filter(|v| present(v)) {
        out.insert(SUB, sub.clone());
    }
    out.insert(PERMISSIONS, original.permissions());
    out.insert(ROLES, original.roles());

    let mut act = Map::new();
    act.insert(SUB.to_string(), Value::String(actor.to_string()));
    if let Some(previous) = original.get(ACT).filter(|v| present(v)) {
        act.insert(ACT.to_string(), previous.clone());
    }
    out.insert(ACT, Value::Object(act));

    for key in PRESERVED_CONTEXT {
        if let Some(value) = original.get(key).filter(|v| present(v)) {
            out.insert(key, value.clone());
        }
    }

    out
}
