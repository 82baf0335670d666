//! Token claims and a fluent builder for them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Issuer claim key
pub const ISS: &str = "iss";
/// Audience claim key
pub const AUD: &str = "aud";
/// Issued-at claim key
pub const IAT: &str = "iat";
/// Expiry claim key
pub const EXP: &str = "exp";
/// Not-before claim key
pub const NBF: &str = "nbf";
/// Subject claim key
pub const SUB: &str = "sub";
/// Token id claim key
pub const JTI: &str = "jti";
/// Actor claim key used for delegation
pub const ACT: &str = "act";
/// Permission list claim key
pub const PERMISSIONS: &str = "permissions";
/// Role list claim key
pub const ROLES: &str = "roles";

/// Token payload: a mapping from claim names to JSON values.
///
/// Reserved keys have typed accessors; every other key round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Empty claims
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Start a [`ClaimsBuilder`]
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    /// Raw value of a claim
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the claim is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a claim, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Set a claim only if it is absent or null. Returns whether it was set.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        match self.0.get(key) {
            Some(existing) if !existing.is_null() => false,
            _ => {
                self.0.insert(key.to_string(), value.into());
                true
            }
        }
    }

    /// Remove a claim
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Iterate over all claims
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no claims
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into a JSON value
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// `iss`
    #[must_use]
    pub fn iss(&self) -> Option<&str> {
        self.str_claim(ISS)
    }

    /// `aud`, when it is a single string
    #[must_use]
    pub fn aud(&self) -> Option<&str> {
        self.str_claim(AUD)
    }

    /// `sub`
    #[must_use]
    pub fn sub(&self) -> Option<&str> {
        self.str_claim(SUB)
    }

    /// `jti`
    #[must_use]
    pub fn jti(&self) -> Option<&str> {
        self.str_claim(JTI)
    }

    /// `iat` in epoch seconds
    #[must_use]
    pub fn iat(&self) -> Option<i64> {
        self.int_claim(IAT)
    }

    /// `exp` in epoch seconds
    #[must_use]
    pub fn exp(&self) -> Option<i64> {
        self.int_claim(EXP)
    }

    /// `nbf` in epoch seconds
    #[must_use]
    pub fn nbf(&self) -> Option<i64> {
        self.int_claim(NBF)
    }

    /// `permissions`; absent or non-list values read as empty.
    #[must_use]
    pub fn permissions(&self) -> Vec<String> {
        self.string_list(PERMISSIONS)
    }

    /// `roles`; absent or non-list values read as empty.
    #[must_use]
    pub fn roles(&self) -> Vec<String> {
        self.string_list(ROLES)
    }

    fn str_claim(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn int_claim(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Claims {
    type Error = crate::error::JwtError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(crate::error::JwtError::invalid_claims(
                "claims must be a JSON object",
            )),
        }
    }
}

/// Whether `exp` falls within `seconds` of `now` (inclusive). A missing `exp`
/// counts as already expiring.
#[must_use]
pub fn is_expiring_soon(claims: &Claims, seconds: i64, now: i64) -> bool {
    claims.exp().unwrap_or(0).saturating_sub(now) <= seconds
}

/// Fluent builder for [`Claims`].
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    /// Set the subject (sub) claim.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.claims.insert(SUB, sub.into());
        self
    }

    /// Set the issuer (iss) claim.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.claims.insert(ISS, iss.into());
        self
    }

    /// Set the audience (aud) claim.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.claims.insert(AUD, aud.into());
        self
    }

    /// Set the issued-at (iat) claim.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.claims.insert(IAT, iat);
        self
    }

    /// Set the expiry (exp) claim.
    #[must_use]
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.claims.insert(EXP, exp);
        self
    }

    /// Set the not-before (nbf) claim.
    #[must_use]
    pub fn not_before(mut self, nbf: i64) -> Self {
        self.claims.insert(NBF, nbf);
        self
    }

    /// Set the token id (jti) claim.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.claims.insert(JTI, jti.into());
        self
    }

    /// Append permissions.
    #[must_use]
    pub fn permissions<I, S>(self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend_list(PERMISSIONS, permissions)
    }

    /// Append roles.
    #[must_use]
    pub fn roles<I, S>(self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend_list(ROLES, roles)
    }

    /// Add an application claim.
    #[must_use]
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key, value);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Claims {
        self.claims
    }

    fn extend_list<I, S>(mut self, key: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut current = match self.claims.remove(key) {
            Some(Value::Array(existing)) => existing,
            _ => Vec::new(),
        };
        current.extend(items.into_iter().map(|item| Value::String(item.into())));
        self.claims.insert(key, Value::Array(current));
        self
    }
}
