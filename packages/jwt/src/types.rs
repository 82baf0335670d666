//! Core token type definitions

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signing algorithm family carried in the `alg` header.
///
/// This is a closed set: adding a variant forces every signing and
/// verification `match` to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmId {
    /// HMAC using SHA-512 with a shared secret
    #[serde(rename = "HS512")]
    Hs512,
    /// Ed25519 signatures. Recognised, but signing is not available here.
    #[serde(rename = "EdDSA")]
    EdDsa,
}

impl AlgorithmId {
    /// Header `alg` value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::Hs512 => "HS512",
            AlgorithmId::EdDsa => "EdDSA",
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = JwtError;

    fn from_str(s: &str) -> JwtResult<Self> {
        match s {
            "HS512" => Ok(AlgorithmId::Hs512),
            "EdDSA" => Ok(AlgorithmId::EdDsa),
            other => Err(JwtError::unsupported_algorithm(other)),
        }
    }
}

/// Which side of the exchange a call is made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Mints tokens
    #[default]
    Producer,
    /// Verifies tokens
    Consumer,
}

/// JWT header structure. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    alg: AlgorithmId,
    typ: &'static str,
}

impl Header {
    /// Create a header for the given algorithm with `typ: "JWT"`.
    #[must_use]
    pub const fn new(alg: AlgorithmId) -> Self {
        Self { alg, typ: "JWT" }
    }

    /// Algorithm family
    #[must_use]
    pub const fn alg(&self) -> AlgorithmId {
        self.alg
    }

    /// Token type
    #[must_use]
    pub const fn typ(&self) -> &'static str {
        self.typ
    }
}

/// Wire form of a header as received; `alg` is kept as text so unknown
/// algorithms surface as [`JwtError::UnsupportedAlgorithm`].
#[derive(Debug, Deserialize)]
pub(crate) struct RawHeader {
    pub(crate) alg: String,
}

impl TryFrom<RawHeader> for Header {
    type Error = JwtError;

    fn try_from(raw: RawHeader) -> JwtResult<Self> {
        Ok(Header::new(raw.alg.parse()?))
    }
}

/// A signed token: `header.payload.signature`, each segment base64url.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub(crate) fn from_segments(header: &str, payload: &str, signature: &str) -> Self {
        let mut jwt = String::with_capacity(header.len() + payload.len() + signature.len() + 2);
        jwt.push_str(header);
        jwt.push('.');
        jwt.push_str(payload);
        jwt.push('.');
        jwt.push_str(signature);
        Self(jwt)
    }

    /// Borrow the compact serialization
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three raw segments
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
