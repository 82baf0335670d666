//! Segment encoding and token parsing.
//!
//! Segments are compact JSON, base64url-encoded without padding. Decoding
//! accepts input with or without padding.

use crate::{
    claims::Claims,
    error::{JwtError, JwtResult},
    types::{Header, RawHeader},
};
use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Serialize, de::DeserializeOwned};

/// base64url engine: unpadded output, padding-indifferent input.
pub(crate) const B64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode raw bytes as unpadded base64url
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    B64URL.encode(bytes)
}

/// Decode base64url (padded or not) into raw bytes
///
/// # Errors
///
/// Returns [`JwtError::MalformedSegment`] if the input is not base64url.
pub fn decode_bytes(segment: &str) -> JwtResult<Vec<u8>> {
    B64URL
        .decode(segment)
        .map_err(|e| JwtError::malformed_segment(&format!("invalid base64url: {e}")))
}

/// Serialize a value to compact JSON and encode it as a segment
///
/// # Errors
///
/// Returns [`JwtError::Serialization`] if the value cannot be serialized.
pub fn encode_segment<T: Serialize + ?Sized>(value: &T) -> JwtResult<String> {
    let json = serde_json::to_vec(value)?;
    Ok(encode_bytes(&json))
}

/// Decode a segment and parse it as JSON
///
/// # Errors
///
/// Returns [`JwtError::MalformedSegment`] on invalid base64url or invalid JSON.
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> JwtResult<T> {
    let bytes = decode_bytes(segment)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::malformed_segment(&format!("invalid JSON: {e}")))
}

/// A token split into its decoded header and payload, keeping the raw
/// segments so the signing input can be rebuilt byte-for-byte.
#[derive(Debug, Clone)]
pub struct ParsedToken<'a> {
    /// Decoded header
    pub header: Header,
    /// Decoded payload
    pub payload: Claims,
    /// Raw header segment
    pub header_segment: &'a str,
    /// Raw payload segment
    pub payload_segment: &'a str,
    /// Raw signature segment, not decoded
    pub signature_segment: &'a str,
}

impl ParsedToken<'_> {
    /// `headerSegment "." payloadSegment`
    #[must_use]
    pub fn signing_input(&self) -> String {
        signing_input(self.header_segment, self.payload_segment)
    }
}

/// Split a token and decode its header and payload.
///
/// # Errors
///
/// - [`JwtError::MalformedToken`] unless there are exactly three segments
/// - [`JwtError::MalformedSegment`] if the header or payload does not decode
/// - [`JwtError::UnsupportedAlgorithm`] if the header names an unknown algorithm
pub fn parse(token: &str) -> JwtResult<ParsedToken<'_>> {
    let mut parts = token.split('.');
    let (Some(header_segment), Some(payload_segment), Some(signature_segment), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(JwtError::MalformedToken);
    };

    let raw_header: RawHeader = decode_segment(header_segment)?;
    let header = Header::try_from(raw_header)?;
    let payload: Claims = decode_segment(payload_segment)?;

    Ok(ParsedToken {
        header,
        payload,
        header_segment,
        payload_segment,
        signature_segment,
    })
}

/// Decode header and payload without checking anything. For debugging and
/// tooling only: the result is untrusted.
///
/// # Errors
///
/// Same as [`parse`].
pub fn inspect(token: &str) -> JwtResult<(Header, Claims)> {
    let parsed = parse(token)?;
    Ok((parsed.header, parsed.payload))
}

pub(crate) fn signing_input(header_segment: &str, payload_segment: &str) -> String {
    let mut input = String::with_capacity(header_segment.len() + 1 + payload_segment.len());
    input.push_str(header_segment);
    input.push('.');
    input.push_str(payload_segment);
    input
}
