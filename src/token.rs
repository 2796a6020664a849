use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token does not have three dot-separated segments")]
    InvalidFormat,

    #[error("token payload is not base64url-encoded JSON")]
    UndecodablePayload,

    #[error("token payload has no usable sub claim")]
    MissingSubjectClaim,
}

/// Reads the `sub` claim out of a compact token WITHOUT verifying the
/// signature or expiry. The upstream issued the token and is trusted at face
/// value; the claim is only used to address upstream calls, never as an
/// authentication check.
pub fn decode_subject_unverified(token: &str) -> Result<i64, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::InvalidFormat);
    }

    let claims = decode_claims(segments[1])?;

    match claims.get("sub") {
        Some(Value::Number(n)) => n.as_i64().ok_or(TokenError::MissingSubjectClaim),
        Some(Value::String(s)) => s.parse().map_err(|_| TokenError::MissingSubjectClaim),
        _ => Err(TokenError::MissingSubjectClaim),
    }
}

fn decode_claims(segment: &str) -> Result<Value, TokenError> {
    // Compact tokens strip base64 padding; restore it before decoding.
    let mut padded = segment.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|_| TokenError::UndecodablePayload)?;

    serde_json::from_slice(&bytes).map_err(|_| TokenError::UndecodablePayload)
}
