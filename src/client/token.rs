//! Advisory checks on an opaque session token.
//!
//! Reads the claims segment without verifying the signature, so the result
//! only says whether a token is worth sending. The server decides.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// Claims object from the middle segment of a three-part token
pub fn decode_claims(token: &str) -> Option<Value> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&payload).ok()?;
    claims.is_object().then_some(claims)
}

/// `exp` claim in seconds since the epoch
pub fn token_expiry(token: &str) -> Option<i64> {
    let exp = decode_claims(token)?.get("exp")?.clone();
    exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
}

pub fn is_token_valid_at(token: &str, now: i64) -> bool {
    token_expiry(token).map(|exp| now < exp).unwrap_or(false)
}

pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, chrono::Utc::now().timestamp())
}
