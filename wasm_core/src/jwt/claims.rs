//! Registered claim helpers (`iat`, `exp`, `sub`) over a JSON payload.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Ordered JSON object used for both the header and the payload.
pub type Claims = Map<String, Value>;

/// Current time in whole seconds since the Unix epoch.
pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Reads a NumericDate claim. Fractional values are truncated.
pub fn numeric_claim(claims: &Claims, name: &str) -> Option<i64> {
    let value = claims.get(name)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.trunc() as i64))
}

/// A claim is missing when the key is absent or explicitly `null`.
pub(crate) fn is_missing(claims: &Claims, name: &str) -> bool {
    claims.get(name).is_none_or(Value::is_null)
}

pub fn issued_at(claims: &Claims) -> Option<i64> {
    numeric_claim(claims, "iat")
}

pub fn expires_at(claims: &Claims) -> Option<i64> {
    numeric_claim(claims, "exp")
}

pub fn subject(claims: &Claims) -> Option<&str> {
    claims.get("sub").and_then(Value::as_str)
}

/// `true` only when `exp` is present and already in the past.
pub fn is_expired(exp: Option<i64>, now: i64) -> bool {
    exp.is_some_and(|exp| now > exp)
}

/// Renders a NumericDate as RFC 3339 UTC, e.g. `2024-01-01T00:00:00Z`.
pub fn format_timestamp(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}
