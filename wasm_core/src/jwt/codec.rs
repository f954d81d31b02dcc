use serde_json::Value;
use tracing::debug;

use super::algorithm::Algorithm;
use super::base64url;
use super::claims::{self, Claims};
use super::signer::{self, SignatureScheme};
use crate::error::{Result, Segment, ToolError};

/// Lifetime given to tokens whose payload carries no `exp`.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

/// Codec settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JwtConfig {
    pub scheme: SignatureScheme,
    /// Added to `iat` when the payload has no `exp` (default: one hour)
    pub default_ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            scheme: SignatureScheme::Keyed,
            default_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

/// A freshly minted token together with the header and payload that were signed.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub token: String,
    pub header: Claims,
    pub payload: Claims,
    pub signature: String,
}

/// Result of decoding a compact token.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub header: Claims,
    pub payload: Claims,
    pub signature: String,
    pub algorithm: Algorithm,
    /// Whether the signature recomputed with the supplied secret matches.
    pub is_valid: bool,
}

impl Decoded {
    pub fn issued_at(&self) -> Option<i64> {
        claims::issued_at(&self.payload)
    }

    pub fn expires_at(&self) -> Option<i64> {
        claims::expires_at(&self.payload)
    }

    pub fn subject(&self) -> Option<&str> {
        claims::subject(&self.payload)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        claims::is_expired(self.expires_at(), now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JwtCodec {
    config: JwtConfig,
}

impl JwtCodec {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn encode(
        &self,
        header: Claims,
        payload: Claims,
        secret: &str,
        algorithm: Algorithm,
    ) -> Result<Encoded> {
        self.encode_at(header, payload, secret, algorithm, claims::now_seconds())
    }

    /// Encodes with an explicit clock value (seconds since the epoch) for `iat`/`exp` defaults.
    pub fn encode_at(
        &self,
        mut header: Claims,
        mut payload: Claims,
        secret: &str,
        algorithm: Algorithm,
        now: i64,
    ) -> Result<Encoded> {
        header.insert("alg".into(), Value::from(algorithm.as_str()));
        header.insert("typ".into(), Value::from("JWT"));

        if claims::is_missing(&payload, "iat") {
            payload.insert("iat".into(), Value::from(now));
        }
        if claims::is_missing(&payload, "exp") {
            let issued = claims::issued_at(&payload).unwrap_or(now);
            let exp = issued.saturating_add(self.config.default_ttl_secs);
            payload.insert("exp".into(), Value::from(exp));
        }

        let header_encoded = base64url::encode(to_json_bytes(&header)?);
        let payload_encoded = base64url::encode(to_json_bytes(&payload)?);
        let signing_input = format!("{}.{}", header_encoded, payload_encoded);
        let signature = signer::sign(&signing_input, secret, algorithm, self.config.scheme)?;
        debug!(%algorithm, scheme = ?self.config.scheme, "encoded JWT");

        Ok(Encoded {
            token: format!("{}.{}", signing_input, signature),
            header,
            payload,
            signature,
        })
    }

    /// Parses a compact token and checks its signature against `secret`.
    ///
    /// Expiry is not enforced; see [`Decoded::is_expired`].
    pub fn decode(&self, token: &str, secret: &str) -> Result<Decoded> {
        let segments: Vec<&str> = token.trim().split('.').collect();
        let [header_part, payload_part, signature_part] = segments.as_slice() else {
            return Err(ToolError::MalformedToken {
                segments: segments.len(),
            });
        };
        if segments.iter().any(|part| part.is_empty()) {
            return Err(ToolError::MalformedToken { segments: 3 });
        }

        let header = parse_object(
            &base64url::decode_segment(header_part, Segment::Header)?,
            Segment::Header,
        )?;
        let payload = parse_object(
            &base64url::decode_segment(payload_part, Segment::Payload)?,
            Segment::Payload,
        )?;
        let algorithm = header_algorithm(&header)?;

        let signing_input = format!("{}.{}", header_part, payload_part);
        let is_valid = signer::verify(
            &signing_input,
            signature_part,
            secret,
            algorithm,
            self.config.scheme,
        )?;
        debug!(%algorithm, is_valid, "decoded JWT");

        Ok(Decoded {
            header,
            payload,
            signature: signature_part.to_string(),
            algorithm,
            is_valid,
        })
    }
}

/// Encodes with the default configuration and the current time.
pub fn encode(
    header: Claims,
    payload: Claims,
    secret: &str,
    algorithm: Algorithm,
) -> Result<Encoded> {
    JwtCodec::default().encode(header, payload, secret, algorithm)
}

/// Decodes with the default configuration.
pub fn decode(token: &str, secret: &str) -> Result<Decoded> {
    JwtCodec::default().decode(token, secret)
}

fn to_json_bytes(map: &Claims) -> Result<Vec<u8>> {
    serde_json::to_vec(map).map_err(|err| ToolError::Serialization(err.to_string()))
}

pub(crate) fn parse_object(bytes: &[u8], segment: Segment) -> Result<Claims> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| ToolError::InvalidJson {
        segment,
        reason: err.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ToolError::InvalidJson {
            segment,
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn header_algorithm(header: &Claims) -> Result<Algorithm> {
    match header.get("alg") {
        Some(Value::String(name)) => name.parse(),
        Some(other) => Err(ToolError::UnsupportedAlgorithm(other.to_string())),
        None => Err(ToolError::UnsupportedAlgorithm("(missing alg)".into())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
