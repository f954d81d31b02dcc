use std::collections::BTreeMap;

use console_error_panic_hook::set_once as set_panic_hook;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod jwt;
pub mod regex_tester;

pub use error::{Segment, ToolError};

use jwt::{Algorithm, Claims, JwtCodec, JwtConfig, SignatureScheme};
use regex_tester::{HighlightSegment, MatchResult, RegexFlags};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
}

fn js_error(err: ToolError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JwtDecodeResult {
    header: String,
    payload: String,
    signature: String,
    algorithm: String,
    is_valid: bool,
    is_expired: bool,
    subject: Option<String>,
    issued_at: Option<String>,
    expires_at: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RegexTestResult {
    flags: String,
    match_count: usize,
    matches: Vec<MatchResult>,
    segments: Vec<HighlightSegment>,
}

#[wasm_bindgen]
pub fn jwt_encode(
    header_input: &str,
    payload_input: &str,
    secret: &str,
    algorithm: &str,
) -> Result<String, JsValue> {
    jwt_encode_internal(
        header_input,
        payload_input,
        secret,
        algorithm,
        SignatureScheme::Keyed,
        jwt::now_seconds(),
    )
    .map_err(js_error)
}

/// Same as `jwt_encode` but signs with the demo scheme of the first tool version.
#[wasm_bindgen]
pub fn jwt_encode_legacy(
    header_input: &str,
    payload_input: &str,
    secret: &str,
    algorithm: &str,
) -> Result<String, JsValue> {
    jwt_encode_internal(
        header_input,
        payload_input,
        secret,
        algorithm,
        SignatureScheme::Legacy,
        jwt::now_seconds(),
    )
    .map_err(js_error)
}

#[wasm_bindgen]
pub fn jwt_decode(token: &str, secret: &str) -> Result<JsValue, JsValue> {
    jwt_decode_internal(token, secret, SignatureScheme::Keyed, jwt::now_seconds())
        .map_err(js_error)
        .and_then(|res| to_js(&res))
}

#[wasm_bindgen]
pub fn jwt_decode_legacy(token: &str, secret: &str) -> Result<JsValue, JsValue> {
    jwt_decode_internal(token, secret, SignatureScheme::Legacy, jwt::now_seconds())
        .map_err(js_error)
        .and_then(|res| to_js(&res))
}

/// `flags` is either the switch object (`{global: true, ...}`) or a letter string like `"gi"`.
#[wasm_bindgen]
pub fn regex_test(pattern: &str, flags: JsValue, subject: &str) -> Result<JsValue, JsValue> {
    let flags = flags_from_js(flags).map_err(js_error)?;
    regex_test_internal(pattern, flags, subject)
        .map_err(js_error)
        .and_then(|res| to_js(&res))
}

#[wasm_bindgen]
pub fn regex_replace(
    pattern: &str,
    flags: JsValue,
    subject: &str,
    replacement: &str,
) -> Result<String, JsValue> {
    let flags = flags_from_js(flags).map_err(js_error)?;
    regex_replace_internal(pattern, flags, subject, replacement).map_err(js_error)
}

#[wasm_bindgen]
pub fn regex_presets() -> Result<JsValue, JsValue> {
    to_js(regex_tester::PRESETS)
}

#[wasm_bindgen]
pub fn regex_flag_descriptions() -> Result<JsValue, JsValue> {
    let map: BTreeMap<&str, &str> = regex_tester::flag_descriptions().into_iter().collect();
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    map.serialize(&serializer)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn flags_from_js(value: JsValue) -> error::Result<RegexFlags> {
    if let Some(letters) = value.as_string() {
        return letters.parse();
    }
    if value.is_undefined() || value.is_null() {
        return Ok(RegexFlags::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| ToolError::InvalidFlags(err.to_string()))
}

/// Reads a header or payload object typed into the page; blank input means `{}`.
fn parse_claims_input(input: &str, segment: Segment) -> error::Result<Claims> {
    if input.trim().is_empty() {
        return Ok(Claims::new());
    }
    jwt::codec::parse_object(input.as_bytes(), segment)
}

fn jwt_encode_internal(
    header_input: &str,
    payload_input: &str,
    secret: &str,
    algorithm: &str,
    scheme: SignatureScheme,
    now: i64,
) -> error::Result<String> {
    let algorithm = match algorithm.trim() {
        "" => Algorithm::default(),
        name => name.parse()?,
    };
    let header = parse_claims_input(header_input, Segment::Header)?;
    let payload = parse_claims_input(payload_input, Segment::Payload)?;
    let codec = JwtCodec::new(JwtConfig {
        scheme,
        ..JwtConfig::default()
    });
    let encoded = codec.encode_at(header, payload, secret, algorithm, now)?;
    Ok(encoded.token)
}

fn jwt_decode_internal(
    token: &str,
    secret: &str,
    scheme: SignatureScheme,
    now: i64,
) -> error::Result<JwtDecodeResult> {
    let codec = JwtCodec::new(JwtConfig {
        scheme,
        ..JwtConfig::default()
    });
    let decoded = codec.decode(token, secret)?;
    Ok(JwtDecodeResult {
        header: pretty_json(&decoded.header)?,
        payload: pretty_json(&decoded.payload)?,
        signature: decoded.signature.clone(),
        algorithm: decoded.algorithm.to_string(),
        is_valid: decoded.is_valid,
        is_expired: decoded.is_expired(now),
        subject: decoded.subject().map(str::to_string),
        issued_at: decoded.issued_at().and_then(jwt::format_timestamp),
        expires_at: decoded.expires_at().and_then(jwt::format_timestamp),
    })
}

fn pretty_json(map: &Claims) -> error::Result<String> {
    serde_json::to_string_pretty(map).map_err(|err| ToolError::Serialization(err.to_string()))
}

fn regex_test_internal(
    pattern: &str,
    flags: RegexFlags,
    subject: &str,
) -> error::Result<RegexTestResult> {
    let compiled = regex_tester::compile(pattern, flags)?;
    let matches = regex_tester::find_all(&compiled, subject);
    let segments = regex_tester::highlight(subject, &matches);
    Ok(RegexTestResult {
        flags: flags.to_string(),
        match_count: matches.len(),
        matches,
        segments,
    })
}

fn regex_replace_internal(
    pattern: &str,
    flags: RegexFlags,
    subject: &str,
    replacement: &str,
) -> error::Result<String> {
    let compiled = regex_tester::compile(pattern, flags)?;
    Ok(regex_tester::replace(&compiled, subject, replacement))
}
