//! Base64URL (RFC 4648 §5) as used by compact JWTs: `-`/`_` alphabet, no padding.

use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{Result, Segment, ToolError};

/// Emits unpadded output but still accepts segments that kept their `=` padding.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode(data: impl AsRef<[u8]>) -> String {
    ENGINE.encode(data)
}

pub fn decode(input: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    ENGINE.decode(input.as_bytes())
}

/// Decodes one token segment, attributing failures to that segment.
pub(crate) fn decode_segment(input: &str, segment: Segment) -> Result<Vec<u8>> {
    decode(input).map_err(|err| ToolError::InvalidEncoding {
        segment,
        reason: err.to_string(),
    })
}
