//! JSON Web Token encoder/decoder.
//!
//! Tokens are `base64url(header).base64url(payload).signature`. Decoding never
//! fails on expiry; the signature check is reported through
//! [`Decoded::is_valid`]. See [`signer`] for which schemes are real signatures.

pub mod algorithm;
pub mod base64url;
pub mod claims;
pub mod codec;
pub mod signer;

pub use algorithm::{Algorithm, Family};
pub use claims::{format_timestamp, is_expired, now_seconds, Claims};
pub use codec::{decode, encode, Decoded, Encoded, JwtCodec, JwtConfig, DEFAULT_TTL_SECS};
pub use signer::SignatureScheme;
