//! Token signatures.
//!
//! Only the HMAC family under [`SignatureScheme::Keyed`] is a real JWS
//! signature. The RSA family never touches a key pair: it is a keyed digest
//! that lets the tool demonstrate `RS*` headers, and [`SignatureScheme::Legacy`]
//! is the string-concatenation scheme of the first version of the tool. Neither
//! of those may be used to protect anything.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::algorithm::{Algorithm, DigestSize, Family};
use super::base64url;
use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// HMAC-SHA2 for `HS*`, demo keyed digest for `RS*`.
    #[default]
    Keyed,
    /// Bit-for-bit compatible with tokens minted by the first version of the tool.
    Legacy,
}

/// Signs `signing_input` (`header.payload`) and returns the base64url signature.
pub fn sign(
    signing_input: &str,
    secret: &str,
    algorithm: Algorithm,
    scheme: SignatureScheme,
) -> Result<String> {
    let raw = match scheme {
        SignatureScheme::Keyed => match algorithm.family() {
            Family::Hmac => hmac_bytes(secret.as_bytes(), signing_input.as_bytes(), algorithm)?,
            Family::Rsa => keyed_digest(secret.as_bytes(), signing_input.as_bytes(), algorithm),
        },
        SignatureScheme::Legacy => match algorithm.family() {
            Family::Hmac => format!("HMAC_{algorithm}_{signing_input}_{secret}").into_bytes(),
            Family::Rsa => format!("RSA_{algorithm}_{signing_input}").into_bytes(),
        },
    };
    Ok(base64url::encode(raw))
}

/// Recomputes the signature and compares it with `signature` in constant time.
pub fn verify(
    signing_input: &str,
    signature: &str,
    secret: &str,
    algorithm: Algorithm,
    scheme: SignatureScheme,
) -> Result<bool> {
    let expected = sign(signing_input, secret, algorithm, scheme)?;
    Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
}

fn hmac_bytes(key: &[u8], data: &[u8], algorithm: Algorithm) -> Result<Vec<u8>> {
    let bytes = match algorithm.digest() {
        DigestSize::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|err| ToolError::InvalidKey(err.to_string()))?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        DigestSize::Sha384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(key)
                .map_err(|err| ToolError::InvalidKey(err.to_string()))?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        DigestSize::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key)
                .map_err(|err| ToolError::InvalidKey(err.to_string()))?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(bytes)
}

fn keyed_digest(secret: &[u8], data: &[u8], algorithm: Algorithm) -> Vec<u8> {
    fn run<D: Digest>(secret: &[u8], data: &[u8]) -> Vec<u8> {
        D::new()
            .chain_update(secret)
            .chain_update(b".")
            .chain_update(data)
            .finalize()
            .to_vec()
    }
    match algorithm.digest() {
        DigestSize::Sha256 => run::<Sha256>(secret, data),
        DigestSize::Sha384 => run::<Sha384>(secret, data),
        DigestSize::Sha512 => run::<Sha512>(secret, data),
    }
}
