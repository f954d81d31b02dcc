//! Error type shared by the JWT codec and the regex tester.

use thiserror::Error;

/// Which part of a token a decoding error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
    Signature,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Segment::Header => "header",
            Segment::Payload => "payload",
            Segment::Signature => "signature",
        };
        f.write_str(name)
    }
}

/// Failures surfaced by every tool in this crate.
///
/// All of them are input-validation failures: nothing is retried and no
/// partial result is produced alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("invalid JWT format: expected 3 non-empty parts separated by '.', found {segments}")]
    MalformedToken { segments: usize },

    #[error("invalid {segment} encoding: {reason}")]
    InvalidEncoding { segment: Segment, reason: String },

    #[error("invalid {segment} JSON: {reason}")]
    InvalidJson { segment: Segment, reason: String },

    #[error("unsupported algorithm {0}")]
    UnsupportedAlgorithm(String),

    #[error("signing key rejected: {0}")]
    InvalidKey(String),

    #[error("{0}")]
    PatternSyntax(String),

    #[error("invalid regex flags: {0}")]
    InvalidFlags(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;

impl From<regex::Error> for ToolError {
    fn from(err: regex::Error) -> Self {
        ToolError::PatternSyntax(err.to_string())
    }
}
