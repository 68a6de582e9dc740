//! # Error Types: Structured Error Hierarchy
//!
//! Lexical and structural errors raised by the leaf layers of the
//! verification pipeline. All errors use `thiserror` for derive-based
//! `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - These errors describe malformed *input shape*: bad JSON nesting, bad
//!   timestamp lexemes, bad Base58 symbols, wrong key/signature lengths.
//! - Policy outcomes (expired credential, wrong subject, bad signature) are
//!   not represented here. The verification engine in `vcgate-vc` maps these
//!   errors onto its own two-kind policy taxonomy.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Presented canonical text was empty.
    #[error("canonical text must not be empty")]
    Empty,
}

/// Error from the targeted JSON field extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Quoting, escaping, or bracket nesting is broken.
    #[error("malformed JSON at byte {offset}: {reason}")]
    MalformedJson {
        /// Byte offset where the scanner gave up.
        offset: usize,
        /// What the scanner expected.
        reason: &'static str,
    },

    /// The field exists but holds a different JSON type than requested.
    #[error("field {path:?} is not {expected}")]
    TypeMismatch {
        /// The dotted field path that was looked up.
        path: String,
        /// The JSON type the caller asked for.
        expected: &'static str,
    },
}

/// Error parsing an ISO-8601 timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The string does not match `YYYY-MM-DDTHH:MM:SS[.fff]Z`.
    #[error("malformed timestamp {input:?}: {reason}")]
    Malformed {
        /// The rejected input.
        input: String,
        /// Which part of the shape was violated.
        reason: &'static str,
    },
}

impl TimestampError {
    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason,
        }
    }
}

/// Error decoding multibase / Base58 text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input was empty (no multibase prefix).
    #[error("multibase input is empty")]
    Empty,

    /// The multibase prefix character is not one this system supports.
    #[error("unsupported multibase prefix {0:?}")]
    UnsupportedPrefix(char),

    /// A character outside the Base58 alphabet was found.
    #[error("invalid base58 character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Character position within the Base58 payload.
        position: usize,
    },

    /// The codec rejected a payload that passed the alphabet check.
    #[error("malformed base58 payload: {0}")]
    Malformed(String),

    /// The decoded bytes do not start with the expected multicodec prefix.
    #[error("unsupported multicodec prefix")]
    UnsupportedMulticodec,
}

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key or signature material has the wrong byte length.
    #[error("{what} must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Which material was malformed ("public key", "signature").
        what: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Multibase decoding of key or signature material failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_display_includes_offset() {
        let err = ExtractError::MalformedJson {
            offset: 17,
            reason: "unterminated string",
        };
        assert_eq!(
            err.to_string(),
            "malformed JSON at byte 17: unterminated string"
        );
    }

    #[test]
    fn invalid_length_display() {
        let err = CryptoError::InvalidLength {
            what: "signature",
            expected: 64,
            actual: 63,
        };
        assert_eq!(err.to_string(), "signature must be 64 bytes, got 63");
    }

    #[test]
    fn decode_error_converts_into_crypto_error() {
        let err: CryptoError = DecodeError::UnsupportedPrefix('m').into();
        assert!(matches!(err, CryptoError::Decode(DecodeError::UnsupportedPrefix('m'))));
    }
}
