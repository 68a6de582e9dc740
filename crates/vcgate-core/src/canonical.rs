//! # Canonical Serialization: JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the byte sequence that Ed25519
//! credential signatures are computed over.
//!
//! ## Security Invariant
//!
//! Signing and verification accept only `&CanonicalBytes`. There are two
//! construction paths:
//!
//! - [`CanonicalBytes::new()`]: issuer side. Serializes any value and emits
//!   RFC 8785 (JSON Canonicalization Scheme) output via `serde_jcs`: sorted
//!   keys, compact separators, deterministic number and string forms.
//! - [`CanonicalBytes::from_presented()`]: verifier side. Wraps the exact
//!   text a caller presented. The signature covers those bytes, so they are
//!   never re-serialized; a non-canonical document is accepted here and then
//!   fails signature verification, not parsing.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced by JCS canonicalization, or presented as JCS output by a
/// caller.
///
/// # Invariants
///
/// - Issuer-side bytes come from `serde_jcs` only.
/// - Presented bytes are kept verbatim and are never empty.
/// - The inner `Vec<u8>` is private; downstream code cannot alter it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Wrap JCS text exactly as the caller presented it.
    ///
    /// Byte-identical canonicalization between issuer and verifier is a
    /// precondition of the caller; this constructor does not re-check it.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::Empty` for empty input.
    pub fn from_presented(text: &str) -> Result<Self, CanonicalizationError> {
        if text.is_empty() {
            return Err(CanonicalizationError::Empty);
        }
        Ok(Self(text.as_bytes().to_vec()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// View the canonical bytes as UTF-8 text.
    ///
    /// Both constructors start from `str`, so this never fails.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,30}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Canonicalization is deterministic.
        #[test]
        fn canonical_bytes_deterministic(value in json_value()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Canonical output parses back to the same value.
        #[test]
        fn canonical_bytes_reparse(value in json_value()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
