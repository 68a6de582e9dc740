//! # Identity Newtypes
//!
//! Newtype wrappers for the two identifier namespaces the verifier handles:
//! the calling principal ([`Identity`]) and credential issuers ([`Did`]).
//! Keeping them distinct prevents an issuer DID from being recorded as a
//! verified caller, or a caller address from being resolved as an issuer.

use serde::{Deserialize, Serialize};

/// The principal invoking a verification, and the key of its verification
/// record.
///
/// Account addresses of the form `0x` + 40 hex digits compare
/// case-insensitively, since checksummed and lowercase renderings name the
/// same account. Every other identity string compares exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a credential subject string names this identity.
    pub fn matches(&self, other: &str) -> bool {
        if is_hex_address(&self.0) && is_hex_address(other) {
            self.0.eq_ignore_ascii_case(other)
        } else {
            self.0 == other
        }
    }

    /// Key used for record lookup; applies the address case rule.
    fn key(&self) -> std::borrow::Cow<'_, str> {
        if is_hex_address(&self.0) {
            std::borrow::Cow::Owned(self.0.to_ascii_lowercase())
        } else {
            std::borrow::Cow::Borrowed(&self.0)
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

fn is_hex_address(s: &str) -> bool {
    let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
        return false;
    };
    hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A Decentralized Identifier naming a credential issuer.
///
/// Only the `did:<method>:<id>` shape is checked; method-specific
/// validation belongs to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Parse a DID string.
    ///
    /// Returns `None` unless the string has a `did:` scheme, a non-empty
    /// lowercase alphanumeric method, and a non-empty method-specific id.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("did:")?;
        let (method, id) = rest.split_once(':')?;
        let method_ok = !method.is_empty()
            && method
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        if method_ok && !id.is_empty() {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    /// The DID method name (e.g. `key`).
    pub fn method(&self) -> &str {
        self.0[4..].split(':').next().unwrap_or_default()
    }

    /// The method-specific identifier.
    pub fn method_specific_id(&self) -> &str {
        self.0[4..].split_once(':').map(|(_, id)| id).unwrap_or_default()
    }

    /// The full DID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ADDR: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";

    #[test]
    fn hex_addresses_compare_case_insensitively() {
        let id = Identity::new(ADDR);
        assert!(id.matches(&ADDR.to_lowercase()));
        assert_eq!(id, Identity::new(ADDR.to_lowercase()));
    }

    #[test]
    fn hashing_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(Identity::new(ADDR));
        assert!(set.contains(&Identity::new(ADDR.to_uppercase().replace("0X", "0x"))));
    }

    #[test]
    fn other_identities_compare_exactly() {
        let id = Identity::new("did:example:Alice");
        assert!(id.matches("did:example:Alice"));
        assert!(!id.matches("did:example:alice"));
        assert_ne!(id, Identity::new("did:example:alice"));
    }

    #[test]
    fn short_hex_is_not_an_address() {
        let id = Identity::new("0xABC");
        assert!(!id.matches("0xabc"));
    }

    #[test]
    fn identity_serde_is_transparent() {
        let json = serde_json::to_string(&Identity::new("0xabc")).unwrap();
        assert_eq!(json, "\"0xabc\"");
    }

    #[test]
    fn did_parse() {
        let did = Did::parse("did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK").unwrap();
        assert_eq!(did.method(), "key");
        assert_eq!(
            did.method_specific_id(),
            "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"
        );
        assert_eq!(Did::parse("did:web:example.com:user").unwrap().method_specific_id(), "example.com:user");
    }

    #[test]
    fn did_parse_rejects_malformed() {
        assert!(Did::parse("did:key:").is_none());
        assert!(Did::parse("did::abc").is_none());
        assert!(Did::parse("did:KEY:abc").is_none());
        assert!(Did::parse("key:abc").is_none());
        assert!(Did::parse("did:key").is_none());
    }
}
