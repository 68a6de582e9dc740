//! # SHA-256 Credential Digests
//!
//! Digests of accepted credentials, logged alongside verification events so
//! an operator can correlate a verified identity with the exact credential
//! bytes it presented without logging the credential itself.

use sha2::{Digest, Sha256};
use vcgate_core::CanonicalBytes;

/// A SHA-256 digest of canonical credential bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialDigest([u8; 32]);

impl CredentialDigest {
    /// Return the raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for CredentialDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> CredentialDigest {
    CredentialDigest(Sha256::digest(data.as_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_known_text() {
        let cb = CanonicalBytes::from_presented("abc").unwrap();
        assert_eq!(
            sha256_digest(&cb).to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn display_is_tagged() {
        let cb = CanonicalBytes::from_presented("{}").unwrap();
        assert!(sha256_digest(&cb).to_string().starts_with("sha256:"));
    }
}
