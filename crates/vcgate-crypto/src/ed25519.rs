//! # Ed25519 Signing and Verification
//!
//! Provides Ed25519 key handling, issuer-side signing, and verifier-side
//! strict verification for `Ed25519Signature2020` credential proofs.
//!
//! ## Security Invariant
//!
//! - Signing and verification take `&CanonicalBytes`, never raw bytes, so
//!   every signed or checked message has passed through the JCS pipeline or
//!   is the verbatim presented text.
//! - Verification follows RFC 8032 strictly (`verify_strict`): non-canonical
//!   `S` scalars and small-order keys or `R` points are rejected.
//! - An invalid signature is a `false` result. Only wrong byte *lengths* are
//!   errors (`CryptoError::InvalidLength`), because a bad signature is an
//!   expected outcome while a wrong-sized one is malformed input.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does not
//!   implement `Serialize` and its `Debug` output is redacted.
//!
//! ## Serde
//!
//! Public keys serialize as Ed25519 multikeys (`z6Mk…`); signatures as
//! Base58BTC multibase strings, the `proofValue` encoding.

use ed25519_dalek::Signer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use vcgate_core::{CanonicalBytes, CryptoError};

use crate::multibase::{
    decode_ed25519_multikey, decode_multibase, encode_ed25519_multikey, encode_multibase,
};

/// Byte length of an Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Byte length of an Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 public key (32 bytes) for signature verification.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LENGTH]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; SIGNATURE_LENGTH]);

/// An Ed25519 key pair for issuer-side signing.
///
/// Does not implement `Serialize`; the seed leaves this type only through
/// [`Ed25519KeyPair::export_seed`].
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a public key from resolved key material of unchecked length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidLength {
                what: "public key",
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })
    }

    /// Parse an Ed25519 multikey (`z6Mk…`).
    pub fn from_multikey(s: &str) -> Result<Self, CryptoError> {
        decode_ed25519_multikey(s).map(Self)
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Render as an Ed25519 multikey.
    pub fn to_multikey(&self) -> String {
        encode_ed25519_multikey(&self.0)
    }

    /// Render as a `did:key` identifier.
    pub fn to_did_key(&self) -> String {
        format!("did:key:{}", self.to_multikey())
    }

    /// Verify a signature over canonical bytes under this key.
    ///
    /// Returns `false` for any signature that fails RFC 8032 strict
    /// verification, including when these key bytes do not decode to a
    /// curve point.
    pub fn verify(&self, data: &CanonicalBytes, signature: &Ed25519Signature) -> bool {
        let Ok(vk) = ed25519_dalek::VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        vk.verify_strict(data.as_bytes(), &sig).is_ok()
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_multikey())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_multikey(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_multikey())
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_multikey())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a signature from decoded bytes of unchecked length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        <[u8; SIGNATURE_LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidLength {
                what: "signature",
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            })
    }

    /// Parse a multibase `proofValue`.
    pub fn from_multibase(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_multibase(s)?;
        Self::from_slice(&bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Render as a Base58BTC multibase string.
    pub fn to_multibase(&self) -> String {
        encode_multibase(&self.0)
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_multibase())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_multibase(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mb = self.to_multibase();
        write!(f, "Ed25519Signature({}...)", &mb[..mb.len().min(12)])
    }
}

impl std::fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_multibase())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte private key seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create a key pair from a multibase-encoded seed.
    pub fn from_seed_multibase(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_multibase(s)?;
        let seed = <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| CryptoError::InvalidLength {
            what: "seed",
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self::from_seed(&seed))
    }

    /// Export the private seed as a multibase string. The caller owns its
    /// secrecy from here on.
    pub fn export_seed(&self) -> String {
        encode_multibase(&self.signing_key.to_bytes())
    }

    /// Get the public key from this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification over unchecked material
// ---------------------------------------------------------------------------

/// Verify a signature given raw key and signature bytes of unchecked length.
///
/// Returns `Ok(true)` or `Ok(false)` for well-shaped input. Returns
/// `CryptoError::InvalidLength` when the key is not 32 bytes or the
/// signature is not 64 bytes.
pub fn verify_signature(
    public_key: &[u8],
    data: &CanonicalBytes,
    signature: &[u8],
) -> Result<bool, CryptoError> {
    let pk = Ed25519PublicKey::from_slice(public_key)?;
    let sig = Ed25519Signature::from_slice(signature)?;
    Ok(pk.verify(data, &sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(v: serde_json::Value) -> CanonicalBytes {
        CanonicalBytes::new(&v).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Ed25519KeyPair::generate();
        let data = canonical(serde_json::json!({"type": ["OptimaV1Credential"], "id": "123"}));
        let sig = kp.sign(&data);
        assert!(kp.public_key().verify(&data, &sig));
    }

    #[test]
    fn test_verify_wrong_key_is_false() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let data = canonical(serde_json::json!({"test": true}));
        let sig = kp1.sign(&data);
        assert!(!kp2.public_key().verify(&data, &sig));
    }

    #[test]
    fn test_verify_wrong_message_is_false() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({"msg": "original"})));
        assert!(!kp
            .public_key()
            .verify(&canonical(serde_json::json!({"msg": "tampered"})), &sig));
    }

    #[test]
    fn test_presented_text_must_be_byte_identical() {
        let kp = Ed25519KeyPair::generate();
        let issued = canonical(serde_json::json!({"a": 1, "b": 2}));
        let sig = kp.sign(&issued);
        let reordered = CanonicalBytes::from_presented(r#"{"b":2,"a":1}"#).unwrap();
        assert!(!kp.public_key().verify(&reordered, &sig));
        let same = CanonicalBytes::from_presented(r#"{"a":1,"b":2}"#).unwrap();
        assert!(kp.public_key().verify(&same, &sig));
    }

    #[test]
    fn test_non_canonical_scalar_rejected() {
        let kp = Ed25519KeyPair::from_seed(&[7u8; 32]);
        let data = canonical(serde_json::json!({"x": 1}));
        let mut bytes = *kp.sign(&data).as_bytes();
        // S + L is the same scalar mod L but not canonical; strict
        // verification must reject it. L = 2^252 + 27742317777372353535851937790883648493.
        const L: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        let mut carry = 0u16;
        for i in 0..32 {
            let sum = u16::from(bytes[32 + i]) + u16::from(L[i]) + carry;
            bytes[32 + i] = (sum & 0xff) as u8;
            carry = sum >> 8;
        }
        let tweaked = Ed25519Signature::from_bytes(bytes);
        assert!(!kp.public_key().verify(&data, &tweaked));
    }

    #[test]
    fn test_garbage_material_is_false_not_error() {
        // Correct lengths, meaningless content: a zero signature never
        // verifies, whether or not the key bytes decode to a point.
        let mut key = [0u8; 32];
        key[0] = 2;
        let data = canonical(serde_json::json!({"x": 1}));
        assert_eq!(verify_signature(&key, &data, &[0u8; 64]), Ok(false));
    }

    #[test]
    fn test_verify_signature_length_checks() {
        let data = canonical(serde_json::json!({"x": 1}));
        assert_eq!(
            verify_signature(&[0u8; 31], &data, &[0u8; 64]),
            Err(CryptoError::InvalidLength {
                what: "public key",
                expected: 32,
                actual: 31
            })
        );
        assert_eq!(
            verify_signature(&[0u8; 32], &data, &[0u8; 65]),
            Err(CryptoError::InvalidLength {
                what: "signature",
                expected: 64,
                actual: 65
            })
        );
    }

    #[test]
    fn test_verify_signature_accepts_genuine() {
        let kp = Ed25519KeyPair::generate();
        let data = canonical(serde_json::json!({"y": 2}));
        let sig = kp.sign(&data);
        assert_eq!(
            verify_signature(kp.public_key().as_bytes(), &data, sig.as_bytes()),
            Ok(true)
        );
    }

    #[test]
    fn test_deterministic_from_seed() {
        let kp1 = Ed25519KeyPair::from_seed(&[42u8; 32]);
        let kp2 = Ed25519KeyPair::from_seed_multibase(&kp1.export_seed()).unwrap();
        assert_eq!(kp1.public_key(), kp2.public_key());
        let data = canonical(serde_json::json!({"test": "deterministic"}));
        assert_eq!(kp1.sign(&data), kp2.sign(&data));
    }

    #[test]
    fn test_seed_multibase_length_checked() {
        let err = Ed25519KeyPair::from_seed_multibase(&encode_multibase(&[1u8; 31])).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidLength { what: "seed", .. }));
    }

    #[test]
    fn test_multikey_and_did_key() {
        let kp = Ed25519KeyPair::generate();
        let pk = kp.public_key();
        let mk = pk.to_multikey();
        assert!(mk.starts_with("z6Mk"));
        assert_eq!(Ed25519PublicKey::from_multikey(&mk).unwrap(), pk);
        assert_eq!(pk.to_did_key(), format!("did:key:{mk}"));
    }

    #[test]
    fn test_signature_multibase_roundtrip() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({"x": 1})));
        let mb = sig.to_multibase();
        assert!(mb.starts_with('z'));
        assert_eq!(Ed25519Signature::from_multibase(&mb).unwrap(), sig);
    }

    #[test]
    fn test_public_key_serde_json_roundtrip() {
        let pk = Ed25519KeyPair::generate().public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json, format!("\"{}\"", pk.to_multikey()));
        let pk2: Ed25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(pk, pk2);
    }

    #[test]
    fn test_signature_deserialize_rejects_bad_length() {
        let json = format!("\"{}\"", encode_multibase(&[1u8; 10]));
        assert!(serde_json::from_str::<Ed25519Signature>(&json).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let kp = Ed25519KeyPair::generate();
        assert_eq!(format!("{kp:?}"), "Ed25519KeyPair(<private>)");
    }
}
