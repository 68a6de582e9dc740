//! # vcgate-crypto: Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for credential verification:
//!
//! - **Ed25519** signing (issuer side) and RFC 8032 strict verification
//!   (verifier side) over `CanonicalBytes`.
//! - **Base58BTC multibase** decoding and encoding for `proofValue`
//!   signatures, Ed25519 multikeys, and `did:key` identifiers.
//! - **SHA-256** digests of accepted credentials for audit logging.
//!
//! ## Crate Policy
//!
//! - Depends only on `vcgate-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   Ed25519 keys and real canonical bytes.
//! - No `unsafe` code.

pub mod ed25519;
pub mod multibase;
pub mod sha256;

pub use ed25519::{verify_signature, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use self::multibase::{decode_ed25519_multikey, decode_multibase, encode_ed25519_multikey, encode_multibase};
pub use sha256::{sha256_digest, CredentialDigest};
