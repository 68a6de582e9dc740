//! # DID Resolution Boundary
//!
//! The engine never looks up issuer keys itself. It asks an injected
//! [`DidResolver`] for the raw public key bytes of an issuer DID and treats
//! any failure as fatal to the verification call.
//!
//! Two resolvers ship with the crate:
//!
//! - [`DidRegistry`]: an in-memory table of trusted issuers populated at
//!   startup, optionally falling back to `did:key` for unknown DIDs.
//! - [`DidKeyResolver`]: resolves `did:key:z6Mk…` by decoding the key
//!   embedded in the identifier. Any such DID resolves, so it is suitable
//!   only where the issuer binding is established out of band.
//!
//! Key length is not checked here. A registry entry of the wrong length is
//! reported by the engine as a malformed issuer key.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use vcgate_core::{CryptoError, Did};
use vcgate_crypto::multibase::ED25519_PUB_MULTICODEC;
use vcgate_crypto::{decode_ed25519_multikey, decode_multibase};

/// Raw public key bytes returned by a resolver.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial(Vec<u8>);

impl PublicKeyMaterial {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for PublicKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKeyMaterial({} bytes)", self.0.len())
    }
}

impl From<[u8; 32]> for PublicKeyMaterial {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Errors from DID resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No key is known for the DID.
    #[error("DID not found: {0}")]
    NotFound(String),

    /// The DID string is not a well-formed DID, or its method-specific id
    /// does not carry a usable key.
    #[error("invalid DID {did}: {reason}")]
    InvalidDid { did: String, reason: String },

    /// The backing store could not be consulted.
    #[error("resolver unavailable: {0}")]
    Unavailable(String),
}

impl ResolveError {
    fn invalid(did: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidDid {
            did: did.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Maps an issuer DID to its public key bytes.
pub trait DidResolver {
    fn resolve(&self, did: &str) -> Result<PublicKeyMaterial, ResolveError>;
}

impl<T: DidResolver + ?Sized> DidResolver for &T {
    fn resolve(&self, did: &str) -> Result<PublicKeyMaterial, ResolveError> {
        (**self).resolve(did)
    }
}

impl<T: DidResolver + ?Sized> DidResolver for Box<T> {
    fn resolve(&self, did: &str) -> Result<PublicKeyMaterial, ResolveError> {
        (**self).resolve(did)
    }
}

impl<T: DidResolver + ?Sized> DidResolver for Arc<T> {
    fn resolve(&self, did: &str) -> Result<PublicKeyMaterial, ResolveError> {
        (**self).resolve(did)
    }
}

// ---------------------------------------------------------------------------
// did:key
// ---------------------------------------------------------------------------

/// Resolves `did:key` identifiers carrying an Ed25519 multikey.
#[derive(Debug, Clone, Copy, Default)]
pub struct DidKeyResolver;

impl DidResolver for DidKeyResolver {
    fn resolve(&self, did: &str) -> Result<PublicKeyMaterial, ResolveError> {
        let parsed = Did::parse(did).ok_or_else(|| ResolveError::invalid(did, "not a DID"))?;
        if parsed.method() != "key" {
            return Err(ResolveError::NotFound(did.to_string()));
        }
        // A DID URL fragment (`#z6Mk…`) names the same key.
        let id = parsed.method_specific_id();
        let multikey = id.split_once('#').map_or(id, |(key, _)| key);
        decode_ed25519_multikey(multikey)
            .map(PublicKeyMaterial::from)
            .map_err(|e| ResolveError::invalid(did, e))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// In-memory table of trusted issuer DIDs.
#[derive(Debug, Clone, Default)]
pub struct DidRegistry {
    entries: HashMap<Did, PublicKeyMaterial>,
    did_key_fallback: bool,
}

impl DidRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve unregistered `did:key` identifiers from the identifier itself.
    pub fn with_did_key_fallback(mut self, enabled: bool) -> Self {
        self.did_key_fallback = enabled;
        self
    }

    pub fn did_key_fallback(&self) -> bool {
        self.did_key_fallback
    }

    /// Register (or replace) the key for an issuer DID. Returns the previous
    /// key, if any.
    pub fn register(
        &mut self,
        did: &str,
        key: PublicKeyMaterial,
    ) -> Result<Option<PublicKeyMaterial>, ResolveError> {
        let parsed = Did::parse(did).ok_or_else(|| ResolveError::invalid(did, "not a DID"))?;
        Ok(self.entries.insert(parsed, key))
    }

    /// Register a key given as a multibase string. Both a bare Ed25519 key
    /// (`z` + 32 bytes) and an Ed25519 multikey (`z6Mk…`) are accepted.
    /// Only a 34-byte value opening with `0xed 0x01` is read as a multikey;
    /// anything else is stored as raw key bytes.
    pub fn register_multibase(
        &mut self,
        did: &str,
        key: &str,
    ) -> Result<Option<PublicKeyMaterial>, ResolveError> {
        let material = decode_registry_key(key).map_err(|e| ResolveError::invalid(did, e))?;
        self.register(did, material)
    }

    /// Build a registry from `(did, multibase key)` pairs. Fails on the
    /// first bad entry.
    pub fn bootstrap<I, D, K>(entries: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = (D, K)>,
        D: AsRef<str>,
        K: AsRef<str>,
    {
        let mut registry = Self::new();
        for (did, key) in entries {
            registry.register_multibase(did.as_ref(), key.as_ref())?;
        }
        Ok(registry)
    }

    pub fn is_registered(&self, did: &str) -> bool {
        Did::parse(did).is_some_and(|d| self.entries.contains_key(&d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DidResolver for DidRegistry {
    fn resolve(&self, did: &str) -> Result<PublicKeyMaterial, ResolveError> {
        let parsed = Did::parse(did).ok_or_else(|| ResolveError::invalid(did, "not a DID"))?;
        if let Some(key) = self.entries.get(&parsed) {
            return Ok(key.clone());
        }
        if self.did_key_fallback && parsed.method() == "key" {
            return DidKeyResolver.resolve(did);
        }
        Err(ResolveError::NotFound(did.to_string()))
    }
}

fn decode_registry_key(key: &str) -> Result<PublicKeyMaterial, CryptoError> {
    let bytes = decode_multibase(key)?;
    // A bare 32-byte key may itself begin with the multicodec bytes.
    match bytes.strip_prefix(&ED25519_PUB_MULTICODEC[..]) {
        Some(raw) if raw.len() == 32 => Ok(PublicKeyMaterial::new(raw)),
        _ => Ok(PublicKeyMaterial::new(bytes)),
    }
}
