//! # Credential Verification Engine
//!
//! Decides whether a caller presents a valid credential of the configured
//! type, signed by the claimed issuer, and records the outcome per caller.
//!
//! ## Check Order
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. credential is well-formed JSON
//! 2. required credential type is listed
//! 3. `validFrom` present, well-formed, not in the future
//! 4. `validUntil`, if present, well-formed and not in the past
//! 5. `credentialSubject.publicAddress`, if present, names the caller
//! 6. proof is well-formed and of a supported type
//! 7. credential `issuer`, if present, equals the claimed issuer DID
//! 8. issuer key resolves, `proofValue` decodes, signature verifies over
//!    the exact presented credential text
//!
//! ## State
//!
//! The only mutable state is the per-identity verification record. All
//! checks run against `&self`; the record is written once, after every
//! check has passed. A rejected call therefore leaves the record untouched,
//! including for callers already marked verified.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use vcgate_core::{CanonicalBytes, Clock, CryptoError, Identity, SystemClock, Timestamp};
use vcgate_crypto::{decode_multibase, sha256_digest, verify_signature, CredentialDigest};

use crate::config::{ConfigError, VerifierConfig};
use crate::credential::PresentedCredential;
use crate::proof::PresentedProof;
use crate::resolver::DidResolver;

/// Longest `proofValue` a 64-byte signature encodes to: `z` plus 88 symbols.
const MAX_PROOF_VALUE_LEN: usize = 89;

/// Reason strings carried by [`VerificationError`].
pub mod reasons {
    pub const CREDENTIAL_MALFORMED: &str = "Credential JSON is malformed";
    pub const TYPE_NOT_EXIST: &str = "Credential type not exist";
    pub const VALID_FROM_NOT_PAST: &str = "validFrom date must be in the past";
    pub const VALID_FROM_MALFORMED: &str = "validFrom date is malformed";
    pub const VALID_UNTIL_PAST: &str = "The validUntil date cannot be in the past";
    pub const VALID_UNTIL_MALFORMED: &str = "validUntil date is malformed";
    pub const SUBJECT_MISMATCH: &str =
        "CredentialSubject publicAddress and msg.sender doesn't match";
    pub const PROOF_MALFORMED: &str = "Proof JSON is malformed";
    pub const PROOF_TYPE_UNKNOWN: &str = "proof type doesn't exists";
    pub const ISSUER_MISMATCH: &str = "Credential issuer and issuer DID doesn't match";
    pub const ISSUER_UNRESOLVED: &str = "Issuer DID could not be resolved";
    pub const PROOF_VALUE_MISSING: &str = "proofValue not exist";
    pub const PROOF_VALUE_ENCODING: &str = "proofValue is not valid multibase";
    pub const ISSUER_KEY_MALFORMED: &str = "Issuer public key is malformed";
    pub const SIGNATURE_LENGTH: &str = "Signature has invalid length";
    pub const SIGNATURE_FAILED: &str = "Signature verification failed";
}

/// Why a credential was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The credential, its timing, its subject binding, or its signature
    /// failed a check.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// The proof object is malformed or of an unsupported kind.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}

impl VerificationError {
    fn data(reason: &str) -> Self {
        Self::InvalidData(reason.to_string())
    }

    fn proof(reason: &str) -> Self {
        Self::InvalidProof(reason.to_string())
    }

    /// `"InvalidData"` or `"InvalidProof"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidData(_) => "InvalidData",
            Self::InvalidProof(_) => "InvalidProof",
        }
    }

    /// The fixed human-readable reason.
    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidData(r) | Self::InvalidProof(r) => r,
        }
    }
}

/// Per-identity verification outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Verified,
}

/// The verification engine.
///
/// Generic over the issuer key resolver and the clock so both can be
/// replaced in tests.
#[derive(Debug)]
pub struct CredentialVerifier<R, C = SystemClock> {
    config: VerifierConfig,
    resolver: R,
    clock: C,
    records: HashMap<Identity, VerificationStatus>,
}

impl<R: DidResolver> CredentialVerifier<R> {
    /// Build an engine on the system clock.
    pub fn new(config: VerifierConfig, resolver: R) -> Result<Self, ConfigError> {
        Self::with_clock(config, resolver, SystemClock)
    }
}

impl<R: DidResolver, C: Clock> CredentialVerifier<R, C> {
    /// Build an engine with an explicit clock.
    pub fn with_clock(config: VerifierConfig, resolver: R, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            resolver,
            clock,
            records: HashMap::new(),
        })
    }

    pub fn credential_type(&self) -> &str {
        &self.config.required_credential_type
    }

    pub fn registry_reference(&self) -> &str {
        &self.config.registry_reference
    }

    /// Whether `identity` has ever passed verification.
    pub fn verification_status(&self, identity: &Identity) -> bool {
        self.status_of(identity) == VerificationStatus::Verified
    }

    pub fn status_of(&self, identity: &Identity) -> VerificationStatus {
        self.records.get(identity).copied().unwrap_or_default()
    }

    /// Identities currently marked verified, in no particular order.
    pub fn verified_identities(&self) -> impl Iterator<Item = &Identity> {
        self.records
            .iter()
            .filter(|(_, status)| **status == VerificationStatus::Verified)
            .map(|(identity, _)| identity)
    }

    /// Verify a credential presented by `caller` and, on success, mark the
    /// caller verified.
    ///
    /// `credential_json` must be the exact text the issuer signed;
    /// whitespace or key-order changes invalidate the signature.
    ///
    /// When the credential names its own `issuer`, it must equal
    /// `issuer_did` exactly. A credential whose embedded issuer differs is
    /// rejected with the issuer-mismatch reason even if the key resolved for
    /// `issuer_did` would verify its signature.
    ///
    /// # Errors
    ///
    /// Returns the first failed check. Nothing is recorded on failure.
    pub fn verify_credential(
        &mut self,
        caller: &Identity,
        issuer_did: &str,
        credential_json: &str,
        proof_json: &str,
    ) -> Result<(), VerificationError> {
        let now = self.clock.now();
        match self.evaluate(caller, issuer_did, credential_json, proof_json, now) {
            Ok(digest) => {
                self.records
                    .insert(caller.clone(), VerificationStatus::Verified);
                info!(
                    caller = %caller,
                    issuer = issuer_did,
                    credential = %digest,
                    credential_type = %self.config.required_credential_type,
                    "credential verified"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    caller = %caller,
                    issuer = issuer_did,
                    kind = err.kind(),
                    reason = err.reason(),
                    "credential rejected"
                );
                Err(err)
            }
        }
    }

    fn evaluate(
        &self,
        caller: &Identity,
        issuer_did: &str,
        credential_json: &str,
        proof_json: &str,
        now: Timestamp,
    ) -> Result<CredentialDigest, VerificationError> {
        use self::reasons::*;

        let credential = PresentedCredential::parse(credential_json).map_err(|e| {
            debug!(error = %e, "credential text rejected");
            VerificationError::data(CREDENTIAL_MALFORMED)
        })?;

        // Type.
        let required = self.config.required_credential_type.as_str();
        match credential.has_type(required) {
            Ok(true) => debug!(credential_type = required, "type check passed"),
            Ok(false) => return Err(VerificationError::data(TYPE_NOT_EXIST)),
            Err(e) => {
                debug!(error = %e, "type field unreadable");
                return Err(VerificationError::data(TYPE_NOT_EXIST));
            }
        }

        // Validity window.
        let valid_from = credential
            .valid_from()
            .map_err(|e| {
                debug!(error = %e, "validFrom unreadable");
                VerificationError::data(VALID_FROM_MALFORMED)
            })?
            .ok_or_else(|| VerificationError::data(VALID_FROM_NOT_PAST))?;
        let valid_from = Timestamp::parse_vc(&valid_from).map_err(|e| {
            debug!(error = %e, "validFrom unparseable");
            VerificationError::data(VALID_FROM_MALFORMED)
        })?;
        if valid_from > now {
            debug!(valid_from = %valid_from, now = %now, "credential not yet valid");
            return Err(VerificationError::data(VALID_FROM_NOT_PAST));
        }

        let valid_until = credential.valid_until().map_err(|e| {
            debug!(error = %e, "validUntil unreadable");
            VerificationError::data(VALID_UNTIL_MALFORMED)
        })?;
        if let Some(valid_until) = valid_until {
            let valid_until = Timestamp::parse_vc(&valid_until).map_err(|e| {
                debug!(error = %e, "validUntil unparseable");
                VerificationError::data(VALID_UNTIL_MALFORMED)
            })?;
            if valid_until < now {
                debug!(valid_until = %valid_until, now = %now, "credential expired");
                return Err(VerificationError::data(VALID_UNTIL_PAST));
            }
        }
        debug!("validity window check passed");

        // Subject binding.
        match credential.subject_address() {
            Ok(None) => {}
            Ok(Some(address)) if caller.matches(&address) => {}
            Ok(Some(address)) => {
                debug!(subject = %address, "subject bound to another identity");
                return Err(VerificationError::data(SUBJECT_MISMATCH));
            }
            Err(e) => {
                debug!(error = %e, "publicAddress unreadable");
                return Err(VerificationError::data(SUBJECT_MISMATCH));
            }
        }

        // Proof shape and scheme.
        let proof = PresentedProof::parse(proof_json).map_err(|e| {
            debug!(error = %e, "proof text rejected");
            VerificationError::proof(PROOF_MALFORMED)
        })?;
        let scheme = proof
            .proof_type()
            .map_err(|e| {
                debug!(error = %e, "proof type unreadable");
                VerificationError::proof(PROOF_TYPE_UNKNOWN)
            })?
            .ok_or_else(|| VerificationError::proof(PROOF_TYPE_UNKNOWN))?;
        debug!(proof_type = %scheme, "proof type check passed");

        // Issuer binding.
        match credential.issuer() {
            Ok(None) => {}
            Ok(Some(issuer)) if issuer == issuer_did => {}
            Ok(Some(issuer)) => {
                debug!(credential_issuer = %issuer, "issuer differs from claimed DID");
                return Err(VerificationError::data(ISSUER_MISMATCH));
            }
            Err(e) => {
                debug!(error = %e, "issuer unreadable");
                return Err(VerificationError::data(ISSUER_MISMATCH));
            }
        }

        // Signature.
        let key = self.resolver.resolve(issuer_did).map_err(|e| {
            debug!(error = %e, "issuer resolution failed");
            VerificationError::data(ISSUER_UNRESOLVED)
        })?;
        let proof_value = proof
            .proof_value()
            .map_err(|e| {
                debug!(error = %e, "proofValue unreadable");
                VerificationError::proof(PROOF_VALUE_MISSING)
            })?
            .ok_or_else(|| VerificationError::proof(PROOF_VALUE_MISSING))?;
        // Bounds the Base58 decode, whose cost grows with the square of the input.
        if proof_value.len() > MAX_PROOF_VALUE_LEN {
            debug!(len = proof_value.len(), "proofValue too long");
            return Err(VerificationError::data(SIGNATURE_LENGTH));
        }
        let signature = decode_multibase(&proof_value).map_err(|e| {
            debug!(error = %e, "proofValue undecodable");
            VerificationError::proof(PROOF_VALUE_ENCODING)
        })?;
        let message = CanonicalBytes::from_presented(credential_json).map_err(|e| {
            debug!(error = %e, "credential text rejected");
            VerificationError::data(CREDENTIAL_MALFORMED)
        })?;

        match verify_signature(key.as_bytes(), &message, &signature) {
            Ok(true) => {
                debug!("signature check passed");
                Ok(sha256_digest(&message))
            }
            Ok(false) => Err(VerificationError::data(SIGNATURE_FAILED)),
            Err(CryptoError::InvalidLength { what, actual, .. }) if what == "public key" => {
                debug!(actual, "issuer key has wrong length");
                Err(VerificationError::data(ISSUER_KEY_MALFORMED))
            }
            Err(e) => {
                debug!(error = %e, "signature unusable");
                Err(VerificationError::data(SIGNATURE_LENGTH))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::issue_credential;
    use crate::resolver::{DidRegistry, PublicKeyMaterial};
    use vcgate_core::FixedClock;
    use vcgate_crypto::{encode_multibase, Ed25519KeyPair};

    const CALLER: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
    const ISSUER: &str = "did:web:issuer.example";

    fn keypair() -> Ed25519KeyPair {
        Ed25519KeyPair::from_seed(&[42u8; 32])
    }

    fn clock() -> FixedClock {
        FixedClock(Timestamp::parse_vc("2025-06-01T00:00:00Z").unwrap())
    }

    fn engine(registry: DidRegistry) -> CredentialVerifier<DidRegistry, FixedClock> {
        CredentialVerifier::with_clock(
            VerifierConfig::new("OptimaV1Credential", "0xd9145CCE52D386f254917e481eB44e9943F39138"),
            registry,
            clock(),
        )
        .unwrap()
    }

    fn registry() -> DidRegistry {
        let mut registry = DidRegistry::new();
        registry
            .register(ISSUER, keypair().public_key().as_bytes().to_owned().into())
            .unwrap();
        registry
    }

    fn credential() -> serde_json::Value {
        serde_json::json!({
            "id": "123",
            "type": ["VerifiableCredential", "OptimaV1Credential"],
            "issuer": ISSUER,
            "validFrom": "2025-01-01T00:00:00.000Z",
            "validUntil": "2026-01-01T00:00:00.000Z",
            "credentialSubject": {"publicAddress": CALLER}
        })
    }

    fn issue(value: &serde_json::Value) -> (String, String) {
        let issued = issue_credential(
            value,
            &keypair(),
            &format!("{ISSUER}#key-1"),
            Timestamp::parse_vc("2025-01-01T00:00:00Z").unwrap(),
        )
        .unwrap();
        (issued.credential, issued.proof)
    }

    #[test]
    fn construction_exposes_config() {
        let engine = engine(registry());
        assert_eq!(engine.credential_type(), "OptimaV1Credential");
        assert_eq!(
            engine.registry_reference(),
            "0xd9145CCE52D386f254917e481eB44e9943F39138"
        );
        assert_eq!(engine.verified_identities().count(), 0);
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let result = CredentialVerifier::with_clock(
            VerifierConfig::new("", "registry"),
            registry(),
            clock(),
        );
        assert_eq!(result.unwrap_err(), ConfigError::EmptyCredentialType);
    }

    #[test]
    fn accepts_valid_credential() {
        let mut engine = engine(registry());
        let caller = Identity::new(CALLER);
        let (vc, proof) = issue(&credential());
        engine.verify_credential(&caller, ISSUER, &vc, &proof).unwrap();
        assert!(engine.verification_status(&caller));
        assert_eq!(engine.status_of(&caller), VerificationStatus::Verified);
        assert_eq!(engine.verified_identities().collect::<Vec<_>>(), vec![&caller]);
    }

    #[test]
    fn error_accessors() {
        let err = VerificationError::data(reasons::TYPE_NOT_EXIST);
        assert_eq!(err.kind(), "InvalidData");
        assert_eq!(err.reason(), "Credential type not exist");
        let err = VerificationError::proof(reasons::PROOF_TYPE_UNKNOWN);
        assert_eq!(err.kind(), "InvalidProof");
        assert_eq!(err.to_string(), "invalid proof: proof type doesn't exists");
    }

    #[test]
    fn validity_bounds_are_inclusive() {
        let mut value = credential();
        value["validFrom"] = "2025-06-01T00:00:00.000Z".into();
        value["validUntil"] = "2025-06-01T00:00:00.999Z".into();
        let (vc, proof) = issue(&value);
        let mut engine = engine(registry());
        assert!(engine
            .verify_credential(&Identity::new(CALLER), ISSUER, &vc, &proof)
            .is_ok());
    }

    #[test]
    fn non_string_valid_from_is_malformed() {
        let mut value = credential();
        value["validFrom"] = 1_700_000_000.into();
        let (vc, proof) = issue(&value);
        let err = engine(registry())
            .verify_credential(&Identity::new(CALLER), ISSUER, &vc, &proof)
            .unwrap_err();
        assert_eq!(err, VerificationError::data(reasons::VALID_FROM_MALFORMED));
    }

    #[test]
    fn short_registry_key_is_malformed_key() {
        let mut registry = DidRegistry::new();
        registry
            .register(ISSUER, PublicKeyMaterial::new(vec![1u8; 31]))
            .unwrap();
        let (vc, proof) = issue(&credential());
        let err = engine(registry)
            .verify_credential(&Identity::new(CALLER), ISSUER, &vc, &proof)
            .unwrap_err();
        assert_eq!(err, VerificationError::data(reasons::ISSUER_KEY_MALFORMED));
    }

    #[test]
    fn short_signature_is_invalid_length() {
        let (vc, _) = issue(&credential());
        let proof = format!(
            r#"{{"proofValue":"{}","type":"Ed25519Signature2020"}}"#,
            encode_multibase(&[9u8; 63])
        );
        let err = engine(registry())
            .verify_credential(&Identity::new(CALLER), ISSUER, &vc, &proof)
            .unwrap_err();
        assert_eq!(err, VerificationError::data(reasons::SIGNATURE_LENGTH));
    }

    #[test]
    fn oversized_proof_value_rejected_before_decoding() {
        let (vc, _) = issue(&credential());
        let proof = format!(
            r#"{{"proofValue":"z{}","type":"Ed25519Signature2020"}}"#,
            "2".repeat(40_000)
        );
        let err = engine(registry())
            .verify_credential(&Identity::new(CALLER), ISSUER, &vc, &proof)
            .unwrap_err();
        assert_eq!(err, VerificationError::data(reasons::SIGNATURE_LENGTH));
    }

    #[test]
    fn longest_signature_encoding_reaches_verification() {
        let (vc, _) = issue(&credential());
        let proof_value = encode_multibase(&[0xff; 64]);
        assert_eq!(proof_value.len(), MAX_PROOF_VALUE_LEN);
        let proof = format!(r#"{{"proofValue":"{proof_value}","type":"Ed25519Signature2020"}}"#);
        let err = engine(registry())
            .verify_credential(&Identity::new(CALLER), ISSUER, &vc, &proof)
            .unwrap_err();
        assert_eq!(err, VerificationError::data(reasons::SIGNATURE_FAILED));
    }

    #[test]
    fn status_defaults_to_unverified() {
        let engine = engine(registry());
        let stranger = Identity::new("0x0000000000000000000000000000000000000001");
        assert!(!engine.verification_status(&stranger));
        assert_eq!(engine.status_of(&stranger), VerificationStatus::Unverified);
    }
}
