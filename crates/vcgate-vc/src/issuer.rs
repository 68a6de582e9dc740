//! # Credential Issuance
//!
//! Produces the `(credential, proof)` text pair a holder later presents to
//! the verifier. The credential is canonicalized with JCS and signed as-is;
//! the emitted credential text is exactly the signed bytes, so a verifier
//! that receives it unchanged can check the signature without
//! re-canonicalizing.

use serde::Serialize;
use thiserror::Error;
use vcgate_core::{CanonicalBytes, CanonicalizationError, Timestamp};
use vcgate_crypto::Ed25519KeyPair;

use crate::proof::{Proof, ProofPurpose, ProofType};

/// Errors from credential issuance.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The credential must be a JSON object.
    #[error("credential must be a JSON object")]
    NotAnObject,

    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// A signed credential ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedCredential {
    /// JCS-canonical credential text. These are the signed bytes.
    pub credential: String,
    /// JCS-canonical `Ed25519Signature2020` proof text.
    pub proof: String,
}

/// Canonicalize and sign a credential.
///
/// An embedded `proof` member is dropped before signing; the proof travels
/// separately.
pub fn issue_credential(
    credential: &serde_json::Value,
    key: &Ed25519KeyPair,
    verification_method: &str,
    created: Timestamp,
) -> Result<IssuedCredential, IssueError> {
    let mut body = credential.as_object().ok_or(IssueError::NotAnObject)?.clone();
    body.remove("proof");

    let canonical = CanonicalBytes::new(&body)?;
    let signature = key.sign(&canonical);

    let proof = Proof {
        proof_type: ProofType::Ed25519Signature2020,
        created: created.to_iso8601(),
        verification_method: verification_method.to_string(),
        proof_purpose: ProofPurpose::AssertionMethod,
        proof_value: signature.to_multibase(),
    };
    let proof = CanonicalBytes::new(&proof)?;

    Ok(IssuedCredential {
        credential: canonical.as_str().to_string(),
        proof: proof.as_str().to_string(),
    })
}
