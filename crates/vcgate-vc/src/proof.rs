//! # Proof Types
//!
//! The proof object that accompanies a credential, in two forms:
//!
//! - [`Proof`]: the owned, serializable structure the issuer emits.
//! - [`PresentedProof`]: a read-only view over proof text a caller submits,
//!   consulted field by field by the verification engine.
//!
//! ## Proof Types Supported
//!
//! - `Ed25519Signature2020` only. Any other `type` value is rejected before
//!   signature bytes are decoded.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use vcgate_core::{ExtractError, JsonDocument};

/// The type of cryptographic proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 signature over the JCS-canonical credential.
    Ed25519Signature2020,
}

impl ProofType {
    /// Look up a proof type by its JSON name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Ed25519Signature2020" => Some(Self::Ed25519Signature2020),
            _ => None,
        }
    }

    /// The JSON name of this proof type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519Signature2020 => "Ed25519Signature2020",
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a proof was created. Informational: the engine does not gate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    AssertionMethod,
    Authentication,
}

/// A cryptographic proof attached to a Verifiable Credential.
///
/// Field order is irrelevant on the wire: the issuer emits proofs through
/// JCS, which sorts keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Proof {
    /// The type of proof.
    #[serde(rename = "type")]
    pub proof_type: ProofType,
    /// Creation time, `YYYY-MM-DDTHH:MM:SS.sssZ`.
    pub created: String,
    /// The DID URL of the verification method used.
    pub verification_method: String,
    pub proof_purpose: ProofPurpose,
    /// Base58BTC multibase signature (`z…`).
    pub proof_value: String,
}

/// A proof as presented by a caller.
#[derive(Debug, Clone, Copy)]
pub struct PresentedProof<'a> {
    doc: JsonDocument<'a>,
}

impl<'a> PresentedProof<'a> {
    /// Validate the proof text's JSON shape.
    pub fn parse(text: &'a str) -> Result<Self, ExtractError> {
        JsonDocument::new(text).map(|doc| Self { doc })
    }

    /// The raw `type` value.
    pub fn type_name(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string("type")
    }

    /// The recognized proof type, or `None` when `type` is absent or names
    /// an unsupported scheme.
    pub fn proof_type(&self) -> Result<Option<ProofType>, ExtractError> {
        Ok(self
            .type_name()?
            .and_then(|name| ProofType::from_name(&name)))
    }

    pub fn proof_value(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string("proofValue")
    }

    pub fn verification_method(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string("verificationMethod")
    }

    pub fn created(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string("created")
    }

    pub fn proof_purpose(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string("proofPurpose")
    }
}
