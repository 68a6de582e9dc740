//! # vcgate-vc: Verifiable Credential Trust Gate
//!
//! Decides whether a caller holds a valid W3C Verifiable Credential of a
//! configured type, signed with `Ed25519Signature2020` by a resolvable
//! issuer, and remembers which callers have passed.
//!
//! - **Credential** (`credential.rs`): read-only view over presented
//!   credential text.
//! - **Proof** (`proof.rs`): proof structure and presented-proof view.
//! - **Resolver** (`resolver.rs`): the DID-to-key boundary, an in-memory
//!   issuer registry, and `did:key` resolution.
//! - **Verifier** (`verifier.rs`): the ordered check pipeline and the
//!   per-identity verification record.
//! - **Issuer** (`issuer.rs`): JCS canonicalization and signing on the
//!   producing side.
//!
//! ## Security Invariant
//!
//! Signatures are checked over the exact credential text the caller
//! presents. The verifier never re-serializes a credential.
//!
//! ## Crate Policy
//!
//! - Depends on `vcgate-core` and `vcgate-crypto` internally.
//! - Verification is synchronous; the resolver is called inline.

pub mod config;
pub mod credential;
pub mod issuer;
pub mod proof;
pub mod resolver;
pub mod verifier;

pub use config::{ConfigError, VerifierConfig};
pub use credential::PresentedCredential;
pub use issuer::{issue_credential, IssueError, IssuedCredential};
pub use proof::{PresentedProof, Proof, ProofPurpose, ProofType};
pub use resolver::{DidKeyResolver, DidRegistry, DidResolver, PublicKeyMaterial, ResolveError};
pub use verifier::{reasons, CredentialVerifier, VerificationError, VerificationStatus};
