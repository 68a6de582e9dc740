//! # vcgate-core: Foundational Types for vcgate
//!
//! The leaf crate of the workspace. It defines the primitives every other
//! crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Signatures are produced and checked over
//!    `&CanonicalBytes` only: JCS output on the issuer side, the verbatim
//!    presented text on the verifier side.
//!
//! 2. **Targeted extraction, not parsing.** [`JsonDocument`] validates a
//!    document's shape once and then answers dotted-path lookups by skipping
//!    everything off the path. No value tree is built.
//!
//! 3. **UTC-only, whole-second timestamps.** [`Timestamp`] accepts exactly
//!    the `YYYY-MM-DDTHH:MM:SS.sssZ` shape; the [`Clock`] trait injects "now".
//!
//! 4. **Distinct identifier namespaces.** [`Identity`] for callers, [`Did`]
//!    for issuers.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vcgate-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod json;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, CryptoError, DecodeError, ExtractError, TimestampError};
pub use identity::{Did, Identity};
pub use json::{JsonDocument, JsonField};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
