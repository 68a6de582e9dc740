//! # vcgate-cli: Trust Gate Command-Line Interface
//!
//! Provides the `vcgate` binary for operating the verifier outside a host
//! service.
//!
//! ## Subcommands
//!
//! - `vcgate keygen`: Generate an Ed25519 issuer key.
//! - `vcgate sign`: Canonicalize and sign a credential.
//! - `vcgate verify`: Run a presented credential through the verifier.
//!
//! ```bash
//! vcgate keygen --output keys --prefix issuer
//! vcgate sign --seed keys/issuer.seed --credential vc.json --output-dir out
//! vcgate verify --config gate.yaml --issuer did:web:issuer.example \
//!     --credential out/credential.json --proof out/proof.json \
//!     --caller 0x5B38Da6a701c568545dCfcB03FcB875f56beddC4
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; verification logic lives in `vcgate-vc`.
//! - Handlers return an exit code: `0` success, `1` rejection; `main` maps
//!   errors to `2`.

pub mod config;
pub mod signing;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

/// Read a UTF-8 text file.
pub fn read_text(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))
}

/// Read presented JSON text, dropping only a final line ending. Every other
/// byte is kept, since signatures cover the exact text.
pub fn read_presented(path: &Path, what: &str) -> Result<String> {
    let mut text = read_text(path, what)?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}
