//! # Verify Subcommand
//!
//! Runs one presented credential through a freshly configured verifier and
//! reports the outcome. Exit code `0` when the caller is verified, `1` when
//! the credential is rejected.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vcgate_core::{Clock, FixedClock, Identity, SystemClock, Timestamp};
use vcgate_vc::CredentialVerifier;

use crate::config::GateConfig;

/// Arguments for `vcgate verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the gate configuration YAML.
    #[arg(long)]
    pub config: PathBuf,
    /// DID of the issuer the caller claims signed the credential.
    #[arg(long)]
    pub issuer: String,
    /// Path to the canonical credential text.
    #[arg(long)]
    pub credential: PathBuf,
    /// Path to the proof JSON.
    #[arg(long)]
    pub proof: PathBuf,
    /// Identity of the presenting caller.
    #[arg(long)]
    pub caller: String,
    /// Evaluate validity windows at this instant (`YYYY-MM-DDTHH:MM:SSZ`)
    /// instead of now.
    #[arg(long)]
    pub at: Option<Timestamp>,
}

/// Execute `vcgate verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let config = GateConfig::load(&args.config)?;
    let registry = config.registry()?;
    let clock: Box<dyn Clock> = match args.at {
        Some(at) => Box::new(FixedClock(at)),
        None => Box::new(SystemClock),
    };
    let mut verifier = CredentialVerifier::with_clock(config.verifier, registry, clock)
        .context("failed to construct verifier")?;

    let credential = crate::read_presented(&args.credential, "credential")?;
    let proof = crate::read_presented(&args.proof, "proof")?;
    let caller = Identity::new(args.caller.as_str());

    match verifier.verify_credential(&caller, &args.issuer, &credential, &proof) {
        Ok(()) => {
            println!("OK: {caller} verified for {}", verifier.credential_type());
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {}: {}", e.kind(), e.reason());
            Ok(1)
        }
    }
}
