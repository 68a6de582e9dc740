//! # Key Generation and Credential Signing
//!
//! Issuer-side tooling: produce an Ed25519 key and sign credentials with it
//! so they can be presented to `vcgate verify`.
//!
//! Seeds are stored as Base58BTC multibase text. The seed file is the only
//! place the private key is written; it is never printed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use vcgate_core::Timestamp;
use vcgate_crypto::Ed25519KeyPair;
use vcgate_vc::issue_credential;

/// Arguments for `vcgate keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "issuer")]
    pub prefix: String,
}

/// Arguments for `vcgate sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Path to the multibase seed file written by `keygen`.
    #[arg(long)]
    pub seed: PathBuf,
    /// Path to the credential JSON to sign.
    #[arg(long)]
    pub credential: PathBuf,
    /// Verification method DID URL. Defaults to the key's `did:key` URL.
    #[arg(long)]
    pub verification_method: Option<String>,
    /// Proof creation time (`YYYY-MM-DDTHH:MM:SSZ`). Defaults to now.
    #[arg(long)]
    pub created: Option<Timestamp>,
    /// Write `credential.json` and `proof.json` here instead of printing.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Public half of a generated key, as printed by `keygen`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeygenReport {
    pub did: String,
    pub public_key_multibase: String,
    pub seed_file: PathBuf,
}

/// Execute `vcgate keygen`.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let report = keygen(&args.output, &args.prefix)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

/// Execute `vcgate sign`.
pub fn run_sign(args: &SignArgs) -> Result<u8> {
    let key = load_seed(&args.seed)?;
    let verification_method = args
        .verification_method
        .clone()
        .unwrap_or_else(|| default_verification_method(&key));
    let created = args.created.unwrap_or_else(Timestamp::now);

    let text = crate::read_text(&args.credential, "credential")?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse JSON: {}", args.credential.display()))?;
    let issued = issue_credential(&value, &key, &verification_method, created)
        .context("failed to sign credential")?;
    tracing::info!(verification_method = %verification_method, "credential signed");

    match &args.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
            let credential_path = dir.join("credential.json");
            let proof_path = dir.join("proof.json");
            std::fs::write(&credential_path, &issued.credential).with_context(|| {
                format!("failed to write credential: {}", credential_path.display())
            })?;
            std::fs::write(&proof_path, &issued.proof)
                .with_context(|| format!("failed to write proof: {}", proof_path.display()))?;
            println!("OK: signed credential");
            println!("  Credential: {}", credential_path.display());
            println!("  Proof:      {}", proof_path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&issued)?),
    }
    Ok(0)
}

/// Generate a key pair, write its seed, and describe the public half.
fn keygen(output_dir: &Path, prefix: &str) -> Result<KeygenReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let key = Ed25519KeyPair::generate();
    let seed_file = output_dir.join(format!("{prefix}.seed"));
    std::fs::write(&seed_file, key.export_seed())
        .with_context(|| format!("failed to write seed: {}", seed_file.display()))?;

    let public_key = key.public_key();
    tracing::info!(did = %public_key.to_did_key(), "generated Ed25519 key");
    Ok(KeygenReport {
        did: public_key.to_did_key(),
        public_key_multibase: public_key.to_multikey(),
        seed_file,
    })
}

fn load_seed(path: &Path) -> Result<Ed25519KeyPair> {
    let seed = crate::read_text(path, "seed")?;
    Ed25519KeyPair::from_seed_multibase(seed.trim())
        .with_context(|| format!("invalid seed: {}", path.display()))
}

/// `did:key:z6Mk…#z6Mk…`
fn default_verification_method(key: &Ed25519KeyPair) -> String {
    let public_key = key.public_key();
    format!("{}#{}", public_key.to_did_key(), public_key.to_multikey())
}
