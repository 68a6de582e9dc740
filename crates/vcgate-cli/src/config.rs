//! # Gate Configuration File
//!
//! YAML file consumed by `vcgate verify`:
//!
//! ```yaml
//! requiredCredentialType: OptimaV1Credential
//! registryReference: "0xd9145CCE52D386f254917e481eB44e9943F39138"
//! didKeyFallback: false
//! issuers:
//!   did:web:issuer.example: z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK
//! ```
//!
//! `issuers` maps each trusted DID to a multibase public key (multikey or
//! bare `z` + 32 bytes).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vcgate_vc::{DidRegistry, VerifierConfig};

/// Parsed gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    #[serde(flatten)]
    pub verifier: VerifierConfig,
    /// Resolve unregistered `did:key` issuers from the identifier itself.
    #[serde(default)]
    pub did_key_fallback: bool,
    #[serde(default)]
    pub issuers: BTreeMap<String, String>,
}

impl GateConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = crate::read_text(path, "config")?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))?;
        config
            .verifier
            .validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Build the issuer registry described by this configuration.
    pub fn registry(&self) -> Result<DidRegistry> {
        let registry = DidRegistry::bootstrap(&self.issuers)
            .context("invalid issuer registry entry")?
            .with_did_key_fallback(self.did_key_fallback);
        tracing::debug!(
            issuers = registry.len(),
            did_key_fallback = self.did_key_fallback,
            "issuer registry loaded"
        );
        Ok(registry)
    }
}
