//! # Verifier Configuration
//!
//! Fixed at engine construction and never mutated afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable verifier policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierConfig {
    /// The credential type every accepted credential must list.
    pub required_credential_type: String,
    /// Reference to the trusted-issuer registry. Reported, never consulted.
    pub registry_reference: String,
}

/// Rejected configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("requiredCredentialType must not be empty")]
    EmptyCredentialType,
    #[error("registryReference must not be empty")]
    EmptyRegistryReference,
}

impl VerifierConfig {
    pub fn new(
        required_credential_type: impl Into<String>,
        registry_reference: impl Into<String>,
    ) -> Self {
        Self {
            required_credential_type: required_credential_type.into(),
            registry_reference: registry_reference.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.required_credential_type.trim().is_empty() {
            return Err(ConfigError::EmptyCredentialType);
        }
        if self.registry_reference.trim().is_empty() {
            return Err(ConfigError::EmptyRegistryReference);
        }
        Ok(())
    }
}
