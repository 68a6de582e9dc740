//! # Presented Credential View
//!
//! Read-only access to the handful of credential fields the trust gate
//! inspects. The credential arrives as JCS text and is never deserialized
//! into a full structure: each accessor is one targeted lookup on a
//! [`JsonDocument`].
//!
//! ## Fields Read
//!
//! | Accessor            | JSON path                         | Shape                        |
//! |---------------------|-----------------------------------|------------------------------|
//! | `types()`           | `type`                            | string or array of strings   |
//! | `issuer()`          | `issuer` / `issuer.id`            | string, or object with `id`  |
//! | `valid_from()`      | `validFrom`                       | ISO-8601 string              |
//! | `valid_until()`     | `validUntil`                      | ISO-8601 string              |
//! | `subject_address()` | `credentialSubject.publicAddress` | identity string              |

use std::borrow::Cow;

use vcgate_core::{ExtractError, JsonDocument, JsonField};

/// JSON path of the credential type list.
pub const TYPE_PATH: &str = "type";
/// JSON path of the issuer DID.
pub const ISSUER_PATH: &str = "issuer";
/// JSON path of the start of the validity window.
pub const VALID_FROM_PATH: &str = "validFrom";
/// JSON path of the end of the validity window.
pub const VALID_UNTIL_PATH: &str = "validUntil";
/// JSON path of the subject's bound identity.
pub const SUBJECT_ADDRESS_PATH: &str = "credentialSubject.publicAddress";

/// A credential as presented by a caller: validated JSON shape, lazily
/// extracted fields.
#[derive(Debug, Clone, Copy)]
pub struct PresentedCredential<'a> {
    doc: JsonDocument<'a>,
}

impl<'a> PresentedCredential<'a> {
    /// Validate the credential text's JSON shape.
    pub fn parse(text: &'a str) -> Result<Self, ExtractError> {
        JsonDocument::new(text).map(|doc| Self { doc })
    }

    /// The exact presented text.
    pub fn as_str(&self) -> &'a str {
        self.doc.as_str()
    }

    /// Credential types in document order. A single string is a one-element
    /// list.
    pub fn types(&self) -> Result<Option<Vec<Cow<'a, str>>>, ExtractError> {
        self.doc.strings(TYPE_PATH)
    }

    /// Whether `required` is one of the credential's types.
    pub fn has_type(&self, required: &str) -> Result<bool, ExtractError> {
        Ok(self
            .types()?
            .is_some_and(|types| types.iter().any(|t| t == required)))
    }

    /// Issuer DID, from either `"issuer": "did:…"` or
    /// `"issuer": {"id": "did:…", …}`.
    pub fn issuer(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        match self.doc.get(ISSUER_PATH)? {
            None => Ok(None),
            Some(JsonField::String(s)) => Ok(Some(s)),
            Some(JsonField::Object(_)) => self.doc.string("issuer.id"),
            Some(_) => Err(ExtractError::TypeMismatch {
                path: ISSUER_PATH.to_string(),
                expected: "a string or an object with an id",
            }),
        }
    }

    /// Raw `validFrom` text.
    pub fn valid_from(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string(VALID_FROM_PATH)
    }

    /// Raw `validUntil` text.
    pub fn valid_until(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string(VALID_UNTIL_PATH)
    }

    /// The identity the credential subject is bound to, if any.
    pub fn subject_address(&self) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.doc.string(SUBJECT_ADDRESS_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VC: &str = r#"{"credentialSubject":{"id":"did:example:holder","publicAddress":"0x5B38Da6a701c568545dCfcB03FcB875f56beddC4"},"id":"123","issuer":"did:key:abc","type":["OptimaV1Credential","VerifiableCredential"],"validFrom":"2024-01-01T00:00:00.000Z","validUntil":"2030-01-01T00:00:00.000Z"}"#;

    #[test]
    fn reads_all_fields() {
        let vc = PresentedCredential::parse(VC).unwrap();
        assert_eq!(
            vc.types().unwrap().unwrap(),
            vec!["OptimaV1Credential", "VerifiableCredential"]
        );
        assert_eq!(vc.issuer().unwrap().as_deref(), Some("did:key:abc"));
        assert_eq!(vc.valid_from().unwrap().as_deref(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(vc.valid_until().unwrap().as_deref(), Some("2030-01-01T00:00:00.000Z"));
        assert_eq!(
            vc.subject_address().unwrap().as_deref(),
            Some("0x5B38Da6a701c568545dCfcB03FcB875f56beddC4")
        );
        assert_eq!(vc.as_str(), VC);
    }

    #[test]
    fn has_type() {
        let vc = PresentedCredential::parse(VC).unwrap();
        assert!(vc.has_type("OptimaV1Credential").unwrap());
        assert!(!vc.has_type("Optima").unwrap());

        let untyped = PresentedCredential::parse(r#"{"id":"123"}"#).unwrap();
        assert!(!untyped.has_type("OptimaV1Credential").unwrap());
    }

    #[test]
    fn single_string_type() {
        let vc = PresentedCredential::parse(r#"{"type":"OptimaV1Credential"}"#).unwrap();
        assert!(vc.has_type("OptimaV1Credential").unwrap());
    }

    #[test]
    fn issuer_object_form() {
        let vc = PresentedCredential::parse(r#"{"issuer":{"id":"did:key:xyz","name":"Issuer"}}"#)
            .unwrap();
        assert_eq!(vc.issuer().unwrap().as_deref(), Some("did:key:xyz"));
    }

    #[test]
    fn issuer_wrong_type() {
        let vc = PresentedCredential::parse(r#"{"issuer":42}"#).unwrap();
        assert!(vc.issuer().is_err());
    }

    #[test]
    fn absent_optional_fields() {
        let vc = PresentedCredential::parse(r#"{"type":["X"]}"#).unwrap();
        assert_eq!(vc.valid_from().unwrap(), None);
        assert_eq!(vc.valid_until().unwrap(), None);
        assert_eq!(vc.subject_address().unwrap(), None);
        assert_eq!(vc.issuer().unwrap(), None);
    }
}
