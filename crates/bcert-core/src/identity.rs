//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that flow through a verification
//! run. These prevent accidental identifier confusion — you cannot pass a
//! `CredentialId` where a `TransactionId` is expected.
//!
//! ## Security Invariant
//!
//! Type-level distinction between identifier namespaces prevents
//! cross-namespace confusion: a revocation check keyed by the wrong
//! identifier kind would silently test membership of the wrong set.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a credential (typically a `urn:uuid:` URN in v2 documents,
/// an assertion uid in v1 documents).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(pub String);

/// Identifier of an issuer: the URL (or DID) its profile resolves from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerId(pub String);

/// Identifier of an issuer signing key (e.g. a `ecdsa-koblitz-pubkey:`
/// prefixed address in issuer profiles).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub String);

/// Identifier of a blockchain transaction (hex txid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

/// Identifier of a single verification run, used to correlate log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl CredentialId {
    /// Wrap a raw credential identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IssuerId {
    /// Wrap a raw issuer identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl KeyId {
    /// Wrap a raw key identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TransactionId {
    /// Wrap a raw transaction identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RunId {
    /// Generate a new random run identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newtypes_display_raw_value() {
        assert_eq!(
            CredentialId::new("urn:uuid:bbba8553-8ec1-445f-82c9-a57251dd731c").to_string(),
            "urn:uuid:bbba8553-8ec1-445f-82c9-a57251dd731c"
        );
        assert_eq!(
            TransactionId::new("d75b7a5b").to_string(),
            "d75b7a5b"
        );
    }

    #[test]
    fn test_run_id_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_serde_is_transparent_enough() {
        let id = CredentialId::new("urn:uuid:1234");
        let json = serde_json::to_string(&id).unwrap();
        let back: CredentialId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
