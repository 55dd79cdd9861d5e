//! # Revocation Lists
//!
//! An issuer-published set of identifiers that are no longer trusted:
//! credential ids, or signing-key ids revoked out of band. Membership in
//! the set means revoked; absence means valid.
//!
//! ## Availability Semantics
//!
//! Revocation is an availability-blocking check. A list that cannot be
//! fetched is a verification *failure*
//! (`RevocationCheckUnavailable`), never "assumed valid" — an attacker who
//! can block the list fetch must not be able to resurrect a revoked
//! credential.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use bcert_core::Timestamp;

/// Error fetching or parsing a revocation list.
#[derive(Error, Debug)]
pub enum RevocationError {
    /// The list could not be fetched right now.
    #[error("revocation list unavailable: {0}")]
    Unavailable(String),

    /// The list was fetched but does not parse.
    #[error("malformed revocation list: {0}")]
    Malformed(String),
}

/// One revoked identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    /// The revoked identifier (credential id or key id).
    pub id: String,
    /// When the revocation took effect, if published.
    pub revoked_at: Option<Timestamp>,
    /// The issuer's stated reason, if any.
    pub reason: Option<String>,
}

/// A fetched revocation list: a read-only snapshot for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationList {
    reference: String,
    entries: Vec<RevocationEntry>,
}

impl RevocationList {
    /// Build a list directly (fixtures, tests).
    pub fn new(reference: impl Into<String>, entries: Vec<RevocationEntry>) -> Self {
        Self {
            reference: reference.into(),
            entries,
        }
    }

    /// Parse a revocation list document.
    ///
    /// The published shape is `{"revokedAssertions": [{"id": ...,
    /// "revocationReason": ...}, ...]}`; entries may be bare id strings in
    /// older lists.
    ///
    /// # Errors
    ///
    /// `Malformed` if the assertions container is missing or ill-typed.
    pub fn parse(reference: &str, raw: &Value) -> Result<Self, RevocationError> {
        let assertions = raw
            .get("revokedAssertions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RevocationError::Malformed("list has no revokedAssertions array".into())
            })?;

        let mut entries = Vec::with_capacity(assertions.len());
        for assertion in assertions {
            entries.push(parse_entry(assertion)?);
        }
        Ok(Self {
            reference: reference.to_string(),
            entries,
        })
    }

    /// The reference this list was fetched from.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// All revoked entries.
    pub fn entries(&self) -> &[RevocationEntry] {
        &self.entries
    }

    /// Test membership: `Some` with the entry if `id` is revoked.
    pub fn find(&self, id: &str) -> Option<&RevocationEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Whether `id` appears in the revocation set.
    pub fn is_revoked(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

fn parse_entry(assertion: &Value) -> Result<RevocationEntry, RevocationError> {
    match assertion {
        Value::String(id) => Ok(RevocationEntry {
            id: id.clone(),
            revoked_at: None,
            reason: None,
        }),
        Value::Object(obj) => {
            let id = obj
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    RevocationError::Malformed("revoked assertion has no id".into())
                })?
                .to_string();
            let revoked_at = match obj.get("revokedAt").and_then(Value::as_str) {
                Some(s) => Some(Timestamp::parse_lenient(s).map_err(|e| {
                    RevocationError::Malformed(format!("bad revokedAt timestamp: {e}"))
                })?),
                None => None,
            };
            let reason = obj
                .get("revocationReason")
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok(RevocationEntry {
                id,
                revoked_at,
                reason,
            })
        }
        other => Err(RevocationError::Malformed(format!(
            "revoked assertion is neither string nor object: {other}"
        ))),
    }
}

/// A provider that resolves revocation lists.
#[async_trait]
pub trait RevocationSource: Send + Sync {
    /// Fetch the revocation list published at the given reference.
    async fn fetch_revocation_list(
        &self,
        reference: &str,
    ) -> Result<RevocationList, RevocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIST_URL: &str = "https://issuer.example.org/revocation.json";

    #[test]
    fn test_parse_object_entries() {
        let raw = json!({
            "id": LIST_URL,
            "revokedAssertions": [
                {
                    "id": "urn:uuid:3bc1a96a-3501-46ed-8f75-49612bbac257",
                    "revocationReason": "Issued in error."
                },
                {
                    "id": "urn:uuid:bbba8553-8ec1-445f-82c9-a57251dd731c",
                    "revokedAt": "2017-09-01T00:00:00Z"
                }
            ]
        });
        let list = RevocationList::parse(LIST_URL, &raw).unwrap();
        assert_eq!(list.entries().len(), 2);
        let entry = list.find("urn:uuid:3bc1a96a-3501-46ed-8f75-49612bbac257").unwrap();
        assert_eq!(entry.reason.as_deref(), Some("Issued in error."));
        assert!(list
            .find("urn:uuid:bbba8553-8ec1-445f-82c9-a57251dd731c")
            .unwrap()
            .revoked_at
            .is_some());
    }

    #[test]
    fn test_parse_bare_string_entries() {
        let raw = json!({"revokedAssertions": ["urn:uuid:aaaa", "urn:uuid:bbbb"]});
        let list = RevocationList::parse(LIST_URL, &raw).unwrap();
        assert!(list.is_revoked("urn:uuid:aaaa"));
        assert!(!list.is_revoked("urn:uuid:cccc"));
    }

    #[test]
    fn test_empty_list_revokes_nothing() {
        let raw = json!({"revokedAssertions": []});
        let list = RevocationList::parse(LIST_URL, &raw).unwrap();
        assert!(!list.is_revoked("urn:uuid:anything"));
    }

    #[test]
    fn test_missing_container_is_malformed() {
        let raw = json!({"id": LIST_URL});
        assert!(matches!(
            RevocationList::parse(LIST_URL, &raw),
            Err(RevocationError::Malformed(_))
        ));
    }

    #[test]
    fn test_entry_without_id_is_malformed() {
        let raw = json!({"revokedAssertions": [{"revocationReason": "oops"}]});
        assert!(matches!(
            RevocationList::parse(LIST_URL, &raw),
            Err(RevocationError::Malformed(_))
        ));
    }
}
