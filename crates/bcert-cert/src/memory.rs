//! # In-Memory Collaborator Sources
//!
//! `IssuerProfileSource` and `RevocationSource` backed by pre-loaded maps.
//! Used by the scenario tests and the CLI's offline mode, where issuer and
//! revocation data arrive as fixture files.

use std::collections::HashMap;

use async_trait::async_trait;

use bcert_core::IssuerId;

use crate::issuer::{IssuerProfile, IssuerProfileSource, ProfileError};
use crate::revocation::{RevocationError, RevocationList, RevocationSource};

/// An issuer profile source resolving from a fixed in-memory map.
#[derive(Debug, Default)]
pub struct StaticIssuerSource {
    profiles: HashMap<IssuerId, IssuerProfile>,
}

impl StaticIssuerSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile under its own id.
    pub fn insert(&mut self, profile: IssuerProfile) {
        self.profiles.insert(profile.id().clone(), profile);
    }
}

#[async_trait]
impl IssuerProfileSource for StaticIssuerSource {
    async fn fetch_profile(&self, id: &IssuerId) -> Result<IssuerProfile, ProfileError> {
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(id.clone()))
    }
}

/// A revocation source resolving from a fixed in-memory map keyed by
/// list reference.
#[derive(Debug, Default)]
pub struct StaticRevocationSource {
    lists: HashMap<String, RevocationList>,
}

impl StaticRevocationSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a list under its reference.
    pub fn insert(&mut self, list: RevocationList) {
        self.lists.insert(list.reference().to_string(), list);
    }
}

#[async_trait]
impl RevocationSource for StaticRevocationSource {
    async fn fetch_revocation_list(
        &self,
        reference: &str,
    ) -> Result<RevocationList, RevocationError> {
        self.lists.get(reference).cloned().ok_or_else(|| {
            RevocationError::Unavailable(format!("no list loaded for {reference}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::IssuerKey;
    use crate::revocation::RevocationEntry;
    use bcert_core::{KeyId, Timestamp};

    #[tokio::test]
    async fn test_issuer_source_roundtrip() {
        let mut source = StaticIssuerSource::new();
        let id = IssuerId::new("https://issuer.example.org/issuer.json");
        source.insert(IssuerProfile::new(
            id.clone(),
            vec![IssuerKey {
                id: KeyId::new("1ABC"),
                created: Timestamp::parse("2016-01-01T00:00:00Z").unwrap(),
                revoked: None,
                expires: None,
            }],
            None,
        ));

        let profile = source.fetch_profile(&id).await.unwrap();
        assert_eq!(profile.keys().len(), 1);

        let missing = source
            .fetch_profile(&IssuerId::new("https://other.example.org"))
            .await;
        assert!(matches!(missing, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_revocation_source_roundtrip() {
        let mut source = StaticRevocationSource::new();
        source.insert(RevocationList::new(
            "https://issuer.example.org/revocation.json",
            vec![RevocationEntry {
                id: "urn:uuid:aaaa".into(),
                revoked_at: None,
                reason: None,
            }],
        ));

        let list = source
            .fetch_revocation_list("https://issuer.example.org/revocation.json")
            .await
            .unwrap();
        assert!(list.is_revoked("urn:uuid:aaaa"));

        let missing = source.fetch_revocation_list("https://nope.example.org").await;
        assert!(matches!(missing, Err(RevocationError::Unavailable(_))));
    }
}
