//! # Issuer Profiles and Key History
//!
//! An issuer profile is the published record of an issuer's signing keys
//! and their validity windows. The authenticity check asks one question of
//! it: was the key that produced this credential valid when the anchoring
//! transaction was mined — not at verification time.
//!
//! Two profile generations are parsed: the current shape (`publicKey`
//! objects with `created`/`revoked`/`expires` timestamps) and the legacy
//! shape (`issuerKeys` entries with a `date` field). A current credential
//! may legitimately point at a legacy profile.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use bcert_core::{IssuerId, KeyId, Timestamp};

/// Error fetching or parsing an issuer profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// No profile exists for this issuer reference.
    #[error("issuer profile {0} not found")]
    NotFound(IssuerId),

    /// The profile could not be fetched right now.
    #[error("issuer profile unavailable: {0}")]
    Unavailable(String),

    /// The profile was fetched but does not parse.
    #[error("malformed issuer profile: {0}")]
    Malformed(String),
}

/// One signing key in an issuer's history, with its validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerKey {
    /// The key identifier (address-style string).
    pub id: KeyId,
    /// When the key entered service.
    pub created: Timestamp,
    /// When the key was revoked, if ever.
    pub revoked: Option<Timestamp>,
    /// When the key expires, if it does.
    pub expires: Option<Timestamp>,
}

impl IssuerKey {
    /// Whether this key was valid at the given instant.
    ///
    /// A key is valid from `created` (inclusive) until the earlier of
    /// `revoked`/`expires` (exclusive — a key revoked at the anchoring
    /// instant does not cover it).
    pub fn valid_at(&self, at: Timestamp) -> bool {
        if at < self.created {
            return false;
        }
        if let Some(revoked) = self.revoked {
            if revoked <= at {
                return false;
            }
        }
        if let Some(expires) = self.expires {
            if expires <= at {
                return false;
            }
        }
        true
    }
}

/// An issuer's published profile: key history plus revocation list
/// reference. Read-only snapshot for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerProfile {
    id: IssuerId,
    keys: Vec<IssuerKey>,
    revocation_list: Option<String>,
}

impl IssuerProfile {
    /// Build a profile directly (fixtures, tests).
    pub fn new(id: IssuerId, keys: Vec<IssuerKey>, revocation_list: Option<String>) -> Self {
        Self {
            id,
            keys,
            revocation_list,
        }
    }

    /// Parse a profile document of either generation.
    ///
    /// Current profiles carry `publicKey` entries; legacy profiles carry
    /// `issuerKeys` entries with a `date` field and no revocation data
    /// (legacy key revocation was published out of band).
    ///
    /// # Errors
    ///
    /// `Malformed` if neither key container is present or entries are
    /// ill-typed.
    pub fn parse(raw: &Value) -> Result<Self, ProfileError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .map(IssuerId::new)
            .ok_or_else(|| ProfileError::Malformed("profile has no id".into()))?;

        let revocation_list = raw
            .get("revocationList")
            .and_then(Value::as_str)
            .map(str::to_string);

        let keys = if let Some(entries) = raw.get("publicKey").and_then(Value::as_array) {
            entries.iter().map(parse_current_key).collect::<Result<_, _>>()?
        } else if let Some(entries) = raw.get("issuerKeys").and_then(Value::as_array) {
            entries.iter().map(parse_legacy_key).collect::<Result<_, _>>()?
        } else {
            return Err(ProfileError::Malformed(
                "profile has neither publicKey nor issuerKeys".into(),
            ));
        };

        Ok(Self {
            id,
            keys,
            revocation_list,
        })
    }

    /// The issuer this profile belongs to.
    pub fn id(&self) -> &IssuerId {
        &self.id
    }

    /// The full key history.
    pub fn keys(&self) -> &[IssuerKey] {
        &self.keys
    }

    /// The revocation list reference, if the issuer publishes one.
    pub fn revocation_list(&self) -> Option<&str> {
        self.revocation_list.as_deref()
    }

    /// Look up a key by id.
    pub fn key(&self, id: &KeyId) -> Option<&IssuerKey> {
        self.keys.iter().find(|k| &k.id == id)
    }

    /// All keys valid at the given instant.
    pub fn keys_valid_at(&self, at: Timestamp) -> impl Iterator<Item = &IssuerKey> {
        self.keys.iter().filter(move |k| k.valid_at(at))
    }
}

fn parse_timestamp_field(
    entry: &Value,
    field: &str,
) -> Result<Option<Timestamp>, ProfileError> {
    match entry.get(field).and_then(Value::as_str) {
        Some(s) => Timestamp::parse_lenient(s)
            .map(Some)
            .map_err(|e| ProfileError::Malformed(format!("bad {field} timestamp: {e}"))),
        None => Ok(None),
    }
}

fn parse_current_key(entry: &Value) -> Result<IssuerKey, ProfileError> {
    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .map(KeyId::new)
        .ok_or_else(|| ProfileError::Malformed("publicKey entry has no id".into()))?;
    let created = parse_timestamp_field(entry, "created")?
        .ok_or_else(|| ProfileError::Malformed(format!("key {id} has no created date")))?;
    Ok(IssuerKey {
        id,
        created,
        revoked: parse_timestamp_field(entry, "revoked")?,
        expires: parse_timestamp_field(entry, "expires")?,
    })
}

fn parse_legacy_key(entry: &Value) -> Result<IssuerKey, ProfileError> {
    let id = entry
        .get("key")
        .and_then(Value::as_str)
        .map(KeyId::new)
        .ok_or_else(|| ProfileError::Malformed("issuerKeys entry has no key".into()))?;
    let created = parse_timestamp_field(entry, "date")?
        .ok_or_else(|| ProfileError::Malformed(format!("key {id} has no date")))?;
    Ok(IssuerKey {
        id,
        created,
        revoked: None,
        expires: None,
    })
}

/// A provider that resolves issuer profiles.
#[async_trait]
pub trait IssuerProfileSource: Send + Sync {
    /// Fetch the profile published at the given issuer reference.
    async fn fetch_profile(&self, id: &IssuerId) -> Result<IssuerProfile, ProfileError>;
}
