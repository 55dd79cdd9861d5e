//! # Issuer Authenticity
//!
//! Was the issuer's signing key valid when the anchoring transaction was
//! mined? Verification time is irrelevant here: a key revoked last year
//! still covers credentials it anchored while valid, and a key revoked
//! *before* the anchor means the anchor was produced by a key the issuer
//! had already disowned.
//!
//! Credential revocation and key revocation are distinct checks with
//! distinct step codes; neither subsumes the other.

use bcert_cert::issuer::IssuerProfile;
use bcert_core::{KeyId, Timestamp};

use crate::step::FailureKind;

/// Check that an issuer key covered the anchoring instant.
///
/// With a pinned key (`Some`), that exact key must exist in the profile
/// and be valid at `anchored_at`. Without one (older document vintages),
/// any key in the history that was valid at `anchored_at` suffices.
///
/// Returns the key that validated the credential.
///
/// # Errors
///
/// - `IssuerKeyRevokedBeforeTransaction` — the (or every candidate) key
///   was revoked at or before the anchoring instant.
/// - `UnknownIssuerKey` — no usable key record: not in the profile, not
///   yet created, expired, or the profile lists no keys at all.
pub fn check_key_validity(
    profile: &IssuerProfile,
    pinned: Option<&KeyId>,
    anchored_at: Timestamp,
) -> Result<KeyId, FailureKind> {
    if let Some(key_id) = pinned {
        let key = profile
            .key(key_id)
            .ok_or_else(|| FailureKind::UnknownIssuerKey(format!(
                "key {key_id} does not appear in the issuer profile"
            )))?;
        if anchored_at < key.created {
            return Err(FailureKind::UnknownIssuerKey(format!(
                "key {key_id} was created at {}, after the anchoring transaction at {anchored_at}",
                key.created
            )));
        }
        if let Some(revoked_at) = key.revoked {
            if revoked_at <= anchored_at {
                return Err(FailureKind::IssuerKeyRevokedBeforeTransaction {
                    key: key_id.as_str().to_string(),
                    revoked_at,
                    anchored_at,
                });
            }
        }
        if let Some(expires) = key.expires {
            if expires <= anchored_at {
                return Err(FailureKind::UnknownIssuerKey(format!(
                    "key {key_id} expired at {expires}, before the anchoring transaction at {anchored_at}"
                )));
            }
        }
        return Ok(key_id.clone());
    }

    // No pinned key: any historically valid key covers the anchor.
    if let Some(key) = profile.keys_valid_at(anchored_at).next() {
        return Ok(key.id.clone());
    }

    if profile.keys().is_empty() {
        return Err(FailureKind::UnknownIssuerKey(
            "issuer profile lists no keys".to_string(),
        ));
    }

    // Prefer the most informative failure: a key that existed but had been
    // revoked by the anchoring instant.
    if let Some(key) = profile.keys().iter().find(|k| {
        k.created <= anchored_at && k.revoked.map_or(false, |r| r <= anchored_at)
    }) {
        return Err(FailureKind::IssuerKeyRevokedBeforeTransaction {
            key: key.id.as_str().to_string(),
            revoked_at: key.revoked.expect("filtered on revoked"),
            anchored_at,
        });
    }

    Err(FailureKind::UnknownIssuerKey(format!(
        "no issuer key was valid at the anchoring transaction time {anchored_at}"
    )))
}
