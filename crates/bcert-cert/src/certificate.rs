//! # Normalized Certificate
//!
//! The single credential shape the verification pipeline consumes,
//! produced by `schema::normalize()` and immutable from then on. One
//! verification run owns one `Certificate`.
//!
//! ## Security Invariant
//!
//! The content hash is computed here and only here, over the version-pinned
//! content subtree selected at normalization time, through the
//! `CanonicalBytes` pipeline. The verifier must reproduce exactly what the
//! issuer hashed; which fields participate is decided once, in the schema
//! layer, not re-derived downstream.

use serde_json::Value;

use bcert_anchor::merkle::MerkleProof;
use bcert_anchor::network::Network;
use bcert_core::digest::is_hex_digest;
use bcert_core::{sha256_hex, CanonicalBytes, CoreError, CredentialId, IssuerId, KeyId, Timestamp, TransactionId};

use crate::schema::{SchemaError, SchemaVersion};

/// A normalized, immutable credential ready for verification.
#[derive(Debug, Clone)]
pub struct Certificate {
    version: SchemaVersion,
    credential_id: CredentialId,
    content: Value,
    proof: MerkleProof,
    transaction_id: TransactionId,
    network: Network,
    issuer: IssuerId,
    revocation_list: Option<String>,
    signing_key: Option<KeyId>,
    expires: Option<Timestamp>,
}

impl Certificate {
    /// Assemble a certificate from normalized parts. Only the schema layer
    /// constructs these.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        version: SchemaVersion,
        credential_id: CredentialId,
        content: Value,
        proof: MerkleProof,
        transaction_id: TransactionId,
        network: Network,
        issuer: IssuerId,
        revocation_list: Option<String>,
        signing_key: Option<KeyId>,
        expires: Option<Timestamp>,
    ) -> Self {
        Self {
            version,
            credential_id,
            content,
            proof,
            transaction_id,
            network,
            issuer,
            revocation_list,
            signing_key,
            expires,
        }
    }

    /// The detected schema vintage.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// The credential identifier (tested against revocation lists).
    pub fn credential_id(&self) -> &CredentialId {
        &self.credential_id
    }

    /// The canonical content this certificate hashes over.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// The embedded Merkle inclusion proof.
    pub fn proof(&self) -> &MerkleProof {
        &self.proof
    }

    /// The expected local hash: the proof's target.
    pub fn expected_hash(&self) -> &str {
        &self.proof.target_hash
    }

    /// The anchoring transaction id.
    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// The network the credential claims to be anchored on.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The issuer reference (profile location).
    pub fn issuer(&self) -> &IssuerId {
        &self.issuer
    }

    /// The revocation list reference embedded in the document, if any.
    /// Absent here, the issuer profile's reference is used instead.
    pub fn revocation_list(&self) -> Option<&str> {
        self.revocation_list.as_deref()
    }

    /// The signing key the document pins, if any. 1.2 documents carry
    /// none; the issuer's whole key history is consulted instead.
    pub fn signing_key(&self) -> Option<&KeyId> {
        self.signing_key.as_ref()
    }

    /// The expiration timestamp, if the credential has one.
    pub fn expires(&self) -> Option<Timestamp> {
        self.expires
    }

    /// Structural validity of the normalized form.
    ///
    /// Runs as the first verification step: hex-shaped proof fields,
    /// object-shaped content, non-empty identifiers. Version detection
    /// already succeeded by the time a `Certificate` exists, so failures
    /// here are `Malformed`, never `UnsupportedSchema`.
    pub fn validate_structure(&self) -> Result<(), SchemaError> {
        if self.credential_id.as_str().is_empty() {
            return Err(SchemaError::Malformed("empty credential id".into()));
        }
        if !self.content.is_object() {
            return Err(SchemaError::Malformed(
                "canonical content is not an object".into(),
            ));
        }
        if !is_hex_digest(&self.proof.target_hash) {
            return Err(SchemaError::Malformed(format!(
                "target hash is not a hex digest: {:?}",
                self.proof.target_hash
            )));
        }
        if !is_hex_digest(&self.proof.merkle_root) {
            return Err(SchemaError::Malformed(format!(
                "merkle root is not a hex digest: {:?}",
                self.proof.merkle_root
            )));
        }
        for step in &self.proof.path {
            if !is_hex_digest(&step.hash) {
                return Err(SchemaError::Malformed(format!(
                    "proof path hash is not a hex digest: {:?}",
                    step.hash
                )));
            }
        }
        if self.transaction_id.as_str().is_empty() {
            return Err(SchemaError::Malformed("empty transaction id".into()));
        }
        Ok(())
    }

    /// Compute the local content hash (lowercase hex).
    ///
    /// Deterministic: repeated calls yield identical output. The content
    /// subtree was fixed at normalization time, so this is a pure function
    /// of the certificate.
    pub fn local_hash(&self) -> Result<String, CoreError> {
        let bytes = CanonicalBytes::new(&self.content)?;
        Ok(sha256_hex(&bytes))
    }
}
