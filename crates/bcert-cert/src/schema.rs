//! # Schema Detection and Normalization
//!
//! Credential documents arrive in several historical shapes. This module
//! detects which vintage a raw document is and normalizes it into the one
//! `Certificate` shape the rest of the pipeline consumes.
//!
//! ## Version Dispatch, Not Scattered Branching
//!
//! All version-specific knowledge lives in the static [`FieldMap`] table:
//! where the proof container sits, which subtree is hashed, where the
//! credential id, issuer, expiration, and signing-key references are found.
//! Downstream steps never ask "is this a v1 document"; they operate on the
//! normalized certificate only.
//!
//! ## Supported Versions
//!
//! - **1.2** — the original anchored format: signed content under
//!   `document`, chainpoint receipt under `receipt`.
//! - **2.0** — open-badge envelope: proof under `signature`
//!   (`MerkleProof2017`), issuer under `badge.issuer`, top-level `expires`.
//! - **2.0-alpha** — the experimental pre-release of 2.0: same envelope,
//!   but the proof container kept its old `receipt` name.
//!
//! Anything else is `UnsupportedSchema`, reported before any verification
//! step runs.

use serde_json::Value;
use thiserror::Error;

use bcert_anchor::merkle::{MerkleProof, PathStep, Side};
use bcert_anchor::network::Network;
use bcert_core::{CredentialId, IssuerId, KeyId, Timestamp, TransactionId};

use crate::certificate::Certificate;

/// Context URL fragments that identify each schema vintage.
const V1_CONTEXT: &str = "w3id.org/blockcerts/v1";
const V2_CONTEXT: &str = "w3id.org/blockcerts/v2";
const V2_ALPHA_CONTEXT: &str = "blockcerts/schema/2.0-alpha";

/// Error producing a normalized certificate from a raw document.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document's version could not be recognized. Terminal: no
    /// verification steps run for such a document.
    #[error("unsupported schema: {0}")]
    UnsupportedSchema(String),

    /// The version was recognized but the document is structurally invalid.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// A supported credential schema vintage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Original anchored format (1.2).
    V1_2,
    /// Open-badge envelope (2.0).
    V2_0,
    /// Experimental pre-release of 2.0.
    V2_0Alpha,
}

impl SchemaVersion {
    /// The version tag as shown in messages and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_2 => "1.2",
            Self::V2_0 => "2.0",
            Self::V2_0Alpha => "2.0-alpha",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which portion of the raw document is hashed.
#[derive(Debug, Clone, Copy)]
enum ContentRule {
    /// Hash the whole document with the proof container removed.
    StripProof,
    /// Hash a named subtree verbatim (the 1.2 `document` node, which
    /// includes its embedded signature — that is what the issuer hashed).
    Subtree(&'static [&'static str]),
}

/// Per-version extraction table. One row per supported vintage; the only
/// place in the stack that knows where anything lives in a raw document.
struct FieldMap {
    proof_container: &'static str,
    content: ContentRule,
    credential_id: &'static [&'static str],
    issuer: &'static [&'static str],
    expires: &'static [&'static str],
    signing_key: &'static [&'static str],
}

static V1_2_MAP: FieldMap = FieldMap {
    proof_container: "receipt",
    content: ContentRule::Subtree(&["document"]),
    credential_id: &["document", "assertion", "uid"],
    issuer: &["document", "certificate", "issuer"],
    expires: &["document", "assertion", "expires"],
    signing_key: &[],
};

static V2_0_MAP: FieldMap = FieldMap {
    proof_container: "signature",
    content: ContentRule::StripProof,
    credential_id: &["id"],
    issuer: &["badge", "issuer"],
    expires: &["expires"],
    signing_key: &["verification", "publicKey"],
};

static V2_0_ALPHA_MAP: FieldMap = FieldMap {
    proof_container: "receipt",
    content: ContentRule::StripProof,
    credential_id: &["id"],
    issuer: &["badge", "issuer"],
    expires: &["expires"],
    signing_key: &["verification", "publicKey"],
};

fn field_map(version: SchemaVersion) -> &'static FieldMap {
    match version {
        SchemaVersion::V1_2 => &V1_2_MAP,
        SchemaVersion::V2_0 => &V2_0_MAP,
        SchemaVersion::V2_0Alpha => &V2_0_ALPHA_MAP,
    }
}

/// Collect the `@context` URL strings from a raw document.
///
/// The `@context` entry may be a single string or an array of strings;
/// any other shape (or an absent entry) yields an empty list.
fn context_strings(raw: &Value) -> Vec<String> {
    match raw.get("@context") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Detect the schema vintage of a raw document.
///
/// Detection inspects `@context` URLs first; documents that predate
/// reliable contexts fall back to structural detection (the 1.2
/// `document` + `receipt` pair).
///
/// # Errors
///
/// Returns `SchemaError::UnsupportedSchema` if no vintage matches.
pub fn detect(raw: &Value) -> Result<SchemaVersion, SchemaError> {
    let contexts = context_strings(raw);
    if contexts.iter().any(|c| c.contains(V2_ALPHA_CONTEXT)) {
        return Ok(SchemaVersion::V2_0Alpha);
    }
    if contexts.iter().any(|c| c.contains(V2_CONTEXT)) {
        return Ok(SchemaVersion::V2_0);
    }
    if contexts.iter().any(|c| c.contains(V1_CONTEXT)) {
        return Ok(SchemaVersion::V1_2);
    }
    // Early 1.2 documents shipped without a blockcerts context.
    if raw.get("document").is_some() && raw.get("receipt").is_some() {
        return Ok(SchemaVersion::V1_2);
    }
    Err(SchemaError::UnsupportedSchema(format!(
        "no recognized version marker (contexts: {contexts:?})"
    )))
}

/// Normalize a raw document into a `Certificate`.
///
/// # Errors
///
/// `UnsupportedSchema` if the vintage is unknown; `Malformed` if the
/// vintage is known but required fields are missing or ill-typed.
pub fn normalize(raw: &Value) -> Result<Certificate, SchemaError> {
    let version = detect(raw)?;
    tracing::debug!(version = %version, "detected credential schema");
    let map = field_map(version);

    if !raw.is_object() {
        return Err(SchemaError::Malformed("document is not an object".into()));
    }

    let proof_value = raw.get(map.proof_container).ok_or_else(|| {
        SchemaError::Malformed(format!("missing proof container {:?}", map.proof_container))
    })?;
    let (proof, transaction_id, network) = parse_receipt(proof_value)?;

    let content = match map.content {
        ContentRule::StripProof => {
            let mut obj = raw
                .as_object()
                .cloned()
                .ok_or_else(|| SchemaError::Malformed("document is not an object".into()))?;
            obj.remove(map.proof_container);
            Value::Object(obj)
        }
        ContentRule::Subtree(path) => get_path(raw, path)
            .cloned()
            .ok_or_else(|| SchemaError::Malformed(format!("missing content subtree {path:?}")))?,
    };

    let credential_id = CredentialId::new(require_str(raw, map.credential_id)?);

    let issuer_obj = get_path(raw, map.issuer)
        .ok_or_else(|| SchemaError::Malformed(format!("missing issuer at {:?}", map.issuer)))?;
    let issuer_id = issuer_obj
        .get("id")
        .and_then(Value::as_str)
        .map(|s| IssuerId::new(s))
        .ok_or_else(|| SchemaError::Malformed("issuer object has no id".into()))?;
    let revocation_list = issuer_obj
        .get("revocationList")
        .and_then(Value::as_str)
        .map(str::to_string);

    let expires = match get_path(raw, map.expires).and_then(Value::as_str) {
        Some(s) => Some(Timestamp::parse_lenient(s).map_err(|e| {
            SchemaError::Malformed(format!("unparseable expiration date: {e}"))
        })?),
        None => None,
    };

    let signing_key = get_path(raw, map.signing_key)
        .and_then(Value::as_str)
        .map(KeyId::new);

    Ok(Certificate::new(
        version,
        credential_id,
        content,
        proof,
        transaction_id,
        network,
        issuer_id,
        revocation_list,
        signing_key,
        expires,
    ))
}

/// Parse a chainpoint-style receipt into a proof and anchor coordinates.
fn parse_receipt(receipt: &Value) -> Result<(MerkleProof, TransactionId, Network), SchemaError> {
    let target_hash = receipt
        .get("targetHash")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::Malformed("receipt has no targetHash".into()))?
        .to_string();
    let merkle_root = receipt
        .get("merkleRoot")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::Malformed("receipt has no merkleRoot".into()))?
        .to_string();

    // A missing proof array is a single-leaf tree, not a defect.
    let mut path = Vec::new();
    if let Some(steps) = receipt.get("proof") {
        let steps = steps
            .as_array()
            .ok_or_else(|| SchemaError::Malformed("receipt proof is not an array".into()))?;
        for step in steps {
            path.push(parse_path_step(step)?);
        }
    }

    let anchors = receipt
        .get("anchors")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::Malformed("receipt has no anchors array".into()))?;
    let anchor = anchors
        .first()
        .ok_or_else(|| SchemaError::Malformed("receipt anchors array is empty".into()))?;
    let source_id = anchor
        .get("sourceId")
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::Malformed("anchor has no sourceId".into()))?;
    // 1.2 receipts predate multi-chain anchoring and omit the chain field.
    let network = match anchor.get("chain").and_then(Value::as_str) {
        Some(chain) => Network::parse(chain)
            .ok_or_else(|| SchemaError::Malformed(format!("unrecognized chain {chain:?}")))?,
        None => Network::BitcoinMainnet,
    };

    let proof = MerkleProof {
        target_hash,
        path,
        merkle_root,
    };
    Ok((proof, TransactionId::new(source_id), network))
}

/// Parse one chainpoint path step: an object with exactly one of
/// `left`/`right`.
fn parse_path_step(step: &Value) -> Result<PathStep, SchemaError> {
    let obj = step
        .as_object()
        .ok_or_else(|| SchemaError::Malformed("proof step is not an object".into()))?;
    let left = obj.get("left").and_then(Value::as_str);
    let right = obj.get("right").and_then(Value::as_str);
    match (left, right) {
        (Some(hash), None) => Ok(PathStep {
            side: Side::Left,
            hash: hash.to_string(),
        }),
        (None, Some(hash)) => Ok(PathStep {
            side: Side::Right,
            hash: hash.to_string(),
        }),
        _ => Err(SchemaError::Malformed(
            "proof step must have exactly one of left/right".into(),
        )),
    }
}

/// Walk a path of object keys. Empty path yields `None` — used for
/// versions that simply do not carry a field.
fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn require_str<'a>(value: &'a Value, path: &[&str]) -> Result<&'a str, SchemaError> {
    get_path(value, path)
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::Malformed(format!("missing required field at {path:?}")))
}
