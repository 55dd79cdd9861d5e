//! # Verification Steps and Statuses
//!
//! The closed enumerations every other module consumes: step codes with
//! their stable wire names, the four-valued status, and the failure-kind
//! taxonomy that step messages are built from.
//!
//! ## Wire Stability
//!
//! The strings returned by [`StepCode::as_str`] and [`Status::as_str`] are
//! a contract surface — downstream systems key off `checkingFormat`,
//! `computingLocalHash`, and friends. Renaming one is a breaking change.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bcert_core::Timestamp;

/// A verification step. Wire names are the camel-case forms produced by
/// [`StepCode::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepCode {
    /// Structural validation of the normalized credential.
    CheckingFormat,
    /// Canonical content hash computation.
    ComputingLocalHash,
    /// Blockchain transaction lookup.
    FetchingRemoteData,
    /// Local hash vs the proof's target hash.
    ComparingHashes,
    /// Merkle path replay to the claimed root.
    CheckingReceipt,
    /// Claimed root vs the anchored root.
    CheckingMerkleRoot,
    /// Credential-id membership in the revocation list.
    CheckingRevokedStatus,
    /// Issuer-key validity at the anchoring timestamp.
    CheckingAuthenticity,
    /// Credential expiration.
    CheckingExpiresDate,
    /// The run summary notification.
    Final,
}

/// The verification checks in execution order ([`StepCode::Final`] is the
/// summary, not a check).
pub const ALL_CHECKS: [StepCode; 9] = [
    StepCode::CheckingFormat,
    StepCode::ComputingLocalHash,
    StepCode::FetchingRemoteData,
    StepCode::ComparingHashes,
    StepCode::CheckingReceipt,
    StepCode::CheckingMerkleRoot,
    StepCode::CheckingRevokedStatus,
    StepCode::CheckingAuthenticity,
    StepCode::CheckingExpiresDate,
];

impl StepCode {
    /// The stable wire name for this step.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckingFormat => "checkingFormat",
            Self::ComputingLocalHash => "computingLocalHash",
            Self::FetchingRemoteData => "fetchingRemoteData",
            Self::ComparingHashes => "comparingHashes",
            Self::CheckingReceipt => "checkingReceipt",
            Self::CheckingMerkleRoot => "checkingMerkleRoot",
            Self::CheckingRevokedStatus => "checkingRevokedStatus",
            Self::CheckingAuthenticity => "checkingAuthenticity",
            Self::CheckingExpiresDate => "checkingExpiresDate",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for StepCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The status of a step transition (or of the whole run, in the final
/// notification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// The step has begun.
    Starting,
    /// The step (or run) completed successfully.
    Success,
    /// The step (or run) failed.
    Failure,
    /// The run passed every check but is anchored to a non-production
    /// network. Callers must not treat this as production-grade trust.
    MockSuccess,
}

impl Status {
    /// The stable wire name for this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::MockSuccess => "mockSuccess",
        }
    }

    /// Whether this status ends a step (everything except `starting`).
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Starting)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step transition: the unit of the progress trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Which step transitioned.
    pub code: StepCode,
    /// Human-readable description of the transition.
    pub message: String,
    /// The status the step transitioned to.
    pub status: Status,
}

impl StepResult {
    /// Build a step transition record.
    pub fn new(code: StepCode, message: impl Into<String>, status: Status) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }
}

/// Why a step failed. Rendered into the step's failure message; expected
/// conditions only — contract violations in collaborator responses are
/// programming errors and panic instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Document version not recognized; terminal before any step runs.
    #[error("unsupported schema: {0}")]
    UnsupportedSchema(String),

    /// Structurally invalid normalized form.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Computed local hash differs from the expected hash.
    #[error("computed hash {computed} does not match expected hash {expected}")]
    HashMismatch {
        /// The locally computed content hash.
        computed: String,
        /// The hash the proof targets.
        expected: String,
    },

    /// Transient external-data failure, retries exhausted.
    #[error("remote data unavailable: {0}")]
    Unavailable(String),

    /// External lookup definitively returned nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// An external call exceeded its allotted bound.
    #[error("external call timed out after {0:?}")]
    Timeout(Duration),

    /// Recomputed root disagrees with the claimed or anchored root.
    #[error("merkle proof invalid: {0}")]
    MerkleMismatch(String),

    /// Revocation data unreachable; never defaulted to "assumed valid".
    #[error("revocation status could not be determined: {0}")]
    RevocationCheckUnavailable(String),

    /// The credential id appears in the revocation set.
    #[error("credential {id} has been revoked: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Revoked {
        /// The revoked credential id.
        id: String,
        /// The issuer's stated reason, if published.
        reason: Option<String>,
    },

    /// The issuing key was revoked before the anchoring transaction.
    #[error("issuer key {key} was revoked at {revoked_at}, before the anchoring transaction at {anchored_at}")]
    IssuerKeyRevokedBeforeTransaction {
        /// The revoked key.
        key: String,
        /// When the key was revoked.
        revoked_at: Timestamp,
        /// When the anchoring transaction was mined.
        anchored_at: Timestamp,
    },

    /// No usable issuer key record for the anchoring instant.
    #[error("unknown issuer key: {0}")]
    UnknownIssuerKey(String),

    /// The credential is past its expiration timestamp.
    #[error("credential expired at {0}")]
    Expired(Timestamp),

    /// A step this one depends on did not succeed; the check was not run.
    #[error("precondition not met: step {0} did not succeed")]
    DependencyFailed(StepCode),
}
