//! # Verification Orchestrator
//!
//! Sequences the verification steps in fixed dependency order, reports
//! every transition through the progress sink, and resolves the aggregate
//! verdict. One `verify` call is one run; the completion notification
//! fires exactly once per run, whatever fails.
//!
//! ## Short-Circuit Semantics
//!
//! A failed step fails only its dependents: a hash-computation failure
//! skips the hash comparison but not the independent expiration check.
//! Skipped steps are recorded as failures whose message names the unmet
//! precondition — never silently omitted.
//!
//! ## External I/O
//!
//! Transaction lookup goes through the `ProviderChain` (explicit retry
//! policy); issuer-profile and revocation-list fetches are bounded by the
//! configured I/O timeout. A timeout surfaces as its own failure kind and
//! is never retried indefinitely. All awaits happen inline in the verify
//! future, so dropping it at a suspension point cancels the run without
//! leaking background work.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use bcert_anchor::lookup::{LookupError, ProviderChain};
use bcert_anchor::network::NetworkClass;
use bcert_anchor::transaction::Transaction;
use bcert_cert::certificate::Certificate;
use bcert_cert::issuer::{IssuerProfile, IssuerProfileSource, ProfileError};
use bcert_cert::revocation::RevocationSource;
use bcert_cert::schema::{self, SchemaError};
use bcert_core::digest::is_hex_digest;
use bcert_core::{RunId, Timestamp};

use crate::authenticity::check_key_validity;
use crate::progress::ProgressSink;
use crate::state::{VerificationState, Verdict};
use crate::step::{FailureKind, Status, StepCode, StepResult};

/// Tunables for a verifier's external I/O.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Bound on each issuer-profile and revocation-list fetch. (The
    /// transaction lookup bound lives in the provider chain's retry
    /// policy.)
    pub io_timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            io_timeout: Duration::from_secs(10),
        }
    }
}

/// The outcome of one verification run.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// The run identifier (correlates log events).
    pub run_id: RunId,
    /// The aggregate verdict.
    pub verdict: Verdict,
    /// The final notification: `(final, message, status)`. Its message
    /// names the first failing check's reason when the run failed.
    pub final_result: StepResult,
    /// Every step transition in execution order.
    pub trace: Vec<StepResult>,
}

impl VerificationReport {
    /// The terminal result recorded for a step, if any.
    pub fn terminal(&self, code: StepCode) -> Option<&StepResult> {
        self.trace
            .iter()
            .find(|r| r.code == code && r.status.is_terminal())
    }
}

/// The verification orchestrator.
///
/// Holds the collaborator seams; owns no per-run state, so concurrent
/// `verify` calls are independent.
pub struct Verifier {
    transactions: ProviderChain,
    issuers: Arc<dyn IssuerProfileSource>,
    revocations: Arc<dyn RevocationSource>,
    config: VerifierConfig,
    clock: Option<Timestamp>,
}

impl Verifier {
    /// Build a verifier over the given collaborators.
    pub fn new(
        transactions: ProviderChain,
        issuers: Arc<dyn IssuerProfileSource>,
        revocations: Arc<dyn RevocationSource>,
    ) -> Self {
        Self {
            transactions,
            issuers,
            revocations,
            config: VerifierConfig::default(),
            clock: None,
        }
    }

    /// Replace the I/O configuration.
    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin "now" for the expiration check (tests, replay).
    pub fn with_clock(mut self, now: Timestamp) -> Self {
        self.clock = Some(now);
        self
    }

    fn now(&self) -> Timestamp {
        self.clock.unwrap_or_else(Timestamp::now)
    }

    /// Verify a raw credential document.
    ///
    /// Every step transition is reported through `sink` (at most twice per
    /// step); the returned report carries the final result and the full
    /// trace. This method never panics on expected data conditions and
    /// always produces exactly one final notification.
    pub async fn verify(&self, raw: &Value, sink: &dyn ProgressSink) -> VerificationReport {
        let run_id = RunId::new();
        let mut state = VerificationState::new(run_id);
        state.begin_run();
        tracing::info!(run = %run_id, "verification started");

        // Schema adaptation precedes the step sequence: a document whose
        // version cannot even be recognized runs no steps at all.
        let prepared = match schema::normalize(raw) {
            Err(SchemaError::UnsupportedSchema(detail)) => {
                let kind = FailureKind::UnsupportedSchema(detail);
                tracing::warn!(run = %run_id, %kind, "document rejected before any step");
                state.complete(Verdict::Failure);
                return self.emit_final(state, sink, Verdict::Failure, kind.to_string());
            }
            other => other,
        };

        // checkingFormat
        self.begin(&mut state, sink, StepCode::CheckingFormat, "Validating credential structure");
        let cert: Option<Certificate> = match prepared {
            Ok(cert) => match cert.validate_structure() {
                Ok(()) => {
                    let message =
                        format!("Credential structure is valid ({} schema)", cert.version());
                    self.succeed(&mut state, sink, StepCode::CheckingFormat, message);
                    Some(cert)
                }
                Err(err) => {
                    let kind = FailureKind::MalformedDocument(schema_detail(err));
                    self.fail(&mut state, sink, StepCode::CheckingFormat, &kind);
                    None
                }
            },
            Err(err) => {
                let kind = FailureKind::MalformedDocument(schema_detail(err));
                self.fail(&mut state, sink, StepCode::CheckingFormat, &kind);
                None
            }
        };

        // computingLocalHash
        self.begin(&mut state, sink, StepCode::ComputingLocalHash, "Computing canonical content hash");
        let local_hash: Option<String> = match &cert {
            None => {
                self.fail_dependency(&mut state, sink, StepCode::ComputingLocalHash, StepCode::CheckingFormat);
                None
            }
            Some(cert) => match cert.local_hash() {
                Ok(hash) => {
                    self.succeed(&mut state, sink, StepCode::ComputingLocalHash, format!("Computed local hash {hash}"));
                    Some(hash)
                }
                Err(err) => {
                    let kind = FailureKind::MalformedDocument(err.to_string());
                    self.fail(&mut state, sink, StepCode::ComputingLocalHash, &kind);
                    None
                }
            },
        };

        // fetchingRemoteData
        self.begin(&mut state, sink, StepCode::FetchingRemoteData, "Fetching anchoring transaction");
        let transaction: Option<Transaction> = match &cert {
            None => {
                self.fail_dependency(&mut state, sink, StepCode::FetchingRemoteData, StepCode::CheckingFormat);
                None
            }
            Some(cert) => match self
                .transactions
                .fetch(cert.transaction_id(), cert.network())
                .await
            {
                Ok(tx) if !is_hex_digest(&tx.anchored_root) => {
                    let kind = FailureKind::Unavailable(format!(
                        "source returned malformed anchored root {:?}",
                        tx.anchored_root
                    ));
                    self.fail(&mut state, sink, StepCode::FetchingRemoteData, &kind);
                    None
                }
                Ok(tx) => {
                    self.succeed(&mut state, sink, StepCode::FetchingRemoteData, format!("Anchoring transaction {} retrieved", tx.id));
                    Some(tx)
                }
                Err(err) => {
                    self.fail(&mut state, sink, StepCode::FetchingRemoteData, &lookup_failure(err));
                    None
                }
            },
        };

        // comparingHashes
        self.begin(&mut state, sink, StepCode::ComparingHashes, "Comparing local hash against proof target");
        match (&cert, &local_hash) {
            (Some(cert), Some(hash)) => match cert.proof().check_target(hash) {
                Ok(()) => {
                    self.succeed(&mut state, sink, StepCode::ComparingHashes, "Local hash matches the proof target".to_string());
                }
                Err(_) => {
                    let kind = FailureKind::HashMismatch {
                        computed: hash.clone(),
                        expected: cert.expected_hash().to_string(),
                    };
                    self.fail(&mut state, sink, StepCode::ComparingHashes, &kind);
                }
            },
            _ => self.fail_dependency(&mut state, sink, StepCode::ComparingHashes, StepCode::ComputingLocalHash),
        }

        // checkingReceipt
        self.begin(&mut state, sink, StepCode::CheckingReceipt, "Replaying merkle proof path");
        match &cert {
            None => self.fail_dependency(&mut state, sink, StepCode::CheckingReceipt, StepCode::CheckingFormat),
            Some(cert) => match cert.proof().check_receipt() {
                Ok(()) => {
                    self.succeed(&mut state, sink, StepCode::CheckingReceipt, "Merkle path reduces to the claimed root".to_string());
                }
                Err(err) => {
                    let kind = FailureKind::MerkleMismatch(err.to_string());
                    self.fail(&mut state, sink, StepCode::CheckingReceipt, &kind);
                }
            },
        }

        // checkingMerkleRoot
        self.begin(&mut state, sink, StepCode::CheckingMerkleRoot, "Comparing claimed root against anchored root");
        match (&cert, &transaction) {
            (Some(cert), Some(tx)) => match cert.proof().check_anchored_root(&tx.anchored_root) {
                Ok(()) => {
                    self.succeed(&mut state, sink, StepCode::CheckingMerkleRoot, "Claimed root matches the anchored root".to_string());
                }
                Err(err) => {
                    let kind = FailureKind::MerkleMismatch(err.to_string());
                    self.fail(&mut state, sink, StepCode::CheckingMerkleRoot, &kind);
                }
            },
            _ => self.fail_dependency(&mut state, sink, StepCode::CheckingMerkleRoot, StepCode::FetchingRemoteData),
        }

        // checkingRevokedStatus — profile fetched here is reused by the
        // authenticity step; a run reads each collaborator snapshot once.
        self.begin(&mut state, sink, StepCode::CheckingRevokedStatus, "Checking revocation status");
        let mut profile: Option<IssuerProfile> = None;
        match &cert {
            None => self.fail_dependency(&mut state, sink, StepCode::CheckingRevokedStatus, StepCode::CheckingFormat),
            Some(cert) => match self.revocation_outcome(cert, &mut profile).await {
                Ok(message) => self.succeed(&mut state, sink, StepCode::CheckingRevokedStatus, message),
                Err(kind) => self.fail(&mut state, sink, StepCode::CheckingRevokedStatus, &kind),
            },
        }

        // checkingAuthenticity
        self.begin(&mut state, sink, StepCode::CheckingAuthenticity, "Checking issuer key validity at anchoring time");
        match (&cert, &transaction) {
            (Some(cert), Some(tx)) => {
                let resolved = match profile {
                    Some(p) => Ok(p),
                    None => self.fetch_profile(cert).await,
                };
                match resolved {
                    Ok(profile) => {
                        match check_key_validity(&profile, cert.signing_key(), tx.timestamp) {
                            Ok(key) => {
                                self.succeed(&mut state, sink, StepCode::CheckingAuthenticity, format!("Issuer key {key} was valid at anchoring time"));
                            }
                            Err(kind) => self.fail(&mut state, sink, StepCode::CheckingAuthenticity, &kind),
                        }
                    }
                    Err(kind) => self.fail(&mut state, sink, StepCode::CheckingAuthenticity, &kind),
                }
            }
            _ => self.fail_dependency(&mut state, sink, StepCode::CheckingAuthenticity, StepCode::FetchingRemoteData),
        }

        // checkingExpiresDate
        self.begin(&mut state, sink, StepCode::CheckingExpiresDate, "Checking expiration date");
        match &cert {
            None => self.fail_dependency(&mut state, sink, StepCode::CheckingExpiresDate, StepCode::CheckingFormat),
            Some(cert) => match cert.expires() {
                None => self.succeed(&mut state, sink, StepCode::CheckingExpiresDate, "Credential has no expiration date".to_string()),
                Some(expires) if expires <= self.now() => {
                    self.fail(&mut state, sink, StepCode::CheckingExpiresDate, &FailureKind::Expired(expires));
                }
                Some(_) => self.succeed(&mut state, sink, StepCode::CheckingExpiresDate, "Credential has not expired".to_string()),
            },
        }

        // Resolve the aggregate verdict. The network classification only
        // matters for fully passing runs.
        let class = cert
            .as_ref()
            .map(|c| c.network().class())
            .unwrap_or(NetworkClass::Production);
        let verdict = state.resolve(class);
        let message = match verdict {
            Verdict::Success => "All verification checks passed".to_string(),
            Verdict::MockSuccess => {
                "All checks passed; credential is anchored to a non-production network".to_string()
            }
            Verdict::Failure => state
                .first_failure()
                .map(|r| r.message.clone())
                .unwrap_or_else(|| "verification failed".to_string()),
        };
        self.emit_final(state, sink, verdict, message)
    }

    /// Resolve the revocation status for a certificate, populating
    /// `profile` if the issuer profile had to be fetched along the way.
    async fn revocation_outcome(
        &self,
        cert: &Certificate,
        profile: &mut Option<IssuerProfile>,
    ) -> Result<String, FailureKind> {
        let reference: Option<String> = match cert.revocation_list() {
            Some(r) => Some(r.to_string()),
            None => match self.fetch_profile(cert).await {
                Ok(p) => {
                    let r = p.revocation_list().map(str::to_string);
                    *profile = Some(p);
                    r
                }
                Err(FailureKind::Timeout(d)) => return Err(FailureKind::Timeout(d)),
                Err(other) => {
                    return Err(FailureKind::RevocationCheckUnavailable(other.to_string()))
                }
            },
        };

        let Some(reference) = reference else {
            // Absence from a revocation set means valid; an issuer that
            // publishes no set revokes nothing.
            return Ok("Issuer publishes no revocation list; credential is not revoked".to_string());
        };

        let fetch = self.revocations.fetch_revocation_list(&reference);
        let list = match tokio::time::timeout(self.config.io_timeout, fetch).await {
            Err(_) => return Err(FailureKind::Timeout(self.config.io_timeout)),
            Ok(Err(err)) => return Err(FailureKind::RevocationCheckUnavailable(err.to_string())),
            Ok(Ok(list)) => list,
        };

        match list.find(cert.credential_id().as_str()) {
            Some(entry) => Err(FailureKind::Revoked {
                id: entry.id.clone(),
                reason: entry.reason.clone(),
            }),
            None => Ok(format!("Credential {} is not revoked", cert.credential_id())),
        }
    }

    /// Fetch the issuer profile with the configured bound.
    async fn fetch_profile(&self, cert: &Certificate) -> Result<IssuerProfile, FailureKind> {
        let fetch = self.issuers.fetch_profile(cert.issuer());
        match tokio::time::timeout(self.config.io_timeout, fetch).await {
            Err(_) => Err(FailureKind::Timeout(self.config.io_timeout)),
            Ok(Err(ProfileError::NotFound(id))) => Err(FailureKind::UnknownIssuerKey(format!(
                "issuer profile {id} not found"
            ))),
            Ok(Err(ProfileError::Unavailable(detail))) => Err(FailureKind::Unavailable(detail)),
            Ok(Err(ProfileError::Malformed(detail))) => Err(FailureKind::UnknownIssuerKey(
                format!("issuer profile malformed: {detail}"),
            )),
            Ok(Ok(profile)) => Ok(profile),
        }
    }

    // -- step transition plumbing ------------------------------------------

    fn emit(
        &self,
        state: &mut VerificationState,
        sink: &dyn ProgressSink,
        code: StepCode,
        message: String,
        status: Status,
    ) {
        state.record(StepResult::new(code, message.clone(), status));
        sink.on_step(code, &message, status);
    }

    fn begin(
        &self,
        state: &mut VerificationState,
        sink: &dyn ProgressSink,
        code: StepCode,
        message: &str,
    ) {
        tracing::debug!(run = %state.run_id(), step = %code, "step starting");
        self.emit(state, sink, code, message.to_string(), Status::Starting);
    }

    fn succeed(
        &self,
        state: &mut VerificationState,
        sink: &dyn ProgressSink,
        code: StepCode,
        message: String,
    ) {
        tracing::debug!(run = %state.run_id(), step = %code, "step succeeded");
        self.emit(state, sink, code, message, Status::Success);
    }

    fn fail(
        &self,
        state: &mut VerificationState,
        sink: &dyn ProgressSink,
        code: StepCode,
        kind: &FailureKind,
    ) {
        tracing::warn!(run = %state.run_id(), step = %code, %kind, "step failed");
        self.emit(state, sink, code, kind.to_string(), Status::Failure);
    }

    fn fail_dependency(
        &self,
        state: &mut VerificationState,
        sink: &dyn ProgressSink,
        code: StepCode,
        dependency: StepCode,
    ) {
        self.fail(state, sink, code, &FailureKind::DependencyFailed(dependency));
    }

    fn emit_final(
        &self,
        mut state: VerificationState,
        sink: &dyn ProgressSink,
        verdict: Verdict,
        message: String,
    ) -> VerificationReport {
        let final_result = StepResult::new(StepCode::Final, message, verdict.as_status());
        state.record(final_result.clone());
        sink.on_step(StepCode::Final, &final_result.message, final_result.status);
        tracing::info!(run = %state.run_id(), verdict = ?verdict, "verification completed");
        VerificationReport {
            run_id: state.run_id(),
            verdict,
            final_result,
            trace: state.results().to_vec(),
        }
    }
}

fn schema_detail(err: SchemaError) -> String {
    match err {
        SchemaError::UnsupportedSchema(detail) | SchemaError::Malformed(detail) => detail,
    }
}

fn lookup_failure(err: LookupError) -> FailureKind {
    match err {
        LookupError::NotFound(id) => FailureKind::NotFound(format!("transaction {id}")),
        LookupError::Unavailable(detail) => FailureKind::Unavailable(detail),
        LookupError::Timeout(bound) => FailureKind::Timeout(bound),
        LookupError::Malformed { source_name, reason } => {
            FailureKind::Unavailable(format!("{source_name}: {reason}"))
        }
    }
}
