//! # Transaction Lookup — Collaborator Contract
//!
//! The seam between the verifier and whatever actually talks to a
//! blockchain: explorers, full nodes, test fixtures. The verifier never
//! sees a transport; it sees `TransactionSource` trait objects arranged in
//! a `ProviderChain` with an explicit `RetryPolicy`.
//!
//! ## Failure Semantics
//!
//! - `NotFound` is definitive: the chain does not have this transaction.
//!   No retry, no fallback to other providers — they observe the same chain.
//! - `Unavailable` is transient: the next provider is tried, and once all
//!   providers are exhausted the whole attempt is retried with backoff,
//!   up to the policy's attempt bound.
//! - `Timeout` is terminal for the run's lookup step. A call that exceeds
//!   its bound is not re-entered into the retry loop; unbounded retry of
//!   slow providers is how verification runs hang forever.
//!
//! Retry policy is a value the caller constructs, not an implementation
//! detail hidden inside a source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use bcert_core::TransactionId;

use crate::network::Network;
use crate::transaction::Transaction;

/// Error from a transaction lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The chain definitively has no transaction with this id.
    #[error("transaction {0} not found")]
    NotFound(TransactionId),

    /// The source could not answer right now (network fault, rate limit).
    #[error("lookup unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its allotted bound.
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The source returned data that violates the collaborator contract
    /// (e.g. a malformed anchored root). Treated as unavailable data, but
    /// kept distinct for diagnostics.
    #[error("malformed response from {source_name}: {reason}")]
    Malformed {
        /// Name of the offending source.
        source_name: String,
        /// What was wrong with the response.
        reason: String,
    },
}

/// A provider that can resolve anchoring transactions on some network.
///
/// Implementations must be cancellation-safe: dropping an in-flight
/// `fetch_transaction` future must not leave background work running.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// A short name for logs and error messages.
    fn name(&self) -> &str;

    /// Fetch the transaction with the given id from the given network.
    async fn fetch_transaction(
        &self,
        id: &TransactionId,
        network: Network,
    ) -> Result<Transaction, LookupError>;
}

/// Retry/backoff configuration for transaction lookup.
///
/// An explicit parameter of the lookup layer: the orchestrator decides how
/// patient a run is allowed to be, sources stay policy-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts across the provider chain (first try included).
    pub max_attempts: u32,
    /// Backoff before the second attempt.
    pub initial_backoff: Duration,
    /// Multiplier applied to the backoff after each failed attempt.
    pub multiplier: u32,
    /// Bound on each individual provider call.
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2,
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// The backoff to sleep before attempt `attempt` (1-based; attempt 0
    /// is the first try and has no backoff).
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.initial_backoff * self.multiplier.saturating_pow(attempt - 1)
    }
}

/// An ordered set of transaction sources tried in priority order.
///
/// The first successful response wins. All sources failing transiently
/// surfaces as `Unavailable` after the policy's attempts are exhausted.
pub struct ProviderChain {
    sources: Vec<Arc<dyn TransactionSource>>,
    policy: RetryPolicy,
}

impl ProviderChain {
    /// Build a chain from sources in priority order.
    pub fn new(sources: Vec<Arc<dyn TransactionSource>>, policy: RetryPolicy) -> Self {
        Self { sources, policy }
    }

    /// The retry policy this chain applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch a transaction, fanning over providers with bounded retries.
    ///
    /// # Errors
    ///
    /// - `NotFound` as soon as any provider definitively reports it.
    /// - `Timeout` as soon as any provider call exceeds the policy bound.
    /// - `Unavailable` when every provider failed transiently on every
    ///   attempt, or when the chain has no sources.
    pub async fn fetch(
        &self,
        id: &TransactionId,
        network: Network,
    ) -> Result<Transaction, LookupError> {
        if self.sources.is_empty() {
            return Err(LookupError::Unavailable(
                "no transaction sources configured".to_string(),
            ));
        }

        let mut last_unavailable = String::new();
        for attempt in 0..self.policy.max_attempts {
            let backoff = self.policy.backoff_before(attempt);
            if !backoff.is_zero() {
                tracing::debug!(?backoff, attempt, "backing off before lookup retry");
                tokio::time::sleep(backoff).await;
            }

            for source in &self.sources {
                let call = source.fetch_transaction(id, network);
                match tokio::time::timeout(self.policy.call_timeout, call).await {
                    Ok(Ok(tx)) => {
                        tracing::debug!(source = source.name(), txid = %id, "lookup succeeded");
                        return Ok(tx);
                    }
                    Ok(Err(LookupError::NotFound(id))) => {
                        tracing::debug!(source = source.name(), txid = %id, "transaction not found");
                        return Err(LookupError::NotFound(id));
                    }
                    Ok(Err(LookupError::Timeout(d))) => {
                        return Err(LookupError::Timeout(d));
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(
                            source = source.name(),
                            %err,
                            attempt,
                            "lookup source failed, trying next"
                        );
                        last_unavailable = format!("{}: {err}", source.name());
                    }
                    Err(_) => {
                        tracing::warn!(
                            source = source.name(),
                            timeout = ?self.policy.call_timeout,
                            "lookup source timed out"
                        );
                        return Err(LookupError::Timeout(self.policy.call_timeout));
                    }
                }
            }
        }

        Err(LookupError::Unavailable(format!(
            "all sources failed after {} attempts (last: {last_unavailable})",
            self.policy.max_attempts
        )))
    }
}
