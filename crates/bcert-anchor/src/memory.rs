//! # In-Memory Transaction Source
//!
//! A `TransactionSource` backed by a pre-loaded map. Used by the scenario
//! tests and by the CLI's offline mode, where the anchoring evidence is
//! supplied as a fixture file rather than fetched from a live chain.

use std::collections::HashMap;

use async_trait::async_trait;

use bcert_core::TransactionId;

use crate::lookup::{LookupError, TransactionSource};
use crate::network::Network;
use crate::transaction::Transaction;

/// A transaction source resolving from a fixed in-memory map.
///
/// Lookups are keyed by (transaction id, network); a transaction loaded
/// for mainnet is not visible to a testnet query.
#[derive(Debug, Default)]
pub struct StaticTransactionSource {
    name: String,
    transactions: HashMap<(TransactionId, Network), Transaction>,
}

impl StaticTransactionSource {
    /// Create an empty source with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transactions: HashMap::new(),
        }
    }

    /// Register a transaction. Replaces any previous entry for the same
    /// (id, network) pair.
    pub fn insert(&mut self, tx: Transaction) {
        self.transactions
            .insert((tx.id.clone(), tx.network), tx);
    }

    /// Number of registered transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the source holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[async_trait]
impl TransactionSource for StaticTransactionSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_transaction(
        &self,
        id: &TransactionId,
        network: Network,
    ) -> Result<Transaction, LookupError> {
        self.transactions
            .get(&(id.clone(), network))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(id.clone()))
    }
}
