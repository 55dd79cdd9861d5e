//! # Anchoring Transactions
//!
//! The transaction record returned by a lookup source: the on-chain
//! evidence a credential's proof is checked against.
//!
//! ## Trust Model
//!
//! A `Transaction` is untrusted input. Its anchored root means nothing
//! until the verifier independently reduces the credential's content hash
//! to the same value; its timestamp is only as good as the source that
//! served it. Nothing in this type performs validation beyond structure.

use serde::{Deserialize, Serialize};

use bcert_core::{Timestamp, TransactionId};

use crate::network::Network;

/// A blockchain transaction that anchors credential data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction identifier (hex txid).
    pub id: TransactionId,
    /// The network the transaction was observed on.
    pub network: Network,
    /// The Merkle root (or single credential hash) embedded in the
    /// transaction, as 64 hex chars.
    pub anchored_root: String,
    /// The block timestamp of the transaction.
    pub timestamp: Timestamp,
}

impl Transaction {
    /// Construct a transaction record.
    pub fn new(
        id: TransactionId,
        network: Network,
        anchored_root: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            network,
            anchored_root: anchored_root.into(),
            timestamp,
        }
    }
}
