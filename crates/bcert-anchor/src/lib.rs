//! # bcert-anchor — Blockchain Anchoring Primitives
//!
//! Everything the verifier needs to interpret a credential's blockchain
//! anchor:
//!
//! - **Merkle** (`merkle.rs`): receipt proof structure and replay — reduce
//!   a target hash through a sibling path to a single root and compare it
//!   against claimed and anchored values.
//!
//! - **Network** (`network.rs`): the closed set of anchoring networks and
//!   their production/mock classification.
//!
//! - **Transaction** (`transaction.rs`): the anchored transaction record
//!   returned by lookup sources — untrusted input until matched against
//!   locally computed values.
//!
//! - **Lookup** (`lookup.rs`): the `TransactionSource` collaborator trait,
//!   an explicit `RetryPolicy`, and the `ProviderChain` that tries sources
//!   in priority order with bounded timeouts.
//!
//! ## Crate Policy
//!
//! - Depends only on `bcert-core` internally.
//! - Retry and timeout behavior is explicit configuration, never hidden
//!   inside a source implementation.
//! - No network transport lives here; sources are trait objects supplied
//!   by the caller.

pub mod lookup;
pub mod memory;
pub mod merkle;
pub mod network;
pub mod transaction;

pub use lookup::{LookupError, ProviderChain, RetryPolicy, TransactionSource};
pub use memory::StaticTransactionSource;
pub use merkle::{MerkleProof, PathStep, Side};
pub use network::{Network, NetworkClass};
pub use transaction::Transaction;
