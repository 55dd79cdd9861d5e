//! # bcert-core — Foundational Types for the bcert Stack
//!
//! This crate is the bedrock of the bcert verification stack. It defines the
//! type-system primitives that make digest agreement between issuer and
//! verifier a compile-time property rather than a runtime hope. Every other
//! crate in the workspace depends on `bcert-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CredentialId`, `IssuerId`,
//!    `KeyId`, `TransactionId` — all newtypes with explicit constructors.
//!    No bare strings for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    Ever. A verifier that hashes differently from the issuer produces
//!    false tamper verdicts; this newtype makes that split impossible.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Block timestamps, key validity windows,
//!    and expiration dates all compare on the same axis.
//!
//! 4. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that all credential digest paths flow through
//!    canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bcert-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a wire.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::CoreError;
pub use identity::{CredentialId, IssuerId, KeyId, RunId, TransactionId};
pub use temporal::Timestamp;
