//! # bcert-cert — Credential Normalization
//!
//! Turns raw credential documents of any supported schema vintage into one
//! canonical shape the verification pipeline can consume:
//!
//! - **Schema** (`schema.rs`): version detection and the per-version
//!   field-mapping tables. Every piece of version-specific knowledge in the
//!   stack lives in this one module.
//!
//! - **Certificate** (`certificate.rs`): the normalized, immutable
//!   credential — canonical content, expected hash, Merkle proof, anchor
//!   coordinates, issuer reference, expiration.
//!
//! - **Issuer** (`issuer.rs`): issuer profiles with signing-key validity
//!   windows, parsed from both profile generations, plus the
//!   `IssuerProfileSource` collaborator trait.
//!
//! - **Revocation** (`revocation.rs`): revocation lists and the
//!   `RevocationSource` collaborator trait.
//!
//! ## Crate Policy
//!
//! - Depends on `bcert-core` and `bcert-anchor` internally.
//! - Downstream steps never inspect raw documents; they see `Certificate`.
//! - Collaborator data (profiles, revocation lists) is parsed defensively —
//!   it comes from the network, not from us.

pub mod certificate;
pub mod issuer;
pub mod memory;
pub mod revocation;
pub mod schema;

pub use certificate::Certificate;
pub use issuer::{IssuerKey, IssuerProfile, IssuerProfileSource, ProfileError};
pub use memory::{StaticIssuerSource, StaticRevocationSource};
pub use revocation::{RevocationEntry, RevocationError, RevocationList, RevocationSource};
pub use schema::{SchemaError, SchemaVersion};
