//! # bcert-cli — Command-Line Verification
//!
//! Subcommand handlers for the `bcert` binary. The CLI verifies anchored
//! credentials *offline*: the anchoring transaction, issuer profile, and
//! revocation list are supplied as fixture files and served to the
//! verifier through the same collaborator seams a networked deployment
//! would use.

pub mod fixtures;
pub mod verify;
