//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the bcert stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Canonicalization and digest errors fail loudly with full context.
//! - Step-level verification failures are NOT errors at this layer — they
//!   are recorded outcomes, modeled in `bcert-verify`. This crate only
//!   covers defects in the data itself.

use thiserror::Error;

/// Top-level error type for foundational operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A hex digest string was malformed.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// A timestamp string was malformed or violated the UTC-only policy.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Non-integer numbers are not permitted in canonical representations;
    /// their serialization differs across JSON writers.
    #[error("float values are not permitted in canonical content: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
