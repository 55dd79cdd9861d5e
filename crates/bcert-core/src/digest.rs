//! # Content Digest — Credential Hash Computation
//!
//! Defines `ContentDigest`, the SHA-256 digest of a credential's canonical
//! content, plus the hex codec shared by the Merkle proof layer.
//!
//! ## Security Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes`, ensuring that
//! every digest in the system is produced through the correct
//! canonicalization pipeline. This is enforced by the function signature of
//! [`sha256_digest()`].
//!
//! Receipts and blockchain anchors carry digests as 64-char lowercase hex
//! strings; the codec here is the single place that format is parsed and
//! rendered.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CoreError;

/// A SHA-256 content digest of canonical credential bytes.
///
/// Produced exclusively from `CanonicalBytes` via [`sha256_digest()`].
/// Compared against receipt target hashes and blockchain-anchored values,
/// which arrive as hex strings — see [`ContentDigest::to_hex`] and
/// [`ContentDigest::parse_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Access the raw 32-byte digest value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string (64 chars).
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse a digest from a 64-char hex string.
    ///
    /// Accepts mixed case and surrounding whitespace; the parsed digest
    /// always renders back as lowercase.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDigest` if the input is not exactly
    /// 64 hex characters.
    pub fn parse_hex(hex: &str) -> Result<Self, CoreError> {
        Ok(Self(hex_to_32_bytes(hex)?))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// This is the only digest computation path for credential content. The
/// function signature enforces that only `CanonicalBytes` (produced through
/// the JCS pipeline) can be hashed, preventing the canonicalization split
/// defect by construction.
///
/// # Security Invariant
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`. No code path can
/// compute a credential digest over non-canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

/// Compute a SHA-256 hex string from canonical bytes.
///
/// Convenience wrapper around [`sha256_digest()`] for contexts that compare
/// against receipt fields (which are hex strings).
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Encode 32 bytes as lowercase hex.
pub fn bytes_to_hex(b: &[u8; 32]) -> String {
    b.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Decode a 64-char hex string to 32 bytes.
pub fn hex_to_32_bytes(hex: &str) -> Result<[u8; 32], CoreError> {
    let hex = hex.trim().to_lowercase();
    if hex.len() != 64 {
        return Err(CoreError::InvalidDigest(format!(
            "expected 64 hex chars, got {}",
            hex.len()
        )));
    }
    let mut out = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let s = std::str::from_utf8(chunk)
            .map_err(|e| CoreError::InvalidDigest(format!("invalid hex: {e}")))?;
        out[i] = u8::from_str_radix(s, 16)
            .map_err(|e| CoreError::InvalidDigest(format!("invalid hex at {i}: {e}")))?;
    }
    Ok(out)
}

/// Whether a string is a well-formed 64-char hex digest.
pub fn is_hex_digest(s: &str) -> bool {
    let s = s.trim();
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_sha256_digest_deterministic() {
        let mut data = BTreeMap::new();
        data.insert("a", 1);
        data.insert("b", 2);
        let cb = CanonicalBytes::new(&data).unwrap();
        let d1 = sha256_digest(&cb);
        let d2 = sha256_digest(&cb);
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_sha256_hex_format() {
        let data = serde_json::json!({"key": "value"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let hex = sha256_hex(&cb);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_content_digest_display() {
        let data = serde_json::json!({"a": 1});
        let cb = CanonicalBytes::new(&data).unwrap();
        let digest = sha256_digest(&cb);
        let s = format!("{digest}");
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn test_different_inputs_different_digests() {
        let cb1 = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        let cb2 = CanonicalBytes::new(&serde_json::json!({"a": 2})).unwrap();
        assert_ne!(sha256_digest(&cb1), sha256_digest(&cb2));
    }

    #[test]
    fn test_known_sha256_vector() {
        // SHA256 of the empty JSON object "{}" is a known value.
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        let digest = sha256_digest(&cb);
        assert_eq!(
            digest.to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_known_sha256_vector_single_key() {
        // SHA256 of '{"a":1}' — verified against Python hashlib.
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(
            sha256_hex(&cb),
            "015abd7f5cc57a2dd94b7590f04ad8084273905ee33ec5cebeae62276a97f862"
        );
    }

    #[test]
    fn test_parse_hex_roundtrip() {
        let cb = CanonicalBytes::new(&serde_json::json!({"x": 1})).unwrap();
        let digest = sha256_digest(&cb);
        let parsed = ContentDigest::parse_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn test_parse_hex_mixed_case_and_whitespace() {
        let hex = "44136FA355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";
        let parsed = ContentDigest::parse_hex(&format!("  {hex} ")).unwrap();
        assert_eq!(parsed.to_hex(), hex.to_lowercase());
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert!(ContentDigest::parse_hex("").is_err());
        assert!(ContentDigest::parse_hex("aabb").is_err());
        assert!(ContentDigest::parse_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_is_hex_digest() {
        assert!(is_hex_digest(&"ab".repeat(32)));
        assert!(is_hex_digest(&"AB".repeat(32)));
        assert!(!is_hex_digest(&"ab".repeat(31)));
        assert!(!is_hex_digest(&"xy".repeat(32)));
    }
}
