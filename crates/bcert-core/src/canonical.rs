//! # Canonical Serialization — JCS-Compatible Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in credential digest computation.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which applies float
//! rejection and recursive value checking before JCS serialization.
//!
//! An issuer and a verifier must reduce the same credential content to the
//! same byte sequence, or every credential looks tampered. Any function that
//! hashes credential content must accept `&CanonicalBytes`, and the only way
//! to produce one is through this pipeline — the "wrong serialization path"
//! defect class is structurally impossible.
//!
//! ## Canonicalization Rules
//!
//! 1. **Reject floats** — non-integer numbers have serialization edge cases
//!    that differ across JSON implementations. Credential content carrying a
//!    float is refused before it can poison a digest.
//! 2. **Object keys sorted, compact separators** — via `serde_jcs`,
//!    RFC 8785 (JSON Canonicalization Scheme) compliant output.
//! 3. **UTF-8, no ASCII escaping** — non-ASCII characters pass through as
//!    UTF-8 bytes.
//!
//! Which *portion* of a credential document is canonicalized (and which
//! proof/signature containers are stripped first) is version-pinned and
//! lives in the schema layer; this module only guarantees that whatever
//! subtree arrives here serializes deterministically.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numeric values are integers, never floats.
/// - Serialization uses sorted keys with compact separators (RFC 8785).
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`. All credential
    /// digest computation in the stack must flow through this constructor.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// non-integer numbers. Returns `CanonicalizationError::SerializationFailed`
    /// if JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively reject any non-integer number in the value tree.
///
/// Integer-valued `f64`s (e.g. `2.0` parsed from JSON) are still rejected:
/// whether `2.0` serializes as `2` or `2.0` depends on the writer, and the
/// issuer's writer is not ours to control.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(())
            } else {
                Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                ))
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                reject_floats(v)?;
            }
            Ok(())
        }
        Value::Array(arr) => {
            for v in arr {
                reject_floats(v)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_simple_dict() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        // JCS: sorted keys, compact separators
        assert_eq!(s, r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        let data = serde_json::json!({"z": 1, "m": 2, "a": 3});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"a":3,"m":2,"z":1}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"score": 1.5});
        let result = CanonicalBytes::new(&data);
        assert!(result.is_err());
        match result.unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 1.5),
            other => panic!("Expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_integer_accepted() {
        let data = serde_json::json!({"year": 2017});
        let cb = CanonicalBytes::new(&data).expect("integers should be accepted");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"year":2017}"#);
    }

    #[test]
    fn test_null_and_bool_passthrough() {
        let data = serde_json::json!({"key": null, "flag": true});
        let cb = CanonicalBytes::new(&data).expect("null/bool should pass through");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"flag":true,"key":null}"#);
    }

    #[test]
    fn test_empty_object() {
        let data = serde_json::json!({});
        let cb = CanonicalBytes::new(&data).expect("empty object should work");
        assert_eq!(cb.as_bytes(), b"{}");
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": {"b": [{"c": 3.14}]}});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_unicode_passthrough() {
        // No ASCII escaping: non-ASCII chars pass through as UTF-8.
        let data = serde_json::json!({"name": "\u{00e9}\u{00e8}\u{00ea}"});
        let cb = CanonicalBytes::new(&data).expect("unicode should pass through");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains('\u{00e9}'));
    }

    #[test]
    fn test_len_and_is_empty() {
        let data = serde_json::json!({"a": 1});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(!cb.is_empty());
        assert!(cb.len() > 0);
    }
}
