//! # Merkle Receipt Proofs
//!
//! The inclusion proof embedded in an anchored credential: an ordered path
//! of sibling hashes that reduces the credential's content hash to the
//! Merkle root recorded on chain.
//!
//! ## Algorithm
//!
//! Parent nodes are `SHA256(left || right)` over the raw 32-byte digests,
//! matching the chainpoint-style receipts the anchoring transactions were
//! built from. Replay folds the running hash with each sibling according to
//! its side indicator. Degenerate case: an empty path means a single-leaf
//! tree, so the target hash must equal the root directly.
//!
//! ## Security Invariant
//!
//! Replay is pure and total over well-formed hex digests: the same
//! (target, path, root) triple always reduces to the same root. All hex
//! inputs are validated before hashing; malformed proofs fail with a typed
//! error rather than producing a garbage root.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use bcert_core::digest::{bytes_to_hex, hex_to_32_bytes, is_hex_digest};

/// Error validating a Merkle receipt proof.
#[derive(Error, Debug)]
pub enum MerkleError {
    /// A hash in the proof was not a 64-char hex digest.
    #[error("malformed proof hash: {0}")]
    MalformedHash(String),

    /// The replayed root did not match the claimed or anchored root.
    #[error("merkle root mismatch: computed {computed}, expected {expected}")]
    RootMismatch {
        /// Root obtained by replaying the path.
        computed: String,
        /// Root the proof (or the chain) claims.
        expected: String,
    },

    /// The target hash did not match the locally computed content hash.
    #[error("target hash mismatch: proof targets {target}, local hash is {local}")]
    TargetMismatch {
        /// Target hash embedded in the proof.
        target: String,
        /// Locally computed content hash.
        local: String,
    },
}

/// Which side of the running hash a sibling combines on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left operand: `SHA256(sibling || running)`.
    Left,
    /// Sibling is the right operand: `SHA256(running || sibling)`.
    Right,
}

/// A single step in a Merkle proof path: a sibling hash and its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Which side the sibling combines on.
    pub side: Side,
    /// The sibling hash (64 hex chars).
    pub hash: String,
}

/// A Merkle inclusion proof for one credential.
///
/// Invariant: replaying `path` against `target_hash` must deterministically
/// reduce to exactly one root value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The leaf this proof targets: the credential's content hash (hex).
    pub target_hash: String,
    /// Ordered sibling path from the leaf toward the root.
    pub path: Vec<PathStep>,
    /// The root the proof claims to reduce to (hex).
    pub merkle_root: String,
}

impl MerkleProof {
    /// Replay the proof path from the target hash and return the computed
    /// root.
    ///
    /// With an empty path the computed root is the target hash itself
    /// (single-leaf tree).
    ///
    /// # Errors
    ///
    /// Returns `MerkleError::MalformedHash` if the target or any sibling is
    /// not a 64-char hex digest.
    pub fn replay_root(&self) -> Result<String, MerkleError> {
        if !is_hex_digest(&self.target_hash) {
            return Err(MerkleError::MalformedHash(self.target_hash.clone()));
        }
        let mut running = self.target_hash.trim().to_lowercase();
        for step in &self.path {
            if !is_hex_digest(&step.hash) {
                return Err(MerkleError::MalformedHash(step.hash.clone()));
            }
            running = match step.side {
                Side::Left => combine(&step.hash, &running)?,
                Side::Right => combine(&running, &step.hash)?,
            };
        }
        Ok(running)
    }

    /// Confirm the proof targets the given locally computed hash.
    ///
    /// # Errors
    ///
    /// Returns `MerkleError::TargetMismatch` if the proof's target differs
    /// from `local_hash`.
    pub fn check_target(&self, local_hash: &str) -> Result<(), MerkleError> {
        if self.target_hash.trim().to_lowercase() == local_hash.trim().to_lowercase() {
            Ok(())
        } else {
            Err(MerkleError::TargetMismatch {
                target: self.target_hash.clone(),
                local: local_hash.to_string(),
            })
        }
    }

    /// Replay the path and confirm it reduces to the claimed root.
    ///
    /// # Errors
    ///
    /// Returns `MerkleError::RootMismatch` if the replayed root differs
    /// from `merkle_root`, or `MalformedHash` for invalid digests.
    pub fn check_receipt(&self) -> Result<(), MerkleError> {
        let computed = self.replay_root()?;
        let claimed = self.merkle_root.trim().to_lowercase();
        if computed == claimed {
            Ok(())
        } else {
            Err(MerkleError::RootMismatch {
                computed,
                expected: claimed,
            })
        }
    }

    /// Confirm the claimed root equals the value anchored on chain.
    ///
    /// # Errors
    ///
    /// Returns `MerkleError::RootMismatch` if they differ.
    pub fn check_anchored_root(&self, anchored_root: &str) -> Result<(), MerkleError> {
        let claimed = self.merkle_root.trim().to_lowercase();
        let anchored = anchored_root.trim().to_lowercase();
        if claimed == anchored {
            Ok(())
        } else {
            Err(MerkleError::RootMismatch {
                computed: claimed,
                expected: anchored,
            })
        }
    }
}

/// Compute a parent node hash: `SHA256(left || right)` over raw digests.
///
/// Both inputs are 32-byte digests encoded as 64 hex chars; the output is
/// hex in the same form.
pub fn combine(left_hex: &str, right_hex: &str) -> Result<String, MerkleError> {
    let left =
        hex_to_32_bytes(left_hex).map_err(|_| MerkleError::MalformedHash(left_hex.to_string()))?;
    let right = hex_to_32_bytes(right_hex)
        .map_err(|_| MerkleError::MalformedHash(right_hex.to_string()))?;
    let mut input = [0u8; 64];
    input[..32].copy_from_slice(&left);
    input[32..].copy_from_slice(&right);
    let hash = Sha256::digest(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    Ok(bytes_to_hex(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixture digests, verified against Python hashlib:
    //   T = sha256(b"doc"), S = sha256(b"sib"), U = sha256(b"u")
    const T: &str = "139d544b821b13ebea14f1b0fe18577222e415c2966e3a3511c4196055232202";
    const S: &str = "c4353298d81297190fbe18652e65fb68b4dece4c5215e379a386071b2c9d169a";
    const U: &str = "0bfe935e70c321c7ca3afc75ce0d0ca2f98b5422e008bb31c00c6d7f1f1c0ad6";
    const COMBINE_T_S: &str = "67bf5fb8f93f22a966c7e121cfe2f211360f012098a0078e45855777f3e4b691";
    const COMBINE_S_T: &str = "2ecb63d964bdf9f90f2cb8f021e0b783944b489765367d1a96f927800cd7e827";
    const COMBINE_ST_U: &str = "83200515824b4a635e6a9aaeaefa72903b50132af80dda914ae26040336ba94f";

    // -----------------------------------------------------------------------
    // combine()
    // -----------------------------------------------------------------------

    #[test]
    fn test_combine_known_vectors() {
        assert_eq!(combine(T, S).unwrap(), COMBINE_T_S);
        assert_eq!(combine(S, T).unwrap(), COMBINE_S_T);
        assert_eq!(
            combine(&"00".repeat(32), &"11".repeat(32)).unwrap(),
            "8878b15a7d6a3a4f464e8f9f42591dbc0cf4bedea0ec309003d2b2ee53655ef8"
        );
    }

    #[test]
    fn test_combine_order_matters() {
        assert_ne!(combine(T, S).unwrap(), combine(S, T).unwrap());
    }

    #[test]
    fn test_combine_rejects_malformed_hex() {
        assert!(combine("not-hex", S).is_err());
        assert!(combine(T, "aabb").is_err());
    }

    // -----------------------------------------------------------------------
    // replay_root()
    // -----------------------------------------------------------------------

    fn proof(target: &str, path: Vec<PathStep>, root: &str) -> MerkleProof {
        MerkleProof {
            target_hash: target.to_string(),
            path,
            merkle_root: root.to_string(),
        }
    }

    fn right(hash: &str) -> PathStep {
        PathStep {
            side: Side::Right,
            hash: hash.to_string(),
        }
    }

    fn left(hash: &str) -> PathStep {
        PathStep {
            side: Side::Left,
            hash: hash.to_string(),
        }
    }

    #[test]
    fn test_replay_single_sibling_right() {
        // running = T, sibling S on the right: SHA256(T || S)
        let p = proof(T, vec![right(S)], COMBINE_T_S);
        assert_eq!(p.replay_root().unwrap(), COMBINE_T_S);
        assert!(p.check_receipt().is_ok());
    }

    #[test]
    fn test_replay_single_sibling_left() {
        // running = T, sibling S on the left: SHA256(S || T)
        let p = proof(T, vec![left(S)], COMBINE_S_T);
        assert_eq!(p.replay_root().unwrap(), COMBINE_S_T);
        assert!(p.check_receipt().is_ok());
    }

    #[test]
    fn test_replay_two_levels() {
        // level 1: SHA256(S || T); level 2: SHA256(level1 || U)
        let p = proof(T, vec![left(S), right(U)], COMBINE_ST_U);
        assert_eq!(p.replay_root().unwrap(), COMBINE_ST_U);
        assert!(p.check_receipt().is_ok());
    }

    #[test]
    fn test_replay_empty_path_single_leaf() {
        // Single-leaf tree: target IS the root.
        let p = proof(T, vec![], T);
        assert_eq!(p.replay_root().unwrap(), T);
        assert!(p.check_receipt().is_ok());
    }

    #[test]
    fn test_replay_empty_path_wrong_root_fails() {
        let p = proof(T, vec![], S);
        assert!(matches!(
            p.check_receipt(),
            Err(MerkleError::RootMismatch { .. })
        ));
    }

    #[test]
    fn test_replay_is_idempotent() {
        let p = proof(T, vec![left(S), right(U)], COMBINE_ST_U);
        let r1 = p.replay_root().unwrap();
        let r2 = p.replay_root().unwrap();
        let r3 = p.replay_root().unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r2, r3);
    }

    #[test]
    fn test_tampered_sibling_changes_root() {
        let good = proof(T, vec![right(S)], COMBINE_T_S);
        let mut bad = good.clone();
        bad.path[0].hash = "00".repeat(32);
        assert!(good.check_receipt().is_ok());
        assert!(matches!(
            bad.check_receipt(),
            Err(MerkleError::RootMismatch { .. })
        ));
    }

    #[test]
    fn test_flipped_side_changes_root() {
        let good = proof(T, vec![right(S)], COMBINE_T_S);
        let mut bad = good.clone();
        bad.path[0].side = Side::Left;
        assert!(good.check_receipt().is_ok());
        assert!(bad.check_receipt().is_err());
    }

    #[test]
    fn test_malformed_target_rejected() {
        let p = proof("zzzz", vec![right(S)], COMBINE_T_S);
        assert!(matches!(
            p.replay_root(),
            Err(MerkleError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_malformed_sibling_rejected() {
        let p = proof(T, vec![right("short")], COMBINE_T_S);
        assert!(matches!(
            p.replay_root(),
            Err(MerkleError::MalformedHash(_))
        ));
    }

    // -----------------------------------------------------------------------
    // check_target / check_anchored_root
    // -----------------------------------------------------------------------

    #[test]
    fn test_check_target_match() {
        let p = proof(T, vec![right(S)], COMBINE_T_S);
        assert!(p.check_target(T).is_ok());
        // Case-insensitive comparison.
        assert!(p.check_target(&T.to_uppercase()).is_ok());
    }

    #[test]
    fn test_check_target_mismatch() {
        let p = proof(T, vec![right(S)], COMBINE_T_S);
        assert!(matches!(
            p.check_target(U),
            Err(MerkleError::TargetMismatch { .. })
        ));
    }

    #[test]
    fn test_check_anchored_root() {
        let p = proof(T, vec![right(S)], COMBINE_T_S);
        assert!(p.check_anchored_root(COMBINE_T_S).is_ok());
        assert!(p.check_anchored_root(COMBINE_S_T).is_err());
    }

    #[test]
    fn test_serde_path_step_sides() {
        let json = serde_json::to_string(&right(S)).unwrap();
        assert!(json.contains(r#""side":"right""#));
        let back: PathStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back.side, Side::Right);
    }
}
