//! # Fixture Loading
//!
//! Parses the evidence files the offline CLI serves to the verifier:
//! transaction records, an issuer profile, and a revocation list. Parsing
//! is split from file I/O so the formats are testable without a
//! filesystem.

use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;

use bcert_anchor::memory::StaticTransactionSource;
use bcert_anchor::network::Network;
use bcert_anchor::transaction::Transaction;
use bcert_cert::issuer::IssuerProfile;
use bcert_cert::memory::{StaticIssuerSource, StaticRevocationSource};
use bcert_cert::revocation::RevocationList;
use bcert_core::{Timestamp, TransactionId};

/// Read and parse a JSON file.
pub fn load_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Parse a transactions fixture: an array of
/// `{"sourceId", "chain", "anchoredRoot", "timestamp"}` records.
pub fn parse_transactions(raw: &Value) -> anyhow::Result<StaticTransactionSource> {
    let entries = raw
        .as_array()
        .context("transactions fixture must be a JSON array")?;
    let mut source = StaticTransactionSource::new("fixture-file");
    for entry in entries {
        let id = entry
            .get("sourceId")
            .and_then(Value::as_str)
            .context("transaction entry has no sourceId")?;
        let chain = entry
            .get("chain")
            .and_then(Value::as_str)
            .context("transaction entry has no chain")?;
        let network = match Network::parse(chain) {
            Some(n) => n,
            None => bail!("unrecognized chain {chain:?} for transaction {id}"),
        };
        let root = entry
            .get("anchoredRoot")
            .and_then(Value::as_str)
            .context("transaction entry has no anchoredRoot")?;
        let timestamp = entry
            .get("timestamp")
            .and_then(Value::as_str)
            .context("transaction entry has no timestamp")?;
        let timestamp = Timestamp::parse_lenient(timestamp)
            .with_context(|| format!("bad timestamp on transaction {id}"))?;
        source.insert(Transaction::new(
            TransactionId::new(id),
            network,
            root,
            timestamp,
        ));
    }
    Ok(source)
}

/// Parse an issuer profile fixture (either profile generation).
pub fn parse_issuer(raw: &Value) -> anyhow::Result<StaticIssuerSource> {
    let profile = IssuerProfile::parse(raw).context("invalid issuer profile")?;
    let mut source = StaticIssuerSource::new();
    source.insert(profile);
    Ok(source)
}

/// Parse a revocation list fixture. The list's own `id` field is the
/// reference credentials point at.
pub fn parse_revocation(raw: &Value) -> anyhow::Result<StaticRevocationSource> {
    let reference = raw
        .get("id")
        .and_then(Value::as_str)
        .context("revocation fixture has no id (the list reference)")?;
    let list = RevocationList::parse(reference, raw).context("invalid revocation list")?;
    let mut source = StaticRevocationSource::new();
    source.insert(list);
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_transactions() {
        let raw = json!([{
            "sourceId": "d75b7a5b",
            "chain": "bitcoinMainnet",
            "anchoredRoot": "a1".repeat(32),
            "timestamp": "2017-05-03T17:10:50Z"
        }]);
        let source = parse_transactions(&raw).unwrap();
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_parse_transactions_rejects_unknown_chain() {
        let raw = json!([{
            "sourceId": "d75b7a5b",
            "chain": "dogecoin",
            "anchoredRoot": "a1".repeat(32),
            "timestamp": "2017-05-03T17:10:50Z"
        }]);
        assert!(parse_transactions(&raw).is_err());
    }

    #[test]
    fn test_parse_issuer() {
        let raw = json!({
            "id": "https://issuer.example.org/issuer.json",
            "publicKey": [{
                "id": "ecdsa-koblitz-pubkey:1ABC",
                "created": "2016-01-01T00:00:00Z"
            }]
        });
        assert!(parse_issuer(&raw).is_ok());
    }

    #[test]
    fn test_parse_revocation() {
        let raw = json!({
            "id": "https://issuer.example.org/revocation.json",
            "revokedAssertions": [{"id": "urn:uuid:aaaa"}]
        });
        assert!(parse_revocation(&raw).is_ok());
    }

    #[test]
    fn test_parse_revocation_requires_reference() {
        let raw = json!({"revokedAssertions": []});
        assert!(parse_revocation(&raw).is_err());
    }

    #[test]
    fn test_load_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"a": 1}"#).unwrap();
        let value = load_json(&path).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_load_json_missing_file() {
        assert!(load_json(Path::new("/nonexistent/doc.json")).is_err());
    }
}
