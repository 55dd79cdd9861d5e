//! # Anchoring Networks
//!
//! The closed set of blockchain networks a credential may be anchored to,
//! and their classification into production and mock tiers.
//!
//! ## Classification
//!
//! A verification run that passes every check on a production network
//! reports `success`; the same run anchored on a mock network reports
//! `mockSuccess` so that callers never mistake a rehearsal anchor for
//! production-grade trust. The mapping is a static total function — adding
//! a network forces every `match` over `Network` to handle it.
//!
//! Bitcoin testnet classifies as production: its anchors are real,
//! publicly observable transactions. Only the local/regression networks
//! (mocknet, regtest) and deprecated rehearsal chains report mock.

use serde::{Deserialize, Serialize};

/// A blockchain network a credential can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Bitcoin mainnet.
    BitcoinMainnet,
    /// Bitcoin testnet (public test network with real transactions).
    BitcoinTestnet,
    /// Local mock chain used by issuance tooling; no real transactions.
    Mocknet,
    /// Bitcoin regression-test mode; private local chain.
    Regtest,
    /// Ethereum mainnet.
    EthereumMainnet,
    /// Ethereum Ropsten test network.
    EthereumRopsten,
}

/// How a successful run on a network is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkClass {
    /// Real, publicly verifiable anchoring.
    Production,
    /// Test/mock anchoring; success must be reported as `mockSuccess`.
    Mock,
}

impl Network {
    /// Parse a network identifier as it appears in credential anchors
    /// (the `chain` field) or CLI arguments.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "bitcoinMainnet" | "bitcoin" | "mainnet" => Some(Self::BitcoinMainnet),
            "bitcoinTestnet" | "testnet" => Some(Self::BitcoinTestnet),
            "mocknet" | "bitcoinMocknet" => Some(Self::Mocknet),
            "regtest" | "bitcoinRegtest" => Some(Self::Regtest),
            "ethereumMainnet" => Some(Self::EthereumMainnet),
            "ethereumRopsten" | "ropsten" => Some(Self::EthereumRopsten),
            _ => None,
        }
    }

    /// The canonical identifier string for this network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BitcoinMainnet => "bitcoinMainnet",
            Self::BitcoinTestnet => "bitcoinTestnet",
            Self::Mocknet => "mocknet",
            Self::Regtest => "regtest",
            Self::EthereumMainnet => "ethereumMainnet",
            Self::EthereumRopsten => "ethereumRopsten",
        }
    }

    /// Classify this network as production or mock anchoring.
    ///
    /// Evaluated only after all required checks pass; it never upgrades a
    /// failed run.
    pub fn class(&self) -> NetworkClass {
        match self {
            Self::BitcoinMainnet | Self::BitcoinTestnet | Self::EthereumMainnet => {
                NetworkClass::Production
            }
            Self::Mocknet | Self::Regtest | Self::EthereumRopsten => NetworkClass::Mock,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(Network::parse("bitcoinMainnet"), Some(Network::BitcoinMainnet));
        assert_eq!(Network::parse("bitcoinTestnet"), Some(Network::BitcoinTestnet));
        assert_eq!(Network::parse("mocknet"), Some(Network::Mocknet));
        assert_eq!(Network::parse("regtest"), Some(Network::Regtest));
        assert_eq!(Network::parse("ethereumMainnet"), Some(Network::EthereumMainnet));
        assert_eq!(Network::parse("ethereumRopsten"), Some(Network::EthereumRopsten));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Network::parse("bitcoin"), Some(Network::BitcoinMainnet));
        assert_eq!(Network::parse("testnet"), Some(Network::BitcoinTestnet));
        assert_eq!(Network::parse("ropsten"), Some(Network::EthereumRopsten));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Network::parse("dogecoin"), None);
        assert_eq!(Network::parse(""), None);
    }

    #[test]
    fn test_roundtrip_as_str() {
        for network in [
            Network::BitcoinMainnet,
            Network::BitcoinTestnet,
            Network::Mocknet,
            Network::Regtest,
            Network::EthereumMainnet,
            Network::EthereumRopsten,
        ] {
            assert_eq!(Network::parse(network.as_str()), Some(network));
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(Network::BitcoinMainnet.class(), NetworkClass::Production);
        assert_eq!(Network::BitcoinTestnet.class(), NetworkClass::Production);
        assert_eq!(Network::EthereumMainnet.class(), NetworkClass::Production);
        assert_eq!(Network::Mocknet.class(), NetworkClass::Mock);
        assert_eq!(Network::Regtest.class(), NetworkClass::Mock);
        assert_eq!(Network::EthereumRopsten.class(), NetworkClass::Mock);
    }

    #[test]
    fn test_display() {
        assert_eq!(Network::Mocknet.to_string(), "mocknet");
        assert_eq!(Network::BitcoinMainnet.to_string(), "bitcoinMainnet");
    }
}
