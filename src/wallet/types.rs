//! Core types for a single transfer run
//!
//! Defines the target network, the confirmed transfer request and the
//! balance snapshots taken around the transfer.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hyperliquid network the run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Parse the network menu choice ("1" = mainnet, "2" = testnet)
    ///
    /// Anything other than "2" selects mainnet, matching the prompt default.
    pub fn from_choice(choice: &str) -> Self {
        if choice.trim() == "2" {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }

    /// Chain name embedded in user-signed actions
    pub fn hyperliquid_chain(&self) -> &'static str {
        match self {
            Network::Mainnet => "Mainnet",
            Network::Testnet => "Testnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hyperliquid_chain())
    }
}

/// A confirmed transfer, built from user input
///
/// Fields are private so the request cannot change after confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    sender: Address,
    recipient: String,
    token: String,
    amount: f64,
    network: Network,
}

impl TransferRequest {
    pub fn new(
        sender: Address,
        recipient: impl Into<String>,
        token: impl Into<String>,
        amount: f64,
        network: Network,
    ) -> Self {
        Self {
            sender,
            recipient: recipient.into(),
            token: token.into().to_uppercase(),
            amount,
            network,
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Recipient exactly as entered
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// User-facing token symbol (uppercase)
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

/// Token balance observed for an address at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
    pub address: Address,
    pub coin: String,
    pub total: f64,
    pub taken_at: DateTime<Utc>,
}

impl BalanceSnapshot {
    pub fn new(address: Address, coin: impl Into<String>, total: f64) -> Self {
        Self {
            address,
            coin: coin.into(),
            total,
            taken_at: Utc::now(),
        }
    }

    /// How much the balance dropped between `self` and a later snapshot
    pub fn decrease_to(&self, later: &BalanceSnapshot) -> f64 {
        self.total - later.total
    }
}

impl std::fmt::Display for BalanceSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (as of {})",
            self.total,
            self.coin,
            self.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_network_from_choice() {
        assert_eq!(Network::from_choice("2"), Network::Testnet);
        assert_eq!(Network::from_choice(" 2 "), Network::Testnet);
        assert_eq!(Network::from_choice("1"), Network::Mainnet);
        assert_eq!(Network::from_choice(""), Network::Mainnet);
        assert_eq!(Network::from_choice("testnet"), Network::Mainnet);
    }

    #[test]
    fn test_network_chain_name() {
        assert_eq!(Network::Mainnet.hyperliquid_chain(), "Mainnet");
        assert_eq!(Network::Testnet.to_string(), "Testnet");
        assert!(Network::Testnet.is_testnet());
    }

    #[test]
    fn test_request_uppercases_token() {
        let request = TransferRequest::new(Address::ZERO, "0xabc", "hype", 1.5, Network::Mainnet);
        assert_eq!(request.token(), "HYPE");
        assert_eq!(request.recipient(), "0xabc");
        assert_eq!(request.amount(), 1.5);
        assert_eq!(request.network(), Network::Mainnet);
    }

    #[test]
    fn test_snapshot_decrease() {
        let before = BalanceSnapshot::new(Address::ZERO, "USDC", 100.0);
        let after = BalanceSnapshot::new(Address::ZERO, "USDC", 90.0);
        assert_eq!(before.decrease_to(&after), 10.0);
    }

    #[test]
    fn test_snapshot_display_includes_time() {
        let mut snapshot = BalanceSnapshot::new(Address::ZERO, "USDC", 90.5);
        snapshot.taken_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(snapshot.to_string(), "90.5 USDC (as of 2024-03-01 12:30:05 UTC)");
    }
}
