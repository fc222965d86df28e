//! Token identifier resolution
//!
//! Testnet spot tokens are addressed by bare symbol; mainnet ones by
//! `SYMBOL:contract`.

use std::collections::BTreeMap;

use crate::config::TokenConfig;
use crate::wallet::Network;

/// Maps user-facing symbols to network-qualified identifiers
#[derive(Debug, Clone)]
pub struct TokenResolver {
    mainnet: BTreeMap<String, String>,
}

impl TokenResolver {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            mainnet: config.mainnet.clone(),
        }
    }

    /// Resolve a symbol (case-insensitive) for the given network
    ///
    /// Unknown mainnet symbols fall back to the bare uppercase symbol.
    pub fn resolve(&self, symbol: &str, network: Network) -> String {
        let symbol = symbol.trim().to_uppercase();
        if network.is_testnet() {
            return symbol;
        }

        self.mainnet.get(&symbol).cloned().unwrap_or(symbol)
    }
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new(&TokenConfig::default())
    }
}

/// Symbol part of an identifier ("USDC:0x..." -> "USDC")
pub fn base_symbol(identifier: &str) -> &str {
    identifier
        .split_once(':')
        .map(|(symbol, _)| symbol)
        .unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testnet_uses_bare_symbol() {
        let resolver = TokenResolver::default();
        assert_eq!(resolver.resolve("usdc", Network::Testnet), "USDC");
        assert_eq!(resolver.resolve("Hype", Network::Testnet), "HYPE");
    }

    #[test]
    fn test_mainnet_uses_contract_table() {
        let resolver = TokenResolver::default();
        assert_eq!(
            resolver.resolve("USDC", Network::Mainnet),
            "USDC:0x6d1e7cde53ba9467b783cb7c530ce054"
        );
        assert_eq!(
            resolver.resolve("hype", Network::Mainnet),
            "HYPE:0x0d01dc56dcaaca66ad901c959b4011ec"
        );
    }

    #[test]
    fn test_unknown_mainnet_symbol_falls_back() {
        let resolver = TokenResolver::default();
        assert_eq!(resolver.resolve("purr", Network::Mainnet), "PURR");
    }

    #[test]
    fn test_base_symbol() {
        assert_eq!(base_symbol("USDC:0x6d1e7cde53ba9467b783cb7c530ce054"), "USDC");
        assert_eq!(base_symbol("HYPE"), "HYPE");
    }
}
