//! User-signed transfer actions
//!
//! `usdSend` and `spotSend` are signed as EIP-712 typed data rather than
//! as L1 actions.

use alloy::primitives::{keccak256, B256};
use alloy::sol_types::{Eip712Domain, SolValue};
use serde::{Serialize, Serializer};

use super::signing::{user_signed_domain, Eip712};

fn serialize_chain_id<S>(chain_id: &u64, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&format!("{:#x}", chain_id))
}

/// USDC transfer between perp accounts
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsdSend {
    #[serde(serialize_with = "serialize_chain_id")]
    pub signature_chain_id: u64,
    pub hyperliquid_chain: String,
    pub destination: String,
    pub amount: String,
    pub time: u64,
}

/// Spot token transfer
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpotSend {
    #[serde(serialize_with = "serialize_chain_id")]
    pub signature_chain_id: u64,
    pub hyperliquid_chain: String,
    pub destination: String,
    pub token: String,
    pub amount: String,
    pub time: u64,
}

impl Eip712 for UsdSend {
    fn domain(&self) -> Eip712Domain {
        user_signed_domain(self.signature_chain_id)
    }

    fn struct_hash(&self) -> B256 {
        let type_hash = keccak256(
            "HyperliquidTransaction:UsdSend(string hyperliquidChain,string destination,string amount,uint64 time)",
        );
        let items = (
            type_hash,
            keccak256(&self.hyperliquid_chain),
            keccak256(&self.destination),
            keccak256(&self.amount),
            self.time,
        );
        keccak256(items.abi_encode())
    }
}

impl Eip712 for SpotSend {
    fn domain(&self) -> Eip712Domain {
        user_signed_domain(self.signature_chain_id)
    }

    fn struct_hash(&self) -> B256 {
        let type_hash = keccak256(
            "HyperliquidTransaction:SpotSend(string hyperliquidChain,string destination,string token,string amount,uint64 time)",
        );
        let items = (
            type_hash,
            keccak256(&self.hyperliquid_chain),
            keccak256(&self.destination),
            keccak256(&self.token),
            keccak256(&self.amount),
            self.time,
        );
        keccak256(items.abi_encode())
    }
}

/// Action envelope, tagged by `type`
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum Actions {
    UsdSend(UsdSend),
    SpotSend(SpotSend),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_send() -> UsdSend {
        UsdSend {
            signature_chain_id: 421614,
            hyperliquid_chain: "Mainnet".to_string(),
            destination: "0x0D1d9635D0640821d15e323ac8AdADfA9c111414".to_string(),
            amount: "1.000000".to_string(),
            time: 1690393044548,
        }
    }

    #[test]
    fn test_usd_send_serialization() {
        let json = serde_json::to_value(Actions::UsdSend(usd_send())).unwrap();
        assert_eq!(json["type"], "usdSend");
        assert_eq!(json["signatureChainId"], "0x66eee");
        assert_eq!(json["hyperliquidChain"], "Mainnet");
        assert_eq!(json["amount"], "1.000000");
        assert_eq!(json["time"], 1690393044548u64);
    }

    #[test]
    fn test_spot_send_serialization() {
        let action = SpotSend {
            signature_chain_id: 421614,
            hyperliquid_chain: "Testnet".to_string(),
            destination: "0xabc".to_string(),
            token: "HYPE".to_string(),
            amount: "2.5".to_string(),
            time: 1,
        };
        let json = serde_json::to_value(Actions::SpotSend(action)).unwrap();
        assert_eq!(json["type"], "spotSend");
        assert_eq!(json["token"], "HYPE");
        assert_eq!(json["destination"], "0xabc");
    }

    #[test]
    fn test_struct_hash_covers_every_field() {
        let base = usd_send();
        let mut other = usd_send();
        other.amount = "2.000000".to_string();
        assert_ne!(base.struct_hash(), other.struct_hash());

        let mut other = usd_send();
        other.hyperliquid_chain = "Testnet".to_string();
        assert_ne!(base.struct_hash(), other.struct_hash());

        let mut other = usd_send();
        other.time += 1;
        assert_ne!(base.struct_hash(), other.struct_hash());
    }

    #[test]
    fn test_spot_and_usd_hashes_differ() {
        let usd = usd_send();
        let spot = SpotSend {
            signature_chain_id: usd.signature_chain_id,
            hyperliquid_chain: usd.hyperliquid_chain.clone(),
            destination: usd.destination.clone(),
            token: "USDC".to_string(),
            amount: usd.amount.clone(),
            time: usd.time,
        };
        assert_ne!(usd.eip712_signing_hash(), spot.eip712_signing_hash());
    }
}
