//! EIP-712 signing for user-signed actions

use std::borrow::Cow;

use alloy::primitives::{keccak256, Address, Signature, B256, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use alloy::sol_types::Eip712Domain;
use serde::Serialize;

use crate::error::{Error, Result};

/// Typed data that can be hashed per EIP-712
pub trait Eip712 {
    fn domain(&self) -> Eip712Domain;

    fn struct_hash(&self) -> B256;

    fn eip712_signing_hash(&self) -> B256 {
        let mut digest_input = [0u8; 2 + 32 + 32];
        digest_input[0] = 0x19;
        digest_input[1] = 0x01;
        digest_input[2..34].copy_from_slice(&self.domain().hash_struct()[..]);
        digest_input[34..66].copy_from_slice(&self.struct_hash()[..]);
        keccak256(digest_input)
    }
}

/// Domain shared by every user-signed Hyperliquid action
pub fn user_signed_domain(chain_id: u64) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed("HyperliquidSignTransaction")),
        Some(Cow::Borrowed("1")),
        Some(U256::from(chain_id)),
        Some(Address::ZERO),
        None,
    )
}

pub fn sign_typed_data<T: Eip712>(payload: &T, wallet: &PrivateKeySigner) -> Result<Signature> {
    let hash = payload.eip712_signing_hash();
    wallet
        .sign_hash_sync(&hash)
        .map_err(|e| Error::Signing(e.to_string()))
}

/// Signature as the exchange expects it: hex `r`/`s`, `v` in {27, 28}
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WireSignature {
    pub r: String,
    pub s: String,
    pub v: u64,
}

impl From<&Signature> for WireSignature {
    fn from(sig: &Signature) -> Self {
        Self {
            r: format!("{:#x}", sig.r()),
            s: format!("{:#x}", sig.s()),
            v: 27 + sig.v() as u64,
        }
    }
}
