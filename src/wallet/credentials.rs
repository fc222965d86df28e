//! Private key handling and address derivation
//!
//! The key only lives in memory for the duration of the run.

use std::str::FromStr;

use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use tracing::debug;

use crate::error::{Error, Result};

/// A parsed private key and the address derived from it
pub struct Credential {
    signer: PrivateKeySigner,
    address: Address,
}

// Custom Debug to keep the key out of logs
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("signer", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

impl Credential {
    /// Parse a hex private key, with or without a `0x` prefix
    pub fn from_private_key(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::MissingPrivateKey);
        }

        let hex = strip_hex_prefix(raw);
        let bytes = alloy::primitives::hex::decode(hex)
            .map_err(|e| Error::InvalidPrivateKey(format!("not valid hex: {}", e)))?;

        if bytes.len() != 32 {
            return Err(Error::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let signer = PrivateKeySigner::from_bytes(&B256::from_slice(&bytes))
            .map_err(|e| Error::InvalidPrivateKey(e.to_string()))?;
        let address = signer.address();

        debug!("Derived wallet address {}", address);

        Ok(Self { signer, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 checksummed address string
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum(None)
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Checksum an address string, `None` if it is not a 20-byte hex address
pub fn checksum_address(address: &str) -> Option<String> {
    Address::from_str(address.trim())
        .ok()
        .map(|a| a.to_checksum(None))
}

/// Prefix with `0x` when missing, then checksum if the address parses
///
/// Unparseable input is returned prefixed but otherwise untouched; the
/// exchange reports the format problem.
pub fn normalize_recipient(recipient: &str) -> String {
    let recipient = recipient.trim();
    let prefixed = if recipient.starts_with("0x") {
        recipient.to_string()
    } else {
        format!("0x{}", recipient)
    };

    checksum_address(&prefixed).unwrap_or(prefixed)
}
