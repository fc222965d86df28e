//! Hyperliquid token transfer library
//!
//! Sends USDC or HYPE between wallets on Hyperliquid: derives the sender
//! address from a private key, checks balances, tries an ordered list of
//! transfer call shapes and verifies the resulting balance change.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod hyperliquid;
pub mod token;
pub mod transfer;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
