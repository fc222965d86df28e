//! Wallet module
//!
//! Provides the in-memory credential and the request types:
//! - Credential parsing and address derivation
//! - Recipient normalisation
//! - Transfer request and balance snapshot types
//!
//! # Security
//!
//! The private key is never persisted, printed or logged.

pub mod credentials;
pub mod types;

pub use credentials::{checksum_address, normalize_recipient, Credential};
pub use types::{BalanceSnapshot, Network, TransferRequest};
