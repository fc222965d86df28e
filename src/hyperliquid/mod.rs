//! Minimal Hyperliquid API client
//!
//! Covers what a spot transfer needs:
//! - `info` - spot balances (`spotClearinghouseState`)
//! - `exchange` - signed `usdSend` / `spotSend` actions
//! - `actions` / `signing` - action types and EIP-712 signing
//! - `req` - HTTP transport with retry

pub mod actions;
pub mod exchange;
pub mod info;
pub mod req;
pub mod signing;

pub use exchange::{ExchangeClient, ExchangeResponseStatus};
pub use info::{InfoClient, SpotBalance, SpotStateQuery, SpotUserState};
pub use req::{HttpClient, RetryPolicy};
