//! Info endpoint client (read-only queries)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::req::{HttpClient, RetryPolicy};

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum InfoRequest {
    /// Spot balances of a user
    #[serde(rename = "spotClearinghouseState")]
    SpotUserState { user: String },
}

/// Spot clearinghouse state of one address
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SpotUserState {
    #[serde(default)]
    pub balances: Vec<SpotBalance>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpotBalance {
    pub coin: String,
    pub total: String,
    #[serde(default)]
    pub hold: String,
    #[serde(default)]
    pub entry_ntl: String,
}

impl SpotUserState {
    /// Total balance of `coin`, `None` when the coin is not listed
    pub fn total_of(&self, coin: &str) -> Result<Option<f64>> {
        self.balances
            .iter()
            .find(|balance| balance.coin == coin)
            .map(|balance| {
                balance.total.parse::<f64>().map_err(|e| {
                    Error::Deserialization(format!(
                        "Invalid {} total '{}': {}",
                        coin, balance.total, e
                    ))
                })
            })
            .transpose()
    }
}

/// Source of spot user state
///
/// Implemented by [`InfoClient`]; tests substitute their own.
#[async_trait]
pub trait SpotStateQuery: Send + Sync {
    /// `None` when the exchange has no state for the address
    async fn spot_user_state(&self, user: &str) -> Result<Option<SpotUserState>>;
}

/// Client for the `/info` endpoint
#[derive(Debug, Clone)]
pub struct InfoClient {
    http_client: HttpClient,
}

impl InfoClient {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    async fn send_info_request<T: for<'a> Deserialize<'a>>(
        &self,
        info_request: InfoRequest,
    ) -> Result<T> {
        let data = serde_json::to_string(&info_request)?;
        let return_data = self
            .http_client
            .post("/info", data, RetryPolicy::Idempotent)
            .await?;
        serde_json::from_str(&return_data).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl SpotStateQuery for InfoClient {
    async fn spot_user_state(&self, user: &str) -> Result<Option<SpotUserState>> {
        debug!("Querying spot state for {}", user);
        self.send_info_request(InfoRequest::SpotUserState {
            user: user.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_request_serialization() {
        let request = InfoRequest::SpotUserState {
            user: "0xabc".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"type":"spotClearinghouseState","user":"0xabc"}"#);
    }

    #[test]
    fn test_spot_state_deserialize() {
        let json = r#"{"balances":[
            {"coin":"USDC","token":0,"hold":"0.0","total":"125.5","entryNtl":"0.0"},
            {"coin":"HYPE","token":150,"hold":"1.0","total":"3.25","entryNtl":"80.1"}
        ]}"#;
        let state: Option<SpotUserState> = serde_json::from_str(json).unwrap();
        let state = state.unwrap();
        assert_eq!(state.total_of("USDC").unwrap(), Some(125.5));
        assert_eq!(state.total_of("HYPE").unwrap(), Some(3.25));
        assert_eq!(state.total_of("PURR").unwrap(), None);
    }

    #[test]
    fn test_null_state() {
        let state: Option<SpotUserState> = serde_json::from_str("null").unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn test_bad_total_is_error() {
        let state = SpotUserState {
            balances: vec![SpotBalance {
                coin: "USDC".to_string(),
                total: "abc".to_string(),
                hold: String::new(),
                entry_ntl: String::new(),
            }],
        };
        assert!(state.total_of("USDC").is_err());
    }
}
