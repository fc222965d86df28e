//! Exchange endpoint client (signed transfer actions)
//!
//! Only the two transfer actions are implemented:
//! - `spot_transfer(amount, destination, token)` -> `spotSend`
//! - `usd_transfer(amount, destination)` -> `usdSend`

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::transfer::call::{ArgValue, CallArgs, TransferClient, TransferMethod};
use crate::wallet::Network;

use super::actions::{Actions, SpotSend, UsdSend};
use super::req::{HttpClient, RetryPolicy};
use super::signing::{sign_typed_data, Eip712, WireSignature};

/// Parameter order of `spot_transfer`
pub const SPOT_TRANSFER_PARAMS: &[&str] = &["amount", "destination", "token"];

/// Parameter order of `usd_transfer`
pub const USD_TRANSFER_PARAMS: &[&str] = &["amount", "destination"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangePayload {
    action: Value,
    signature: WireSignature,
    nonce: u64,
    vault_address: Option<String>,
}

/// Top-level `/exchange` response
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", content = "response")]
#[serde(rename_all = "camelCase")]
pub enum ExchangeResponseStatus {
    Ok(Value),
    Err(String),
}

pub struct ExchangeClient {
    http_client: HttpClient,
    wallet: PrivateKeySigner,
    network: Network,
    signature_chain_id: u64,
}

// Security: keep the signing key out of debug output
impl std::fmt::Debug for ExchangeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeClient")
            .field("http_client", &self.http_client)
            .field("wallet", &"<redacted>")
            .field("network", &self.network)
            .field("signature_chain_id", &self.signature_chain_id)
            .finish()
    }
}

/// Millisecond timestamp used as both nonce and action time
pub fn next_nonce() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

impl ExchangeClient {
    pub fn new(
        http_client: HttpClient,
        wallet: PrivateKeySigner,
        network: Network,
        signature_chain_id: u64,
    ) -> Self {
        Self {
            http_client,
            wallet,
            network,
            signature_chain_id,
        }
    }

    /// Transfer USDC to another address
    pub async fn usd_transfer(&self, amount: &str, destination: &str) -> Result<Value> {
        let usd_send = UsdSend {
            signature_chain_id: self.signature_chain_id,
            hyperliquid_chain: self.network.hyperliquid_chain().to_string(),
            destination: destination.to_string(),
            amount: amount.to_string(),
            time: next_nonce(),
        };
        let payload = self.signed_payload(&usd_send, Actions::UsdSend(usd_send.clone()), usd_send.time)?;

        self.post(payload).await?.into_result()
    }

    /// Transfer spot tokens to another address
    pub async fn spot_transfer(&self, amount: &str, destination: &str, token: &str) -> Result<Value> {
        let spot_send = SpotSend {
            signature_chain_id: self.signature_chain_id,
            hyperliquid_chain: self.network.hyperliquid_chain().to_string(),
            destination: destination.to_string(),
            token: token.to_string(),
            amount: amount.to_string(),
            time: next_nonce(),
        };
        let payload =
            self.signed_payload(&spot_send, Actions::SpotSend(spot_send.clone()), spot_send.time)?;

        self.post(payload).await?.into_result()
    }

    /// Sign `typed` and wrap `action` into the request body; `nonce` must be the action time
    fn signed_payload<T: Eip712>(
        &self,
        typed: &T,
        action: Actions,
        nonce: u64,
    ) -> Result<ExchangePayload> {
        let signature = sign_typed_data(typed, &self.wallet)?;
        Ok(ExchangePayload {
            action: serde_json::to_value(action)?,
            signature: WireSignature::from(&signature),
            nonce,
            vault_address: None,
        })
    }

    async fn post(&self, payload: ExchangePayload) -> Result<ExchangeResponseStatus> {
        let body = serde_json::to_string(&payload)?;
        // Not logging the payload, it carries the signature
        debug!("Sending exchange request");

        let output = self
            .http_client
            .post("/exchange", body, RetryPolicy::SignedAction)
            .await?;
        debug!("Received exchange response");
        serde_json::from_str(&output).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

impl ExchangeResponseStatus {
    /// `err` responses become [`Error::ExchangeRejected`]
    pub fn into_result(self) -> Result<Value> {
        match self {
            ExchangeResponseStatus::Ok(response) => Ok(response),
            ExchangeResponseStatus::Err(message) => Err(Error::ExchangeRejected(message)),
        }
    }
}

#[async_trait]
impl TransferClient for ExchangeClient {
    fn supports(&self, method: TransferMethod) -> bool {
        matches!(
            method,
            TransferMethod::SpotTransfer | TransferMethod::UsdTransfer
        )
    }

    async fn invoke(&self, method: TransferMethod, args: &CallArgs) -> Result<Value> {
        match method {
            TransferMethod::SpotTransfer => {
                let bound = bind_arguments(method, SPOT_TRANSFER_PARAMS, args)?;
                self.spot_transfer(&bound[0], &bound[1], &bound[2]).await
            }
            TransferMethod::UsdTransfer => {
                let bound = bind_arguments(method, USD_TRANSFER_PARAMS, args)?;
                self.usd_transfer(&bound[0], &bound[1]).await
            }
        }
    }
}

/// Bind call arguments to `params`, returning wire strings in parameter order
///
/// Keyword names must match a parameter; positional values fill parameters
/// left to right. Numbers are only accepted for `amount`.
pub fn bind_arguments(
    method: TransferMethod,
    params: &[&'static str],
    args: &CallArgs,
) -> Result<Vec<String>> {
    let mut slots: Vec<Option<&ArgValue>> = vec![None; params.len()];

    match args {
        CallArgs::Named(named) => {
            for (name, value) in named {
                let index = params.iter().position(|p| p == name).ok_or_else(|| {
                    Error::UnexpectedArgument {
                        method: method.to_string(),
                        name: name.to_string(),
                    }
                })?;
                slots[index] = Some(value);
            }
        }
        CallArgs::Positional(values) => {
            if values.len() > params.len() {
                return Err(Error::ArgumentCount {
                    method: method.to_string(),
                    expected: params.len(),
                    given: values.len(),
                });
            }
            for (slot, value) in slots.iter_mut().zip(values) {
                *slot = Some(value);
            }
        }
    }

    params
        .iter()
        .zip(slots)
        .map(|(name, slot)| {
            let value = slot.ok_or_else(|| Error::MissingArgument {
                method: method.to_string(),
                name: name.to_string(),
            })?;
            match value {
                ArgValue::Str(s) => Ok(s.clone()),
                ArgValue::Num(n) if *name == "amount" => Ok(float_to_wire(*n)),
                ArgValue::Num(_) => Err(Error::ArgumentType {
                    method: method.to_string(),
                    name: name.to_string(),
                    expected: "a string",
                }),
            }
        })
        .collect()
}

/// Render a float the way it is stringified for the wire ("10.0", "2.5")
pub fn float_to_wire(value: f64) -> String {
    format!("{:?}", value)
}
