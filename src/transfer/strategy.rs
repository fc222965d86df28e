//! Transfer call-shape strategies
//!
//! Each strategy is one way of calling a transfer method. The executor tries
//! them in the order returned by [`build_attempts`] until one succeeds.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::token::base_symbol;

use super::call::{ArgValue, CallArgs, TransferClient, TransferMethod};
use super::classify::{classify, FailureKind};

/// Result of a single attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The client does not expose the method
    Skipped { reason: String },
    Succeeded(Value),
    Failed {
        error: Error,
        kind: Option<FailureKind>,
    },
}

impl AttemptOutcome {
    fn from_error(error: Error) -> Self {
        let kind = classify(&error.to_string());
        AttemptOutcome::Failed { error, kind }
    }
}

/// A candidate way of executing the transfer
#[async_trait]
pub trait TransferStrategy: Send + Sync {
    fn method(&self) -> TransferMethod;

    /// Human-readable description shown in progress output
    fn description(&self) -> &str;

    fn args(&self) -> &CallArgs;

    async fn attempt(&self, client: &dyn TransferClient) -> AttemptOutcome;
}

/// A fixed method call with fixed arguments
#[derive(Debug, Clone)]
pub struct CallShape {
    method: TransferMethod,
    args: CallArgs,
    description: String,
}

impl CallShape {
    pub fn new(method: TransferMethod, args: CallArgs, description: impl Into<String>) -> Self {
        Self {
            method,
            args,
            description: description.into(),
        }
    }
}

#[async_trait]
impl TransferStrategy for CallShape {
    fn method(&self) -> TransferMethod {
        self.method
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn args(&self) -> &CallArgs {
        &self.args
    }

    async fn attempt(&self, client: &dyn TransferClient) -> AttemptOutcome {
        if !client.supports(self.method) {
            return AttemptOutcome::Skipped {
                reason: format!("{} method not available", self.method),
            };
        }

        debug!("Invoking {} with {}", self.method, self.args);
        match client.invoke(self.method, &self.args).await {
            Ok(response) => AttemptOutcome::Succeeded(response),
            Err(e) => AttemptOutcome::from_error(e),
        }
    }
}

/// Build the ordered list of call shapes for one transfer
///
/// `recipient` should already be normalised. The `usd_transfer` shape is only
/// included when the token is USDC.
pub fn build_attempts(
    recipient: &str,
    token: &str,
    amount: f64,
    decimals: usize,
) -> Vec<Box<dyn TransferStrategy>> {
    let amount_str = format!("{:.*}", decimals, amount);
    let token_upper = token.to_uppercase();
    let is_usdc = base_symbol(token).eq_ignore_ascii_case("USDC");

    let spot = |args: Vec<(&'static str, ArgValue)>, description: &str| -> Box<dyn TransferStrategy> {
        Box::new(CallShape::new(
            TransferMethod::SpotTransfer,
            CallArgs::Named(args),
            description,
        ))
    };

    let mut attempts: Vec<Box<dyn TransferStrategy>> = vec![
        spot(
            vec![
                ("destination", ArgValue::str(recipient)),
                ("token", ArgValue::str(token)),
                ("amount", ArgValue::str(&amount_str)),
            ],
            "spot_transfer with resolved token",
        ),
        spot(
            vec![
                ("destination", ArgValue::str(recipient)),
                ("token", ArgValue::str(&token_upper)),
                ("amount", ArgValue::str(&amount_str)),
            ],
            "spot_transfer with uppercase token",
        ),
    ];

    if is_usdc {
        attempts.push(Box::new(CallShape::new(
            TransferMethod::UsdTransfer,
            CallArgs::Named(vec![
                ("destination", ArgValue::str(recipient)),
                ("amount", ArgValue::str(&amount_str)),
            ]),
            "usd_transfer for USDC",
        )));
    }

    attempts.push(spot(
        vec![
            ("destination", ArgValue::str(recipient.to_lowercase())),
            ("token", ArgValue::str(token)),
            ("amount", ArgValue::str(&amount_str)),
        ],
        "spot_transfer with lowercase address",
    ));
    attempts.push(spot(
        vec![
            ("destination", ArgValue::str(recipient)),
            ("token", ArgValue::str(token)),
            ("amount", ArgValue::Num(amount)),
        ],
        "spot_transfer with numeric amount",
    ));
    attempts.push(spot(
        vec![
            ("coin", ArgValue::str(token)),
            ("destination", ArgValue::str(recipient)),
            ("amount", ArgValue::str(&amount_str)),
        ],
        "spot_transfer with coin keyword",
    ));
    attempts.push(Box::new(CallShape::new(
        TransferMethod::SpotTransfer,
        CallArgs::Positional(vec![
            ArgValue::str(&amount_str),
            ArgValue::str(token),
            ArgValue::str(recipient),
        ]),
        "spot_transfer positional (amount, token, destination)",
    )));
    attempts.push(Box::new(CallShape::new(
        TransferMethod::SpotTransfer,
        CallArgs::Positional(vec![
            ArgValue::str(recipient),
            ArgValue::str(token),
            ArgValue::str(&amount_str),
        ]),
        "spot_transfer positional (destination, token, amount)",
    )));

    attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    struct RejectAll;

    #[async_trait]
    impl TransferClient for RejectAll {
        fn supports(&self, method: TransferMethod) -> bool {
            method == TransferMethod::SpotTransfer
        }

        async fn invoke(&self, _method: TransferMethod, _args: &CallArgs) -> Result<Value> {
            Err(Error::ExchangeRejected("Insufficient balance for token transfer".to_string()))
        }
    }

    #[test]
    fn test_usdc_builds_eight_shapes_in_order() {
        let attempts = build_attempts(RECIPIENT, "USDC", 10.0, 6);
        assert_eq!(attempts.len(), 8);

        let methods: Vec<TransferMethod> = attempts.iter().map(|a| a.method()).collect();
        assert_eq!(methods[2], TransferMethod::UsdTransfer);
        assert_eq!(
            methods.iter().filter(|m| **m == TransferMethod::SpotTransfer).count(),
            7
        );

        assert_eq!(
            attempts[0].args(),
            &CallArgs::Named(vec![
                ("destination", ArgValue::str(RECIPIENT)),
                ("token", ArgValue::str("USDC")),
                ("amount", ArgValue::str("10.000000")),
            ])
        );
        assert_eq!(
            attempts[4].args(),
            &CallArgs::Named(vec![
                ("destination", ArgValue::str(RECIPIENT)),
                ("token", ArgValue::str("USDC")),
                ("amount", ArgValue::Num(10.0)),
            ])
        );
    }

    #[test]
    fn test_non_usdc_skips_usd_transfer_shape() {
        let token = "HYPE:0x0d01dc56dcaaca66ad901c959b4011ec";
        let attempts = build_attempts(RECIPIENT, token, 1.5, 6);
        assert_eq!(attempts.len(), 7);
        assert!(attempts.iter().all(|a| a.method() == TransferMethod::SpotTransfer));

        // uppercased identifier, lowercased destination
        assert_eq!(
            attempts[1].args(),
            &CallArgs::Named(vec![
                ("destination", ArgValue::str(RECIPIENT)),
                ("token", ArgValue::str("HYPE:0X0D01DC56DCAACA66AD901C959B4011EC")),
                ("amount", ArgValue::str("1.500000")),
            ])
        );
        assert_eq!(
            attempts[2].args(),
            &CallArgs::Named(vec![
                ("destination", ArgValue::str(RECIPIENT.to_lowercase())),
                ("token", ArgValue::str(token)),
                ("amount", ArgValue::str("1.500000")),
            ])
        );
    }

    #[test]
    fn test_mainnet_usdc_identifier_keeps_usd_shape() {
        let attempts = build_attempts(RECIPIENT, "USDC:0x6d1e7cde53ba9467b783cb7c530ce054", 1.0, 6);
        assert_eq!(attempts.len(), 8);
        assert_eq!(attempts[2].method(), TransferMethod::UsdTransfer);
    }

    #[test]
    fn test_positional_shapes() {
        let attempts = build_attempts(RECIPIENT, "USDC", 2.0, 6);
        assert_eq!(
            attempts[6].args(),
            &CallArgs::Positional(vec![
                ArgValue::str("2.000000"),
                ArgValue::str("USDC"),
                ArgValue::str(RECIPIENT),
            ])
        );
        assert_eq!(
            attempts[7].args(),
            &CallArgs::Positional(vec![
                ArgValue::str(RECIPIENT),
                ArgValue::str("USDC"),
                ArgValue::str("2.000000"),
            ])
        );
    }

    #[tokio::test]
    async fn test_attempt_outcomes() {
        let attempts = build_attempts(RECIPIENT, "USDC", 1.0, 6);

        match attempts[2].attempt(&RejectAll).await {
            AttemptOutcome::Skipped { reason } => assert!(reason.contains("usd_transfer")),
            other => panic!("expected skip, got {:?}", other),
        }

        match attempts[0].attempt(&RejectAll).await {
            AttemptOutcome::Failed { kind, .. } => {
                assert_eq!(kind, Some(FailureKind::InsufficientBalance))
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
