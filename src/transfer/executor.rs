//! Transfer executor
//!
//! Pre-checks the sender balance, runs the call-shape strategies in order
//! until one succeeds, then re-reads the balance to verify the transfer.

use tracing::{debug, error, info, warn};

use crate::config::{TransferConfig, VerificationConfig};
use crate::hyperliquid::SpotStateQuery;
use crate::token::base_symbol;
use crate::wallet::{normalize_recipient, BalanceSnapshot, TransferRequest};

use super::balance::{get_balance, is_registered, query_balance};
use super::call::{CallArgs, TransferClient, TransferMethod};
use super::classify::FailureKind;
use super::strategy::{build_attempts, AttemptOutcome};

/// Result of comparing balances around a transfer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verification {
    /// Balance dropped by the amount, within tolerance
    Confirmed,
    /// Balance did not move at all
    Unchanged,
    /// Balance moved, but not by the amount
    UnexpectedChange { delta: f64 },
}

/// Compare the balance decrease against the transferred amount
pub fn verify(initial: f64, final_balance: f64, amount: f64, tolerance: f64) -> Verification {
    let delta = initial - final_balance;
    if (delta - amount).abs() < tolerance {
        Verification::Confirmed
    } else if delta == 0.0 {
        Verification::Unchanged
    } else {
        Verification::UnexpectedChange { delta }
    }
}

/// Final state of a transfer run
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// Balance below amount, nothing was sent
    InsufficientBalance { balance: f64 },
    /// Every call shape failed or was skipped
    AllAttemptsFailed,
    Confirmed,
    Unchanged,
    UnexpectedChange { delta: f64 },
    /// A call succeeded but the balance could not be re-read
    Unverified { reason: String },
}

/// One attempted call shape and what happened
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub index: usize,
    pub method: TransferMethod,
    pub description: String,
    pub args: CallArgs,
    pub result: AttemptResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptResult {
    Skipped(String),
    Succeeded,
    Failed {
        message: String,
        kind: Option<FailureKind>,
    },
}

#[derive(Debug, Clone)]
pub struct TransferReport {
    pub outcome: TransferOutcome,
    pub initial: BalanceSnapshot,
    pub final_balance: Option<BalanceSnapshot>,
    pub recipient_registered: bool,
    pub attempts: Vec<AttemptRecord>,
    /// Overall verdict; `Unverified` counts only if configured to trust it
    pub success: bool,
}

impl TransferReport {
    pub fn failed_kinds(&self) -> Vec<FailureKind> {
        let mut kinds = Vec::new();
        for attempt in &self.attempts {
            if let AttemptResult::Failed { kind: Some(kind), .. } = &attempt.result {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        }
        kinds
    }

    /// Index of the call shape that succeeded, if any
    pub fn succeeded_attempt(&self) -> Option<&AttemptRecord> {
        self.attempts
            .iter()
            .find(|a| a.result == AttemptResult::Succeeded)
    }
}

pub struct TransferExecutor<'a> {
    info: &'a dyn SpotStateQuery,
    client: &'a dyn TransferClient,
    amount_decimals: usize,
    tolerance: f64,
    trust_unverified: bool,
}

impl<'a> TransferExecutor<'a> {
    pub fn new(
        info: &'a dyn SpotStateQuery,
        client: &'a dyn TransferClient,
        transfer: &TransferConfig,
        verification: &VerificationConfig,
    ) -> Self {
        Self {
            info,
            client,
            amount_decimals: transfer.amount_decimals,
            tolerance: verification.tolerance,
            trust_unverified: verification.trust_unverified,
        }
    }

    /// Execute `request`, sending `token` (the network-qualified identifier)
    pub async fn execute(&self, request: &TransferRequest, token: &str) -> TransferReport {
        let sender = request.sender();
        let sender_str = sender.to_checksum(None);
        let coin = base_symbol(token).to_uppercase();
        let amount = request.amount();

        info!("Checking {} balance of {}", coin, sender_str);
        let initial_total = get_balance(self.info, &sender_str, &coin).await;
        let initial = BalanceSnapshot::new(sender, coin.clone(), initial_total);
        println!("Current {} balance: {}", coin, initial_total);

        if initial_total < amount {
            error!(
                "Insufficient balance: have {} {}, need {}",
                initial_total, coin, amount
            );
            return TransferReport {
                outcome: TransferOutcome::InsufficientBalance {
                    balance: initial_total,
                },
                initial,
                final_balance: None,
                recipient_registered: false,
                attempts: Vec::new(),
                success: false,
            };
        }

        let recipient = normalize_recipient(request.recipient());
        let recipient_registered = is_registered(self.info, &recipient).await;
        if recipient_registered {
            info!("Recipient {} is registered", recipient);
        } else {
            warn!(
                "Recipient {} has no exchange state, transfer may be rejected",
                recipient
            );
        }

        let available = self.client.available_methods();
        debug!("Client transfer methods: {:?}", available);

        let strategies = build_attempts(&recipient, token, amount, self.amount_decimals);
        let total = strategies.len();
        let mut attempts = Vec::with_capacity(total);
        let mut succeeded = false;

        for (i, strategy) in strategies.iter().enumerate() {
            let index = i + 1;
            println!("Attempt {}/{}: {}", index, total, strategy.description());
            if self.client.supports(strategy.method()) {
                println!("  {}", strategy.args().labelled());
            }

            let result = match strategy.attempt(self.client).await {
                AttemptOutcome::Skipped { reason } => {
                    println!("  skipped: {}", reason);
                    AttemptResult::Skipped(reason)
                }
                AttemptOutcome::Succeeded(value) => {
                    info!("Transfer call succeeded with {}", strategy.description());
                    println!("  succeeded: {}", value);
                    succeeded = true;
                    AttemptResult::Succeeded
                }
                AttemptOutcome::Failed { error, kind } => {
                    warn!("Attempt {} failed: {}", index, error);
                    println!("  failed: {}", error);
                    if let Some(kind) = kind {
                        println!("  hint: {}", kind.hint());
                    }
                    AttemptResult::Failed {
                        message: error.to_string(),
                        kind,
                    }
                }
            };

            let done = result == AttemptResult::Succeeded;
            attempts.push(AttemptRecord {
                index,
                method: strategy.method(),
                description: strategy.description().to_string(),
                args: strategy.args().clone(),
                result,
            });
            if done {
                break;
            }
        }

        if !succeeded {
            error!("All {} transfer attempts failed", total);
            return TransferReport {
                outcome: TransferOutcome::AllAttemptsFailed,
                initial,
                final_balance: None,
                recipient_registered,
                attempts,
                success: false,
            };
        }

        info!("Verifying transfer");
        let (outcome, final_balance) = match query_balance(self.info, &sender_str, &coin).await {
            Ok(final_total) => {
                let snapshot = BalanceSnapshot::new(sender, coin.clone(), final_total);
                let outcome = match verify(initial_total, final_total, amount, self.tolerance) {
                    Verification::Confirmed => {
                        info!("Transfer confirmed: {} -> {}", initial_total, final_total);
                        TransferOutcome::Confirmed
                    }
                    Verification::Unchanged => {
                        error!("Balance unchanged after transfer ({})", final_total);
                        TransferOutcome::Unchanged
                    }
                    Verification::UnexpectedChange { delta } => {
                        warn!(
                            "Unexpected balance change: expected -{}, got -{}",
                            amount, delta
                        );
                        TransferOutcome::UnexpectedChange { delta }
                    }
                };
                (outcome, Some(snapshot))
            }
            Err(e) => {
                warn!(
                    "Could not verify transfer, balance query failed: {}. The transfer call itself succeeded",
                    e
                );
                (
                    TransferOutcome::Unverified {
                        reason: e.to_string(),
                    },
                    None,
                )
            }
        };

        let success = match &outcome {
            TransferOutcome::Confirmed => true,
            TransferOutcome::Unverified { .. } => self.trust_unverified,
            _ => false,
        };

        TransferReport {
            outcome,
            initial,
            final_balance,
            recipient_registered,
            attempts,
            success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::hyperliquid::{SpotBalance, SpotUserState};
    use crate::wallet::{Credential, Network};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    /// Returns queued balances for the sender, in order; the last one repeats.
    /// `None` entries fail the query.
    struct ScriptedInfo {
        balances: Mutex<Vec<Option<f64>>>,
    }

    impl ScriptedInfo {
        fn new(balances: Vec<Option<f64>>) -> Self {
            Self {
                balances: Mutex::new(balances),
            }
        }
    }

    #[async_trait]
    impl SpotStateQuery for ScriptedInfo {
        async fn spot_user_state(&self, user: &str) -> Result<Option<SpotUserState>> {
            if user.eq_ignore_ascii_case(RECIPIENT) {
                return Ok(Some(SpotUserState { balances: vec![] }));
            }
            let next = {
                let mut balances = self.balances.lock().unwrap();
                if balances.len() > 1 {
                    balances.remove(0)
                } else {
                    balances[0]
                }
            };
            match next {
                Some(total) => Ok(Some(SpotUserState {
                    balances: vec![SpotBalance {
                        coin: "USDC".to_string(),
                        total: total.to_string(),
                        hold: "0.0".to_string(),
                        entry_ntl: "0.0".to_string(),
                    }],
                })),
                None => Err(Error::Http("connection reset".to_string())),
            }
        }
    }

    /// Records every call; fails the first `fail_first` invocations
    struct RecordingClient {
        methods: Vec<TransferMethod>,
        fail_first: usize,
        calls: Mutex<Vec<(TransferMethod, CallArgs)>>,
    }

    impl RecordingClient {
        fn new(methods: Vec<TransferMethod>, fail_first: usize) -> Self {
            Self {
                methods,
                fail_first,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(TransferMethod, CallArgs)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransferClient for RecordingClient {
        fn supports(&self, method: TransferMethod) -> bool {
            self.methods.contains(&method)
        }

        async fn invoke(&self, method: TransferMethod, args: &CallArgs) -> Result<Value> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((method, args.clone()));
            if calls.len() <= self.fail_first {
                Err(Error::ExchangeRejected("Invalid token".to_string()))
            } else {
                Ok(serde_json::json!({"type": "default"}))
            }
        }
    }

    fn request(amount: f64) -> TransferRequest {
        let credential = Credential::from_private_key(KEY).unwrap();
        TransferRequest::new(credential.address(), RECIPIENT, "USDC", amount, Network::Testnet)
    }

    fn executor<'a>(
        info: &'a ScriptedInfo,
        client: &'a RecordingClient,
        trust_unverified: bool,
    ) -> TransferExecutor<'a> {
        let verification = VerificationConfig {
            trust_unverified,
            ..VerificationConfig::default()
        };
        TransferExecutor::new(info, client, &TransferConfig::default(), &verification)
    }

    #[test]
    fn test_verify() {
        assert_eq!(verify(100.0, 90.0, 10.0, 0.001), Verification::Confirmed);
        assert_eq!(verify(100.0, 90.0005, 10.0, 0.001), Verification::Confirmed);
        assert_eq!(verify(100.0, 100.0, 10.0, 0.001), Verification::Unchanged);
        assert_eq!(
            verify(100.0, 95.0, 10.0, 0.001),
            Verification::UnexpectedChange { delta: 5.0 }
        );
    }

    #[tokio::test]
    async fn test_confirmed_transfer() {
        let info = ScriptedInfo::new(vec![Some(100.0), Some(90.0)]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        assert_eq!(report.outcome, TransferOutcome::Confirmed);
        assert!(report.success);
        assert!(report.recipient_registered);
        assert_eq!(client.calls().len(), 1);
        assert_eq!(report.succeeded_attempt().map(|a| a.index), Some(1));
    }

    #[tokio::test]
    async fn test_unchanged_balance_fails() {
        let info = ScriptedInfo::new(vec![Some(100.0), Some(100.0)]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        assert_eq!(report.outcome, TransferOutcome::Unchanged);
        assert!(!report.success);
    }

    #[tokio::test]
    async fn test_unexpected_change_fails() {
        let info = ScriptedInfo::new(vec![Some(100.0), Some(95.0)]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        assert!(matches!(report.outcome, TransferOutcome::UnexpectedChange { .. }));
        assert!(!report.success);
    }

    #[tokio::test]
    async fn test_insufficient_balance_makes_no_calls() {
        let info = ScriptedInfo::new(vec![Some(5.0)]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        assert_eq!(
            report.outcome,
            TransferOutcome::InsufficientBalance { balance: 5.0 }
        );
        assert!(!report.success);
        assert!(client.calls().is_empty());
        assert!(report.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_failed_balance_query_reads_as_zero() {
        let info = ScriptedInfo::new(vec![None]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, true).execute(&request(1.0), "USDC").await;

        assert_eq!(
            report.outcome,
            TransferOutcome::InsufficientBalance { balance: 0.0 }
        );
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_usd_only_client_skips_spot_shapes() {
        let info = ScriptedInfo::new(vec![Some(100.0), Some(90.0)]);
        let client = RecordingClient::new(vec![TransferMethod::UsdTransfer], 0);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, TransferMethod::UsdTransfer);

        // two skipped spot shapes, then the usd shape, then stop
        assert_eq!(report.attempts.len(), 3);
        assert!(matches!(report.attempts[0].result, AttemptResult::Skipped(_)));
        assert!(matches!(report.attempts[1].result, AttemptResult::Skipped(_)));
        assert_eq!(report.attempts[2].result, AttemptResult::Succeeded);
        assert_eq!(report.outcome, TransferOutcome::Confirmed);
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let info = ScriptedInfo::new(vec![Some(100.0), Some(90.0)]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 2);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        assert_eq!(client.calls().len(), 3);
        assert_eq!(report.attempts.len(), 3);
        assert_eq!(report.failed_kinds(), vec![FailureKind::InvalidParameter]);
        assert!(report.success);
    }

    #[tokio::test]
    async fn test_all_attempts_failed() {
        let info = ScriptedInfo::new(vec![Some(100.0)]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), usize::MAX);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;

        assert_eq!(report.outcome, TransferOutcome::AllAttemptsFailed);
        assert_eq!(client.calls().len(), 8);
        assert!(!report.success);
    }

    #[tokio::test]
    async fn test_unverified_follows_config() {
        let info = ScriptedInfo::new(vec![Some(100.0), None]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, true).execute(&request(10.0), "USDC").await;
        assert!(matches!(report.outcome, TransferOutcome::Unverified { .. }));
        assert!(report.success);

        let info = ScriptedInfo::new(vec![Some(100.0), None]);
        let client = RecordingClient::new(TransferMethod::ALL.to_vec(), 0);
        let report = executor(&info, &client, false).execute(&request(10.0), "USDC").await;
        assert!(!report.success);
    }
}
