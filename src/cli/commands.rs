//! CLI command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{Config, TransferConfig};
use crate::error::Error;
use crate::hyperliquid::{ExchangeClient, HttpClient, InfoClient, SpotStateQuery};
use crate::token::{base_symbol, TokenResolver};
use crate::transfer::balance::{is_registered, query_balance};
use crate::transfer::{TransferClient, TransferExecutor, TransferOutcome, TransferReport};
use crate::wallet::{normalize_recipient, Credential, Network, TransferRequest};

use super::prompt::Prompter;

/// How a command run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// User declined or interrupted; not an error
    Cancelled,
    Failed,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed | RunOutcome::Cancelled => 0,
            RunOutcome::Failed => 1,
        }
    }
}

/// Answers collected from the user, validated
#[derive(Debug)]
pub struct CollectedInput {
    pub credential: Credential,
    pub recipient: String,
    pub token: String,
    pub amount: f64,
    pub network: Network,
}

/// Clients for one network
pub struct Connection {
    pub info: Box<dyn SpotStateQuery>,
    pub client: Box<dyn TransferClient>,
}

/// Builds exchange clients once the transfer is confirmed
pub trait Connector {
    fn connect(&self, config: &Config, credential: &Credential, network: Network)
        -> Result<Connection>;
}

/// Connects to the Hyperliquid HTTP API
#[derive(Debug, Default)]
pub struct HyperliquidConnector;

impl Connector for HyperliquidConnector {
    fn connect(
        &self,
        config: &Config,
        credential: &Credential,
        network: Network,
    ) -> Result<Connection> {
        let base_url = config.api_url(network.is_testnet());
        info!("Connecting to {} ({})", network, base_url);

        let info = InfoClient::new(HttpClient::new(base_url, &config.network)?);
        let exchange = ExchangeClient::new(
            HttpClient::new(base_url, &config.network)?,
            credential.signer().clone(),
            network,
            config.network.signature_chain_id,
        );

        Ok(Connection {
            info: Box::new(info),
            client: Box::new(exchange),
        })
    }
}

/// Parse a user-entered amount; must be a finite positive number
pub fn parse_amount(raw: &str) -> crate::Result<f64> {
    let raw = raw.trim();
    let amount: f64 = raw
        .parse()
        .map_err(|_| Error::InvalidAmount(raw.to_string()))?;

    if !amount.is_finite() {
        return Err(Error::InvalidAmount(raw.to_string()));
    }
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount(amount));
    }
    Ok(amount)
}

/// Parse a token symbol; empty input selects the default token
pub fn parse_token(raw: &str, config: &TransferConfig) -> crate::Result<String> {
    let token = raw.trim().to_uppercase();
    if token.is_empty() {
        return Ok(config.default_token.clone());
    }

    if !config.supported_tokens.contains(&token) {
        return Err(Error::UnsupportedToken {
            token,
            supported: config.supported_tokens.join(" and "),
        });
    }
    Ok(token)
}

/// Prompt for key, recipient, token, amount and network
pub fn collect_input(prompter: &dyn Prompter, config: &TransferConfig) -> crate::Result<CollectedInput> {
    let raw_key = prompter.secret("Enter your private key")?;
    let credential = Credential::from_private_key(&raw_key)?;

    let recipient = prompter.input("Enter recipient address", None)?;
    if recipient.trim().is_empty() {
        return Err(Error::MissingRecipient);
    }

    println!("\nSupported tokens: {}", config.supported_tokens.join(", "));
    let token_prompt = format!("Enter token type ({})", config.supported_tokens.join("/"));
    let token = parse_token(
        &prompter.input(&token_prompt, Some(&config.default_token))?,
        config,
    )?;

    let amount = parse_amount(&prompter.input(&format!("Enter amount of {} to transfer", token), None)?)?;

    let network = Network::from_choice(
        &prompter.input("Choose network (1=Mainnet, 2=Testnet)", Some("1"))?,
    );

    Ok(CollectedInput {
        credential,
        recipient: recipient.trim().to_string(),
        token,
        amount,
        network,
    })
}

/// Interactive transfer
pub async fn transfer(
    config: &Config,
    prompter: &dyn Prompter,
    connector: &dyn Connector,
) -> Result<RunOutcome> {
    println!("Hyperliquid Token Transfer Tool");
    println!("{}", "=".repeat(50));

    let input = collect_input(prompter, &config.transfer)?;

    let identifier = TokenResolver::new(&config.tokens).resolve(&input.token, input.network);
    println!(
        "\nToken format for {}: {}",
        input.network.to_string().to_lowercase(),
        identifier
    );

    let sender = input.credential.checksum_address();
    println!("Derived wallet address: {}", sender);

    println!("\nTransfer Summary:");
    println!("  From: {}", sender);
    println!("  To: {}", input.recipient);
    println!("  Amount: {} {}", input.amount, input.token);
    println!("  Network: {}", input.network);
    println!("  Token format: {}", identifier);

    if !prompter.confirm("\nConfirm transfer?")? {
        info!("Transfer cancelled by user");
        println!("Transfer cancelled");
        return Ok(RunOutcome::Cancelled);
    }

    let connection = connector
        .connect(config, &input.credential, input.network)
        .context("Failed to initialize exchange")?;
    println!("Exchange initialized for {}", input.network.to_string().to_uppercase());

    let request = TransferRequest::new(
        input.credential.address(),
        input.recipient,
        input.token,
        input.amount,
        input.network,
    );

    println!(
        "\nTransferring {:.*} {} on {}",
        config.transfer.amount_decimals,
        request.amount(),
        request.token(),
        request.network()
    );
    println!("  From: {}", sender);
    println!("  To: {}", normalize_recipient(request.recipient()));
    println!("  Using token format: {}", identifier);

    let executor = TransferExecutor::new(
        connection.info.as_ref(),
        connection.client.as_ref(),
        &config.transfer,
        &config.verification,
    );
    let report = executor.execute(&request, &identifier).await;
    print_report(&report, request.amount(), connection.client.as_ref());

    if report.success {
        println!("\nTransfer completed successfully!");
        Ok(RunOutcome::Completed)
    } else {
        println!("\nTransfer failed. Please check the messages above.");
        Ok(RunOutcome::Failed)
    }
}

fn print_report(report: &TransferReport, amount: f64, client: &dyn TransferClient) {
    if !report.recipient_registered
        && !matches!(report.outcome, TransferOutcome::InsufficientBalance { .. })
    {
        println!("Note: recipient may need to deposit funds or connect their wallet to Hyperliquid first");
    }

    if let Some(final_balance) = &report.final_balance {
        println!("Initial balance: {}", report.initial);
        println!("Final balance: {}", final_balance);
    }

    match &report.outcome {
        TransferOutcome::InsufficientBalance { balance } => {
            println!(
                "Insufficient balance! You have {} {}, need {}",
                balance, report.initial.coin, amount
            );
        }
        TransferOutcome::AllAttemptsFailed => {
            println!("\nAll transfer attempts failed!");
            for kind in report.failed_kinds() {
                println!("  seen: {}", kind);
            }
            println!("\nPossible solutions:");
            println!("  1. Ensure the recipient has registered on Hyperliquid (made a deposit)");
            println!("  2. Try the Hyperliquid web interface first");
            println!("  3. Verify you're on the correct network");
            let methods: Vec<String> = client
                .available_methods()
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("\nAvailable transfer methods: {}", methods.join(", "));
        }
        TransferOutcome::Confirmed => {
            if let Some(final_balance) = &report.final_balance {
                println!(
                    "Transfer confirmed! Balance decreased by {}",
                    report.initial.decrease_to(final_balance)
                );
            }
        }
        TransferOutcome::Unchanged => {
            println!("Warning: balance unchanged! Transfer may have failed silently.");
            println!("  Check the transaction on the Hyperliquid explorer");
        }
        TransferOutcome::UnexpectedChange { delta } => {
            println!("Unexpected balance change: {} (expected: {})", delta, amount);
        }
        TransferOutcome::Unverified { reason } => {
            println!("Error verifying transfer: {}", reason);
            println!("  Transfer may have succeeded - check manually on Hyperliquid");
        }
    }
}

/// Read-only balance and registration lookup
pub async fn balance(
    config: &Config,
    address: &str,
    token: Option<&str>,
    testnet: bool,
) -> Result<()> {
    let network = if testnet { Network::Testnet } else { Network::Mainnet };
    let token = parse_token(token.unwrap_or_default(), &config.transfer)?;
    let identifier = TokenResolver::new(&config.tokens).resolve(&token, network);
    let coin = base_symbol(&identifier).to_uppercase();
    let address = normalize_recipient(address);

    let info = InfoClient::new(HttpClient::new(config.api_url(testnet), &config.network)?);

    println!("\n=== BALANCE ({}) ===\n", network);
    println!("Address: {}", address);
    println!("Token format: {}", identifier);

    match query_balance(&info, &address, &coin).await {
        Ok(total) => println!("{} balance: {}", coin, total),
        Err(e) => {
            warn!("Balance query failed: {}", e);
            println!("{} balance: unavailable ({})", coin, e);
        }
    }

    let registered = is_registered(&info, &address).await;
    println!(
        "Registered: {}",
        if registered { "yes" } else { "no" }
    );

    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}
