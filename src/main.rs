//! hl-transfer - send USDC or HYPE between Hyperliquid wallets
//!
//! # WARNING
//! - Transfers on mainnet move real funds and cannot be undone.
//! - The private key is read interactively and never stored.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use hl_transfer::bootstrap::startup_checks;
use hl_transfer::cli::{commands, HyperliquidConnector, RunOutcome, TerminalPrompter};
use hl_transfer::config::Config;
use hl_transfer::Error;

/// Hyperliquid token transfer tool
#[derive(Parser)]
#[command(name = "hl-transfer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "hl-transfer.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively transfer tokens (default)
    Transfer,

    /// Show the token balance and registration status of an address
    Balance {
        /// Address to look up
        #[arg(long)]
        address: String,

        /// Token symbol (default from config)
        #[arg(long)]
        token: Option<String>,

        /// Query testnet instead of mainnet
        #[arg(long)]
        testnet: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "hl_transfer=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = startup_checks(&config) {
        error!("Startup checks failed: {}", e);
        std::process::exit(1);
    }

    // Ctrl-C anywhere aborts the run
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n\nTransfer cancelled by user");
            std::process::exit(RunOutcome::Cancelled.exit_code());
        }
    });

    let result = match cli.command.unwrap_or(Commands::Transfer) {
        Commands::Transfer => {
            commands::transfer(&config, &TerminalPrompter, &HyperliquidConnector).await
        }
        Commands::Balance {
            address,
            token,
            testnet,
        } => commands::balance(&config, &address, token.as_deref(), testnet)
            .await
            .map(|_| RunOutcome::Completed),
        Commands::Config => commands::show_config(&config).map(|_| RunOutcome::Completed),
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::Cancelled)) => {
            println!("\n\nTransfer cancelled by user");
            RunOutcome::Cancelled
        }
        Err(e) => {
            if e.downcast_ref::<Error>().is_some_and(Error::is_fatal_input) {
                println!("Error: {}", e);
            }
            error!("Command failed: {:#}", e);
            RunOutcome::Failed
        }
    };

    info!("Exiting with {:?}", outcome);
    std::process::exit(outcome.exit_code());
}
