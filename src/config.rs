//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Hyperliquid mainnet API endpoint
pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Hyperliquid testnet API endpoint
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_mainnet_url")]
    pub mainnet_url: String,
    #[serde(default = "default_testnet_url")]
    pub testnet_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Chain id placed in the EIP-712 domain of user-signed actions
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: u64,
}

/// Token identifiers per network
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Symbol -> "SYMBOL:contract" for mainnet spot tokens
    #[serde(default = "default_mainnet_tokens")]
    pub mainnet: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    /// Decimals used when formatting the amount for the wire
    #[serde(default = "default_amount_decimals")]
    pub amount_decimals: usize,
    #[serde(default = "default_supported_tokens")]
    pub supported_tokens: Vec<String>,
    #[serde(default = "default_token")]
    pub default_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Allowed difference between expected and observed balance change
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Report success when the post-transfer balance query fails
    #[serde(default = "default_true")]
    pub trust_unverified: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mainnet_url: default_mainnet_url(),
            testnet_url: default_testnet_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            signature_chain_id: default_signature_chain_id(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            mainnet: default_mainnet_tokens(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            amount_decimals: default_amount_decimals(),
            supported_tokens: default_supported_tokens(),
            default_token: default_token(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            trust_unverified: true,
        }
    }
}

fn default_mainnet_url() -> String {
    MAINNET_API_URL.to_string()
}

fn default_testnet_url() -> String {
    TESTNET_API_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_signature_chain_id() -> u64 {
    421614
}

fn default_mainnet_tokens() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "USDC".to_string(),
            "USDC:0x6d1e7cde53ba9467b783cb7c530ce054".to_string(),
        ),
        (
            "HYPE".to_string(),
            "HYPE:0x0d01dc56dcaaca66ad901c959b4011ec".to_string(),
        ),
    ])
}

fn default_amount_decimals() -> usize {
    6
}

fn default_supported_tokens() -> Vec<String> {
    vec!["USDC".to_string(), "HYPE".to_string()]
}

fn default_token() -> String {
    "USDC".to_string()
}

fn default_tolerance() -> f64 {
    0.001
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix HLTRANSFER__)
            .add_source(
                config::Environment::with_prefix("HLTRANSFER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Uppercase token symbols (the config crate lowercases table keys)
    fn normalize(&mut self) {
        self.tokens.mainnet = std::mem::take(&mut self.tokens.mainnet)
            .into_iter()
            .map(|(symbol, identifier)| (symbol.to_uppercase(), identifier))
            .collect();
        for token in &mut self.transfer.supported_tokens {
            *token = token.to_uppercase();
        }
        self.transfer.default_token = self.transfer.default_token.to_uppercase();
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.network.mainnet_url.trim().is_empty() || self.network.testnet_url.trim().is_empty()
        {
            anyhow::bail!("network.mainnet_url and network.testnet_url must be set");
        }

        if self.network.timeout_ms == 0 {
            anyhow::bail!("network.timeout_ms must be positive");
        }

        if self.transfer.amount_decimals > 18 {
            anyhow::bail!(
                "transfer.amount_decimals cannot exceed 18, got {}",
                self.transfer.amount_decimals
            );
        }

        if self.transfer.supported_tokens.is_empty() {
            anyhow::bail!("transfer.supported_tokens cannot be empty");
        }

        if !self
            .transfer
            .supported_tokens
            .contains(&self.transfer.default_token)
        {
            anyhow::bail!(
                "transfer.default_token {} is not in supported_tokens",
                self.transfer.default_token
            );
        }

        if self.verification.tolerance.is_nan() || self.verification.tolerance <= 0.0 {
            anyhow::bail!("verification.tolerance must be positive");
        }

        if self.verification.trust_unverified {
            tracing::debug!(
                "verification.trust_unverified is on - unverifiable transfers are reported as successful"
            );
        }

        Ok(())
    }

    /// Base URL for the selected network
    pub fn api_url(&self, testnet: bool) -> &str {
        if testnet {
            &self.network.testnet_url
        } else {
            &self.network.mainnet_url
        }
    }

    /// Get configuration for display
    pub fn masked_display(&self) -> String {
        let tokens = self
            .tokens
            .mainnet
            .iter()
            .map(|(symbol, identifier)| format!("    {}: {}", symbol, identifier))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Configuration:
  Network:
    mainnet_url: {}
    testnet_url: {}
    timeout: {}ms
    max_retries: {}
    signature_chain_id: {}
  Mainnet tokens:
{}
  Transfer:
    supported_tokens: {:?}
    default_token: {}
    amount_decimals: {}
  Verification:
    tolerance: {}
    trust_unverified: {}
"#,
            mask_url(&self.network.mainnet_url),
            mask_url(&self.network.testnet_url),
            self.network.timeout_ms,
            self.network.max_retries,
            self.network.signature_chain_id,
            tokens,
            self.transfer.supported_tokens,
            self.transfer.default_token,
            self.transfer.amount_decimals,
            self.verification.tolerance,
            self.verification.trust_unverified,
        )
    }
}

/// Mask URL for display (hide API keys in query params)
fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}
