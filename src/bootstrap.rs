//! Startup checks
//!
//! Every component the transfer flow depends on is checked once, in order,
//! before the first prompt. The first failure stops the run.

use alloy::primitives::keccak256;
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hyperliquid::req::build_client;

type Check = fn(&Config) -> Result<()>;

const CHECKS: [(&str, Check); 4] = [
    ("configuration", check_config),
    ("API endpoints", check_endpoints),
    ("HTTP client", check_http_client),
    ("signer", check_signer),
];

/// Run all startup checks
pub fn startup_checks(config: &Config) -> Result<()> {
    info!("Performing startup checks...");

    for (component, check) in CHECKS {
        if let Err(e) = check(config) {
            let reason = match e {
                Error::Startup { reason, .. } => reason,
                other => other.to_string(),
            };
            error!("{} check failed: {}", component, reason);
            return Err(Error::Startup {
                component: component.to_string(),
                reason,
            });
        }
        info!("{} ready", component);
    }

    info!("Startup checks passed");
    Ok(())
}

fn check_config(config: &Config) -> Result<()> {
    config.validate().map_err(|e| Error::Config(e.to_string()))
}

fn check_endpoints(config: &Config) -> Result<()> {
    for (name, raw) in [
        ("mainnet_url", &config.network.mainnet_url),
        ("testnet_url", &config.network.testnet_url),
    ] {
        let url = url::Url::parse(raw).map_err(|e| Error::Config(format!("{}: {}", name, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "{} must be http(s), got {}",
                name,
                url.scheme()
            )));
        }
    }
    Ok(())
}

fn check_http_client(config: &Config) -> Result<()> {
    build_client(config.network.timeout_ms).map(|_| ())
}

/// Sign a fixed hash with a throwaway key and recover the address
fn check_signer(_config: &Config) -> Result<()> {
    let signer = PrivateKeySigner::random();
    let hash = keccak256(b"hl-transfer startup check");
    let signature = signer
        .sign_hash_sync(&hash)
        .map_err(|e| Error::Signing(e.to_string()))?;
    let recovered = signature
        .recover_address_from_prehash(&hash)
        .map_err(|e| Error::Signing(e.to_string()))?;

    if recovered != signer.address() {
        return Err(Error::Signing("self-check signature recovered a different address".to_string()));
    }
    Ok(())
}
