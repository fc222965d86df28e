//! Balance and registration lookups

use tracing::{debug, warn};

use crate::error::Result;
use crate::hyperliquid::SpotStateQuery;

/// Total balance of `coin`, or an error if the query fails
///
/// An address with no state, or without the coin, has a balance of 0.
pub async fn query_balance(info: &dyn SpotStateQuery, address: &str, coin: &str) -> Result<f64> {
    let total = match info.spot_user_state(address).await? {
        Some(state) => state.total_of(coin)?.unwrap_or(0.0),
        None => 0.0,
    };
    debug!("{} balance of {}: {}", coin, address, total);
    Ok(total)
}

/// Total balance of `coin`; query errors are logged and read as 0
pub async fn get_balance(info: &dyn SpotStateQuery, address: &str, coin: &str) -> f64 {
    match query_balance(info, address, coin).await {
        Ok(total) => total,
        Err(e) => {
            warn!("Error getting {} balance: {}", coin, e);
            0.0
        }
    }
}

/// Whether the exchange has user state for `address`; errors read as false
pub async fn is_registered(info: &dyn SpotStateQuery, address: &str) -> bool {
    match info.spot_user_state(address).await {
        Ok(state) => state.is_some(),
        Err(e) => {
            debug!("Registration check for {} failed: {}", address, e);
            false
        }
    }
}
