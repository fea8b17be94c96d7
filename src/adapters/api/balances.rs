//! Balance Adapter - Per-market Available Balances
//!
//! Reads an account's available base and quote from the REST API
//! and scales the raw sub-unit integers by the market's decimals.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::types::ApiUserBalance;
use crate::domain::market::MarketDescriptor;
use crate::domain::order::BalanceSnapshot;
use crate::domain::units::to_decimal_amount;
use crate::ports::balance::BalanceSource;

/// Balance adapter that wraps the REST client.
pub struct ApiBalances {
    client: Arc<ApiClient>,
}

impl ApiBalances {
    /// Create a new balance adapter.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

/// Converts raw balances into a decimal snapshot.
///
/// An account without a row for the market has nothing available.
pub fn snapshot_from_raw(
    row: Option<&ApiUserBalance>,
    market: &MarketDescriptor,
) -> Result<BalanceSnapshot> {
    let Some(row) = row else {
        return Ok(BalanceSnapshot::new(Decimal::ZERO, Decimal::ZERO));
    };

    let base = to_decimal_amount(u128::from(row.base_available), market.base_decimals()?)?;
    let quote = to_decimal_amount(u128::from(row.quote_available), market.quote_decimals())?;
    Ok(BalanceSnapshot::new(base, quote))
}

#[async_trait]
impl BalanceSource for ApiBalances {
    /// Calls GET /rpc/user_balance?user_address={account}&market={id}.
    #[instrument(skip(self, market), fields(market_id = market.market_id))]
    async fn balance(&self, account: &str, market: &MarketDescriptor) -> Result<BalanceSnapshot> {
        let path = format!(
            "/rpc/user_balance?user_address={account}&market={}",
            market.market_id
        );
        let rows: Vec<ApiUserBalance> = self
            .client
            .get_json(&path)
            .await
            .context("Failed to fetch user balance")?;

        if rows.is_empty() {
            debug!(account, "No market account, treating balances as zero");
        }

        let snapshot = snapshot_from_raw(rows.first(), market)?;
        debug!(
            base = %snapshot.base_available,
            quote = %snapshot.quote_available,
            "Balance fetched"
        );
        Ok(snapshot)
    }
}
