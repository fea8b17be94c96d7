//! Balance Port - Available Balance Interface

use async_trait::async_trait;

use crate::domain::market::MarketDescriptor;
use crate::domain::order::BalanceSnapshot;

/// Trait for account balance providers.
///
/// Implementors return decimal balances already scaled by the market's
/// coin decimals, with the time the snapshot was taken.
#[async_trait]
pub trait BalanceSource: Send + Sync + 'static {
  /// Available base and quote for `account` in `market`.
  async fn balance(
    &self,
    account: &str,
    market: &MarketDescriptor,
  ) -> anyhow::Result<BalanceSnapshot>;
}
