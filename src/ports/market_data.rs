//! Market Data Port - Market Metadata and Order Book Interface
//!
//! The order form needs a market's unit metadata (decimals, lot and
//! tick size, minimum size) before any conversion can happen, and the
//! current book for fee and slippage estimates.

use async_trait::async_trait;

use crate::domain::book::OrderBookView;
use crate::domain::market::MarketDescriptor;

/// Trait for market data providers.
#[async_trait]
pub trait MarketDataSource: Send + Sync + 'static {
  /// Fetch the descriptor for a market.
  ///
  /// Fails if the market does not exist or the source is unreachable.
  /// Metadata sanity (lot/tick > 0, base present) is checked by the
  /// domain, not here.
  async fn market(&self, market_id: u64) -> anyhow::Result<MarketDescriptor>;

  /// Fetch up to `depth` levels per side of the market's book.
  async fn order_book(&self, market_id: u64, depth: u32) -> anyhow::Result<OrderBookView>;
}
