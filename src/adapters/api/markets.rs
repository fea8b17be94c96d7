//! Market Data Adapter - Market Metadata and Order Book Queries
//!
//! Fetches a market registration and order-book snapshots from the
//! REST API and converts them into domain types.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::types::{ApiMarket, ApiOrderBook};
use crate::domain::book::OrderBookView;
use crate::domain::market::MarketDescriptor;
use crate::ports::market_data::MarketDataSource;

/// Market data adapter that wraps the REST client.
pub struct ApiMarketData {
    client: Arc<ApiClient>,
}

impl ApiMarketData {
    /// Create a new market data adapter.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarketDataSource for ApiMarketData {
    /// Calls GET /markets?market_id=eq.{id}, which returns zero or one row.
    #[instrument(skip(self))]
    async fn market(&self, market_id: u64) -> Result<MarketDescriptor> {
        let path = format!("/markets?market_id=eq.{market_id}");
        let rows: Vec<ApiMarket> = self
            .client
            .get_json(&path)
            .await
            .context("Failed to fetch market")?;

        let market = rows
            .first()
            .with_context(|| format!("Market {market_id} not found"))?;

        debug!(market_id, name = %market.name, "Market fetched");
        Ok(MarketDescriptor::from(market))
    }

    #[instrument(skip(self))]
    async fn order_book(&self, market_id: u64, depth: u32) -> Result<OrderBookView> {
        let path = format!("/rpc/orderbook?market_id={market_id}&depth={depth}");
        let book: ApiOrderBook = self
            .client
            .get_json(&path)
            .await
            .context("Failed to fetch order book")?;

        debug!(
            market_id,
            bids = book.bids.len(),
            asks = book.asks.len(),
            "Order book fetched"
        );

        Ok(book.into())
    }
}
