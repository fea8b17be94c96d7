//! Order Entry - Limit Order Preparation
//!
//! Runs once per submit:
//! - Fetch the market descriptor
//! - Fetch balances and the order book concurrently
//! - Validate (adjust or reject) against market constraints and balances
//! - Estimate taker fee and fill against the book
//! - Build the entry-function payload for the wallet

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::domain::book::FillEstimate;
use crate::domain::fees::FeeCalculator;
use crate::domain::market::MarketDescriptor;
use crate::domain::order::{OrderCheck, OrderRequest, Side, validate_order};
use crate::domain::sizing;
use crate::domain::units::{to_decimal_price, to_decimal_size};
use crate::ports::balance::BalanceSource;
use crate::ports::market_data::MarketDataSource;
use crate::ports::payload::{EntryFunctionPayload, PayloadBuilder};

/// Everything the form shows before the wallet prompt.
#[derive(Debug, Clone, Serialize)]
pub struct OrderTicket {
  pub market_id: u64,
  pub request: OrderRequest,
  /// Ready (with adjustments) or rejected.
  pub check: OrderCheck,
  /// Adjusted price × size in quote, `None` for rejected orders.
  pub total: Option<Decimal>,
  /// Taker fee in quote, `None` when the book is one-sided or the order was rejected.
  pub estimated_fee: Option<Decimal>,
  /// Immediate fill against the book at the limit price, if any.
  pub fill: Option<FillEstimate>,
  /// Present only for ready orders.
  pub payload: Option<EntryFunctionPayload>,
}

/// Prepares limit orders against live market data.
pub struct OrderEntry<M: MarketDataSource, B: BalanceSource, P: PayloadBuilder> {
  /// Market data port.
  market_data: Arc<M>,
  /// Balance port.
  balances: Arc<B>,
  /// Payload builder port.
  payloads: Arc<P>,
  /// Taker fee model.
  fees: FeeCalculator,
  /// Book levels fetched per side.
  orderbook_depth: u32,
  /// Fill slippage above this is logged.
  max_slippage_bps: Decimal,
}

impl<M: MarketDataSource, B: BalanceSource, P: PayloadBuilder> OrderEntry<M, B, P> {
  /// Create a new order entry use case.
  pub fn new(market_data: Arc<M>, balances: Arc<B>, payloads: Arc<P>, config: &AppConfig) -> Self {
    Self {
      market_data,
      balances,
      payloads,
      fees: FeeCalculator::new(config.trading.taker_fee_divisor),
      orderbook_depth: config.api.orderbook_depth,
      max_slippage_bps: Decimal::from(config.trading.max_slippage_bps),
    }
  }

  /// Validate `request` for `account` on `market_id` and build its payload.
  ///
  /// Rejections are part of the returned ticket; errors are reserved for
  /// unreachable data sources and malformed market metadata.
  #[instrument(skip(self, request), fields(side = %request.side, price = %request.price, size = %request.size))]
  pub async fn prepare(
    &self,
    market_id: u64,
    account: &str,
    request: &OrderRequest,
  ) -> Result<OrderTicket> {
    let market = self.load_market(market_id).await?;

    let (balance, book) = tokio::try_join!(
      self.balances.balance(account, &market),
      self.market_data.order_book(market_id, self.orderbook_depth),
    )
    .context("Failed to fetch order snapshot")?;

    debug!(
      base = %balance.base_available,
      quote = %balance.quote_available,
      bids = book.bids.len(),
      asks = book.asks.len(),
      "Snapshot loaded"
    );

    let check = validate_order(request, &market, &balance)?;

    let Some(validated) = check.validated().cloned() else {
      if let Some(reason) = check.rejection() {
        warn!(reason = %reason, "Order rejected");
      }
      return Ok(OrderTicket {
        market_id,
        request: request.clone(),
        check,
        total: None,
        estimated_fee: None,
        fill: None,
        payload: None,
      });
    };

    for adjustment in &validated.adjustments {
      info!(adjustment = %adjustment, "Order adjusted");
    }

    let order = &validated.order;
    let adjusted = OrderRequest::new(
      order.side,
      to_decimal_price(order.ticks, &market)?,
      to_decimal_size(order.lots, &market)?,
    );

    let total = sizing::order_total(adjusted.price, adjusted.size, &market)?;
    let estimated_fee = self.fees.estimate_limit_fee(&adjusted, &book, &market)?;
    let fill = book.estimate_limit_fill(order.side, order.lots, order.ticks);
    if let Some(fill) = &fill {
      if fill.slippage_bps > self.max_slippage_bps {
        warn!(
          slippage_bps = %fill.slippage_bps,
          max_bps = %self.max_slippage_bps,
          "Estimated slippage above threshold"
        );
      }
    }

    let payload = self
      .payloads
      .build(&market, order)
      .context("Failed to build order payload")?;

    info!(
      lots = order.lots,
      ticks = order.ticks,
      total = %total,
      fee = ?estimated_fee,
      crosses = fill.is_some(),
      "Order ready"
    );

    Ok(OrderTicket {
      market_id,
      request: request.clone(),
      check,
      total: Some(total),
      estimated_fee,
      fill,
      payload: Some(payload),
    })
  }

  /// Size for the percentage slider: `percent`% of what the account can
  /// afford at `price` (buy) or holds (sell).
  #[instrument(skip(self))]
  pub async fn size_for_percent(
    &self,
    market_id: u64,
    account: &str,
    side: Side,
    price: Decimal,
    percent: Decimal,
  ) -> Result<Decimal> {
    let market = self.load_market(market_id).await?;
    let balance = self.balances.balance(account, &market).await?;
    let size = sizing::size_for_percent(side, &balance, price, percent, &market)?;
    debug!(size = %size, "Slider size computed");
    Ok(size)
  }

  async fn load_market(&self, market_id: u64) -> Result<MarketDescriptor> {
    let market = self
      .market_data
      .market(market_id)
      .await
      .with_context(|| format!("Failed to load market {market_id}"))?;
    market.validate()?;
    Ok(market)
  }
}
