//! Order-book view in on-chain units.
//!
//! Levels are kept as ticks/lots exactly as the market-data API reports
//! them; display conversion happens at the edge via `units`. Used for
//! top-of-book fee estimation and pre-trade fill/slippage estimates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::order::Side;

/// One aggregated price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price in ticks.
    pub price: u64,
    /// Resting size in lots.
    pub size: u64,
}

impl PriceLevel {
    pub fn new(price: u64, size: u64) -> Self {
        Self { price, size }
    }
}

/// Snapshot of both sides of a market's book.
///
/// Bids are kept sorted by price descending, asks ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookView {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// Expected outcome of sweeping the book with a given size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillEstimate {
    pub filled_lots: u64,
    /// Size the visible book cannot absorb.
    pub unfilled_lots: u64,
    /// Size-weighted average fill price, in ticks.
    pub average_price: Decimal,
    /// Deepest level touched, in ticks.
    pub worst_price: u64,
    /// Distance of the average fill from the best level, in basis points.
    pub slippage_bps: Decimal,
}

impl OrderBookView {
    /// Builds a view, sorting each side best-first and dropping empty levels.
    pub fn new(mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.retain(|l| l.size > 0);
        asks.retain(|l| l.size > 0);
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self { bids, asks }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Mid price in ticks when both sides are present.
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((Decimal::from(bid.price) + Decimal::from(ask.price)) / Decimal::TWO)
    }

    /// Best ask minus best bid, in ticks. Zero for a crossed book.
    pub fn spread_ticks(&self) -> Option<u64> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some(ask.price.saturating_sub(bid.price))
    }

    /// Spread relative to mid, in basis points.
    pub fn spread_bps(&self) -> Option<Decimal> {
        let spread = Decimal::from(self.spread_ticks()?);
        let mid = self.mid_price()?;
        if mid.is_zero() {
            return None;
        }
        Some(spread / mid * dec!(10000))
    }

    /// Levels a taker on `side` would fill against.
    pub fn opposite(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    /// Walks the opposite side to estimate a taker fill of `lots`.
    ///
    /// Returns `None` when `lots` is zero or the opposite side is empty.
    pub fn estimate_fill(&self, side: Side, lots: u64) -> Option<FillEstimate> {
        sweep(self.opposite(side), lots)
    }

    /// Like [`Self::estimate_fill`], but only through levels a limit order
    /// at `limit` ticks would cross. `None` when nothing crosses.
    pub fn estimate_limit_fill(&self, side: Side, lots: u64, limit: u64) -> Option<FillEstimate> {
        let levels = self.opposite(side);
        let crossing = levels
            .iter()
            .take_while(|l| match side {
                Side::Buy => l.price <= limit,
                Side::Sell => l.price >= limit,
            })
            .count();
        sweep(&levels[..crossing], lots)
    }
}

fn sweep(levels: &[PriceLevel], lots: u64) -> Option<FillEstimate> {
    let best = levels.first()?;
    if lots == 0 {
        return None;
    }

    let mut remaining = lots;
    let mut filled = 0_u64;
    let mut cost = Decimal::ZERO;
    let mut worst = best.price;

    for level in levels {
        let fill = remaining.min(level.size);
        cost += Decimal::from(fill) * Decimal::from(level.price);
        filled += fill;
        remaining -= fill;
        worst = level.price;
        if remaining == 0 {
            break;
        }
    }

    let average_price = cost / Decimal::from(filled);
    let best_price = Decimal::from(best.price);
    let slippage_bps = if best_price.is_zero() {
        Decimal::ZERO
    } else {
        ((average_price - best_price) / best_price).abs() * dec!(10000)
    };

    Some(FillEstimate {
        filled_lots: filled,
        unfilled_lots: remaining,
        average_price,
        worst_price: worst,
        slippage_bps,
    })
}
