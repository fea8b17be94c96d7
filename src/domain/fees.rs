//! Taker fee estimation for limit orders.
//!
//! The matching engine charges `notional / taker_fee_divisor` to the
//! taker side only. A limit order is a taker when it crosses the book:
//! a buy priced at or above the best ask, or a sell at or below the best
//! bid. It then fills at the resting price, so the estimate uses the best
//! opposite price rather than the limit price. Resting orders pay nothing.

use rust_decimal::Decimal;

use super::book::OrderBookView;
use super::error::{OrderError, UnitError};
use super::market::MarketDescriptor;
use super::order::{OrderRequest, Side};
use super::units::to_decimal_price;

/// Divisor applied when the on-chain value cannot be read (5 bps).
pub const DEFAULT_TAKER_FEE_DIVISOR: u64 = 2000;

/// Fee calculator for the on-chain taker fee.
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    /// Notional is divided by this to get the fee.
    taker_fee_divisor: Decimal,
}

impl FeeCalculator {
    /// Creates a calculator for the given taker fee divisor.
    ///
    /// # Panics
    /// Panics if `taker_fee_divisor` is zero.
    pub fn new(taker_fee_divisor: u64) -> Self {
        assert!(taker_fee_divisor > 0, "taker fee divisor must be positive");
        Self {
            taker_fee_divisor: Decimal::from(taker_fee_divisor),
        }
    }

    pub fn taker_fee_divisor(&self) -> Decimal {
        self.taker_fee_divisor
    }

    /// Fee charged to a taker on `notional` quote.
    pub fn taker_fee(&self, notional: Decimal) -> Decimal {
        notional / self.taker_fee_divisor
    }

    /// Taker fee rate in basis points.
    pub fn taker_fee_bps(&self) -> Decimal {
        Decimal::from(10_000) / self.taker_fee_divisor
    }

    /// Estimated fee for a limit order against the current top of book.
    ///
    /// Returns `Ok(None)` when either side of the book is empty, since
    /// crossing cannot be decided. The fee is rounded to base decimals.
    pub fn estimate_limit_fee(
        &self,
        request: &OrderRequest,
        book: &OrderBookView,
        market: &MarketDescriptor,
    ) -> Result<Option<Decimal>, OrderError> {
        let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) else {
            return Ok(None);
        };

        let fill_price = match request.side {
            Side::Buy => {
                let ask_price = to_decimal_price(ask.price, market)?;
                (request.price >= ask_price).then_some(ask_price)
            }
            Side::Sell => {
                let bid_price = to_decimal_price(bid.price, market)?;
                (request.price <= bid_price).then_some(bid_price)
            }
        };

        let Some(fill_price) = fill_price else {
            return Ok(Some(Decimal::ZERO));
        };

        let notional = fill_price
            .checked_mul(request.size)
            .ok_or(UnitError::Overflow("fee notional"))?;
        let fee = self.taker_fee(notional);
        Ok(Some(fee.round_dp(market.base_decimals()?)))
    }
}

impl Default for FeeCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_TAKER_FEE_DIVISOR)
    }
}
