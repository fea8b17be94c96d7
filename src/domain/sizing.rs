//! Display precision and balance-based sizing for the order form.
//!
//! Display places follow the market granularity: a market whose lot is
//! 0.001 base shows sizes to 3 places, and prices to as many places as
//! one tick is worth. These counts are the only place floating point is
//! used, and only for choosing how many digits to show.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::error::{OrderError, UnitError};
use super::market::MarketDescriptor;
use super::order::{BalanceSnapshot, Side};

/// Decimal places needed to show one lot: `log10(10^base_decimals / lot_size)`.
pub fn base_display_places(market: &MarketDescriptor) -> Result<u32, OrderError> {
    market.validate()?;
    let base_decimals = f64::from(market.base_decimals()?);
    Ok(places(base_decimals - (market.lot_size as f64).log10()))
}

/// Decimal places needed to show one tick of price.
pub fn quote_display_places(market: &MarketDescriptor) -> Result<u32, OrderError> {
    market.validate()?;
    let base_decimals = f64::from(market.base_decimals()?);
    let quote_decimals = f64::from(market.quote_decimals());
    Ok(places(
        quote_decimals + (market.lot_size as f64).log10()
            - (market.tick_size as f64).log10()
            - base_decimals,
    ))
}

/// Largest size the balance supports at `price`.
///
/// Buys are bounded by quote over price, sells by the base balance.
/// `Ok(None)` for a buy at a non-positive price.
///
/// # Errors
/// `Overflow` when quote over price does not fit a `Decimal`.
pub fn max_order_size(
    side: Side,
    balance: &BalanceSnapshot,
    price: Decimal,
) -> Result<Option<Decimal>, UnitError> {
    match side {
        Side::Buy => {
            if price <= Decimal::ZERO {
                return Ok(None);
            }
            balance
                .quote_available
                .checked_div(price)
                .map(Some)
                .ok_or(UnitError::Overflow("max order size"))
        }
        Side::Sell => Ok(Some(balance.base_available)),
    }
}

/// `percent`% of [`max_order_size`], truncated to the base display places.
///
/// `percent` is clamped to `[0, 100]`. Truncation keeps the result within
/// the balance.
pub fn size_for_percent(
    side: Side,
    balance: &BalanceSnapshot,
    price: Decimal,
    percent: Decimal,
    market: &MarketDescriptor,
) -> Result<Decimal, OrderError> {
    let places = base_display_places(market)?;
    let Some(max) = max_order_size(side, balance, price)? else {
        return Ok(Decimal::ZERO);
    };
    let percent = percent.clamp(Decimal::ZERO, dec!(100));
    // Divide first: max × 100 can exceed the Decimal range.
    let size = max
        .checked_div(dec!(100))
        .and_then(|v| v.checked_mul(percent))
        .ok_or(UnitError::Overflow("percent size"))?;
    Ok(size
        .round_dp_with_strategy(places, RoundingStrategy::ToZero)
        .normalize())
}

/// Order value `price × size`, rounded to the quote display places.
pub fn order_total(price: Decimal, size: Decimal, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    let places = quote_display_places(market)?;
    let total = price
        .checked_mul(size)
        .ok_or(UnitError::Overflow("order total"))?;
    Ok(total
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .normalize())
}

fn places(value: f64) -> u32 {
    let rounded = value.round();
    if rounded <= 0.0 { 0 } else { rounded as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::fixtures::{apt, apt_usdc, usdc};

    fn fine_market() -> MarketDescriptor {
        MarketDescriptor::new(3, apt(), usdc(), 100_000, 1, 500)
    }

    #[test]
    fn test_display_places() {
        assert_eq!(base_display_places(&fine_market()).unwrap(), 3);
        assert_eq!(quote_display_places(&fine_market()).unwrap(), 3);
        assert_eq!(base_display_places(&apt_usdc()).unwrap(), 5);
        // One tick is 10 USDC here, so no fractional digits.
        assert_eq!(quote_display_places(&apt_usdc()).unwrap(), 0);
    }

    #[test]
    fn test_max_order_size() {
        let balance = BalanceSnapshot::new(dec!(3), dec!(100));
        assert_eq!(max_order_size(Side::Buy, &balance, dec!(8)), Ok(Some(dec!(12.5))));
        assert_eq!(max_order_size(Side::Sell, &balance, dec!(8)), Ok(Some(dec!(3))));
        assert_eq!(max_order_size(Side::Buy, &balance, dec!(0)), Ok(None));
    }

    #[test]
    fn test_max_order_size_overflow_is_an_error() {
        let balance = BalanceSnapshot::new(dec!(0), Decimal::MAX);
        assert_eq!(
            max_order_size(Side::Buy, &balance, dec!(0.5)),
            Err(UnitError::Overflow("max order size"))
        );
    }

    #[test]
    fn test_size_for_percent_at_tiny_price_does_not_panic() {
        // 1e6 / 1e-22 = 1e28, close to the Decimal limit.
        let balance = BalanceSnapshot::new(dec!(0), dec!(1000000));
        let price = Decimal::new(1, 22);
        let size = size_for_percent(Side::Buy, &balance, price, dec!(50), &fine_market()).unwrap();
        assert_eq!(size, dec!(5000000000000000000000000000));

        let balance = BalanceSnapshot::new(dec!(0), dec!(10000000));
        let err = size_for_percent(Side::Buy, &balance, price, dec!(50), &fine_market()).unwrap_err();
        assert_eq!(err, OrderError::Unit(UnitError::Overflow("max order size")));
    }

    #[test]
    fn test_size_for_percent_truncates() {
        let balance = BalanceSnapshot::new(dec!(2), dec!(100));
        // 100 / 3 = 33.333..; half of that truncated to 3 places.
        let size = size_for_percent(Side::Buy, &balance, dec!(3), dec!(50), &fine_market()).unwrap();
        assert_eq!(size, dec!(16.666));

        let size = size_for_percent(Side::Sell, &balance, dec!(3), dec!(25), &fine_market()).unwrap();
        assert_eq!(size, dec!(0.5));
    }

    #[test]
    fn test_size_for_percent_clamps() {
        let balance = BalanceSnapshot::new(dec!(2), dec!(0));
        let size = size_for_percent(Side::Sell, &balance, dec!(1), dec!(150), &fine_market()).unwrap();
        assert_eq!(size, dec!(2));
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(dec!(8.5), dec!(1.2345), &fine_market()).unwrap(), dec!(10.493));
        assert_eq!(order_total(dec!(10), dec!(0.00001), &apt_usdc()).unwrap(), dec!(0));
    }

    #[test]
    fn test_order_total_overflow_is_an_error() {
        let huge = dec!(100000000000000000000);
        assert_eq!(
            order_total(huge, huge, &fine_market()),
            Err(OrderError::Unit(UnitError::Overflow("order total")))
        );
    }
}
