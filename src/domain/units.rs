//! Conversion between raw on-chain integers and human decimal values.
//!
//! On-chain, every quantity is an unsigned integer:
//! - coin amounts in sub-units (`value × 10^decimals`)
//! - order sizes in lots (`lot_size` base sub-units each)
//! - order prices in ticks (`tick_size` quote sub-units per lot each)
//!
//! Prices are always quoted as quote-per-one-whole-base, so converting a
//! tick count to a display price rescales by the decimals difference and
//! the lot size:
//!
//!   price = ticks × tick_size × 10^base_decimals / (lot_size × 10^quote_decimals)
//!
//! All arithmetic is exact `Decimal` / checked `u128`. Floating point never
//! enters this module.

use rust_decimal::prelude::*;

use super::error::{MAX_DECIMALS, OrderError, UnitError};
use super::market::MarketDescriptor;

/// Parses user input into an exact decimal.
///
/// # Errors
/// `InvalidNumber` for empty input, exponents, or anything that would need
/// rounding to fit 28 significant digits.
pub fn parse_decimal(input: &str) -> Result<Decimal, UnitError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UnitError::InvalidNumber(input.to_string()));
    }
    Decimal::from_str_exact(trimmed).map_err(|_| UnitError::InvalidNumber(input.to_string()))
}

/// `round(value × 10^decimals)`, half away from zero.
///
/// # Errors
/// Negative values, `decimals > 28`, or results that overflow `u128`.
pub fn to_raw_amount(value: Decimal, decimals: u32) -> Result<u128, UnitError> {
    scale_to_raw(value, decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Exact inverse of [`to_raw_amount`]: `raw / 10^decimals`.
pub fn to_decimal_amount(raw: u128, decimals: u32) -> Result<Decimal, UnitError> {
    check_decimals(decimals)?;
    raw_to_decimal(raw, decimals)
}

/// Converts a tick-denominated price into quote per whole base unit.
pub fn to_decimal_price(ticks: u64, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    market.validate()?;
    let base_decimals = market.base_decimals()?;

    let per_lot = u128::from(ticks)
        .checked_mul(u128::from(market.tick_size))
        .ok_or(UnitError::Overflow("quote per lot"))?;

    let numerator = raw_to_decimal(per_lot, 0)?
        .checked_mul(pow10(base_decimals)?)
        .ok_or(UnitError::Overflow("decimal price"))?;
    let denominator = Decimal::from(market.lot_size)
        .checked_mul(pow10(market.quote_decimals())?)
        .ok_or(UnitError::Overflow("decimal price"))?;

    Ok(numerator
        .checked_div(denominator)
        .ok_or(UnitError::Overflow("decimal price"))?)
}

/// Converts a decimal price into ticks, rounded to the nearest valid tick.
///
/// For every tick count `p`, `from_decimal_price(to_decimal_price(p)) == p`.
pub fn from_decimal_price(price: Decimal, market: &MarketDescriptor) -> Result<u64, OrderError> {
    let ticks = exact_ticks(price, market)?;
    round_to_u64(ticks, RoundingStrategy::MidpointAwayFromZero, "price in ticks")
}

/// Converts a lot count into a decimal base amount.
pub fn to_decimal_size(lots: u64, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    market.validate()?;
    let raw = u128::from(lots)
        .checked_mul(u128::from(market.lot_size))
        .ok_or(UnitError::Overflow("raw size"))?;
    Ok(raw_to_decimal(raw, market.base_decimals()?)?)
}

/// Converts a decimal base amount into lots, rounded to the nearest lot.
pub fn from_decimal_size(size: Decimal, market: &MarketDescriptor) -> Result<u64, OrderError> {
    let lots = exact_lots(size, market)?;
    round_to_u64(lots, RoundingStrategy::MidpointAwayFromZero, "size in lots")
}

/// Converts an aggregate tick count (e.g. quote volume) into quote units.
pub fn to_decimal_quote(ticks: u128, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    market.validate()?;
    let raw = ticks
        .checked_mul(u128::from(market.tick_size))
        .ok_or(UnitError::Overflow("raw quote"))?;
    Ok(raw_to_decimal(raw, market.quote_decimals())?)
}

/// Price expressed in quote sub-units per lot, before any tick rounding.
pub(crate) fn raw_price_per_lot(price: Decimal, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    market.validate()?;
    if price < Decimal::ZERO {
        return Err(UnitError::NegativeAmount(price).into());
    }

    let scaled = price
        .checked_mul(pow10(market.quote_decimals())?)
        .and_then(|v| v.checked_mul(Decimal::from(market.lot_size)))
        .ok_or(UnitError::Overflow("raw price"))?;

    Ok(scaled
        .checked_div(pow10(market.base_decimals()?)?)
        .ok_or(UnitError::Overflow("raw price"))?)
}

/// Unrounded tick count for a decimal price.
pub(crate) fn exact_ticks(price: Decimal, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    let per_lot = raw_price_per_lot(price, market)?;
    Ok(per_lot
        .checked_div(Decimal::from(market.tick_size))
        .ok_or(UnitError::Overflow("price in ticks"))?)
}

/// Unrounded lot count for a decimal size.
pub(crate) fn exact_lots(size: Decimal, market: &MarketDescriptor) -> Result<Decimal, OrderError> {
    market.validate()?;
    if size < Decimal::ZERO {
        return Err(UnitError::NegativeAmount(size).into());
    }
    let raw = size
        .checked_mul(pow10(market.base_decimals()?)?)
        .ok_or(UnitError::Overflow("raw size"))?;
    Ok(raw
        .checked_div(Decimal::from(market.lot_size))
        .ok_or(UnitError::Overflow("size in lots"))?)
}

/// `value × 10^decimals` with no rounding. May carry a fractional sub-unit.
pub(crate) fn scale_exact(value: Decimal, decimals: u32) -> Result<Decimal, UnitError> {
    if value < Decimal::ZERO {
        return Err(UnitError::NegativeAmount(value));
    }
    value
        .checked_mul(pow10(decimals)?)
        .ok_or(UnitError::Overflow("raw amount"))
}

/// Like [`to_raw_amount`] with an explicit rounding strategy.
pub(crate) fn scale_to_raw(
    value: Decimal,
    decimals: u32,
    strategy: RoundingStrategy,
) -> Result<u128, UnitError> {
    scale_exact(value, decimals)?
        .round_dp_with_strategy(0, strategy)
        .to_u128()
        .ok_or(UnitError::Overflow("raw amount"))
}

pub(crate) fn round_to_u64(
    value: Decimal,
    strategy: RoundingStrategy,
    what: &'static str,
) -> Result<u64, OrderError> {
    Ok(value
        .round_dp_with_strategy(0, strategy)
        .to_u64()
        .ok_or(UnitError::Overflow(what))?)
}

pub(crate) fn raw_to_decimal(raw: u128, scale: u32) -> Result<Decimal, UnitError> {
    let raw = i128::try_from(raw).map_err(|_| UnitError::Overflow("decimal amount"))?;
    Decimal::try_from_i128_with_scale(raw, scale).map_err(|_| UnitError::Overflow("decimal amount"))
}

fn pow10(decimals: u32) -> Result<Decimal, UnitError> {
    check_decimals(decimals)?;
    raw_to_decimal(10_u128.pow(decimals), 0)
}

fn check_decimals(decimals: u32) -> Result<(), UnitError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitError::DecimalsOutOfRange { decimals });
    }
    Ok(())
}
