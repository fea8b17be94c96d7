//! Limit-order requests and pre-submission validation.
//!
//! `validate_order` turns a decimal form snapshot into a raw order
//! (lots, ticks) the on-chain book will accept, or explains why it
//! cannot. Checks run in a fixed order:
//!
//! 1. size is rounded down to a whole number of lots
//! 2. size must meet the market minimum (no balance check otherwise)
//! 3. price is rounded down to a whole number of ticks
//! 4. available balance must cover the order
//!
//! Rounding never goes up: a rounded-up size could exceed what the user
//! asked for or can afford. Every adjustment is reported back so the form
//! can show the corrected values before anything is signed.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::{OrderError, UnitError};
use super::market::{Asset, MarketDescriptor};
use super::units::{
    raw_price_per_lot, raw_to_decimal, round_to_u64, scale_exact, scale_to_raw,
    to_decimal_price,
};

/// Lowest price the on-chain book accepts, in ticks.
pub const MIN_PRICE_TICKS: u64 = 1;

/// Highest price the on-chain book accepts, in ticks (`u32::MAX`).
pub const MAX_PRICE_TICKS: u64 = 4_294_967_295;

/// Order side as chosen in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// On-chain books call buys bids and sells asks.
    pub fn is_ask(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "bid" => Ok(Self::Buy),
            "sell" | "ask" => Ok(Self::Sell),
            other => Err(format!("unknown order side: {other}")),
        }
    }
}

/// Fill restriction applied by the matching engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Restriction {
    #[default]
    NoRestriction,
    FillOrAbort,
    ImmediateOrCancel,
    PostOrAbort,
}

impl Restriction {
    /// Discriminant used by the on-chain entry function.
    pub fn code(self) -> u8 {
        match self {
            Self::NoRestriction => 0,
            Self::FillOrAbort => 1,
            Self::ImmediateOrCancel => 2,
            Self::PostOrAbort => 3,
        }
    }
}

/// What the matching engine does when an order would fill against the
/// same account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelfMatchBehavior {
    #[default]
    Abort,
    CancelBoth,
    CancelMaker,
    CancelTaker,
}

impl SelfMatchBehavior {
    pub fn code(self) -> u8 {
        match self {
            Self::Abort => 0,
            Self::CancelBoth => 1,
            Self::CancelMaker => 2,
            Self::CancelTaker => 3,
        }
    }
}

/// Fully materialized form values at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: Side,
    /// Quote per whole base unit.
    pub price: Decimal,
    /// Base units.
    pub size: Decimal,
}

impl OrderRequest {
    pub fn new(side: Side, price: Decimal, size: Decimal) -> Self {
        Self { side, price, size }
    }

    /// Builds a request from raw form strings.
    pub fn parse(side: Side, price: &str, size: &str) -> Result<Self, UnitError> {
        Ok(Self {
            side,
            price: super::units::parse_decimal(price)?,
            size: super::units::parse_decimal(size)?,
        })
    }
}

/// Order in on-chain units, ready for payload construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOrder {
    pub side: Side,
    /// Size in lots.
    pub lots: u64,
    /// Price in ticks.
    pub ticks: u64,
}

impl RawOrder {
    /// Size in base sub-units, always a multiple of the lot size.
    pub fn raw_size(&self, market: &MarketDescriptor) -> Result<u128, OrderError> {
        Ok(u128::from(self.lots)
            .checked_mul(u128::from(market.lot_size))
            .ok_or(UnitError::Overflow("raw size"))?)
    }

    /// Price in quote sub-units per lot, always a multiple of the tick size.
    pub fn raw_price(&self, market: &MarketDescriptor) -> Result<u128, OrderError> {
        Ok(u128::from(self.ticks)
            .checked_mul(u128::from(market.tick_size))
            .ok_or(UnitError::Overflow("raw price"))?)
    }

    /// Quote sub-units locked by a bid of this size and price.
    pub fn quote_required(&self, market: &MarketDescriptor) -> Result<u128, OrderError> {
        Ok(self
            .raw_price(market)?
            .checked_mul(u128::from(self.lots))
            .ok_or(UnitError::Overflow("quote required"))?)
    }
}

/// Available balances at query time. Not synchronized with in-flight orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub base_available: Decimal,
    pub quote_available: Decimal,
    pub as_of: DateTime<Utc>,
}

impl BalanceSnapshot {
    pub fn new(base_available: Decimal, quote_available: Decimal) -> Self {
        Self {
            base_available,
            quote_available,
            as_of: Utc::now(),
        }
    }

    pub fn available(&self, asset: Asset) -> Decimal {
        match asset {
            Asset::Base => self.base_available,
            Asset::Quote => self.quote_available,
        }
    }
}

/// A correction applied to the request. The order still proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    /// Size was not a lot multiple (values in base sub-units, the
    /// requested one unrounded).
    SizeRounded {
        requested: Decimal,
        adjusted: u128,
        /// Adjusted size in base units, for the form field.
        display: Decimal,
    },
    /// Price was not a tick multiple (values in quote sub-units per lot).
    PriceRounded {
        requested: Decimal,
        adjusted: u128,
        /// Adjusted price in quote per base, for the form field.
        display: Decimal,
    },
}

impl std::fmt::Display for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeRounded { display, .. } => write!(f, "size rounded down to {display}"),
            Self::PriceRounded { display, .. } => write!(f, "price rounded down to {display}"),
        }
    }
}

/// Why an order cannot be submitted. Shown inline on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum OrderRejection {
    #[error("size must be positive, got {0}")]
    NonPositiveSize(Decimal),

    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("size {0} is too large for the market")]
    SizeTooLarge(Decimal),

    /// Sizes in base sub-units.
    #[error("size too small: {size} below minimum {min_size}")]
    SizeTooSmall { size: u128, min_size: u128 },

    #[error("price {0} is outside the tradeable range")]
    PriceOutOfRange(Decimal),

    /// Amounts in sub-units of `asset`.
    #[error("insufficient {asset} balance: {required} required, {available} available")]
    InsufficientBalance {
        asset: Asset,
        required: u128,
        available: u128,
    },
}

/// A raw order plus every adjustment made to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedOrder {
    pub order: RawOrder,
    pub adjustments: Vec<Adjustment>,
}

/// Outcome of [`validate_order`] for well-formed markets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCheck {
    Ready(ValidatedOrder),
    Rejected(OrderRejection),
}

impl OrderCheck {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn validated(&self) -> Option<&ValidatedOrder> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&OrderRejection> {
        match self {
            Self::Ready(_) => None,
            Self::Rejected(r) => Some(r),
        }
    }
}

/// Validates a limit order against market constraints and balances.
///
/// Expected conditions come back as `Ok(OrderCheck::Rejected(..))`.
///
/// # Errors
/// Only contract violations: invalid market metadata, or a balance
/// snapshot that cannot be scaled to sub-units.
pub fn validate_order(
    request: &OrderRequest,
    market: &MarketDescriptor,
    balance: &BalanceSnapshot,
) -> Result<OrderCheck, OrderError> {
    market.validate()?;
    let base_decimals = market.base_decimals()?;

    if request.size <= Decimal::ZERO {
        return Ok(OrderCheck::Rejected(OrderRejection::NonPositiveSize(request.size)));
    }
    if request.price <= Decimal::ZERO {
        return Ok(OrderCheck::Rejected(OrderRejection::NonPositivePrice(request.price)));
    }

    let mut adjustments = Vec::new();

    // Unrounded: a fractional sub-unit must floor with the lot, never round up.
    let requested_size = match scale_exact(request.size, base_decimals) {
        Ok(raw) => raw,
        Err(UnitError::Overflow(_)) => {
            return Ok(OrderCheck::Rejected(OrderRejection::SizeTooLarge(request.size)));
        }
        Err(e) => return Err(e.into()),
    };
    let Some(whole_size) = requested_size.trunc().to_u128() else {
        return Ok(OrderCheck::Rejected(OrderRejection::SizeTooLarge(request.size)));
    };
    let lot = u128::from(market.lot_size);
    let raw_size = whole_size - whole_size % lot;
    if raw_to_decimal(raw_size, 0)? != requested_size {
        adjustments.push(Adjustment::SizeRounded {
            requested: requested_size,
            adjusted: raw_size,
            display: raw_to_decimal(raw_size, base_decimals)?,
        });
    }

    let min_size = u128::from(market.min_size);
    if raw_size == 0 || raw_size < min_size {
        return Ok(OrderCheck::Rejected(OrderRejection::SizeTooSmall {
            size: raw_size,
            min_size,
        }));
    }
    let Ok(lots) = u64::try_from(raw_size / lot) else {
        return Ok(OrderCheck::Rejected(OrderRejection::SizeTooLarge(request.size)));
    };

    let requested_price = match raw_price_per_lot(request.price, market) {
        Ok(p) => p,
        Err(OrderError::Unit(UnitError::Overflow(_))) => {
            return Ok(OrderCheck::Rejected(OrderRejection::PriceOutOfRange(request.price)));
        }
        Err(e) => return Err(e),
    };
    let tick = Decimal::from(market.tick_size);
    let mut floor_ticks = requested_price
        .checked_div(tick)
        .ok_or(UnitError::Overflow("price in ticks"))?
        .trunc();
    if floor_ticks > Decimal::from(MAX_PRICE_TICKS) {
        return Ok(OrderCheck::Rejected(OrderRejection::PriceOutOfRange(request.price)));
    }
    // The division rounds at 28 digits and can land on the next tick up.
    if floor_ticks * tick > requested_price {
        floor_ticks -= Decimal::ONE;
    }
    let ticks = round_to_u64(floor_ticks, RoundingStrategy::ToZero, "price in ticks")?;
    if ticks < MIN_PRICE_TICKS {
        return Ok(OrderCheck::Rejected(OrderRejection::PriceOutOfRange(request.price)));
    }

    let order = RawOrder {
        side: request.side,
        lots,
        ticks,
    };
    let raw_price = order.raw_price(market)?;
    if raw_to_decimal(raw_price, 0)? != requested_price {
        adjustments.push(Adjustment::PriceRounded {
            requested: requested_price,
            adjusted: raw_price,
            display: to_decimal_price(ticks, market)?,
        });
    }

    let (asset, required) = match request.side {
        Side::Buy => (Asset::Quote, order.quote_required(market)?),
        Side::Sell => (Asset::Base, raw_size),
    };
    // Floor so a balance with sub-unit dust never overstates funds.
    let available = scale_to_raw(
        balance.available(asset),
        market.decimals_of(asset)?,
        RoundingStrategy::ToZero,
    )?;
    if required > available {
        return Ok(OrderCheck::Rejected(OrderRejection::InsufficientBalance {
            asset,
            required,
            available,
        }));
    }

    Ok(OrderCheck::Ready(ValidatedOrder { order, adjustments }))
}
