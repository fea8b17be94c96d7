//! Market descriptors and coin metadata.
//!
//! A market is an immutable snapshot supplied by the market-data source:
//! coin decimals plus the lot/tick granularity the on-chain order book
//! enforces. Every conversion that takes a market checks it first, so a
//! malformed descriptor fails loudly as `InvalidMarketMetadata` instead
//! of producing a silently wrong price.

use serde::{Deserialize, Serialize};

use super::error::{MAX_DECIMALS, OrderError};

/// Fully qualified Move struct type, `address::module::Struct`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    pub address: String,
    pub module: String,
    pub name: String,
}

impl TypeTag {
    pub fn new(address: impl Into<String>, module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            module: module.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)
    }
}

/// Coin metadata needed to scale raw amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    /// Ticker shown in the UI (e.g. "APT").
    pub symbol: String,
    /// Number of decimal places of the smallest on-chain unit.
    pub decimals: u32,
    /// On-chain type of the coin.
    pub type_tag: TypeTag,
}

impl CoinInfo {
    pub fn new(symbol: impl Into<String>, decimals: u32, type_tag: TypeTag) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            type_tag,
        }
    }
}

/// Which side of the pair an amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Base,
    Quote,
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Quote => write!(f, "quote"),
        }
    }
}

/// Market snapshot as published by the market-data source.
///
/// - `lot_size`: base sub-units per lot.
/// - `tick_size`: quote sub-units per lot, per tick of price.
/// - `min_size`: smallest order, in base sub-units.
///
/// `base` is optional because generic markets carry no base coin; such
/// markets cannot be traded through this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDescriptor {
    pub market_id: u64,
    pub base: Option<CoinInfo>,
    pub quote: CoinInfo,
    pub lot_size: u64,
    pub tick_size: u64,
    pub min_size: u64,
}

impl MarketDescriptor {
    /// Creates a descriptor for a coin/coin market.
    pub fn new(
        market_id: u64,
        base: CoinInfo,
        quote: CoinInfo,
        lot_size: u64,
        tick_size: u64,
        min_size: u64,
    ) -> Self {
        Self {
            market_id,
            base: Some(base),
            quote,
            lot_size,
            tick_size,
            min_size,
        }
    }

    /// Checks the invariants every conversion relies on.
    ///
    /// # Errors
    /// `InvalidMarketMetadata` if the base coin is missing, lot or tick
    /// size is zero, or either coin has more than 28 decimals.
    pub fn validate(&self) -> Result<(), OrderError> {
        let base = self.base_coin()?;

        if self.lot_size == 0 {
            return Err(self.invalid("lot size must be positive"));
        }
        if self.tick_size == 0 {
            return Err(self.invalid("tick size must be positive"));
        }
        if base.decimals > MAX_DECIMALS || self.quote.decimals > MAX_DECIMALS {
            return Err(self.invalid(&format!(
                "coin decimals must not exceed {MAX_DECIMALS} (base {}, quote {})",
                base.decimals, self.quote.decimals
            )));
        }
        Ok(())
    }

    /// Base coin metadata.
    ///
    /// # Errors
    /// `InvalidMarketMetadata` for markets without a base coin.
    pub fn base_coin(&self) -> Result<&CoinInfo, OrderError> {
        self.base
            .as_ref()
            .ok_or_else(|| self.invalid("markets without base coin are not supported"))
    }

    /// Base coin decimals, see [`Self::base_coin`].
    pub fn base_decimals(&self) -> Result<u32, OrderError> {
        self.base_coin().map(|c| c.decimals)
    }

    pub fn quote_decimals(&self) -> u32 {
        self.quote.decimals
    }

    /// Decimals of the given side of the pair.
    pub fn decimals_of(&self, asset: Asset) -> Result<u32, OrderError> {
        match asset {
            Asset::Base => self.base_decimals(),
            Asset::Quote => Ok(self.quote_decimals()),
        }
    }

    fn invalid(&self, reason: &str) -> OrderError {
        OrderError::InvalidMarketMetadata(format!("market {}: {reason}", self.market_id))
    }
}
