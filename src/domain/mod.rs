//! Domain layer - Unit conversion and order validation.
//!
//! Pure logic over market metadata: converting between on-chain integers
//! (sub-units, lots, ticks) and human decimals, and deciding whether an
//! order can be placed. No I/O here (hexagonal architecture inner ring).

pub mod book;
pub mod error;
pub mod fees;
pub mod market;
pub mod order;
pub mod sizing;
pub mod units;

// Re-export core types for convenience
pub use book::{FillEstimate, OrderBookView, PriceLevel};
pub use error::{OrderError, UnitError};
pub use fees::FeeCalculator;
pub use market::{Asset, CoinInfo, MarketDescriptor, TypeTag};
pub use order::{
    Adjustment, BalanceSnapshot, OrderCheck, OrderRejection, OrderRequest, RawOrder, Restriction,
    SelfMatchBehavior, Side, ValidatedOrder, validate_order,
};
