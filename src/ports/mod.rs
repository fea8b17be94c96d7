//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `MarketDataSource`: Market metadata and order-book snapshots
//! - `BalanceSource`: Per-account available balances
//! - `PayloadBuilder`: On-chain transaction payload construction

pub mod balance;
pub mod market_data;
pub mod payload;

pub use balance::BalanceSource;
pub use market_data::MarketDataSource;
pub use payload::{EntryFunctionPayload, PayloadBuilder};
