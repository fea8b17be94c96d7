//! Market Data REST API Adapter
//!
//! Implements the HTTP client for the read-only market-data API and
//! the `MarketDataSource` / `BalanceSource` ports on top of it.
//!
//! Sub-modules:
//! - `client`: HTTP client with concurrency limit and retries
//! - `markets`: Market metadata and order book queries
//! - `balances`: Per-market account balances
//! - `types`: API response type definitions

pub mod balances;
pub mod client;
pub mod markets;
pub mod types;

pub use balances::ApiBalances;
pub use client::{ApiClient, ApiClientConfig};
pub use markets::ApiMarketData;
