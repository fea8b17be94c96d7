//! Configuration Module - TOML-based Order Entry Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Contract addresses and API endpoints are externalized here;
//! market metadata is always fetched, never configured.

pub mod loader;

use serde::Deserialize;

use crate::domain::fees::DEFAULT_TAKER_FEE_DIVISOR;
use crate::domain::order::{Restriction, SelfMatchBehavior};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Application identity and logging.
  pub app: AppSection,
  /// Market-data REST API.
  pub api: ApiConfig,
  /// On-chain addresses used in payloads.
  pub chain: ChainConfig,
  /// Order defaults and fee parameters.
  #[serde(default)]
  pub trading: TradingConfig,
  /// Account whose balances are checked.
  pub account: AccountConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable name, included in logs.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Market-data API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// REST API base URL.
  pub base_url: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
  /// Maximum retries on transient errors.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// Base delay between retries (milliseconds, doubled per attempt).
  #[serde(default = "default_retry_delay")]
  pub retry_base_delay_ms: u64,
  /// Maximum concurrent requests.
  #[serde(default = "default_max_concurrent")]
  pub max_concurrent: usize,
  /// Levels per side fetched for fee and slippage estimates.
  #[serde(default = "default_orderbook_depth")]
  pub orderbook_depth: u32,
}

/// On-chain address configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  /// Address the order-book package is published at.
  pub econia_address: String,
  /// Integrator address credited in placed orders.
  pub integrator_address: String,
}

/// Trading defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
  /// Taker fee is notional divided by this.
  #[serde(default = "default_taker_fee_divisor")]
  pub taker_fee_divisor: u64,
  /// Fill restriction for placed orders.
  #[serde(default)]
  pub restriction: Restriction,
  /// Self-match behavior for placed orders.
  #[serde(default)]
  pub self_match_behavior: SelfMatchBehavior,
  /// Estimated slippage above this is logged as a warning.
  #[serde(default = "default_max_slippage_bps")]
  pub max_slippage_bps: u32,
}

impl Default for TradingConfig {
  fn default() -> Self {
    Self {
      taker_fee_divisor: default_taker_fee_divisor(),
      restriction: Restriction::default(),
      self_match_behavior: SelfMatchBehavior::default(),
      max_slippage_bps: default_max_slippage_bps(),
    }
  }
}

/// Account configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  /// Account address balances are read for.
  pub address: String,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_timeout() -> u64 {
  10
}

fn default_max_retries() -> u32 {
  3
}

fn default_retry_delay() -> u64 {
  200
}

fn default_max_concurrent() -> usize {
  8
}

fn default_orderbook_depth() -> u32 {
  60
}

fn default_taker_fee_divisor() -> u64 {
  DEFAULT_TAKER_FEE_DIVISOR
}

fn default_max_slippage_bps() -> u32 {
  100
}
