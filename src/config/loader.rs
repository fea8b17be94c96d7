//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    api = %config.api.base_url,
    account = %config.account.address,
    taker_fee_divisor = config.trading.taker_fee_divisor,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  // API validation
  anyhow::ensure!(
    config.api.base_url.starts_with("http://") || config.api.base_url.starts_with("https://"),
    "API base_url must be an http(s) URL, got {:?}",
    config.api.base_url
  );
  anyhow::ensure!(
    config.api.timeout_seconds > 0,
    "API timeout_seconds must be positive"
  );
  anyhow::ensure!(
    config.api.max_retries <= 10,
    "API max_retries must be at most 10, got {}",
    config.api.max_retries
  );
  anyhow::ensure!(
    config.api.max_concurrent > 0,
    "API max_concurrent must be positive"
  );
  anyhow::ensure!(
    config.api.orderbook_depth > 0,
    "API orderbook_depth must be positive"
  );

  // Chain validation
  anyhow::ensure!(
    is_account_address(&config.chain.econia_address),
    "econia_address must be a 0x-prefixed hex address, got {:?}",
    config.chain.econia_address
  );
  anyhow::ensure!(
    is_account_address(&config.chain.integrator_address),
    "integrator_address must be a 0x-prefixed hex address, got {:?}",
    config.chain.integrator_address
  );

  // Trading validation
  anyhow::ensure!(
    config.trading.taker_fee_divisor > 0,
    "taker_fee_divisor must be positive"
  );
  anyhow::ensure!(
    config.trading.max_slippage_bps <= 10_000,
    "max_slippage_bps must be at most 10000, got {}",
    config.trading.max_slippage_bps
  );

  // Account validation
  anyhow::ensure!(
    is_account_address(&config.account.address),
    "account address must be a 0x-prefixed hex address, got {:?}",
    config.account.address
  );

  Ok(())
}

fn is_account_address(address: &str) -> bool {
  address
    .strip_prefix("0x")
    .is_some_and(|hex| !hex.is_empty() && hex.len() <= 64 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
