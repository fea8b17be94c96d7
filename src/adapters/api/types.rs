//! REST API Response Types
//!
//! Serialization types for the market-data REST API and their
//! conversions into domain types. Integer fields arrive in on-chain
//! units (lots, ticks, sub-units).

use serde::{Deserialize, Serialize};

use crate::domain::book::{OrderBookView, PriceLevel};
use crate::domain::market::{CoinInfo, MarketDescriptor, TypeTag};

/// Coin metadata as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCoin {
  /// Publishing account.
  pub account_address: String,
  /// Module the coin struct lives in.
  pub module_name: String,
  /// Coin struct name.
  pub struct_name: String,
  /// Ticker symbol.
  pub symbol: String,
  /// Display name.
  #[serde(default)]
  pub name: String,
  /// Decimal places of the smallest unit.
  pub decimals: u32,
}

impl From<&ApiCoin> for CoinInfo {
  fn from(coin: &ApiCoin) -> Self {
    CoinInfo::new(
      coin.symbol.clone(),
      coin.decimals,
      TypeTag::new(&coin.account_address, &coin.module_name, &coin.struct_name),
    )
  }
}

/// Market registration as returned by `GET /markets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMarket {
  pub market_id: u64,
  /// Pair name, e.g. `APT-USDC`.
  #[serde(default)]
  pub name: String,
  /// Missing for generic-asset markets.
  pub base: Option<ApiCoin>,
  /// Generic base asset description, when `base` is missing.
  #[serde(default)]
  pub base_name_generic: Option<String>,
  pub quote: ApiCoin,
  /// Base sub-units per lot.
  pub lot_size: u64,
  /// Quote sub-units per tick (per lot).
  pub tick_size: u64,
  /// Minimum order size, in base sub-units.
  pub min_size: u64,
}

impl From<&ApiMarket> for MarketDescriptor {
  fn from(market: &ApiMarket) -> Self {
    MarketDescriptor {
      market_id: market.market_id,
      base: market.base.as_ref().map(CoinInfo::from),
      quote: CoinInfo::from(&market.quote),
      lot_size: market.lot_size,
      tick_size: market.tick_size,
      min_size: market.min_size,
    }
  }
}

/// One aggregated level from `GET /rpc/orderbook`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApiPriceLevel {
  /// Price in ticks.
  pub price: u64,
  /// Size in lots.
  pub size: u64,
}

/// Order book response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiOrderBook {
  #[serde(default)]
  pub bids: Vec<ApiPriceLevel>,
  #[serde(default)]
  pub asks: Vec<ApiPriceLevel>,
}

impl From<ApiOrderBook> for OrderBookView {
  fn from(book: ApiOrderBook) -> Self {
    let level = |l: ApiPriceLevel| PriceLevel::new(l.price, l.size);
    OrderBookView::new(
      book.bids.into_iter().map(level).collect(),
      book.asks.into_iter().map(level).collect(),
    )
  }
}

/// Per-market balances from `GET /rpc/user_balance`, in sub-units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApiUserBalance {
  pub base_available: u64,
  pub quote_available: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  const MARKET_JSON: &str = r#"{
    "market_id": 7,
    "name": "APT-USDC",
    "base": {
      "account_address": "0x1",
      "module_name": "aptos_coin",
      "struct_name": "AptosCoin",
      "symbol": "APT",
      "name": "Aptos Coin",
      "decimals": 8
    },
    "base_name_generic": null,
    "quote": {
      "account_address": "0xfa",
      "module_name": "example_usdc",
      "struct_name": "ExampleUSDC",
      "symbol": "USDC",
      "name": "USD Coin",
      "decimals": 6
    },
    "lot_size": 100000,
    "tick_size": 1,
    "min_size": 500,
    "underwriter_id": 0
  }"#;

  #[test]
  fn test_market_conversion() {
    let api: ApiMarket = serde_json::from_str(MARKET_JSON).unwrap();
    let market = MarketDescriptor::from(&api);
    assert_eq!(market.market_id, 7);
    assert_eq!(market.lot_size, 100_000);
    assert_eq!(market.base_decimals().unwrap(), 8);
    assert_eq!(market.quote.type_tag.to_string(), "0xfa::example_usdc::ExampleUSDC");
    assert!(market.validate().is_ok());
  }

  #[test]
  fn test_generic_market_has_no_base() {
    let mut api: ApiMarket = serde_json::from_str(MARKET_JSON).unwrap();
    api.base = None;
    api.base_name_generic = Some("Generic asset".to_string());
    assert!(MarketDescriptor::from(&api).validate().is_err());
  }

  #[test]
  fn test_order_book_conversion_sorts_levels() {
    let api: ApiOrderBook = serde_json::from_str(
      r#"{"bids":[{"price":90,"size":1},{"price":95,"size":2}],"asks":[{"price":101,"size":3}]}"#,
    )
    .unwrap();
    let book = OrderBookView::from(api);
    assert_eq!(book.best_bid(), Some(&PriceLevel::new(95, 2)));
    assert_eq!(book.best_ask(), Some(&PriceLevel::new(101, 3)));
  }
}
