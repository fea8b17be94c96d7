//! Integration Tests - End-to-end Order Entry Testing
//!
//! Tests the interaction between the use case, ports, the real payload
//! builder and mock data sources.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::Arc;

use mockall::mock;
use mockall::predicate::*;
use rust_decimal_macros::dec;
use serde_json::json;

use dex_order_entry::adapters::chain::EconiaPayloadBuilder;
use dex_order_entry::config::AppConfig;
use dex_order_entry::config::loader::parse_config;
use dex_order_entry::domain::book::{OrderBookView, PriceLevel};
use dex_order_entry::domain::market::{Asset, CoinInfo, MarketDescriptor, TypeTag};
use dex_order_entry::domain::order::{
    Adjustment, BalanceSnapshot, OrderRejection, OrderRequest, Side,
};
use dex_order_entry::usecases::OrderEntry;

// ---- Mock Definitions ----

mock! {
    pub MarketData {}

    #[async_trait::async_trait]
    impl dex_order_entry::ports::market_data::MarketDataSource for MarketData {
        async fn market(&self, market_id: u64) -> anyhow::Result<MarketDescriptor>;
        async fn order_book(&self, market_id: u64, depth: u32) -> anyhow::Result<OrderBookView>;
    }
}

mock! {
    pub Balances {}

    #[async_trait::async_trait]
    impl dex_order_entry::ports::balance::BalanceSource for Balances {
        async fn balance(
            &self,
            account: &str,
            market: &MarketDescriptor,
        ) -> anyhow::Result<BalanceSnapshot>;
    }
}

// ---- Fixtures ----

const ACCOUNT: &str = "0xabc";

fn config() -> AppConfig {
    parse_config(
        r#"
[app]
name = "order-entry-test"

[api]
base_url = "http://localhost:3000"
orderbook_depth = 20

[chain]
econia_address = "0xc0deb00c"
integrator_address = "0x2"

[account]
address = "0xabc"
"#,
    )
    .expect("test config is valid")
}

/// APT/USDC with 0.001 APT lots and 0.001 USDC ticks.
fn market() -> MarketDescriptor {
    MarketDescriptor::new(
        1,
        CoinInfo::new("APT", 8, TypeTag::new("0x1", "aptos_coin", "AptosCoin")),
        CoinInfo::new("USDC", 6, TypeTag::new("0xfa", "example_usdc", "ExampleUSDC")),
        100_000,
        1,
        500,
    )
}

/// Bid 8.400, ask 8.600.
fn book() -> OrderBookView {
    OrderBookView::new(
        vec![PriceLevel::new(8_400, 5_000), PriceLevel::new(8_300, 5_000)],
        vec![PriceLevel::new(8_600, 100), PriceLevel::new(8_700, 100)],
    )
}

fn market_data(market: MarketDescriptor) -> MockMarketData {
    let mut mock = MockMarketData::new();
    mock.expect_market()
        .with(eq(1))
        .times(1)
        .returning(move |_| Ok(market.clone()));
    mock.expect_order_book()
        .with(eq(1), eq(20))
        .returning(|_, _| Ok(book()));
    mock
}

fn balances(base: rust_decimal::Decimal, quote: rust_decimal::Decimal) -> MockBalances {
    let mut mock = MockBalances::new();
    mock.expect_balance()
        .withf(|account, market| account == ACCOUNT && market.market_id == 1)
        .returning(move |_, _| Ok(BalanceSnapshot::new(base, quote)));
    mock
}

fn entry(
    market_data: MockMarketData,
    balances: MockBalances,
) -> OrderEntry<MockMarketData, MockBalances, EconiaPayloadBuilder> {
    let config = config();
    OrderEntry::new(
        Arc::new(market_data),
        Arc::new(balances),
        Arc::new(EconiaPayloadBuilder::from_config(&config)),
        &config,
    )
}

// ---- Integration Tests ----

#[tokio::test]
async fn test_resting_buy_is_adjusted_and_built() {
    let entry = entry(market_data(market()), balances(dec!(0), dec!(100)));
    let request = OrderRequest::new(Side::Buy, dec!(8.5004), dec!(1.2345));

    let ticket = entry.prepare(1, ACCOUNT, &request).await.unwrap();

    let validated = ticket.check.validated().expect("order should be ready");
    assert_eq!(validated.order.lots, 1_234);
    assert_eq!(validated.order.ticks, 8_500);
    assert!(matches!(
        validated.adjustments.as_slice(),
        [Adjustment::SizeRounded { .. }, Adjustment::PriceRounded { .. }]
    ));

    // Total uses the adjusted values: 8.500 × 1.234.
    assert_eq!(ticket.total, Some(dec!(10.489)));

    // Below the best ask: rests, pays no taker fee and fills nothing.
    assert_eq!(ticket.estimated_fee, Some(dec!(0)));
    assert!(ticket.fill.is_none());

    let payload = ticket.payload.expect("ready order has a payload");
    assert_eq!(payload.function, "0xc0deb00c::market::place_limit_order_user_entry");
    assert_eq!(
        payload.arguments,
        vec![
            json!("1"),
            json!("0x2"),
            json!(false),
            json!("1234"),
            json!("8500"),
            json!(0),
            json!(0),
        ]
    );
}

#[tokio::test]
async fn test_crossing_sell_estimates_fee_and_fill() {
    let entry = entry(market_data(market()), balances(dec!(5), dec!(0)));
    let request = OrderRequest::new(Side::Sell, dec!(8.3), dec!(2));

    let ticket = entry.prepare(1, ACCOUNT, &request).await.unwrap();

    assert!(ticket.check.is_ready());
    assert_eq!(ticket.total, Some(dec!(16.6)));
    // 2 APT at the 8.400 bid, 5 bps.
    assert_eq!(ticket.estimated_fee, Some(dec!(0.0084)));
    let fill = ticket.fill.expect("crossing order fills");
    assert_eq!(fill.filled_lots, 2_000);
    assert_eq!(fill.unfilled_lots, 0);
    assert_eq!(fill.worst_price, 8_400);
    assert_eq!(ticket.payload.unwrap().arguments[2], json!(true));
}

#[tokio::test]
async fn test_insufficient_quote_is_rejected_without_payload() {
    let entry = entry(market_data(market()), balances(dec!(0), dec!(10)));
    let request = OrderRequest::new(Side::Buy, dec!(10), dec!(2));

    let ticket = entry.prepare(1, ACCOUNT, &request).await.unwrap();

    assert_eq!(
        ticket.check.rejection(),
        Some(&OrderRejection::InsufficientBalance {
            asset: Asset::Quote,
            required: 20_000_000,
            available: 10_000_000,
        })
    );
    assert!(ticket.payload.is_none());
    assert!(ticket.total.is_none());
    assert!(ticket.estimated_fee.is_none());
}

#[tokio::test]
async fn test_sell_of_entire_balance_passes() {
    let entry = entry(market_data(market()), balances(dec!(1.5), dec!(0)));
    let request = OrderRequest::new(Side::Sell, dec!(9), dec!(1.5));

    let ticket = entry.prepare(1, ACCOUNT, &request).await.unwrap();

    let validated = ticket.check.validated().unwrap();
    assert_eq!(validated.order.lots, 1_500);
    assert!(validated.adjustments.is_empty());
}

#[tokio::test]
async fn test_missing_market_is_an_error() {
    let mut market_data = MockMarketData::new();
    market_data
        .expect_market()
        .returning(|id| Err(anyhow::anyhow!("Market {id} not found")));
    market_data.expect_order_book().never();

    let mut balances = MockBalances::new();
    balances.expect_balance().never();

    let entry = entry(market_data, balances);
    let request = OrderRequest::new(Side::Buy, dec!(1), dec!(1));

    let err = entry.prepare(1, ACCOUNT, &request).await.unwrap_err();
    assert!(format!("{err:#}").contains("not found"));
}

#[tokio::test]
async fn test_generic_market_is_an_error() {
    let mut generic = market();
    generic.base = None;

    let mut market_data = MockMarketData::new();
    market_data
        .expect_market()
        .returning(move |_| Ok(generic.clone()));
    market_data.expect_order_book().never();

    let mut balances = MockBalances::new();
    balances.expect_balance().never();

    let entry = entry(market_data, balances);
    let request = OrderRequest::new(Side::Buy, dec!(1), dec!(1));

    assert!(entry.prepare(1, ACCOUNT, &request).await.is_err());
}

#[tokio::test]
async fn test_balance_failure_propagates() {
    let mut balances = MockBalances::new();
    balances
        .expect_balance()
        .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

    let entry = entry(market_data(market()), balances);
    let request = OrderRequest::new(Side::Buy, dec!(1), dec!(1));

    assert!(entry.prepare(1, ACCOUNT, &request).await.is_err());
}

#[tokio::test]
async fn test_size_for_percent_uses_live_balance() {
    let mut market_data = MockMarketData::new();
    market_data
        .expect_market()
        .times(1)
        .returning(|_| Ok(market()));

    let entry = entry(market_data, balances(dec!(3), dec!(100)));

    // 100 / 8.5 = 11.7647..; half, truncated to 0.001 APT.
    let size = entry
        .size_for_percent(1, ACCOUNT, Side::Buy, dec!(8.5), dec!(50))
        .await
        .unwrap();
    assert_eq!(size, dec!(5.882));
}
