//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that unit conversion and order validation
//! keep their laws across random markets and inputs.

use proptest::prelude::*;
use rust_decimal::prelude::*;

use dex_order_entry::domain::book::{OrderBookView, PriceLevel};
use dex_order_entry::domain::market::{CoinInfo, MarketDescriptor, TypeTag};
use dex_order_entry::domain::order::{
    BalanceSnapshot, MAX_PRICE_TICKS, OrderCheck, OrderRequest, Side, validate_order,
};
use dex_order_entry::domain::sizing::{max_order_size, size_for_percent};
use dex_order_entry::domain::units::{
    from_decimal_price, from_decimal_size, to_decimal_amount, to_decimal_price, to_decimal_size,
    to_raw_amount,
};

fn market(base_decimals: u32, quote_decimals: u32, lot_size: u64, tick_size: u64) -> MarketDescriptor {
    MarketDescriptor::new(
        1,
        CoinInfo::new("BASE", base_decimals, TypeTag::new("0x1", "base", "Base")),
        CoinInfo::new("QUOTE", quote_decimals, TypeTag::new("0x2", "quote", "Quote")),
        lot_size,
        tick_size,
        0,
    )
}

fn arb_market() -> impl Strategy<Value = MarketDescriptor> {
    (0u32..=10, 0u32..=10, 1u64..=1_000_000, 1u64..=1_000_000)
        .prop_map(|(bd, qd, lot, tick)| market(bd, qd, lot, tick))
}

/// Non-negative decimal with up to 10 fractional digits.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_000_000, 0u32..=10).prop_map(|(m, s)| Decimal::new(m, s))
}

/// Like [`arb_amount`] but with more fractional digits than any market's
/// base decimals, so sizes can fall between sub-units.
fn arb_fine_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_000_000, 0u32..=16).prop_map(|(m, s)| Decimal::new(m, s))
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

// ── Unit Conversion Laws ────────────────────────────────────

proptest! {
    /// Raw round trip equals the value rounded to the coin's decimals.
    #[test]
    fn raw_amount_round_trip(value in arb_amount(), decimals in 0u32..=10) {
        let raw = to_raw_amount(value, decimals).unwrap();
        let back = to_decimal_amount(raw, decimals).unwrap();
        let expected = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(back, expected);
    }

    /// Every tick count survives conversion to a price and back.
    #[test]
    fn price_round_trip(market in arb_market(), ticks in 1u64..=MAX_PRICE_TICKS) {
        let price = to_decimal_price(ticks, &market).unwrap();
        prop_assert_eq!(from_decimal_price(price, &market).unwrap(), ticks);
    }

    /// Every lot count survives conversion to a size and back.
    #[test]
    fn size_round_trip(market in arb_market(), lots in 0u64..=1_000_000_000) {
        let size = to_decimal_size(lots, &market).unwrap();
        prop_assert_eq!(from_decimal_size(size, &market).unwrap(), lots);
    }

    /// Higher tick counts never display as lower prices.
    #[test]
    fn price_is_monotonic(market in arb_market(), ticks in 1u64..MAX_PRICE_TICKS) {
        let lower = to_decimal_price(ticks, &market).unwrap();
        let higher = to_decimal_price(ticks + 1, &market).unwrap();
        prop_assert!(higher > lower);
    }
}

// ── Order Validation Invariants ─────────────────────────────

proptest! {
    /// Ready orders are lot/tick multiples no larger than requested, and
    /// rounding down removed less than one lot and one tick.
    #[test]
    fn ready_orders_round_down_to_grid(
        market in arb_market(),
        side in arb_side(),
        size in arb_fine_amount(),
        price in arb_amount(),
    ) {
        let balance = BalanceSnapshot::new(Decimal::from(1_000_000_000_000u64), Decimal::from(1_000_000_000_000u64));
        let request = OrderRequest::new(side, price, size);
        let check = validate_order(&request, &market, &balance).unwrap();

        if let OrderCheck::Ready(validated) = check {
            let order = validated.order;
            let base_decimals = market.base_decimals().unwrap();
            let lot = u128::from(market.lot_size);
            let pow = |e: u32| 10u128.pow(e);

            // adjusted ≤ size × 10^bd < adjusted + lot, with size = mantissa / 10^scale.
            let adjusted = order.raw_size(&market).unwrap();
            let size_rhs = u128::try_from(size.mantissa()).unwrap() * pow(base_decimals);
            prop_assert_eq!(adjusted % lot, 0);
            prop_assert!(adjusted * pow(size.scale()) <= size_rhs);
            prop_assert!((adjusted + lot) * pow(size.scale()) > size_rhs);

            // ticks ≤ price × 10^qd × lot / (10^bd × tick) < ticks + 1, cross-multiplied
            // with price = mantissa / 10^scale so the comparison is exact.
            prop_assert!(order.ticks >= 1 && order.ticks <= MAX_PRICE_TICKS);
            let mantissa = u128::try_from(price.mantissa()).unwrap();
            let lhs_unit = u128::from(market.tick_size) * pow(base_decimals) * pow(price.scale());
            let rhs = mantissa * pow(market.quote_decimals()) * lot;
            prop_assert!(u128::from(order.ticks) * lhs_unit <= rhs);
            prop_assert!(u128::from(order.ticks + 1) * lhs_unit > rhs);
        }
    }

    /// An order is never ready when the balance cannot cover it.
    #[test]
    fn ready_orders_fit_balance(
        market in arb_market(),
        side in arb_side(),
        size in arb_amount(),
        price in arb_amount(),
        base in arb_amount(),
        quote in arb_amount(),
    ) {
        let balance = BalanceSnapshot::new(base, quote);
        let request = OrderRequest::new(side, price, size);
        let check = validate_order(&request, &market, &balance).unwrap();

        if let OrderCheck::Ready(validated) = check {
            let order = validated.order;
            match side {
                Side::Buy => {
                    let quote_raw = to_decimal_amount(order.quote_required(&market).unwrap(), market.quote_decimals()).unwrap();
                    prop_assert!(quote_raw <= quote);
                }
                Side::Sell => {
                    let base_raw = to_decimal_amount(order.raw_size(&market).unwrap(), market.base_decimals().unwrap()).unwrap();
                    prop_assert!(base_raw <= base);
                }
            }
        }
    }
}

// ── Book and Sizing Properties ──────────────────────────────

proptest! {
    /// Fill estimates conserve size and average within the touched levels.
    #[test]
    fn fill_conserves_size(
        levels in prop::collection::vec((1u64..100_000, 1u64..1_000), 1..20),
        side in arb_side(),
        lots in 1u64..50_000,
    ) {
        let levels: Vec<PriceLevel> = levels.into_iter().map(|(p, s)| PriceLevel::new(p, s)).collect();
        let book = OrderBookView::new(levels.clone(), levels);
        let fill = book.estimate_fill(side, lots).unwrap();

        prop_assert_eq!(fill.filled_lots + fill.unfilled_lots, lots);
        let best = Decimal::from(book.opposite(side)[0].price);
        let worst = Decimal::from(fill.worst_price);
        prop_assert!(fill.average_price >= best.min(worst));
        prop_assert!(fill.average_price <= best.max(worst));
        prop_assert!(fill.slippage_bps >= Decimal::ZERO);
    }

    /// Slider sizes never exceed what the balance supports.
    #[test]
    fn percent_size_within_max(
        market in arb_market(),
        side in arb_side(),
        base in arb_amount(),
        quote in arb_amount(),
        price in (1i64..1_000_000_000, 0u32..=6).prop_map(|(m, s)| Decimal::new(m, s)),
        percent in 0u32..=100,
    ) {
        let balance = BalanceSnapshot::new(base, quote);
        let size = size_for_percent(side, &balance, price, Decimal::from(percent), &market).unwrap();
        let max = max_order_size(side, &balance, price).unwrap().expect("positive price");
        prop_assert!(size >= Decimal::ZERO);
        prop_assert!(size <= max);
    }
}
