//! Entry-function payload builder for the on-chain order book.
//!
//! Produces the `place_limit_order_user_entry` call a wallet signs.
//! u64 arguments are encoded as decimal strings, as JSON numbers
//! cannot carry the full u64 range.

use anyhow::{Result, ensure};
use serde_json::{Value, json};

use crate::config::AppConfig;
use crate::domain::market::MarketDescriptor;
use crate::domain::order::{MAX_PRICE_TICKS, MIN_PRICE_TICKS, RawOrder, Restriction, SelfMatchBehavior};
use crate::ports::payload::{EntryFunctionPayload, PayloadBuilder};

const MARKET_MODULE: &str = "market";
const PLACE_LIMIT_ORDER: &str = "place_limit_order_user_entry";

/// Builds limit-order payloads against a deployed order-book package.
#[derive(Debug, Clone)]
pub struct EconiaPayloadBuilder {
    econia_address: String,
    integrator_address: String,
    restriction: Restriction,
    self_match: SelfMatchBehavior,
}

impl EconiaPayloadBuilder {
    pub fn new(
        econia_address: impl Into<String>,
        integrator_address: impl Into<String>,
        restriction: Restriction,
        self_match: SelfMatchBehavior,
    ) -> Self {
        Self {
            econia_address: econia_address.into(),
            integrator_address: integrator_address.into(),
            restriction,
            self_match,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.chain.econia_address,
            &config.chain.integrator_address,
            config.trading.restriction,
            config.trading.self_match_behavior,
        )
    }

    fn function(&self) -> String {
        format!("{}::{MARKET_MODULE}::{PLACE_LIMIT_ORDER}", self.econia_address)
    }
}

impl PayloadBuilder for EconiaPayloadBuilder {
    fn build(&self, market: &MarketDescriptor, order: &RawOrder) -> Result<EntryFunctionPayload> {
        let base = market.base_coin()?;
        ensure!(order.lots > 0, "order size must be at least one lot");
        ensure!(
            (MIN_PRICE_TICKS..=MAX_PRICE_TICKS).contains(&order.ticks),
            "price {} ticks outside on-chain bounds",
            order.ticks
        );

        let arguments: Vec<Value> = vec![
            json!(market.market_id.to_string()),
            json!(self.integrator_address),
            json!(order.side.is_ask()),
            json!(order.lots.to_string()),
            json!(order.ticks.to_string()),
            json!(self.restriction.code()),
            json!(self.self_match.code()),
        ];

        Ok(EntryFunctionPayload {
            function: self.function(),
            type_arguments: vec![base.type_tag.to_string(), market.quote.type_tag.to_string()],
            arguments,
        })
    }
}
