//! Payload Port - Transaction Payload Construction
//!
//! Turns a validated raw order into the entry-function payload a wallet
//! would sign. Signing and submission are outside this crate.

use serde::{Deserialize, Serialize};

use crate::domain::market::MarketDescriptor;
use crate::domain::order::RawOrder;

/// An entry-function call ready to hand to a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
  /// Fully qualified function, `address::module::function`.
  pub function: String,
  /// Generic type arguments as type tag strings.
  pub type_arguments: Vec<String>,
  /// Positional arguments in wire form.
  pub arguments: Vec<serde_json::Value>,
}

/// Trait for payload builders.
pub trait PayloadBuilder: Send + Sync + 'static {
  /// Build the place-order payload for `order` on `market`.
  fn build(
    &self,
    market: &MarketDescriptor,
    order: &RawOrder,
  ) -> anyhow::Result<EntryFunctionPayload>;
}
