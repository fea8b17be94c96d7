//! On-chain Adapter
//!
//! Builds entry-function payloads for the order-book package.
//! Signing and submission are left to the wallet.

pub mod payload;

pub use payload::EconiaPayloadBuilder;
