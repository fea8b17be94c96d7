//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the order form's workflows.
//!
//! Use cases:
//! - `OrderEntry`: Fetch market and balances, validate, estimate, build payload

pub mod order_entry;

pub use order_entry::{OrderEntry, OrderTicket};
