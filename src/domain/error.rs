//! Hard error types for the domain layer.
//!
//! Only contract violations surface here: malformed market metadata,
//! unsupported decimal scales, arithmetic overflow, unparseable input.
//! Expected validation outcomes (size too small, insufficient balance)
//! are plain values, see `order::OrderRejection`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest decimal scale representable by `rust_decimal`.
pub const MAX_DECIMALS: u32 = 28;

/// Errors raised while converting between raw and decimal units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// Raw on-chain amounts are unsigned.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Coin decimals beyond what exact decimal arithmetic can scale by.
    #[error("{decimals} decimal places exceeds the supported maximum of {MAX_DECIMALS}")]
    DecimalsOutOfRange { decimals: u32 },

    /// A checked multiplication or division did not fit.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    /// User input that is not a plain decimal number.
    #[error("invalid decimal number: {0:?}")]
    InvalidNumber(String),
}

/// Errors that indicate a caller bug rather than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Market descriptor is missing data or violates lot/tick invariants.
    #[error("invalid market metadata: {0}")]
    InvalidMarketMetadata(String),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_error_display() {
        let err = UnitError::NegativeAmount(dec!(-1.5));
        assert_eq!(err.to_string(), "amount must not be negative, got -1.5");

        let err = UnitError::DecimalsOutOfRange { decimals: 30 };
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("28"));
    }

    #[test]
    fn test_order_error_wraps_unit_error() {
        let err: OrderError = UnitError::Overflow("raw size").into();
        assert_eq!(err, OrderError::Unit(UnitError::Overflow("raw size")));
        assert_eq!(err.to_string(), "arithmetic overflow while computing raw size");
    }
}
