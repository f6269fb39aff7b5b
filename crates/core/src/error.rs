//! Domain error model.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::id::{OrderId, ProductId, UserId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (money
/// invariants, preconditions, missing references). Infrastructure concerns
/// belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A monetary amount was negative.
    #[error("amount cannot be negative: {0}")]
    InvalidAmount(Decimal),

    /// A multiplication factor was negative.
    #[error("factor cannot be negative: {0}")]
    InvalidFactor(Decimal),

    /// A subtraction would have produced a negative amount.
    #[error("resulting amount cannot be negative")]
    NegativeResult,

    /// Arithmetic was attempted between two different currencies.
    #[error("currencies must match ({left} vs {right})")]
    CurrencyMismatch { left: String, right: String },

    /// Order quantity was zero, negative or above the per-order cap.
    #[error("quantity must be between 1 and 1000000, got {0}")]
    InvalidQuantity(i64),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn currency_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than by the
    /// system (used by adapters to pick a response class).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidFactor(_)
                | Self::InvalidQuantity(_)
                | Self::ProductNotFound(_)
                | Self::UserNotFound(_)
                | Self::OrderNotFound(_)
                | Self::InvalidId(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_preconditions() {
        assert!(DomainError::InvalidQuantity(0).is_precondition());
        assert!(DomainError::ProductNotFound(ProductId::new(1)).is_precondition());
        assert!(!DomainError::NegativeResult.is_precondition());
        assert!(!DomainError::currency_mismatch("USD", "EUR").is_precondition());
        assert!(!DomainError::invariant("broken").is_precondition());
    }

    #[test]
    fn messages_name_the_missing_record() {
        assert_eq!(DomainError::OrderNotFound(OrderId::new(4)).to_string(), "order 4 not found");
        assert_eq!(DomainError::UserNotFound(UserId::new(2)).to_string(), "user 2 not found");
    }
}
