//! Expense planning error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while planning expense postings.
#[derive(Debug, Error)]
pub enum ExpensePlanError {
    /// Expense amounts are stored as positive magnitudes.
    #[error("Expense amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
}

impl ExpensePlanError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
        }
    }
}
