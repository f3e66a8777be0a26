//! Payment transition error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while planning a payment-status transition.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Monetary inputs must be non-negative.
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The offending value.
        amount: Decimal,
    },

    /// Unresolvable payment status value.
    #[error("Unknown payment status: '{0}'")]
    UnknownStatus(String),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::UnknownStatus(_) => "UNKNOWN_PAYMENT_STATUS",
        }
    }
}
