//! Fund ledger error types for posting validation.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::FundTransactionType;

/// Errors raised while validating fund ledger postings.
#[derive(Debug, Error)]
pub enum FundLedgerError {
    /// Posting amount cannot be zero.
    #[error("Posting amount cannot be zero")]
    ZeroAmount,

    /// Posting amount sign contradicts the transaction type.
    #[error("Amount {amount} violates the sign convention for {transaction_type}")]
    SignMismatch {
        /// The transaction type being posted.
        transaction_type: FundTransactionType,
        /// The offending signed amount.
        amount: Decimal,
    },

    /// Transfers require two distinct funds.
    #[error("Cannot transfer a fund to itself")]
    SameFundTransfer,

    /// Transfer amounts must be strictly positive.
    #[error("Transfer amount must be positive, got {0}")]
    InvalidTransferAmount(Decimal),

    /// Unresolvable fund key.
    #[error("Unknown fund type: '{0}'")]
    UnknownFundType(String),

    /// Unresolvable transaction type key.
    #[error("Unknown transaction type: '{0}'")]
    UnknownTransactionType(String),
}

impl FundLedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::SignMismatch { .. } => "SIGN_MISMATCH",
            Self::SameFundTransfer => "SAME_FUND_TRANSFER",
            Self::InvalidTransferAmount(_) => "INVALID_TRANSFER_AMOUNT",
            Self::UnknownFundType(_) => "UNKNOWN_FUND_TYPE",
            Self::UnknownTransactionType(_) => "UNKNOWN_TRANSACTION_TYPE",
        }
    }
}
