//! Fund account and ledger posting logic.
//!
//! This module implements the core fund ledger functionality:
//! - Fund account and transaction domain types
//! - Sign conventions per transaction type
//! - Running balance calculations
//! - Posting and transfer validation
//! - Error types for ledger operations

pub mod error;
pub mod posting;
pub mod types;

#[cfg(test)]
mod posting_props;

pub use error::FundLedgerError;
pub use posting::{BalanceChange, PlannedPosting, transfer_amounts, validate_posting, validate_transfer};
pub use types::{FundSource, FundTransactionType, FundType};
