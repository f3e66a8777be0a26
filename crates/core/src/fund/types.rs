//! Fund ledger domain types.
//!
//! This module defines the fund account keys, the posting classification,
//! and the provenance tags carried on every ledger row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The named cash pools tracked by the ledger.
///
/// Stored as a string key so that new fund types can be introduced by a
/// migration without a schema change; the code keeps the set closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundType {
    /// Day-to-day operational cash.
    PettyCash,
    /// Accumulated profit held at the bank.
    ProfitBank,
}

impl FundType {
    /// Returns the storage key for this fund type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PettyCash => "petty_cash",
            Self::ProfitBank => "profit_bank",
        }
    }

    /// Parses a fund type from its storage key.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "petty_cash" => Some(Self::PettyCash),
            "profit_bank" => Some(Self::ProfitBank),
            _ => None,
        }
    }

    /// All known fund types, in seed order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::PettyCash, Self::ProfitBank]
    }
}

impl fmt::Display for FundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a ledger posting.
///
/// The sign convention is fixed per type: `income`/`transfer_in` carry
/// positive amounts, `expense`/`transfer_out` negative, `adjustment`
/// either sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundTransactionType {
    /// Cash received into a fund.
    Income,
    /// Cash paid out of a fund.
    Expense,
    /// Receiving side of a fund-to-fund transfer.
    TransferIn,
    /// Sending side of a fund-to-fund transfer.
    TransferOut,
    /// Manual correction, either sign.
    Adjustment,
}

impl FundTransactionType {
    /// Returns the storage key for this transaction type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::Adjustment => "adjustment",
        }
    }

    /// Parses a transaction type from its storage key.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "transfer_in" => Some(Self::TransferIn),
            "transfer_out" => Some(Self::TransferOut),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }

    /// Applies this type's sign convention to a magnitude.
    ///
    /// Inflow types yield a positive amount, outflow types a negative
    /// amount; adjustments pass the value through unchanged.
    #[must_use]
    pub fn signed(self, magnitude: Decimal) -> Decimal {
        match self {
            Self::Income | Self::TransferIn => magnitude.abs(),
            Self::Expense | Self::TransferOut => -magnitude.abs(),
            Self::Adjustment => magnitude,
        }
    }

    /// Returns true if a signed amount satisfies this type's convention.
    #[must_use]
    pub fn accepts(self, amount: Decimal) -> bool {
        match self {
            Self::Income | Self::TransferIn => amount > Decimal::ZERO,
            Self::Expense | Self::TransferOut => amount < Decimal::ZERO,
            Self::Adjustment => true,
        }
    }
}

impl fmt::Display for FundTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance of a ledger posting: which kind of business operation issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundSource {
    /// Expense creation or edit.
    Expense,
    /// Payment-status change on a project transaction.
    TransactionUpdate,
    /// One leg of a fund-to-fund transfer.
    FundTransfer,
    /// Manual posting entered directly against a fund.
    ManualEntry,
    /// Materialized recurring expense.
    RecurringExpense,
}

impl FundSource {
    /// Returns the storage key for this source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::TransactionUpdate => "transaction_update",
            Self::FundTransfer => "fund_transfer",
            Self::ManualEntry => "manual_entry",
            Self::RecurringExpense => "recurring_expense",
        }
    }

    /// Parses a source from its storage key.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "transaction_update" => Some(Self::TransactionUpdate),
            "fund_transfer" => Some(Self::FundTransfer),
            "manual_entry" => Some(Self::ManualEntry),
            "recurring_expense" => Some(Self::RecurringExpense),
            _ => None,
        }
    }
}

impl fmt::Display for FundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fund_type_roundtrip() {
        for fund in FundType::all() {
            assert_eq!(FundType::parse(fund.as_str()), Some(fund));
        }
    }

    #[test]
    fn test_fund_type_parse_unknown() {
        assert_eq!(FundType::parse("savings"), None);
        assert_eq!(FundType::parse(""), None);
    }

    #[test]
    fn test_fund_type_parse_is_case_insensitive() {
        assert_eq!(FundType::parse("PETTY_CASH"), Some(FundType::PettyCash));
        assert_eq!(FundType::parse(" profit_bank "), Some(FundType::ProfitBank));
    }

    #[test]
    fn test_transaction_type_roundtrip() {
        for kind in [
            FundTransactionType::Income,
            FundTransactionType::Expense,
            FundTransactionType::TransferIn,
            FundTransactionType::TransferOut,
            FundTransactionType::Adjustment,
        ] {
            assert_eq!(FundTransactionType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FundTransactionType::parse("withdrawal"), None);
    }

    #[test]
    fn test_signed_applies_convention() {
        assert_eq!(FundTransactionType::Income.signed(dec!(100)), dec!(100));
        assert_eq!(FundTransactionType::Income.signed(dec!(-100)), dec!(100));
        assert_eq!(FundTransactionType::Expense.signed(dec!(100)), dec!(-100));
        assert_eq!(FundTransactionType::TransferOut.signed(dec!(50)), dec!(-50));
        assert_eq!(FundTransactionType::TransferIn.signed(dec!(-50)), dec!(50));
        assert_eq!(FundTransactionType::Adjustment.signed(dec!(-25)), dec!(-25));
        assert_eq!(FundTransactionType::Adjustment.signed(dec!(25)), dec!(25));
    }

    #[test]
    fn test_accepts_sign_convention() {
        assert!(FundTransactionType::Income.accepts(dec!(1)));
        assert!(!FundTransactionType::Income.accepts(dec!(-1)));
        assert!(FundTransactionType::Expense.accepts(dec!(-1)));
        assert!(!FundTransactionType::Expense.accepts(dec!(1)));
        assert!(FundTransactionType::Adjustment.accepts(dec!(-1)));
        assert!(FundTransactionType::Adjustment.accepts(dec!(1)));
    }

    #[test]
    fn test_fund_source_roundtrip() {
        for source in [
            FundSource::Expense,
            FundSource::TransactionUpdate,
            FundSource::FundTransfer,
            FundSource::ManualEntry,
            FundSource::RecurringExpense,
        ] {
            assert_eq!(FundSource::parse(source.as_str()), Some(source));
        }
    }

    #[test]
    fn test_display_matches_storage_key() {
        assert_eq!(FundType::PettyCash.to_string(), "petty_cash");
        assert_eq!(FundTransactionType::TransferOut.to_string(), "transfer_out");
        assert_eq!(FundSource::ManualEntry.to_string(), "manual_entry");
    }
}
