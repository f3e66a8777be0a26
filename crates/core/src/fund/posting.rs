//! Posting math and validation.
//!
//! Balance arithmetic is pure: the store reads the previous balance, the
//! math here produces the snapshot recorded on the ledger row, and the
//! store persists both.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FundLedgerError;
use super::types::{FundTransactionType, FundType};

/// Balance movement produced by a single posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Balance before this posting.
    pub previous_balance: Decimal,
    /// Balance after this posting; recorded on the ledger row.
    pub balance_after: Decimal,
}

impl BalanceChange {
    /// Applies a signed amount to a balance.
    #[must_use]
    pub fn apply(previous_balance: Decimal, amount: Decimal) -> Self {
        Self {
            previous_balance,
            balance_after: previous_balance + amount,
        }
    }

    /// Chains another posting after this one.
    #[must_use]
    pub fn then(&self, amount: Decimal) -> Self {
        Self::apply(self.balance_after, amount)
    }
}

/// A posting computed by a planning step and executed by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPosting {
    /// The fund the posting applies to.
    pub fund: FundType,
    /// The posting classification.
    pub transaction_type: FundTransactionType,
    /// The signed amount, already following the sign convention.
    pub amount: Decimal,
}

/// Validates a posting amount against the sign convention for its type.
///
/// # Errors
///
/// Returns `ZeroAmount` for zero amounts and `SignMismatch` when the sign
/// contradicts the transaction type.
pub fn validate_posting(
    transaction_type: FundTransactionType,
    amount: Decimal,
) -> Result<(), FundLedgerError> {
    if amount.is_zero() {
        return Err(FundLedgerError::ZeroAmount);
    }
    if !transaction_type.accepts(amount) {
        return Err(FundLedgerError::SignMismatch {
            transaction_type,
            amount,
        });
    }
    Ok(())
}

/// Validates the funds and amount of a transfer request.
///
/// # Errors
///
/// Returns `SameFundTransfer` when both sides name the same fund and
/// `InvalidTransferAmount` unless the amount is strictly positive.
pub fn validate_transfer(
    from: FundType,
    to: FundType,
    amount: Decimal,
) -> Result<(), FundLedgerError> {
    if from == to {
        return Err(FundLedgerError::SameFundTransfer);
    }
    if amount <= Decimal::ZERO {
        return Err(FundLedgerError::InvalidTransferAmount(amount));
    }
    Ok(())
}

/// Returns the signed amounts for the two legs of a transfer.
///
/// The outgoing leg is always negative and the incoming leg positive;
/// together they sum to zero.
#[must_use]
pub fn transfer_amounts(amount: Decimal) -> (Decimal, Decimal) {
    let magnitude = amount.abs();
    (-magnitude, magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_change_apply() {
        let change = BalanceChange::apply(dec!(500000), dec!(-150000));
        assert_eq!(change.previous_balance, dec!(500000));
        assert_eq!(change.balance_after, dec!(350000));
    }

    #[test]
    fn test_balance_change_chain() {
        let change = BalanceChange::apply(dec!(1000000), dec!(-300000)).then(dec!(50000));
        assert_eq!(change.previous_balance, dec!(700000));
        assert_eq!(change.balance_after, dec!(750000));
    }

    #[test]
    fn test_balance_may_go_negative() {
        let change = BalanceChange::apply(dec!(100), dec!(-250));
        assert_eq!(change.balance_after, dec!(-150));
    }

    #[test]
    fn test_validate_posting_zero_rejected() {
        assert!(matches!(
            validate_posting(FundTransactionType::Income, Decimal::ZERO),
            Err(FundLedgerError::ZeroAmount)
        ));
    }

    #[test]
    fn test_validate_posting_sign_mismatch() {
        assert!(matches!(
            validate_posting(FundTransactionType::Expense, dec!(100)),
            Err(FundLedgerError::SignMismatch { .. })
        ));
        assert!(matches!(
            validate_posting(FundTransactionType::TransferIn, dec!(-100)),
            Err(FundLedgerError::SignMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_posting_accepts_convention() {
        assert!(validate_posting(FundTransactionType::Income, dec!(100)).is_ok());
        assert!(validate_posting(FundTransactionType::Expense, dec!(-100)).is_ok());
        assert!(validate_posting(FundTransactionType::Adjustment, dec!(-7)).is_ok());
        assert!(validate_posting(FundTransactionType::Adjustment, dec!(7)).is_ok());
    }

    #[test]
    fn test_validate_transfer_same_fund() {
        assert!(matches!(
            validate_transfer(FundType::PettyCash, FundType::PettyCash, dec!(100)),
            Err(FundLedgerError::SameFundTransfer)
        ));
    }

    #[test]
    fn test_validate_transfer_nonpositive_amount() {
        assert!(matches!(
            validate_transfer(FundType::PettyCash, FundType::ProfitBank, Decimal::ZERO),
            Err(FundLedgerError::InvalidTransferAmount(_))
        ));
        assert!(matches!(
            validate_transfer(FundType::PettyCash, FundType::ProfitBank, dec!(-10)),
            Err(FundLedgerError::InvalidTransferAmount(_))
        ));
    }

    #[test]
    fn test_transfer_amounts_conserve() {
        let (out_leg, in_leg) = transfer_amounts(dec!(300000));
        assert_eq!(out_leg, dec!(-300000));
        assert_eq!(in_leg, dec!(300000));
        assert_eq!(out_leg + in_leg, Decimal::ZERO);
    }
}
