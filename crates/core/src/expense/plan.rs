//! Ledger planning for expense edits.

use rust_decimal::Decimal;

use crate::fund::{FundTransactionType, FundType, PlannedPosting};

use super::error::ExpensePlanError;

/// An amount/fund edit on an expense, captured before the row is updated.
#[derive(Debug, Clone, Copy)]
pub struct ExpenseChange {
    /// Amount before the edit (positive magnitude).
    pub old_amount: Decimal,
    /// Amount after the edit (positive magnitude).
    pub new_amount: Decimal,
    /// Fund drawn from before the edit.
    pub old_fund: FundType,
    /// Fund drawn from after the edit.
    pub new_fund: FundType,
}

/// Plans the postings that reconcile the funds with an expense edit.
///
/// Same fund: a single adjustment of `-(new - old)`, skipped when the
/// amount is unchanged. Fund changed: the old amount is returned to the
/// old fund as an adjustment and the new amount drawn from the new fund
/// as an expense posting.
///
/// # Errors
///
/// Returns `ExpensePlanError::NegativeAmount` if either amount is
/// negative.
pub fn edit_plan(change: &ExpenseChange) -> Result<Vec<PlannedPosting>, ExpensePlanError> {
    for amount in [change.old_amount, change.new_amount] {
        if amount < Decimal::ZERO {
            return Err(ExpensePlanError::NegativeAmount(amount));
        }
    }

    if change.old_fund == change.new_fund {
        let delta = change.new_amount - change.old_amount;
        if delta.is_zero() {
            return Ok(Vec::new());
        }
        return Ok(vec![PlannedPosting {
            fund: change.new_fund,
            transaction_type: FundTransactionType::Adjustment,
            amount: -delta,
        }]);
    }

    let mut postings = Vec::with_capacity(2);
    if !change.old_amount.is_zero() {
        postings.push(PlannedPosting {
            fund: change.old_fund,
            transaction_type: FundTransactionType::Adjustment,
            amount: change.old_amount,
        });
    }
    if !change.new_amount.is_zero() {
        postings.push(PlannedPosting {
            fund: change.new_fund,
            transaction_type: FundTransactionType::Expense,
            amount: -change.new_amount,
        });
    }
    Ok(postings)
}
