//! Payment-status transition engine.
//!
//! Computes the cash postings implied by moving a project transaction
//! between payment states, including reversions and destination-fund
//! reassignments. Pure logic; execution against the ledger lives in the
//! repository layer.

use rust_decimal::Decimal;

use crate::fund::{FundTransactionType, PlannedPosting};
use crate::payment::error::PaymentError;
use crate::payment::types::{
    FundMove, PaymentStatus, StatusChange, TransitionPlan, recognized_amount,
};

/// Stateless service computing transition plans for payment-status edits.
pub struct PaymentTransitionService;

impl PaymentTransitionService {
    /// Computes the signed cash delta implied by a status edit.
    ///
    /// All six directed pairs over the three statuses are legal, since a
    /// wrongly-entered status can be reverted. Keyed by (old, new):
    /// - `Belum Bayar -> DP`: `+new_dp`
    /// - `Belum Bayar -> Lunas`: `+total`
    /// - `DP -> Lunas`: `+(total - old_dp)`
    /// - `DP -> DP` (amount edited): `+(new_dp - old_dp)`
    /// - `Lunas -> DP`: `+(new_dp - total)`
    /// - `Lunas -> Belum Bayar`: `-total`
    /// - `DP -> Belum Bayar`: `-old_dp`
    /// - unchanged otherwise: `0`
    #[must_use]
    pub fn status_delta(change: &StatusChange) -> Decimal {
        use PaymentStatus::{BelumBayar, Dp, Lunas};

        match (change.old_status, change.new_status) {
            (BelumBayar, Dp) => change.new_down_payment,
            (BelumBayar, Lunas) => change.total_profit,
            (Dp, Lunas) => change.total_profit - change.old_down_payment,
            (Dp, Dp) => change.new_down_payment - change.old_down_payment,
            (Lunas, Dp) => change.new_down_payment - change.total_profit,
            (Lunas, BelumBayar) => -change.total_profit,
            (Dp, BelumBayar) => -change.old_down_payment,
            (BelumBayar, BelumBayar) | (Lunas, Lunas) => Decimal::ZERO,
        }
    }

    /// Plans the ledger activity for a payment-status edit.
    ///
    /// When the destination fund changed, the cash recognized under the
    /// OLD status is moved from the old fund to the new one first; the
    /// status delta is then posted to the (possibly new) current fund as
    /// income when positive or expense when negative. A zero delta
    /// produces no posting.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NegativeAmount` if any monetary input is
    /// negative; no plan is produced in that case.
    pub fn plan(change: &StatusChange) -> Result<TransitionPlan, PaymentError> {
        Self::validate_amounts(change)?;

        let fund_move = if change.fund_changed() {
            let already_recognized = recognized_amount(
                change.old_status,
                change.old_down_payment,
                change.total_profit,
            );
            (already_recognized > Decimal::ZERO).then(|| FundMove {
                from: change.old_fund,
                to: change.new_fund,
                amount: already_recognized,
            })
        } else {
            None
        };

        let delta = Self::status_delta(change);
        let status_delta = (!delta.is_zero()).then(|| {
            let transaction_type = if delta > Decimal::ZERO {
                FundTransactionType::Income
            } else {
                FundTransactionType::Expense
            };
            PlannedPosting {
                fund: change.new_fund,
                transaction_type,
                amount: delta,
            }
        });

        Ok(TransitionPlan {
            fund_move,
            status_delta,
        })
    }

    fn validate_amounts(change: &StatusChange) -> Result<(), PaymentError> {
        for (field, amount) in [
            ("old_down_payment_amount", change.old_down_payment),
            ("new_down_payment_amount", change.new_down_payment),
            ("total_profit", change.total_profit),
        ] {
            if amount < Decimal::ZERO {
                return Err(PaymentError::NegativeAmount { field, amount });
            }
        }
        Ok(())
    }
}
