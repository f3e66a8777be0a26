//! Property tests for the payment-status transition engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fund::FundType;

use super::engine::PaymentTransitionService;
use super::types::{PaymentStatus, StatusChange, recognized_amount};

/// Strategy for non-negative amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn status_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::BelumBayar),
        Just(PaymentStatus::Dp),
        Just(PaymentStatus::Lunas),
    ]
}

fn fund_strategy() -> impl Strategy<Value = FundType> {
    prop_oneof![Just(FundType::PettyCash), Just(FundType::ProfitBank)]
}

fn change_strategy() -> impl Strategy<Value = StatusChange> {
    (
        status_strategy(),
        status_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        fund_strategy(),
        fund_strategy(),
    )
        .prop_map(
            |(old_status, new_status, old_dp, new_dp, total, old_fund, new_fund)| StatusChange {
                old_status,
                new_status,
                old_down_payment: old_dp,
                new_down_payment: new_dp,
                total_profit: total,
                old_fund,
                new_fund,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The closed-form table is exactly the difference in recognized cash.
    ///
    /// For every transition, the delta equals
    /// `recognized(new_status, new_dp) - recognized(old_status, old_dp)`,
    /// which is what keeps the ledger in sync with the implicit value of
    /// the business record.
    #[test]
    fn prop_delta_is_recognized_difference(change in change_strategy()) {
        let delta = PaymentTransitionService::status_delta(&change);
        let expected = recognized_amount(
            change.new_status,
            change.new_down_payment,
            change.total_profit,
        ) - recognized_amount(
            change.old_status,
            change.old_down_payment,
            change.total_profit,
        );
        prop_assert_eq!(delta, expected);
    }

    /// Reverting a transition negates its delta.
    #[test]
    fn prop_reversion_negates_delta(change in change_strategy()) {
        let reverted = StatusChange {
            old_status: change.new_status,
            new_status: change.old_status,
            old_down_payment: change.new_down_payment,
            new_down_payment: change.old_down_payment,
            total_profit: change.total_profit,
            old_fund: change.new_fund,
            new_fund: change.old_fund,
        };
        prop_assert_eq!(
            PaymentTransitionService::status_delta(&change),
            -PaymentTransitionService::status_delta(&reverted)
        );
    }

    /// A plan's fund move carries exactly the cash recognized under the
    /// old status, and only when the destination fund changed.
    #[test]
    fn prop_fund_move_carries_old_recognized_amount(change in change_strategy()) {
        let plan = PaymentTransitionService::plan(&change).unwrap();
        let already_recognized = recognized_amount(
            change.old_status,
            change.old_down_payment,
            change.total_profit,
        );

        match plan.fund_move {
            Some(fund_move) => {
                prop_assert!(change.fund_changed());
                prop_assert_eq!(fund_move.from, change.old_fund);
                prop_assert_eq!(fund_move.to, change.new_fund);
                prop_assert_eq!(fund_move.amount, already_recognized);
            }
            None => {
                prop_assert!(!change.fund_changed() || already_recognized.is_zero());
            }
        }
    }

    /// The status delta, when present, is posted to the new fund with a
    /// transaction type matching its sign.
    #[test]
    fn prop_status_delta_lands_on_new_fund(change in change_strategy()) {
        let plan = PaymentTransitionService::plan(&change).unwrap();
        let delta = PaymentTransitionService::status_delta(&change);

        match plan.status_delta {
            Some(posting) => {
                prop_assert_eq!(posting.fund, change.new_fund);
                prop_assert_eq!(posting.amount, delta);
                prop_assert!(posting.transaction_type.accepts(posting.amount));
            }
            None => prop_assert!(delta.is_zero()),
        }
    }

    /// Executing the whole plan changes total cash across funds by
    /// exactly the status delta (fund moves conserve cash).
    #[test]
    fn prop_plan_net_effect_equals_delta(change in change_strategy()) {
        let plan = PaymentTransitionService::plan(&change).unwrap();
        let delta = PaymentTransitionService::status_delta(&change);

        let mut net = Decimal::ZERO;
        if let Some(posting) = plan.status_delta {
            net += posting.amount;
        }
        prop_assert_eq!(net, delta);
    }
}
