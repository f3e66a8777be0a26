//! Property tests for posting math and sign conventions.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::posting::{BalanceChange, transfer_amounts, validate_posting};
use super::types::FundTransactionType;

/// Strategy for generating signed amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating a sequence of signed amounts.
fn amounts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(amount_strategy(), 1..=max_len)
}

fn transaction_type_strategy() -> impl Strategy<Value = FundTransactionType> {
    prop_oneof![
        Just(FundTransactionType::Income),
        Just(FundTransactionType::Expense),
        Just(FundTransactionType::TransferIn),
        Just(FundTransactionType::TransferOut),
        Just(FundTransactionType::Adjustment),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A posting's balance-after always equals previous plus amount.
    #[test]
    fn prop_balance_after_equals_previous_plus_amount(
        previous in amount_strategy(),
        amount in amount_strategy(),
    ) {
        let change = BalanceChange::apply(previous, amount);
        prop_assert_eq!(change.balance_after, change.previous_balance + amount);
    }

    /// A chain of postings ends at the initial balance plus the sum of amounts.
    #[test]
    fn prop_chain_final_balance_equals_sum(
        initial in amount_strategy(),
        amounts in amounts_strategy(20),
    ) {
        let mut change = BalanceChange::apply(initial, amounts[0]);
        for amount in amounts.iter().skip(1) {
            change = change.then(*amount);
        }

        let expected: Decimal = initial + amounts.iter().copied().sum::<Decimal>();
        prop_assert_eq!(change.balance_after, expected);
    }

    /// The signed helper always produces an amount the same type accepts.
    #[test]
    fn prop_signed_amount_is_accepted(
        kind in transaction_type_strategy(),
        magnitude in amount_strategy(),
    ) {
        prop_assume!(!magnitude.is_zero());

        let signed = kind.signed(magnitude);
        prop_assert!(kind.accepts(signed));
        prop_assert!(validate_posting(kind, signed).is_ok());
    }

    /// Transfer legs always conserve cash across the two funds.
    #[test]
    fn prop_transfer_legs_sum_to_zero(amount in amount_strategy()) {
        let (out_leg, in_leg) = transfer_amounts(amount);
        prop_assert_eq!(out_leg + in_leg, Decimal::ZERO);
        prop_assert!(out_leg <= Decimal::ZERO);
        prop_assert!(in_leg >= Decimal::ZERO);
    }

    /// Applying both transfer legs leaves the combined balances unchanged.
    #[test]
    fn prop_transfer_conserves_combined_balance(
        from_balance in amount_strategy(),
        to_balance in amount_strategy(),
        amount in amount_strategy(),
    ) {
        prop_assume!(amount > Decimal::ZERO);

        let (out_leg, in_leg) = transfer_amounts(amount);
        let from_after = BalanceChange::apply(from_balance, out_leg).balance_after;
        let to_after = BalanceChange::apply(to_balance, in_leg).balance_after;

        prop_assert_eq!(from_after + to_after, from_balance + to_balance);
    }
}
