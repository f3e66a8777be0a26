//! Payment domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fund::{FundType, PlannedPosting};

/// Payment lifecycle of a project transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Not yet paid.
    #[serde(rename = "Belum Bayar")]
    BelumBayar,
    /// Down payment received.
    #[serde(rename = "DP")]
    Dp,
    /// Paid in full.
    #[serde(rename = "Lunas")]
    Lunas,
}

impl PaymentStatus {
    /// Returns the storage value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BelumBayar => "Belum Bayar",
            Self::Dp => "DP",
            Self::Lunas => "Lunas",
        }
    }

    /// Parses a status from its storage value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "belum bayar" | "belum_bayar" => Some(Self::BelumBayar),
            "dp" => Some(Self::Dp),
            "lunas" => Some(Self::Lunas),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cash already recognized for a transaction under a given status.
///
/// `Belum Bayar` has recognized nothing, `DP` the down payment, and
/// `Lunas` the full price.
#[must_use]
pub fn recognized_amount(
    status: PaymentStatus,
    down_payment: Decimal,
    total_profit: Decimal,
) -> Decimal {
    match status {
        PaymentStatus::BelumBayar => Decimal::ZERO,
        PaymentStatus::Dp => down_payment,
        PaymentStatus::Lunas => total_profit,
    }
}

/// A payment-status edit on a project transaction, as seen by the engine.
///
/// Old and new values are captured before the project row is updated so
/// the implied cash delta can be computed against the previous state.
#[derive(Debug, Clone, Copy)]
pub struct StatusChange {
    /// Status before the edit.
    pub old_status: PaymentStatus,
    /// Status after the edit.
    pub new_status: PaymentStatus,
    /// Down payment amount before the edit.
    pub old_down_payment: Decimal,
    /// Down payment amount after the edit.
    pub new_down_payment: Decimal,
    /// The transaction's full price.
    pub total_profit: Decimal,
    /// Destination fund before the edit.
    pub old_fund: FundType,
    /// Destination fund after the edit.
    pub new_fund: FundType,
}

impl StatusChange {
    /// Returns true if the destination fund was reassigned.
    #[must_use]
    pub fn fund_changed(&self) -> bool {
        self.old_fund != self.new_fund
    }
}

/// Cash that must move between funds because the destination changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundMove {
    /// Fund the cash leaves.
    pub from: FundType,
    /// Fund the cash enters.
    pub to: FundType,
    /// Positive amount to move.
    pub amount: Decimal,
}

/// The postings implied by one payment-status edit.
///
/// The fund move, when present, is executed before the status delta so
/// the delta lands on the fund that now holds the recognized cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPlan {
    /// Cash moved between funds when the destination changed.
    pub fund_move: Option<FundMove>,
    /// Signed delta posted to the current fund, if any.
    pub status_delta: Option<PlannedPosting>,
}

impl TransitionPlan {
    /// Returns true if the edit implies no ledger activity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fund_move.is_none() && self.status_delta.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PaymentStatus::BelumBayar,
            PaymentStatus::Dp,
            PaymentStatus::Lunas,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_variants() {
        assert_eq!(
            PaymentStatus::parse("belum bayar"),
            Some(PaymentStatus::BelumBayar)
        );
        assert_eq!(
            PaymentStatus::parse("belum_bayar"),
            Some(PaymentStatus::BelumBayar)
        );
        assert_eq!(PaymentStatus::parse("dp"), Some(PaymentStatus::Dp));
        assert_eq!(PaymentStatus::parse("LUNAS"), Some(PaymentStatus::Lunas));
        assert_eq!(PaymentStatus::parse("paid"), None);
    }

    #[test]
    fn test_recognized_amount() {
        let dp = dec!(3000000);
        let total = dec!(10000000);
        assert_eq!(
            recognized_amount(PaymentStatus::BelumBayar, dp, total),
            Decimal::ZERO
        );
        assert_eq!(recognized_amount(PaymentStatus::Dp, dp, total), dp);
        assert_eq!(recognized_amount(PaymentStatus::Lunas, dp, total), total);
    }

    #[test]
    fn test_status_serde_storage_values() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::BelumBayar).unwrap(),
            r#""Belum Bayar""#
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Dp).unwrap(),
            r#""DP""#
        );
    }
}
