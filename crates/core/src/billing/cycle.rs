//! Billing cycle calculator.
//!
//! Maps (current date, frequency) to the next billing date. Pure and
//! deterministic: no I/O, no clock access.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring expense bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillingFrequency {
    /// Every calendar month.
    Monthly,
    /// Every three calendar months.
    Quarterly,
    /// Every calendar year.
    Annually,
}

impl BillingFrequency {
    /// Parses a frequency value.
    ///
    /// Unrecognized or missing values fall back to `Monthly`; the caller
    /// never sees an error for a bad frequency string.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_uppercase()).as_deref() {
            Some("QUARTERLY") => Self::Quarterly,
            Some("ANNUALLY") => Self::Annually,
            _ => Self::Monthly,
        }
    }

    /// Returns the storage key for this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Annually => "ANNUALLY",
        }
    }

    /// Length of one billing period in calendar months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annually => 12,
        }
    }
}

impl fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes the next billing date after `current` for the given frequency.
///
/// Month arithmetic keeps the day-of-month and rolls overflow into the
/// following month instead of clamping: Jan 31 + 1 month lands on Mar 3
/// in a non-leap year, and Feb 29 + 1 year lands on Mar 1.
#[must_use]
pub fn next_billing_date(current: NaiveDate, frequency: BillingFrequency) -> NaiveDate {
    add_months_rolling(current, frequency.months())
}

/// Adds calendar months with day-overflow rollover.
#[allow(clippy::cast_possible_wrap)]
fn add_months_rolling(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;

    let Some(first_of_month) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return date;
    };
    first_of_month
        .checked_add_days(Days::new(u64::from(date.day() - 1)))
        .unwrap_or(date)
}
