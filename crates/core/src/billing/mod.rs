//! Recurring billing cycle calculations.

pub mod cycle;

pub use cycle::{BillingFrequency, next_billing_date};
