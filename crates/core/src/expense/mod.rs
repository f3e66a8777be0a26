//! Expense edit planning.
//!
//! An expense edit can change the amount, the fund it draws from, or
//! both; this module computes the ledger postings that keep the funds in
//! line with the edited record.

pub mod error;
pub mod plan;

pub use error::ExpensePlanError;
pub use plan::{ExpenseChange, edit_plan};
