//! Payment status transitions and their cash deltas.
//!
//! A project transaction moves between `Belum Bayar`, `DP` and `Lunas`;
//! every transition implies a cash posting, and a fund reassignment
//! implies a transfer. This module computes those plans purely; the
//! repositories execute them.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::PaymentTransitionService;
pub use error::PaymentError;
pub use types::{FundMove, PaymentStatus, StatusChange, TransitionPlan, recognized_amount};
