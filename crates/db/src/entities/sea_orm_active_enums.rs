//! String-backed active enums shared by the entities.
//!
//! `fund_type` stays a plain string column so new funds can be introduced
//! without a schema change; the closed sets below ride VARCHAR columns
//! with CHECK constraints.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use aruskas_core::fund::FundTransactionType as CoreFundTransactionType;
use aruskas_core::fund::FundSource as CoreFundSource;
use aruskas_core::payment::PaymentStatus as CorePaymentStatus;

/// Classification of a fund ledger posting.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FundTransactionType {
    /// Cash received into a fund.
    #[sea_orm(string_value = "income")]
    Income,
    /// Cash paid out of a fund.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Receiving side of a transfer.
    #[sea_orm(string_value = "transfer_in")]
    TransferIn,
    /// Sending side of a transfer.
    #[sea_orm(string_value = "transfer_out")]
    TransferOut,
    /// Manual correction, either sign.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<CoreFundTransactionType> for FundTransactionType {
    fn from(value: CoreFundTransactionType) -> Self {
        match value {
            CoreFundTransactionType::Income => Self::Income,
            CoreFundTransactionType::Expense => Self::Expense,
            CoreFundTransactionType::TransferIn => Self::TransferIn,
            CoreFundTransactionType::TransferOut => Self::TransferOut,
            CoreFundTransactionType::Adjustment => Self::Adjustment,
        }
    }
}

impl From<FundTransactionType> for CoreFundTransactionType {
    fn from(value: FundTransactionType) -> Self {
        match value {
            FundTransactionType::Income => Self::Income,
            FundTransactionType::Expense => Self::Expense,
            FundTransactionType::TransferIn => Self::TransferIn,
            FundTransactionType::TransferOut => Self::TransferOut,
            FundTransactionType::Adjustment => Self::Adjustment,
        }
    }
}

/// Provenance of a fund ledger posting.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum FundSourceType {
    /// Expense creation or edit.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Payment-status change on a project transaction.
    #[sea_orm(string_value = "transaction_update")]
    TransactionUpdate,
    /// One leg of a fund-to-fund transfer.
    #[sea_orm(string_value = "fund_transfer")]
    FundTransfer,
    /// Manual posting entered directly against a fund.
    #[sea_orm(string_value = "manual_entry")]
    ManualEntry,
    /// Materialized recurring expense.
    #[sea_orm(string_value = "recurring_expense")]
    RecurringExpense,
}

impl From<CoreFundSource> for FundSourceType {
    fn from(value: CoreFundSource) -> Self {
        match value {
            CoreFundSource::Expense => Self::Expense,
            CoreFundSource::TransactionUpdate => Self::TransactionUpdate,
            CoreFundSource::FundTransfer => Self::FundTransfer,
            CoreFundSource::ManualEntry => Self::ManualEntry,
            CoreFundSource::RecurringExpense => Self::RecurringExpense,
        }
    }
}

impl From<FundSourceType> for CoreFundSource {
    fn from(value: FundSourceType) -> Self {
        match value {
            FundSourceType::Expense => Self::Expense,
            FundSourceType::TransactionUpdate => Self::TransactionUpdate,
            FundSourceType::FundTransfer => Self::FundTransfer,
            FundSourceType::ManualEntry => Self::ManualEntry,
            FundSourceType::RecurringExpense => Self::RecurringExpense,
        }
    }
}

/// Payment lifecycle of a project transaction or subscription.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    /// Not yet paid.
    #[sea_orm(string_value = "Belum Bayar")]
    BelumBayar,
    /// Down payment received.
    #[sea_orm(string_value = "DP")]
    Dp,
    /// Paid in full.
    #[sea_orm(string_value = "Lunas")]
    Lunas,
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(value: CorePaymentStatus) -> Self {
        match value {
            CorePaymentStatus::BelumBayar => Self::BelumBayar,
            CorePaymentStatus::Dp => Self::Dp,
            CorePaymentStatus::Lunas => Self::Lunas,
        }
    }
}

impl From<PaymentStatus> for CorePaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::BelumBayar => Self::BelumBayar,
            PaymentStatus::Dp => Self::Dp,
            PaymentStatus::Lunas => Self::Lunas,
        }
    }
}

/// Inventory item classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ItemType {
    /// Physical or digital product.
    #[sea_orm(string_value = "product")]
    Product,
    /// Recurring subscription asset.
    #[sea_orm(string_value = "subscription")]
    Subscription,
}
