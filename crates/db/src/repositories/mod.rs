//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. They also own the best-effort ledger side of every
//! business write, reported back through `FundUpdates`.

pub mod expense;
pub mod fund;
pub mod project;
pub mod recurring;

pub use expense::{
    CreateExpenseInput, ExpenseError, ExpenseRepository, ExpenseWithFundUpdates,
    UpdateExpenseInput,
};
pub use fund::{
    FundError, FundRepository, FundTransactionFilter, FundUpdates, PostFundTransaction,
    TransferFunds, TransferResult,
};
pub use project::{
    CreateProjectInput, PaymentStatusUpdate, ProjectError, ProjectRepository,
    UpdatePaymentStatusInput,
};
pub use recurring::{ProcessOutcome, ProcessStatus, RecurringError, RecurringPaymentProcessor};

use aruskas_shared::AppError;

// Boundary mappings for the route layer: repository errors collapse into
// the application error envelope with its status and error codes.

impl From<FundError> for AppError {
    fn from(err: FundError) -> Self {
        match err {
            FundError::Ledger(inner) => Self::Validation(inner.to_string()),
            FundError::PartialTransfer { .. } => Self::Internal(err.to_string()),
            FundError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound(_) => Self::NotFound(err.to_string()),
            ExpenseError::InvalidAmount(_)
            | ExpenseError::UnknownFundType(_)
            | ExpenseError::Plan(_) => Self::Validation(err.to_string()),
            ExpenseError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound(_) => Self::NotFound(err.to_string()),
            ProjectError::UnknownFundType(_) | ProjectError::Payment(_) => {
                Self::Validation(err.to_string())
            }
            ProjectError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

impl From<RecurringError> for AppError {
    fn from(err: RecurringError) -> Self {
        match err {
            RecurringError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aruskas_core::fund::FundLedgerError;
    use aruskas_core::payment::PaymentError;
    use uuid::Uuid;

    #[test]
    fn test_fund_errors_map_to_app_errors() {
        let err: AppError = FundError::Ledger(FundLedgerError::ZeroAmount).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err: AppError = FundError::PartialTransfer {
            committed_leg: Uuid::new_v4(),
            to_fund: "profit_bank".to_string(),
            source: Box::new(FundError::Database(sea_orm::DbErr::Custom(
                "connection lost".to_string(),
            ))),
        }
        .into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_not_found_errors_map_to_404() {
        let err: AppError = ExpenseError::NotFound(Uuid::new_v4()).into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = ProjectError::NotFound(Uuid::new_v4()).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        let err: AppError = ProjectError::Payment(PaymentError::UnknownStatus("paid".into())).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = ExpenseError::UnknownFundType("savings".into()).into();
        assert_eq!(err.status_code(), 400);
    }
}
