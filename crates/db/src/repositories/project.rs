//! Project transaction repository.
//!
//! Payment-status edits are the one place project rows touch the ledger:
//! the status write commits first and is authoritative, and the implied
//! postings run best-effort afterwards, reported through `fund_updates`.

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use aruskas_core::fund::{FundSource, FundType};
use aruskas_core::payment::{
    PaymentError, PaymentStatus, PaymentTransitionService, StatusChange, TransitionPlan,
};
use aruskas_shared::types::{ProjectId, UserId};

use crate::entities::project_transactions;
use crate::repositories::fund::{
    FundRepository, FundUpdates, PostFundTransaction, TransferFunds,
};

/// Error types for project transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Project transaction not found.
    #[error("Project transaction not found: {0}")]
    NotFound(Uuid),

    /// A stored fund key no longer resolves.
    #[error("Unknown fund type: '{0}'")]
    UnknownFundType(String),

    /// Transition planning failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a project transaction.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// The project's full price.
    pub total_profit: Decimal,
    /// Agreed down payment amount.
    pub down_payment_amount: Decimal,
    /// Initial payment status.
    pub payment_status: PaymentStatus,
    /// Destination fund for receipts.
    pub fund_type: FundType,
    /// User creating the project.
    pub created_by: Option<UserId>,
}

/// Input for a payment-status edit.
#[derive(Debug, Clone)]
pub struct UpdatePaymentStatusInput {
    /// The new payment status.
    pub payment_status: PaymentStatus,
    /// New down payment amount; unchanged when absent.
    pub down_payment_amount: Option<Decimal>,
    /// New destination fund; unchanged when absent.
    pub fund_type: Option<FundType>,
    /// User performing the edit.
    pub updated_by: Option<UserId>,
}

/// A payment-status edit together with its ledger-side outcome.
#[derive(Debug, Clone)]
pub struct PaymentStatusUpdate {
    /// The persisted project row.
    pub project: project_transactions::Model,
    /// Outcome of the best-effort ledger postings.
    pub fund_updates: FundUpdates,
}

/// Repository for project transactions.
#[derive(Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
    funds: FundRepository,
}

impl ProjectRepository {
    /// Creates a new project repository sharing the given fund repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, funds: FundRepository) -> Self {
        Self { db, funds }
    }

    /// Creates a project transaction.
    ///
    /// Creation itself never posts to the ledger; cash is recognized only
    /// through payment-status edits.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative amounts, or a database
    /// error if the insert fails.
    pub async fn create_project(
        &self,
        input: CreateProjectInput,
    ) -> Result<project_transactions::Model, ProjectError> {
        for (field, amount) in [
            ("total_profit", input.total_profit),
            ("down_payment_amount", input.down_payment_amount),
        ] {
            if amount < Decimal::ZERO {
                return Err(PaymentError::NegativeAmount { field, amount }.into());
            }
        }

        let now = chrono::Utc::now().into();
        let project = project_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            total_profit: Set(input.total_profit),
            down_payment_amount: Set(input.down_payment_amount),
            payment_status: Set(input.payment_status.into()),
            fund_type: Set(input.fund_type.as_str().to_string()),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(project.insert(&self.db).await?)
    }

    /// Applies a payment-status edit and synchronizes the ledger.
    ///
    /// The transition plan is computed before any write, so validation
    /// failures leave no partial state. The project update then commits
    /// and is authoritative; ledger execution (fund move first, then the
    /// status delta on the possibly-new fund) is best-effort and its
    /// outcome is returned in `fund_updates` for the caller to inspect.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing projects, a payment validation
    /// error, or a database error if the project update fails.
    pub async fn update_payment_status(
        &self,
        id: ProjectId,
        input: UpdatePaymentStatusInput,
    ) -> Result<PaymentStatusUpdate, ProjectError> {
        let project = project_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ProjectError::NotFound(id.into_inner()))?;

        let old_status: PaymentStatus = project.payment_status.clone().into();
        let old_fund = FundType::parse(&project.fund_type)
            .ok_or_else(|| ProjectError::UnknownFundType(project.fund_type.clone()))?;

        let change = StatusChange {
            old_status,
            new_status: input.payment_status,
            old_down_payment: project.down_payment_amount,
            new_down_payment: input
                .down_payment_amount
                .unwrap_or(project.down_payment_amount),
            total_profit: project.total_profit,
            old_fund,
            new_fund: input.fund_type.unwrap_or(old_fund),
        };
        let plan = PaymentTransitionService::plan(&change)?;

        let project_id = project.id;
        let name = project.name.clone();
        let mut active: project_transactions::ActiveModel = project.into();
        active.payment_status = Set(input.payment_status.into());
        if let Some(down_payment) = input.down_payment_amount {
            active.down_payment_amount = Set(down_payment);
        }
        if let Some(fund_type) = input.fund_type {
            active.fund_type = Set(fund_type.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let project = active.update(&self.db).await?;

        let fund_updates = self
            .execute_plan(&plan, &change, project_id, &name, input.updated_by)
            .await;

        Ok(PaymentStatusUpdate {
            project,
            fund_updates,
        })
    }

    /// Finds a project transaction by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_project_by_id(
        &self,
        id: ProjectId,
    ) -> Result<Option<project_transactions::Model>, ProjectError> {
        Ok(project_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Executes a transition plan best-effort: fund move first, then the
    /// status delta. The first failure stops execution and is reported.
    async fn execute_plan(
        &self,
        plan: &TransitionPlan,
        change: &StatusChange,
        project_id: Uuid,
        name: &str,
        updated_by: Option<UserId>,
    ) -> FundUpdates {
        if plan.is_empty() {
            return FundUpdates::none_needed();
        }

        if let Some(fund_move) = plan.fund_move {
            let result = self
                .funds
                .transfer(TransferFunds {
                    from: fund_move.from,
                    to: fund_move.to,
                    amount: fund_move.amount,
                    description: format!("Fund reassignment for '{name}'"),
                    created_by: updated_by,
                })
                .await;

            if let Err(err) = result {
                tracing::error!(
                    project_id = %project_id,
                    from_fund = %fund_move.from,
                    to_fund = %fund_move.to,
                    amount = %fund_move.amount,
                    error = %err,
                    "fund reassignment failed; project record remains authoritative"
                );
                return FundUpdates::failed(&err);
            }
        }

        if let Some(posting) = plan.status_delta {
            let result = self
                .funds
                .post(PostFundTransaction {
                    fund_type: posting.fund,
                    transaction_type: posting.transaction_type,
                    amount: posting.amount,
                    description: format!(
                        "Payment status {} -> {} for '{name}'",
                        change.old_status, change.new_status
                    ),
                    source: FundSource::TransactionUpdate,
                    source_id: Some(project_id),
                    reference_id: None,
                    created_by: updated_by,
                })
                .await;

            if let Err(err) = result {
                tracing::error!(
                    project_id = %project_id,
                    fund_type = %posting.fund,
                    amount = %posting.amount,
                    error = %err,
                    "status delta posting failed; project record remains authoritative"
                );
                return FundUpdates::failed(&err);
            }
        }

        FundUpdates::ok()
    }
}
