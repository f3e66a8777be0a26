//! Expense repository.
//!
//! Expense rows are the most common ledger poster: creation draws cash
//! from the expense's fund and edits reconcile the difference. The
//! expense write is authoritative; ledger postings are best-effort and
//! reported back through `FundUpdates`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use aruskas_core::expense::{ExpenseChange, ExpensePlanError, edit_plan};
use aruskas_core::fund::{FundSource, FundTransactionType, FundType, PlannedPosting};
use aruskas_shared::types::{ExpenseId, InventoryItemId, ProjectId, UserId};

use crate::entities::expenses;
use crate::repositories::fund::{FundRepository, FundUpdates, PostFundTransaction};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found or already deleted.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Expense amounts must be positive.
    #[error("Expense amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// A stored fund key no longer resolves.
    #[error("Unknown fund type: '{0}'")]
    UnknownFundType(String),

    /// Edit planning failed.
    #[error(transparent)]
    Plan(#[from] ExpensePlanError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Expense category label.
    pub category: String,
    /// Human-readable description.
    pub description: String,
    /// Positive amount drawn from the fund.
    pub amount: Decimal,
    /// The fund the expense draws from.
    pub fund_type: FundType,
    /// Linked project transaction, if any.
    pub project_id: Option<ProjectId>,
    /// Linked inventory item, if any.
    pub inventory_id: Option<InventoryItemId>,
    /// The date the expense applies to.
    pub expense_date: NaiveDate,
    /// True for recurring templates; templates never post to the ledger.
    pub is_recurring: bool,
    /// Billing frequency for recurring templates.
    pub recurring_frequency: Option<String>,
    /// Next billing date for recurring templates.
    pub next_billing_date: Option<NaiveDate>,
    /// User creating the expense.
    pub created_by: Option<UserId>,
}

/// Input for updating an expense.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// New category.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New amount (positive).
    pub amount: Option<Decimal>,
    /// New fund to draw from.
    pub fund_type: Option<FundType>,
    /// New expense date.
    pub expense_date: Option<NaiveDate>,
}

/// An expense write together with its ledger-side outcome.
#[derive(Debug, Clone)]
pub struct ExpenseWithFundUpdates {
    /// The persisted expense row.
    pub expense: expenses::Model,
    /// Outcome of the best-effort ledger postings.
    pub fund_updates: FundUpdates,
}

/// Expense repository for CRUD operations and their ledger side effects.
#[derive(Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
    funds: FundRepository,
}

impl ExpenseRepository {
    /// Creates a new expense repository sharing the given fund repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, funds: FundRepository) -> Self {
        Self { db, funds }
    }

    /// Creates an expense and draws its amount from the fund.
    ///
    /// Recurring templates are stored without any ledger posting; only
    /// the concrete instances they spawn move cash. The ledger posting
    /// for a regular expense is best-effort: its failure is logged and
    /// reported in `fund_updates`, never rolled into the expense write.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` before any write, or a database error if
    /// the expense insert itself fails.
    pub async fn create_expense(
        &self,
        input: CreateExpenseInput,
    ) -> Result<ExpenseWithFundUpdates, ExpenseError> {
        if input.amount <= Decimal::ZERO {
            return Err(ExpenseError::InvalidAmount(input.amount));
        }

        let now = chrono::Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(input.category),
            description: Set(input.description),
            amount: Set(input.amount),
            fund_type: Set(input.fund_type.as_str().to_string()),
            project_id: Set(input.project_id.map(ProjectId::into_inner)),
            inventory_id: Set(input.inventory_id.map(InventoryItemId::into_inner)),
            expense_date: Set(input.expense_date),
            is_recurring: Set(input.is_recurring),
            recurring_frequency: Set(input.recurring_frequency.filter(|_| input.is_recurring)),
            next_billing_date: Set(input.next_billing_date.filter(|_| input.is_recurring)),
            last_processed_date: Set(None),
            deleted_at: Set(None),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let expense = expense.insert(&self.db).await?;

        let fund_updates = if expense.is_recurring {
            FundUpdates::none_needed()
        } else {
            self.execute_postings(
                &[PlannedPosting {
                    fund: input.fund_type,
                    transaction_type: FundTransactionType::Expense,
                    amount: -expense.amount,
                }],
                FundSource::Expense,
                expense.id,
                &expense.description,
                input.created_by,
            )
            .await
        };

        Ok(ExpenseWithFundUpdates {
            expense,
            fund_updates,
        })
    }

    /// Updates an expense and reconciles the funds with the edit.
    ///
    /// The postings are planned before the row is written, so validation
    /// errors leave no partial state; the row update then commits first
    /// and the postings run best-effort.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing or deleted expenses,
    /// `InvalidAmount`/`Plan` for invalid inputs, or a database error.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        input: UpdateExpenseInput,
    ) -> Result<ExpenseWithFundUpdates, ExpenseError> {
        let expense = self.find_active(id.into_inner()).await?;

        if let Some(amount) = input.amount
            && amount <= Decimal::ZERO
        {
            return Err(ExpenseError::InvalidAmount(amount));
        }

        let old_fund = parse_fund(&expense.fund_type)?;
        let change = ExpenseChange {
            old_amount: expense.amount,
            new_amount: input.amount.unwrap_or(expense.amount),
            old_fund,
            new_fund: input.fund_type.unwrap_or(old_fund),
        };
        let postings = if expense.is_recurring {
            Vec::new()
        } else {
            edit_plan(&change)?
        };

        let expense_id = expense.id;
        let created_by = expense.created_by.map(UserId::from_uuid);
        let mut active: expenses::ActiveModel = expense.into();
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(fund_type) = input.fund_type {
            active.fund_type = Set(fund_type.as_str().to_string());
        }
        if let Some(expense_date) = input.expense_date {
            active.expense_date = Set(expense_date);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let expense = active.update(&self.db).await?;

        let fund_updates = if postings.is_empty() {
            FundUpdates::none_needed()
        } else {
            self.execute_postings(
                &postings,
                FundSource::Expense,
                expense_id,
                &expense.description,
                created_by,
            )
            .await
        };

        Ok(ExpenseWithFundUpdates {
            expense,
            fund_updates,
        })
    }

    /// Soft-deletes an expense.
    ///
    /// No compensating ledger posting is made; deletion is not one of
    /// the ledger's call sites.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing or already-deleted expenses.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), ExpenseError> {
        let expense = self.find_active(id.into_inner()).await?;

        let mut active: expenses::ActiveModel = expense.into();
        active.deleted_at = Set(Some(chrono::Utc::now().into()));
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Finds a non-deleted expense by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_expense_by_id(
        &self,
        id: ExpenseId,
    ) -> Result<Option<expenses::Model>, ExpenseError> {
        let expense = expenses::Entity::find_by_id(id.into_inner())
            .filter(expenses::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(expense)
    }

    async fn find_active(&self, id: Uuid) -> Result<expenses::Model, ExpenseError> {
        expenses::Entity::find_by_id(id)
            .filter(expenses::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    /// Executes planned postings sequentially, stopping at the first
    /// failure and reporting it instead of propagating.
    async fn execute_postings(
        &self,
        postings: &[PlannedPosting],
        source: FundSource,
        source_id: Uuid,
        description: &str,
        created_by: Option<UserId>,
    ) -> FundUpdates {
        for posting in postings {
            let result = self
                .funds
                .post(PostFundTransaction {
                    fund_type: posting.fund,
                    transaction_type: posting.transaction_type,
                    amount: posting.amount,
                    description: description.to_string(),
                    source,
                    source_id: Some(source_id),
                    reference_id: None,
                    created_by,
                })
                .await;

            if let Err(err) = result {
                tracing::warn!(
                    fund_type = %posting.fund,
                    amount = %posting.amount,
                    source_id = %source_id,
                    error = %err,
                    "expense ledger posting failed; expense record remains authoritative"
                );
                return FundUpdates::failed(&err);
            }
        }
        FundUpdates::ok()
    }
}

fn parse_fund(value: &str) -> Result<FundType, ExpenseError> {
    FundType::parse(value).ok_or_else(|| ExpenseError::UnknownFundType(value.to_string()))
}
