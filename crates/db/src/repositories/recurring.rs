//! Recurring payment processor.
//!
//! Batch job over recurring expense templates: each due template spawns
//! a concrete expense for the period, advances its billing date, keeps
//! any linked subscription inventory in lockstep, and draws the cash
//! from the template's fund. Items are processed independently; one
//! failure never aborts its siblings.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use aruskas_core::billing::{BillingFrequency, next_billing_date};
use aruskas_core::fund::{FundSource, FundTransactionType, FundType};
use aruskas_shared::types::{ExpenseId, UserId};

use crate::entities::sea_orm_active_enums::{ItemType, PaymentStatus};
use crate::entities::{expenses, inventory_items};
use crate::repositories::fund::{FundRepository, FundUpdates, PostFundTransaction};

/// Error types for the batch itself.
///
/// Per-item failures are captured in `ProcessOutcome`; the batch call
/// only fails when the due-list cannot be read at all.
#[derive(Debug, thiserror::Error)]
pub enum RecurringError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result status of one processed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    /// The template was materialized and advanced.
    Processed,
    /// The template failed; see the error message.
    Failed,
}

/// Per-template result of a processor run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// The recurring template this outcome belongs to.
    pub template_id: Uuid,
    /// The concrete expense spawned for the period, when successful.
    pub new_expense_id: Option<Uuid>,
    /// The template's advanced billing date, when successful.
    pub next_billing_date: Option<NaiveDate>,
    /// Whether the item succeeded.
    pub status: ProcessStatus,
    /// Failure description for failed items.
    pub error: Option<String>,
    /// Ledger-side outcome for successful items.
    pub fund_updates: Option<FundUpdates>,
}

/// Batch processor for due recurring expense templates.
#[derive(Clone)]
pub struct RecurringPaymentProcessor {
    db: DatabaseConnection,
    funds: FundRepository,
}

impl RecurringPaymentProcessor {
    /// Creates a new processor sharing the given fund repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, funds: FundRepository) -> Self {
        Self { db, funds }
    }

    /// Processes every active template due on or before `cutoff`.
    ///
    /// A template whose `next_billing_date` has already advanced past
    /// the cutoff is excluded by the selection filter, which is what
    /// makes repeated cron triggers safe. `specific_ids` restricts the
    /// selection without widening it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the due-list query fails; per-item
    /// failures are recorded in the returned outcomes.
    pub async fn run(
        &self,
        cutoff: NaiveDate,
        specific_ids: Option<Vec<ExpenseId>>,
        acting_user: Option<UserId>,
    ) -> Result<Vec<ProcessOutcome>, RecurringError> {
        // next_billing_date < cutoff + 1 day, on a DATE column.
        let mut query = expenses::Entity::find()
            .filter(expenses::Column::IsRecurring.eq(true))
            .filter(expenses::Column::DeletedAt.is_null())
            .filter(expenses::Column::NextBillingDate.lte(cutoff));

        if let Some(ids) = specific_ids {
            query = query.filter(
                expenses::Column::Id.is_in(ids.into_iter().map(ExpenseId::into_inner)),
            );
        }

        let templates = query.all(&self.db).await?;
        tracing::info!(
            count = templates.len(),
            cutoff = %cutoff,
            "processing due recurring expenses"
        );

        let mut outcomes = Vec::with_capacity(templates.len());
        for template in templates {
            outcomes.push(self.process_template(template, acting_user).await);
        }
        Ok(outcomes)
    }

    async fn process_template(
        &self,
        template: expenses::Model,
        acting_user: Option<UserId>,
    ) -> ProcessOutcome {
        let template_id = template.id;
        match self.materialize(&template, acting_user).await {
            Ok((instance, advanced_to, fund_updates)) => ProcessOutcome {
                template_id,
                new_expense_id: Some(instance.id),
                next_billing_date: Some(advanced_to),
                status: ProcessStatus::Processed,
                error: None,
                fund_updates: Some(fund_updates),
            },
            Err(err) => {
                tracing::error!(
                    template_id = %template_id,
                    error = %err,
                    "recurring template processing failed"
                );
                ProcessOutcome {
                    template_id,
                    new_expense_id: None,
                    next_billing_date: None,
                    status: ProcessStatus::Failed,
                    error: Some(err.to_string()),
                    fund_updates: None,
                }
            }
        }
    }

    /// Materializes one template: concrete expense, advanced template,
    /// inventory lockstep, then the best-effort fund posting.
    async fn materialize(
        &self,
        template: &expenses::Model,
        acting_user: Option<UserId>,
    ) -> Result<(expenses::Model, NaiveDate, FundUpdates), DbErr> {
        let now = Utc::now();
        let today = now.date_naive();

        let frequency = BillingFrequency::parse(template.recurring_frequency.as_deref());
        let advanced_to = next_billing_date(template.next_billing_date.unwrap_or(today), frequency);

        let created_by = acting_user
            .map(UserId::into_inner)
            .or(template.created_by);

        let instance = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(template.category.clone()),
            description: Set(format!("{} ({today})", template.description)),
            amount: Set(template.amount),
            fund_type: Set(template.fund_type.clone()),
            project_id: Set(template.project_id),
            inventory_id: Set(template.inventory_id),
            expense_date: Set(today),
            is_recurring: Set(false),
            recurring_frequency: Set(None),
            next_billing_date: Set(None),
            last_processed_date: Set(None),
            deleted_at: Set(None),
            created_by: Set(created_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let instance = instance.insert(&self.db).await?;

        let mut active: expenses::ActiveModel = template.clone().into();
        active.last_processed_date = Set(Some(now.into()));
        active.next_billing_date = Set(Some(advanced_to));
        active.updated_at = Set(now.into());
        active.update(&self.db).await?;

        if let Some(inventory_id) = template.inventory_id {
            self.sync_subscription(inventory_id, today, advanced_to)
                .await?;
        }

        let fund_updates = self
            .draw_from_fund(template, instance.id, created_by.map(UserId::from_uuid))
            .await;

        Ok((instance, advanced_to, fund_updates))
    }

    /// Updates a linked subscription item's billing fields in lockstep.
    async fn sync_subscription(
        &self,
        inventory_id: Uuid,
        billed_on: NaiveDate,
        advanced_to: NaiveDate,
    ) -> Result<(), DbErr> {
        let Some(item) = inventory_items::Entity::find_by_id(inventory_id)
            .one(&self.db)
            .await?
        else {
            return Ok(());
        };

        if item.item_type != ItemType::Subscription {
            return Ok(());
        }

        let mut active: inventory_items::ActiveModel = item.into();
        active.last_billing_date = Set(Some(billed_on));
        active.next_billing_date = Set(Some(advanced_to));
        active.payment_status = Set(Some(PaymentStatus::Lunas));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Best-effort fund decrement for a materialized expense.
    async fn draw_from_fund(
        &self,
        template: &expenses::Model,
        instance_id: Uuid,
        created_by: Option<UserId>,
    ) -> FundUpdates {
        let Some(fund_type) = FundType::parse(&template.fund_type) else {
            tracing::warn!(
                template_id = %template.id,
                fund_type = %template.fund_type,
                "recurring template carries an unknown fund type; skipping fund update"
            );
            return FundUpdates {
                applied: false,
                error: Some(format!("Unknown fund type: '{}'", template.fund_type)),
            };
        };

        let result = self
            .funds
            .post(PostFundTransaction {
                fund_type,
                transaction_type: FundTransactionType::Expense,
                amount: -template.amount.abs(),
                description: format!("Recurring expense: {}", template.description),
                source: FundSource::RecurringExpense,
                source_id: Some(instance_id),
                reference_id: None,
                created_by,
            })
            .await;

        match result {
            Ok(_) => FundUpdates::ok(),
            Err(err) => {
                tracing::warn!(
                    template_id = %template.id,
                    fund_type = %fund_type,
                    amount = %template.amount,
                    error = %err,
                    "recurring fund update failed; expense instance remains authoritative"
                );
                FundUpdates::failed(&err)
            }
        }
    }
}
