//! Fund account store and ledger repository.
//!
//! This is the single write path for fund balances: every mutation goes
//! through `apply_delta` and leaves exactly one append-only ledger row
//! carrying the resulting balance.

use std::fmt;
use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveTime};
use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use aruskas_core::fund::{
    BalanceChange, FundLedgerError, FundSource, FundTransactionType, FundType, transfer_amounts,
    validate_posting, validate_transfer,
};
use aruskas_shared::types::{PageRequest, PageResponse, UserId};

use crate::entities::{fund_accounts, fund_transactions};

/// Error types for fund ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum FundError {
    /// Posting or transfer validation failed; nothing was written.
    #[error(transparent)]
    Ledger(#[from] FundLedgerError),

    /// The second transfer leg failed after the first committed.
    ///
    /// The ledger is left one-legged but auditable; reconciliation is a
    /// manual step driven by the committed leg id.
    #[error("Transfer leg into '{to_fund}' failed after leg {committed_leg} committed")]
    PartialTransfer {
        /// Id of the committed outgoing leg.
        committed_leg: Uuid,
        /// Fund the failed incoming leg targeted.
        to_fund: String,
        /// The underlying failure.
        #[source]
        source: Box<FundError>,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of the best-effort ledger side of a business-record write.
///
/// The business record is authoritative; callers inspect this field to
/// detect ledger drift instead of assuming all-or-nothing atomicity.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FundUpdates {
    /// True if every planned posting was applied.
    pub applied: bool,
    /// Failure description when `applied` is false.
    pub error: Option<String>,
}

impl FundUpdates {
    /// All postings applied.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            applied: true,
            error: None,
        }
    }

    /// No postings were needed.
    #[must_use]
    pub const fn none_needed() -> Self {
        Self {
            applied: true,
            error: None,
        }
    }

    /// At least one posting failed.
    #[must_use]
    pub fn failed(error: &impl fmt::Display) -> Self {
        Self {
            applied: false,
            error: Some(error.to_string()),
        }
    }
}

/// Input for posting a single ledger transaction.
#[derive(Debug, Clone)]
pub struct PostFundTransaction {
    /// The fund the posting applies to.
    pub fund_type: FundType,
    /// The posting classification.
    pub transaction_type: FundTransactionType,
    /// Signed amount following the sign convention for the type.
    pub amount: Decimal,
    /// Human-readable description recorded on the ledger row.
    pub description: String,
    /// Provenance of the posting.
    pub source: FundSource,
    /// Id of the originating business record, if any.
    pub source_id: Option<Uuid>,
    /// Paired transfer leg, set on the second leg at creation time.
    pub reference_id: Option<Uuid>,
    /// User who triggered the posting.
    pub created_by: Option<UserId>,
}

/// Input for a fund-to-fund transfer.
#[derive(Debug, Clone)]
pub struct TransferFunds {
    /// Fund the cash leaves.
    pub from: FundType,
    /// Fund the cash enters.
    pub to: FundType,
    /// Positive amount to move.
    pub amount: Decimal,
    /// Human-readable description recorded on both legs.
    pub description: String,
    /// User who triggered the transfer.
    pub created_by: Option<UserId>,
}

/// The two linked ledger rows produced by a transfer.
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// The `transfer_out` leg on the source fund.
    pub outgoing: fund_transactions::Model,
    /// The `transfer_in` leg on the destination fund.
    pub incoming: fund_transactions::Model,
}

/// Filter options for the ledger history listing.
#[derive(Debug, Clone, Default)]
pub struct FundTransactionFilter {
    /// Filter by fund type.
    pub fund_type: Option<FundType>,
    /// Filter by transaction type.
    pub transaction_type: Option<FundTransactionType>,
    /// Filter by source type.
    pub source_type: Option<FundSource>,
    /// Include rows created on or after this date.
    pub from: Option<NaiveDate>,
    /// Include rows created on or before this date.
    pub to: Option<NaiveDate>,
}

/// Repository for fund accounts and the fund ledger.
#[derive(Clone)]
pub struct FundRepository {
    db: DatabaseConnection,
    // Serializes postings per fund type within this process; cross-process
    // interleavings remain possible.
    locks: Arc<DashMap<&'static str, Arc<Mutex<()>>>>,
}

impl FundRepository {
    /// Creates a new fund repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn lock_for(&self, fund_type: FundType) -> Arc<Mutex<()>> {
        self.locks
            .entry(fund_type.as_str())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Returns the balance record for a fund, creating it with balance 0
    /// on first reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create(
        &self,
        fund_type: FundType,
    ) -> Result<fund_accounts::Model, FundError> {
        let lock = self.lock_for(fund_type);
        let _guard = lock.lock().await;
        self.get_or_create_unlocked(fund_type).await
    }

    async fn get_or_create_unlocked(
        &self,
        fund_type: FundType,
    ) -> Result<fund_accounts::Model, FundError> {
        let existing = fund_accounts::Entity::find()
            .filter(fund_accounts::Column::FundType.eq(fund_type.as_str()))
            .one(&self.db)
            .await?;

        if let Some(account) = existing {
            return Ok(account);
        }

        let now = chrono::Utc::now().into();
        let account = fund_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            fund_type: Set(fund_type.as_str().to_string()),
            current_balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Adds a signed delta to a fund balance and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn apply_delta(
        &self,
        fund_type: FundType,
        delta: Decimal,
    ) -> Result<fund_accounts::Model, FundError> {
        let lock = self.lock_for(fund_type);
        let _guard = lock.lock().await;
        let (account, _) = self.apply_delta_unlocked(fund_type, delta).await?;
        Ok(account)
    }

    async fn apply_delta_unlocked(
        &self,
        fund_type: FundType,
        delta: Decimal,
    ) -> Result<(fund_accounts::Model, BalanceChange), FundError> {
        let account = self.get_or_create_unlocked(fund_type).await?;
        let change = BalanceChange::apply(account.current_balance, delta);

        let mut active: fund_accounts::ActiveModel = account.into();
        active.current_balance = Set(change.balance_after);
        active.updated_at = Set(chrono::Utc::now().into());
        let account = active.update(&self.db).await?;

        Ok((account, change))
    }

    /// Posts a single ledger transaction against a fund.
    ///
    /// Validates the amount against the sign convention, applies the
    /// delta to the balance, and appends the ledger row carrying the
    /// resulting balance.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any write, or a database error
    /// if persistence fails.
    pub async fn post(
        &self,
        input: PostFundTransaction,
    ) -> Result<fund_transactions::Model, FundError> {
        validate_posting(input.transaction_type, input.amount)?;

        let lock = self.lock_for(input.fund_type);
        let _guard = lock.lock().await;

        let (_, change) = self
            .apply_delta_unlocked(input.fund_type, input.amount)
            .await?;

        let row = fund_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            fund_type: Set(input.fund_type.as_str().to_string()),
            transaction_type: Set(input.transaction_type.into()),
            amount: Set(input.amount),
            balance_after: Set(change.balance_after),
            description: Set(input.description),
            source_type: Set(input.source.into()),
            source_id: Set(input.source_id),
            reference_id: Set(input.reference_id),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Moves cash between two funds as a pair of linked ledger rows.
    ///
    /// Posts the `transfer_out` leg first, then the `transfer_in` leg
    /// carrying a reference to it, then backfills the out leg's
    /// `reference_id`. A failed second leg surfaces as `PartialTransfer`
    /// with the committed leg id; the committed leg is not rolled back.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any write, `PartialTransfer`
    /// when only one leg committed, or a database error.
    pub async fn transfer(&self, input: TransferFunds) -> Result<TransferResult, FundError> {
        validate_transfer(input.from, input.to, input.amount)?;
        let (out_amount, in_amount) = transfer_amounts(input.amount);

        let outgoing = self
            .post(PostFundTransaction {
                fund_type: input.from,
                transaction_type: FundTransactionType::TransferOut,
                amount: out_amount,
                description: input.description.clone(),
                source: FundSource::FundTransfer,
                source_id: None,
                reference_id: None,
                created_by: input.created_by,
            })
            .await?;

        let incoming = match self
            .post(PostFundTransaction {
                fund_type: input.to,
                transaction_type: FundTransactionType::TransferIn,
                amount: in_amount,
                description: input.description,
                source: FundSource::FundTransfer,
                source_id: None,
                reference_id: Some(outgoing.id),
                created_by: input.created_by,
            })
            .await
        {
            Ok(row) => row,
            Err(err) => {
                tracing::error!(
                    from_fund = %input.from,
                    to_fund = %input.to,
                    amount = %input.amount,
                    committed_leg = %outgoing.id,
                    error = %err,
                    "transfer leg failed after outgoing leg committed"
                );
                return Err(FundError::PartialTransfer {
                    committed_leg: outgoing.id,
                    to_fund: input.to.as_str().to_string(),
                    source: Box::new(err),
                });
            }
        };

        let mut out_active: fund_transactions::ActiveModel = outgoing.into();
        out_active.reference_id = Set(Some(incoming.id));
        let outgoing = out_active.update(&self.db).await?;

        Ok(TransferResult { outgoing, incoming })
    }

    /// Returns the current balance for a fund, creating the record on
    /// first reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn balance(&self, fund_type: FundType) -> Result<Decimal, FundError> {
        Ok(self.get_or_create(fund_type).await?.current_balance)
    }

    /// Returns the balance records for all known funds.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn balances(&self) -> Result<Vec<fund_accounts::Model>, FundError> {
        let mut accounts = Vec::with_capacity(FundType::all().len());
        for fund_type in FundType::all() {
            accounts.push(self.get_or_create(fund_type).await?);
        }
        Ok(accounts)
    }

    /// Lists ledger history, newest first, with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: &FundTransactionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<fund_transactions::Model>, FundError> {
        let total = Self::filtered(filter).count(&self.db).await?;

        let rows = Self::filtered(filter)
            .order_by_desc(fund_transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }

    fn filtered(filter: &FundTransactionFilter) -> sea_orm::Select<fund_transactions::Entity> {
        let mut query = fund_transactions::Entity::find();

        if let Some(fund_type) = filter.fund_type {
            query = query.filter(fund_transactions::Column::FundType.eq(fund_type.as_str()));
        }
        if let Some(transaction_type) = filter.transaction_type {
            let db_type: crate::entities::sea_orm_active_enums::FundTransactionType =
                transaction_type.into();
            query = query.filter(fund_transactions::Column::TransactionType.eq(db_type));
        }
        if let Some(source_type) = filter.source_type {
            let db_source: crate::entities::sea_orm_active_enums::FundSourceType =
                source_type.into();
            query = query.filter(fund_transactions::Column::SourceType.eq(db_source));
        }
        if let Some(from) = filter.from {
            query = query.filter(
                fund_transactions::Column::CreatedAt.gte(from.and_time(NaiveTime::MIN).and_utc()),
            );
        }
        if let Some(to) = filter.to
            && let Some(end) = to.checked_add_days(Days::new(1))
        {
            query = query.filter(
                fund_transactions::Column::CreatedAt.lt(end.and_time(NaiveTime::MIN).and_utc()),
            );
        }

        query
    }
}
