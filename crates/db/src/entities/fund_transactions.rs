//! `SeaORM` Entity for the fund_transactions table.
//!
//! Append-only ledger rows. Immutable after creation except for the
//! `reference_id` backfill on the first leg of a transfer pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{FundSourceType, FundTransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fund_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fund_type: String,
    pub transaction_type: FundTransactionType,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub description: String,
    pub source_type: FundSourceType,
    pub source_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ReferenceId",
        to = "Column::Id"
    )]
    PairedLeg,
}

impl ActiveModelBehavior for ActiveModel {}
