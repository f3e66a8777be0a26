//! `SeaORM` Entity for the expenses table.
//!
//! Rows with `is_recurring = true` are templates; the recurring processor
//! spawns concrete non-recurring rows from them each billing cycle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub fund_type: String,
    pub project_id: Option<Uuid>,
    pub inventory_id: Option<Uuid>,
    pub expense_date: Date,
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
    pub next_billing_date: Option<Date>,
    pub last_processed_date: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_transactions::Entity",
        from = "Column::ProjectId",
        to = "super::project_transactions::Column::Id"
    )]
    ProjectTransactions,
    #[sea_orm(
        belongs_to = "super::inventory_items::Entity",
        from = "Column::InventoryId",
        to = "super::inventory_items::Column::Id"
    )]
    InventoryItems,
}

impl Related<super::project_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectTransactions.def()
    }
}

impl Related<super::inventory_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
