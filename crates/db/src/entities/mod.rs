//! `SeaORM` entity definitions.

pub mod expenses;
pub mod fund_accounts;
pub mod fund_transactions;
pub mod inventory_items;
pub mod project_transactions;
pub mod sea_orm_active_enums;
