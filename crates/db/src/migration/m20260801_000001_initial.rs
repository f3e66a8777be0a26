//! Initial database migration.
//!
//! Creates the fund ledger, expense, project, and inventory tables with
//! their indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: FUND LEDGER
        // ============================================================
        db.execute_unprepared(FUND_ACCOUNTS_SQL).await?;
        db.execute_unprepared(FUND_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 2: BUSINESS RECORDS
        // ============================================================
        db.execute_unprepared(PROJECT_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(INVENTORY_ITEMS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 3: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const FUND_ACCOUNTS_SQL: &str = r"
CREATE TABLE fund_accounts (
    id UUID PRIMARY KEY,
    fund_type VARCHAR(32) NOT NULL UNIQUE,
    current_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const FUND_TRANSACTIONS_SQL: &str = r"
CREATE TABLE fund_transactions (
    id UUID PRIMARY KEY,
    fund_type VARCHAR(32) NOT NULL,
    transaction_type VARCHAR(16) NOT NULL CHECK (
        transaction_type IN ('income', 'expense', 'transfer_in', 'transfer_out', 'adjustment')
    ),
    amount NUMERIC(18, 2) NOT NULL,
    balance_after NUMERIC(18, 2) NOT NULL,
    description TEXT NOT NULL,
    source_type VARCHAR(24) NOT NULL CHECK (
        source_type IN ('expense', 'transaction_update', 'fund_transfer', 'manual_entry', 'recurring_expense')
    ),
    source_id UUID,
    reference_id UUID REFERENCES fund_transactions(id),
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROJECT_TRANSACTIONS_SQL: &str = r"
CREATE TABLE project_transactions (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    total_profit NUMERIC(18, 2) NOT NULL,
    down_payment_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    payment_status VARCHAR(16) NOT NULL DEFAULT 'Belum Bayar' CHECK (
        payment_status IN ('Belum Bayar', 'DP', 'Lunas')
    ),
    fund_type VARCHAR(32) NOT NULL,
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INVENTORY_ITEMS_SQL: &str = r"
CREATE TABLE inventory_items (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    item_type VARCHAR(16) NOT NULL CHECK (item_type IN ('product', 'subscription')),
    recurring_type VARCHAR(16),
    last_billing_date DATE,
    next_billing_date DATE,
    payment_status VARCHAR(16) CHECK (payment_status IN ('Belum Bayar', 'DP', 'Lunas')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    category VARCHAR(64) NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    fund_type VARCHAR(32) NOT NULL,
    project_id UUID REFERENCES project_transactions(id),
    inventory_id UUID REFERENCES inventory_items(id),
    expense_date DATE NOT NULL,
    is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
    recurring_frequency VARCHAR(16),
    next_billing_date DATE,
    last_processed_date TIMESTAMPTZ,
    deleted_at TIMESTAMPTZ,
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_fund_transactions_fund_created
    ON fund_transactions (fund_type, created_at DESC);

CREATE INDEX idx_fund_transactions_source
    ON fund_transactions (source_type, source_id);

CREATE INDEX idx_expenses_recurring_due
    ON expenses (next_billing_date)
    WHERE is_recurring AND deleted_at IS NULL;

CREATE INDEX idx_expenses_project
    ON expenses (project_id)
    WHERE project_id IS NOT NULL;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS inventory_items;
DROP TABLE IF EXISTS project_transactions;
DROP TABLE IF EXISTS fund_transactions;
DROP TABLE IF EXISTS fund_accounts;
";
