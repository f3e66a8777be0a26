//! Shared helpers for integration tests.
//!
//! Tests run against the database named by `DATABASE_URL` and skip
//! silently when it is not set, so the suite stays green on machines
//! without a local Postgres.

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::env;

use aruskas_db::migration::Migrator;

/// Connects to the test database, running migrations first.
///
/// Returns `None` (and prints a notice) when `DATABASE_URL` is unset.
pub async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Some(db)
}
