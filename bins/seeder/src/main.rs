//! Database seeder for ArusKas development and testing.
//!
//! Seeds the two fund accounts so a fresh database starts with explicit
//! zero balances instead of relying on first-touch lazy creation.
//!
//! Usage: cargo run --bin seeder

use aruskas_core::fund::FundType;
use aruskas_db::repositories::fund::FundRepository;
use aruskas_shared::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // DATABASE_URL wins; fall back to the layered app configuration.
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        AppConfig::load()
            .expect("DATABASE_URL not set and configuration could not be loaded")
            .database
            .url
    });

    println!("Connecting to database...");
    let db = aruskas_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let funds = FundRepository::new(db);

    for fund_type in FundType::all() {
        println!("Seeding fund account '{fund_type}'...");
        let account = funds
            .get_or_create(fund_type)
            .await
            .expect("Failed to seed fund account");
        println!("  balance: {}", account.current_balance);
    }

    println!("Seeding complete!");
}
