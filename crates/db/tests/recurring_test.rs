//! Integration tests for the recurring payment processor.

mod common;

use chrono::{Days, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use aruskas_core::billing::{BillingFrequency, next_billing_date};
use aruskas_core::fund::FundType;
use aruskas_db::entities::sea_orm_active_enums::{ItemType, PaymentStatus};
use aruskas_db::entities::{expenses, inventory_items};
use aruskas_db::repositories::expense::{CreateExpenseInput, ExpenseRepository};
use aruskas_db::repositories::fund::FundRepository;
use aruskas_db::repositories::recurring::{ProcessStatus, RecurringPaymentProcessor};
use aruskas_shared::types::{ExpenseId, InventoryItemId};

fn repos(
    db: DatabaseConnection,
) -> (FundRepository, ExpenseRepository, RecurringPaymentProcessor) {
    let funds = FundRepository::new(db.clone());
    let expense_repo = ExpenseRepository::new(db.clone(), funds.clone());
    let processor = RecurringPaymentProcessor::new(db, funds.clone());
    (funds, expense_repo, processor)
}

async fn create_template(
    expense_repo: &ExpenseRepository,
    inventory_id: Option<InventoryItemId>,
) -> expenses::Model {
    let due = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(1))
        .unwrap();

    let created = expense_repo
        .create_expense(CreateExpenseInput {
            category: "Software".to_string(),
            description: "Accounting SaaS".to_string(),
            amount: dec!(150000),
            fund_type: FundType::PettyCash,
            project_id: None,
            inventory_id,
            expense_date: due,
            is_recurring: true,
            recurring_frequency: Some("MONTHLY".to_string()),
            next_billing_date: Some(due),
            created_by: None,
        })
        .await
        .unwrap();

    assert!(created.fund_updates.applied);
    created.expense
}

#[tokio::test]
async fn test_template_creation_does_not_post() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let (funds, expense_repo, _) = repos(db);

    let before = funds.balance(FundType::PettyCash).await.unwrap();
    create_template(&expense_repo, None).await;
    assert_eq!(funds.balance(FundType::PettyCash).await.unwrap(), before);
}

#[tokio::test]
async fn test_due_template_is_materialized_and_advanced() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let (funds, expense_repo, processor) = repos(db.clone());

    let template = create_template(&expense_repo, None).await;
    let template_due = template.next_billing_date.unwrap();
    let before = funds.balance(FundType::PettyCash).await.unwrap();

    let today = Utc::now().date_naive();
    let outcomes = processor
        .run(today, Some(vec![ExpenseId::from_uuid(template.id)]), None)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert_eq!(outcome.status, ProcessStatus::Processed);
    assert_eq!(outcome.template_id, template.id);

    let expected_next = next_billing_date(template_due, BillingFrequency::Monthly);
    assert_eq!(outcome.next_billing_date, Some(expected_next));

    // The spawned instance is a concrete, non-recurring expense dated today.
    let instance = expenses::Entity::find_by_id(outcome.new_expense_id.unwrap())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!instance.is_recurring);
    assert_eq!(instance.expense_date, today);
    assert_eq!(instance.amount, dec!(150000));
    assert!(instance.description.contains("Accounting SaaS"));
    assert!(instance.description.contains(&today.to_string()));

    // The template advanced and recorded the run.
    let template = expenses::Entity::find_by_id(template.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(template.next_billing_date, Some(expected_next));
    assert!(template.last_processed_date.is_some());

    // The fund was drawn down by the expense amount.
    assert!(outcome.fund_updates.as_ref().unwrap().applied);
    assert_eq!(
        funds.balance(FundType::PettyCash).await.unwrap(),
        before - dec!(150000)
    );
}

#[tokio::test]
async fn test_second_run_with_same_cutoff_selects_nothing() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let (_, expense_repo, processor) = repos(db);

    let template = create_template(&expense_repo, None).await;
    let ids = Some(vec![ExpenseId::from_uuid(template.id)]);
    let today = Utc::now().date_naive();

    let first = processor.run(today, ids.clone(), None).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].status, ProcessStatus::Processed);

    // The advanced billing date now lies past the cutoff.
    let second = processor.run(today, ids, None).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_subscription_inventory_updated_in_lockstep() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let (_, expense_repo, processor) = repos(db.clone());

    let now = Utc::now();
    let item = inventory_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Design tool seat".to_string()),
        item_type: Set(ItemType::Subscription),
        recurring_type: Set(Some("MONTHLY".to_string())),
        last_billing_date: Set(None),
        next_billing_date: Set(None),
        payment_status: Set(Some(PaymentStatus::BelumBayar)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await
    .unwrap();

    let template =
        create_template(&expense_repo, Some(InventoryItemId::from_uuid(item.id))).await;

    let today = now.date_naive();
    let outcomes = processor
        .run(today, Some(vec![ExpenseId::from_uuid(template.id)]), None)
        .await
        .unwrap();
    assert_eq!(outcomes[0].status, ProcessStatus::Processed);

    let item = inventory_items::Entity::find_by_id(item.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.payment_status, Some(PaymentStatus::Lunas));
    assert_eq!(item.last_billing_date, Some(today));
    assert_eq!(item.next_billing_date, outcomes[0].next_billing_date);
}

#[tokio::test]
async fn test_not_yet_due_template_is_excluded() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let (_, expense_repo, processor) = repos(db);

    let future = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(10))
        .unwrap();
    let created = expense_repo
        .create_expense(CreateExpenseInput {
            category: "Hosting".to_string(),
            description: "VPS".to_string(),
            amount: dec!(90000),
            fund_type: FundType::ProfitBank,
            project_id: None,
            inventory_id: None,
            expense_date: future,
            is_recurring: true,
            recurring_frequency: Some("MONTHLY".to_string()),
            next_billing_date: Some(future),
            created_by: None,
        })
        .await
        .unwrap();

    let outcomes = processor
        .run(
            Utc::now().date_naive(),
            Some(vec![ExpenseId::from_uuid(created.expense.id)]),
            None,
        )
        .await
        .unwrap();
    assert!(outcomes.is_empty());
}
