use chrono::{TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, MoneyCents, MonthPeriod, NewTransaction, TransactionFilter,
    TransactionInput, TransactionKind, TransactionUpdate,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn on(day: u32, month: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, day, 12, 0, 0).unwrap()
}

fn expense(title: &str, units: i64, category: &str, day: u32, month: u32) -> NewTransaction {
    NewTransaction::new(
        title,
        MoneyCents::units(units),
        category,
        TransactionKind::Expense,
        on(day, month),
    )
}

fn income(title: &str, units: i64, day: u32, month: u32) -> NewTransaction {
    NewTransaction::new(
        title,
        MoneyCents::units(units),
        "Salary",
        TransactionKind::Income,
        on(day, month),
    )
}

#[tokio::test]
async fn add_assigns_ids_and_round_trips_fields() {
    let (engine, _db) = engine_with_db().await;

    let tx = engine
        .add_transaction(
            TransactionInput::new(" Groceries ", "42.10", "Food", TransactionKind::Expense)
                .date("2026-10-05")
                .note("weekly"),
        )
        .await
        .unwrap();
    assert!(tx.id > 0);

    let stored = engine.transaction(tx.id).await.unwrap();
    assert_eq!(stored, tx);
    assert_eq!(stored.title, "Groceries");
    assert_eq!(stored.amount, MoneyCents::new(4210));
    assert_eq!(stored.note.as_deref(), Some("weekly"));
    assert_eq!(
        stored.occurred_at,
        Utc.with_ymd_and_hms(2026, 10, 5, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn invalid_input_writes_nothing() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_transaction(TransactionInput::new(
            "Taxi",
            "twelve",
            "Travel",
            TransactionKind::Expense,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Please enter a valid amount".to_string())
    );
    assert!(
        engine
            .list_transactions(&TransactionFilter::all())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .insert_transaction(expense("Lunch", 12, "Food", 3, 10).note("with Ana"))
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            tx.id,
            TransactionUpdate::default()
                .amount(MoneyCents::units(15))
                .category("Eating out")
                .note(None),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, tx.id);
    assert_eq!(updated.title, "Lunch");
    assert_eq!(updated.amount, MoneyCents::units(15));
    assert_eq!(updated.category, "Eating out");
    assert_eq!(updated.note, None);
    assert_eq!(engine.transaction(tx.id).await.unwrap(), updated);

    let err = engine
        .update_transaction(tx.id, TransactionUpdate::default().title("  "))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Please enter a title".to_string())
    );
}

#[tokio::test]
async fn replace_and_delete() {
    let (engine, _db) = engine_with_db().await;
    let mut tx = engine
        .insert_transaction(expense("Bus", 2, "Travel", 1, 10))
        .await
        .unwrap();

    tx.kind = TransactionKind::Income;
    tx.title = "Refund".to_string();
    let replaced = engine.replace_transaction(&tx).await.unwrap();
    assert_eq!(replaced, tx);

    engine.delete_transaction(tx.id).await.unwrap();
    assert!(matches!(
        engine.transaction(tx.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_transaction(tx.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine
            .update_transaction(tx.id, TransactionUpdate::default().title("x"))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn list_filters_by_kind_and_half_open_range() {
    let (engine, _db) = engine_with_db().await;
    engine
        .insert_transaction(expense("Rent", 900, "Housing", 1, 9))
        .await
        .unwrap();
    let first = engine
        .insert_transaction(expense("Rent", 900, "Housing", 1, 10))
        .await
        .unwrap();
    let second = engine
        .insert_transaction(income("Salary", 3000, 2, 10))
        .await
        .unwrap();
    engine
        .insert_transaction(expense("Rent", 900, "Housing", 1, 11))
        .await
        .unwrap();

    let from = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();
    let october = engine
        .list_transactions(&TransactionFilter::all().between(from, to))
        .await
        .unwrap();
    let ids: Vec<i64> = october.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let expenses = engine
        .list_transactions(&TransactionFilter::all().kind(TransactionKind::Expense))
        .await
        .unwrap();
    assert_eq!(expenses.len(), 3);
    assert!(expenses.iter().all(|tx| tx.kind == TransactionKind::Expense));

    let err = engine
        .list_transactions(&TransactionFilter::all().between(to, from))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPeriod(_)));
}

#[tokio::test]
async fn period_totals_and_balance() {
    let (engine, _db) = engine_with_db().await;
    engine
        .insert_transaction(income("Salary", 5000, 1, 10))
        .await
        .unwrap();
    engine
        .insert_transaction(expense("Rent", 2000, "Housing", 2, 10))
        .await
        .unwrap();
    engine
        .insert_transaction(expense("Food", 1200, "Food", 20, 10))
        .await
        .unwrap();
    engine
        .insert_transaction(expense("Old", 999, "Food", 30, 9))
        .await
        .unwrap();

    let october = MonthPeriod::new(2026, 10).unwrap();
    let totals = engine.period_totals(october).await.unwrap();
    assert_eq!(totals.income, MoneyCents::units(5000));
    assert_eq!(totals.expense, MoneyCents::units(3200));
    assert_eq!(
        engine.monthly_balance(october).await.unwrap(),
        MoneyCents::units(1800)
    );

    let empty = engine
        .period_totals(MonthPeriod::new(2025, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(empty.income, MoneyCents::ZERO);
    assert_eq!(empty.expense, MoneyCents::ZERO);
}

#[tokio::test]
async fn category_breakdown_for_period() {
    let (engine, _db) = engine_with_db().await;
    for (category, units) in [("Food", 30), ("Rent", 60), ("Food", 10)] {
        engine
            .insert_transaction(expense(category, units, category, 4, 10))
            .await
            .unwrap();
    }
    engine
        .insert_transaction(income("Salary", 100, 4, 10))
        .await
        .unwrap();

    let breakdown = engine
        .category_breakdown_for(MonthPeriod::new(2026, 10).unwrap(), TransactionKind::Expense)
        .await
        .unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].category, "Rent");
    assert_eq!(breakdown[0].percentage, 60);
    assert_eq!(breakdown[1].category, "Food");
    assert_eq!(breakdown[1].total, MoneyCents::units(40));
    assert_eq!(breakdown[1].percentage, 40);
}

#[tokio::test]
async fn month_bounds_follow_engine_time_zone() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .time_zone(chrono_tz::Asia::Colombo)
        .build()
        .await
        .unwrap();

    // Local Nov 1, 01:00 in Colombo.
    engine
        .insert_transaction(NewTransaction::new(
            "Late dinner",
            MoneyCents::units(10),
            "Food",
            TransactionKind::Expense,
            Utc.with_ymd_and_hms(2026, 10, 31, 19, 30, 0).unwrap(),
        ))
        .await
        .unwrap();

    let october = engine
        .period_totals(MonthPeriod::new(2026, 10).unwrap())
        .await
        .unwrap();
    let november = engine
        .period_totals(MonthPeriod::new(2026, 11).unwrap())
        .await
        .unwrap();
    assert_eq!(october.expense, MoneyCents::ZERO);
    assert_eq!(november.expense, MoneyCents::units(10));
}

#[tokio::test]
async fn oversized_amounts_are_rejected_and_large_sums_stay_exact() {
    let (engine, _db) = engine_with_db().await;

    for _ in 0..2 {
        let err = engine
            .add_transaction(TransactionInput::new(
                "Yacht",
                "90000000000000000",
                "Food",
                TransactionKind::Expense,
            ))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::Validation("amount too large".to_string()));
    }
    let err = engine
        .insert_transaction(NewTransaction::new(
            "Yacht",
            MoneyCents::new(i64::MAX / 2 + 1),
            "Food",
            TransactionKind::Expense,
            on(3, 10),
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("amount too large".to_string()));

    let mut ids = Vec::new();
    for _ in 0..2 {
        let tx = engine
            .add_transaction(
                TransactionInput::new("Yacht", "1000000000000", "Food", TransactionKind::Expense)
                    .date("2026-10-03"),
            )
            .await
            .unwrap();
        ids.push(tx.id);
    }
    let err = engine
        .update_transaction(
            ids[0],
            TransactionUpdate::default().amount(MoneyCents::new(i64::MAX)),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("amount too large".to_string()));

    let october = MonthPeriod::new(2026, 10).unwrap();
    let expected = MoneyCents::new(2 * MoneyCents::MAX_AMOUNT.cents());
    let totals = engine.period_totals(october).await.unwrap();
    assert_eq!(totals.expense, expected);

    let breakdown = engine
        .category_breakdown_for(october, TransactionKind::Expense)
        .await
        .unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].total, expected);
    assert_eq!(breakdown[0].percentage, 100);
}

#[tokio::test]
async fn delete_all_empties_the_ledger() {
    let (engine, _db) = engine_with_db().await;
    assert_eq!(engine.delete_all_transactions().await.unwrap(), 0);

    engine
        .insert_transaction(expense("Rent", 900, "Housing", 1, 10))
        .await
        .unwrap();
    engine
        .insert_transaction(income("Salary", 3000, 2, 10))
        .await
        .unwrap();

    assert_eq!(engine.delete_all_transactions().await.unwrap(), 2);
    assert!(
        engine
            .list_transactions(&TransactionFilter::all())
            .await
            .unwrap()
            .is_empty()
    );
    let totals = engine
        .period_totals(MonthPeriod::new(2026, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(totals.expense, MoneyCents::ZERO);
}
