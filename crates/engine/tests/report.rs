use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::Database;

use engine::{
    Currency, Engine, MoneyCents, MonthPeriod, NewTransaction, PlainTextRenderer,
    TransactionFilter, TransactionKind, export_report, write_transactions_csv,
};
use migration::MigratorTrait;

async fn seeded_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    engine
        .set_monthly_budget(MoneyCents::units(4000))
        .await
        .unwrap();
    engine
        .set_currency(Currency::try_from("LKR").unwrap())
        .await
        .unwrap();

    let day = |d| Utc.with_ymd_and_hms(2026, 10, d, 10, 0, 0).unwrap();
    let rows = [
        ("Salary", 5000, "Salary", TransactionKind::Income, 1),
        ("Rent", 2000, "Housing", TransactionKind::Expense, 2),
        ("Groceries", 700, "Food", TransactionKind::Expense, 5),
        ("Dinner", 300, "Food", TransactionKind::Expense, 9),
        ("Train", 200, "Travel", TransactionKind::Expense, 12),
    ];
    for (title, units, category, kind, d) in rows {
        engine
            .insert_transaction(NewTransaction::new(
                title,
                MoneyCents::units(units),
                category,
                kind,
                day(d),
            ))
            .await
            .unwrap();
    }
    engine
}

#[tokio::test]
async fn monthly_report_summarizes_the_month() {
    let engine = seeded_engine().await;
    let report = engine
        .monthly_report(MonthPeriod::new(2026, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(report.total_income, MoneyCents::units(5000));
    assert_eq!(report.total_expense, MoneyCents::units(3200));
    assert_eq!(report.balance().unwrap(), MoneyCents::units(1800));

    let text = report.render_text().unwrap();
    assert!(text.starts_with("Monthly Financial Report - October 2026\n"));
    assert!(text.contains("Budget Usage: 80.0%\n"));
    assert!(text.contains(
        "Top Expense Categories:\nHousing: LKR 2000.00\nFood: LKR 1000.00\nTravel: LKR 200.00\n"
    ));
    assert!(text.contains("Balance: LKR 1800.00\n"));
}

#[tokio::test]
async fn export_writes_named_file() {
    let engine = seeded_engine().await;
    let report = engine
        .monthly_report(MonthPeriod::new(2026, 10).unwrap())
        .await
        .unwrap();
    let dir = tempfile::tempdir().unwrap();

    let path = export_report(
        &report,
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
        &PlainTextRenderer,
        dir.path(),
    )
    .unwrap();
    assert_eq!(path, dir.path().join("Finance_Report_202610.txt"));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("Generated on: 02 Nov 2026"));
    assert!(content.contains("Total Expenses: LKR 3200.00"));
}

#[tokio::test]
async fn csv_export_lists_every_transaction() {
    let engine = seeded_engine().await;
    let transactions = engine
        .list_transactions(&TransactionFilter::all())
        .await
        .unwrap();

    let mut out = Vec::new();
    write_transactions_csv(&transactions, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.contains(",INCOME,Salary,Salary,5000.00,"));
}
