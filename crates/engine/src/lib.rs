//! Personal finance ledger: income and expense transactions, a monthly
//! budget, category analysis and the monthly report.
//!
//! All persistence goes through [`Engine`], built on a sea-orm
//! `DatabaseConnection` whose schema comes from the `migration` crate.
//! The aggregation functions in [`analytics`] and the report layout in
//! [`report`] are pure and can be used on any list of transactions.

pub use alerts::{AlertSink, LogAlertSink};
pub use analytics::{BudgetStatus, BudgetTier, CategoryAggregate, SpendingOverview};
pub use commands::{TransactionInput, TransactionUpdate, parse_local_date};
pub use currency::Currency;
pub use error::EngineError;
pub use events::{StoreEvent, Subscription};
pub use export::{
    PageRenderer, PlainTextRenderer, export_report, report_file_name, write_transactions_csv,
};
pub use legacy::{LegacyStore, LegacyTransaction};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, MigrationReport, PeriodTotals, TransactionFilter};
pub use period::MonthPeriod;
pub use report::{MonthlyReport, PageLayout, Rect, TextItem, TextStyle};
pub use transactions::{NewTransaction, Transaction, TransactionKind};
pub use user_settings::UserSettings;

mod alerts;
pub mod analytics;
mod commands;
mod currency;
mod error;
mod events;
mod export;
mod legacy;
mod money;
mod ops;
mod period;
pub mod report;
mod transactions;
mod user_settings;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
