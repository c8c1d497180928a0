use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use engine::TransactionKind;

use crate::settings::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(
    name = "finance_tracker",
    about = "Track income and expenses against a monthly budget"
)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a transaction.
    Add {
        #[arg(long)]
        title: String,
        /// Decimal amount, `.` or `,` as separator.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        category: String,
        #[arg(long, value_enum, default_value = "expense")]
        kind: KindArg,
        /// YYYY-MM-DD, defaults to now.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// List transactions, most recent first.
    List {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// YYYY-MM; all months when omitted.
        #[arg(long)]
        month: Option<String>,
    },
    /// Change fields of a transaction.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
        #[arg(long, conflicts_with = "clear_note")]
        note: Option<String>,
        #[arg(long)]
        clear_note: bool,
    },
    /// Delete a transaction.
    Delete { id: i64 },
    /// Delete every transaction.
    DeleteAll {
        /// Required; there is no undo.
        #[arg(long)]
        yes: bool,
    },
    /// Salary and income of a month against its spending.
    Summary {
        /// YYYY-MM, defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },
    /// Budget usage of a month.
    Budget {
        /// YYYY-MM, defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },
    /// Top categories of a month with their share.
    Breakdown {
        #[arg(long, value_enum, default_value = "expense")]
        kind: KindArg,
        #[arg(long)]
        month: Option<String>,
    },
    /// Print the monthly report, optionally writing it to a file.
    Report {
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        export: bool,
        /// Output directory for `--export`.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Write all transactions as CSV.
    ExportCsv {
        /// Defaults to standard output.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Legacy(LegacyCommand),
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        alerts: Option<bool>,
    },
}

/// Backup of the legacy preferences file.
#[derive(Debug, Subcommand)]
pub enum LegacyCommand {
    /// Print the stored transaction list as JSON.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace the stored transaction list with a JSON backup; it is moved
    /// into the database on the next start.
    Import { file: PathBuf },
}
