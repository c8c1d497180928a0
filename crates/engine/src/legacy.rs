//! The flat preferences file used before the database existed.
//!
//! The file is one JSON object. Transactions live under `transactions` as a
//! *string* holding a JSON array, amounts are doubles in major units and
//! dates are epoch milliseconds:
//!
//! ```json
//! {
//!   "monthly_budget": 4000.0,
//!   "currency": "LKR",
//!   "transactions": "[{\"id\":1,\"title\":\"Lunch\",\"amount\":12.5,\"category\":\"Food\",\"date\":1760000000000,\"type\":\"EXPENSE\"}]"
//! }
//! ```
//!
//! Only the transactions are migrated into the database; the other keys are
//! still readable for export.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, NewTransaction, ResultEngine, TransactionKind};

const DEFAULT_CURRENCY: &str = "LKR";

/// A transaction as stored in the legacy file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyTransaction {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub category: String,
    /// Epoch milliseconds.
    pub date: i64,
    /// `INCOME` or `EXPENSE`; anything else is rejected on migration.
    #[serde(rename = "type")]
    pub kind: String,
}

impl LegacyTransaction {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: DateTime<Utc>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            amount,
            category: category.into(),
            date: date.timestamp_millis(),
            kind: kind.as_str().to_string(),
        }
    }

    /// Converts to a database transaction. Title, amount, category, date and
    /// type carry over; there is no note.
    pub fn to_new_transaction(&self) -> ResultEngine<NewTransaction> {
        let kind = TransactionKind::try_from(self.kind.as_str())?;
        let amount = MoneyCents::from_major_f64(self.amount)?;
        let occurred_at = Utc
            .timestamp_millis_opt(self.date)
            .single()
            .ok_or_else(|| EngineError::Validation(format!("invalid date: {}", self.date)))?;
        Ok(NewTransaction::new(
            self.title.clone(),
            amount,
            self.category.clone(),
            kind,
            occurred_at,
        ))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct LegacyPrefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monthly_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monthly_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transactions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget_alerts_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    daily_reminders_enabled: Option<bool>,
}

/// File-backed legacy preferences.
///
/// Every setter writes the whole file back (temp file, then rename).
#[derive(Debug)]
pub struct LegacyStore {
    path: PathBuf,
    prefs: LegacyPrefs,
}

impl LegacyStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> ResultEngine<Self> {
        let path = path.into();
        let prefs = read_prefs(&path)?;
        Ok(Self { path, prefs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file from disk.
    pub fn reload(&mut self) -> ResultEngine<()> {
        self.prefs = read_prefs(&self.path)?;
        Ok(())
    }

    /// All stored transactions.
    ///
    /// An unreadable list is logged and treated as empty; unreadable entries
    /// are skipped.
    pub fn transactions(&self) -> Vec<LegacyTransaction> {
        let raw = self.prefs.transactions.as_deref().unwrap_or("[]");
        let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(values) => values,
            Err(err) => {
                tracing::error!("legacy transactions are not a JSON array: {err}");
                return Vec::new();
            }
        };
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(tx) => Some(tx),
                Err(err) => {
                    tracing::warn!("skipping unreadable legacy transaction: {err}");
                    None
                }
            })
            .collect()
    }

    pub fn save_transaction(&mut self, transaction: LegacyTransaction) -> ResultEngine<()> {
        let mut transactions = self.transactions();
        transactions.push(transaction);
        self.save_transactions(&transactions)
    }

    /// Replaces the transaction with the same id. Unknown ids are ignored.
    pub fn update_transaction(&mut self, transaction: LegacyTransaction) -> ResultEngine<()> {
        let mut transactions = self.transactions();
        let Some(slot) = transactions.iter_mut().find(|tx| tx.id == transaction.id) else {
            return Ok(());
        };
        *slot = transaction;
        self.save_transactions(&transactions)
    }

    /// Removes the transaction with `id`; returns whether it existed.
    pub fn delete_transaction(&mut self, id: i64) -> ResultEngine<bool> {
        let mut transactions = self.transactions();
        let before = transactions.len();
        transactions.retain(|tx| tx.id != id);
        let removed = transactions.len() != before;
        self.save_transactions(&transactions)?;
        if removed {
            tracing::debug!(id, before, after = transactions.len(), "legacy transaction deleted");
        } else {
            tracing::warn!("legacy transaction {id} was not found");
        }
        Ok(removed)
    }

    /// The raw transaction list, as stored.
    pub fn export_transactions(&self) -> String {
        self.prefs
            .transactions
            .clone()
            .unwrap_or_else(|| "[]".to_string())
    }

    /// Replaces the transaction list with `json`, which must be a JSON array.
    pub fn import_transactions(&mut self, json: &str) -> ResultEngine<()> {
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(serde_json::Value::Array(_)) => {}
            _ => {
                return Err(EngineError::Validation(
                    "Invalid backup data format".to_string(),
                ));
            }
        }
        self.prefs.transactions = Some(json.to_string());
        self.persist()
    }

    /// Removes the transaction list, keeping the other keys.
    pub fn clear_transactions(&mut self) -> ResultEngine<()> {
        self.prefs.transactions = None;
        self.persist()
    }

    pub fn monthly_budget(&self) -> f64 {
        self.prefs.monthly_budget.unwrap_or(0.0)
    }

    pub fn set_monthly_budget(&mut self, budget: f64) -> ResultEngine<()> {
        self.prefs.monthly_budget = Some(budget);
        self.persist()
    }

    pub fn monthly_salary(&self) -> f64 {
        self.prefs.monthly_salary.unwrap_or(0.0)
    }

    pub fn set_monthly_salary(&mut self, salary: f64) -> ResultEngine<()> {
        self.prefs.monthly_salary = Some(salary);
        self.persist()
    }

    pub fn currency(&self) -> String {
        self.prefs
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }

    pub fn set_currency(&mut self, currency: impl Into<String>) -> ResultEngine<()> {
        self.prefs.currency = Some(currency.into());
        self.persist()
    }

    pub fn budget_alerts_enabled(&self) -> bool {
        self.prefs.budget_alerts_enabled.unwrap_or(true)
    }

    pub fn set_budget_alerts_enabled(&mut self, enabled: bool) -> ResultEngine<()> {
        self.prefs.budget_alerts_enabled = Some(enabled);
        self.persist()
    }

    pub fn daily_reminders_enabled(&self) -> bool {
        self.prefs.daily_reminders_enabled.unwrap_or(false)
    }

    fn save_transactions(&mut self, transactions: &[LegacyTransaction]) -> ResultEngine<()> {
        self.prefs.transactions = Some(serde_json::to_string(transactions)?);
        self.persist()
    }

    fn persist(&self) -> ResultEngine<()> {
        write_prefs(&self.path, &self.prefs)
    }
}

fn read_prefs(path: &Path) -> ResultEngine<LegacyPrefs> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(LegacyPrefs::default()),
        Err(err) => return Err(err.into()),
    };
    if raw.trim().is_empty() {
        return Ok(LegacyPrefs::default());
    }
    serde_json::from_str(&raw)
        .map_err(|err| EngineError::LegacyStore(format!("{}: {err}", path.display())))
}

fn write_prefs(path: &Path, prefs: &LegacyPrefs) -> ResultEngine<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(prefs)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    if fs::rename(&tmp, path).is_err() {
        fs::copy(&tmp, path)?;
        let _ = fs::remove_file(&tmp);
    }
    Ok(())
}
