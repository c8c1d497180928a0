//! Transaction primitives.
//!
//! A `Transaction` is a single recorded income or expense event. The domain
//! type is what callers see; `Model`/`ActiveModel` are the sea-orm bindings
//! of the `transactions` table.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// String tag persisted in the `type` column and in the legacy store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(EngineError::InvalidKind(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub amount: MoneyCents,
    pub category: String,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// A transaction that has not been stored yet (no id).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub title: String,
    pub amount: MoneyCents,
    pub category: String,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn new(
        title: impl Into<String>,
        amount: MoneyCents,
        category: impl Into<String>,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
            kind,
            occurred_at,
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    #[sea_orm(column_name = "date")]
    pub occurred_at: DateTimeUtc,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewTransaction> for ActiveModel {
    fn from(tx: &NewTransaction) -> Self {
        Self {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(tx.title.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            description: ActiveValue::Set(tx.note.clone()),
        }
    }
}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Unchanged(tx.id),
            title: ActiveValue::Set(tx.title.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            description: ActiveValue::Set(tx.note.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            occurred_at: model.occurred_at,
            note: model.description,
        })
    }
}
