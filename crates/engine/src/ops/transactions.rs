use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, MonthPeriod, NewTransaction, ResultEngine, StoreEvent, Transaction,
    TransactionInput, TransactionKind, TransactionUpdate, transactions,
    util::{normalize_optional, normalize_required},
};

use super::{Engine, with_tx};

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from >= to
        {
            return Err(EngineError::InvalidPeriod(
                "invalid range: from must be < to".to_string(),
            ));
        }
        Ok(())
    }
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lt(to));
        }
        self
    }
}

impl Engine {
    /// Validates user input and stores the transaction.
    ///
    /// Nothing is written when validation fails.
    pub async fn add_transaction(&self, input: TransactionInput) -> ResultEngine<Transaction> {
        let new_tx = input.validate(Utc::now(), self.time_zone)?;
        self.insert_transaction(new_tx).await
    }

    /// Stores an already validated transaction and returns it with its id.
    pub async fn insert_transaction(&self, new_tx: NewTransaction) -> ResultEngine<Transaction> {
        new_tx.amount.ensure_accepted()?;
        let transaction = with_tx!(self, |db_tx| {
            let model = transactions::ActiveModel::from(&new_tx)
                .insert(&db_tx)
                .await?;
            Transaction::try_from(model)
        })?;
        tracing::debug!(
            id = transaction.id,
            kind = %transaction.kind,
            "transaction inserted"
        );
        self.publish(StoreEvent::TransactionsChanged);
        Ok(transaction)
    }

    /// Return a transaction by id.
    pub async fn transaction(&self, id: i64) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {id}")))?;
        Transaction::try_from(model)
    }

    /// Applies `update` to the transaction `id`. Fields left as `None` are
    /// kept.
    pub async fn update_transaction(
        &self,
        id: i64,
        update: TransactionUpdate,
    ) -> ResultEngine<Transaction> {
        if let Some(amount) = update.amount {
            amount.ensure_accepted()?;
        }
        let title = update
            .title
            .as_deref()
            .map(|t| normalize_required(t, "Please enter a title"))
            .transpose()?;
        let category = update
            .category
            .as_deref()
            .map(|c| normalize_required(c, "Please select a category"))
            .transpose()?;

        let transaction = with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {id}")))?;
            let mut tx = Transaction::try_from(model)?;

            if let Some(title) = title {
                tx.title = title;
            }
            if let Some(amount) = update.amount {
                tx.amount = amount;
            }
            if let Some(category) = category {
                tx.category = category;
            }
            if let Some(kind) = update.kind {
                tx.kind = kind;
            }
            if let Some(occurred_at) = update.occurred_at {
                tx.occurred_at = occurred_at;
            }
            if let Some(note) = update.note {
                tx.note = normalize_optional(note.as_deref());
            }

            let model = transactions::ActiveModel::from(&tx).update(&db_tx).await?;
            Transaction::try_from(model)
        })?;
        self.publish(StoreEvent::TransactionsChanged);
        Ok(transaction)
    }

    /// Deletes the transaction `id`.
    pub async fn delete_transaction(&self, id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                Err(EngineError::KeyNotFound(format!("transaction {id}")))
            } else {
                Ok(())
            }
        })?;
        tracing::debug!(id, "transaction deleted");
        self.publish(StoreEvent::TransactionsChanged);
        Ok(())
    }

    /// Deletes every transaction and returns how many were removed.
    pub async fn delete_all_transactions(&self) -> ResultEngine<u64> {
        let removed = with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_many().exec(&db_tx).await?;
            Ok::<_, EngineError>(result.rows_affected)
        })?;
        tracing::info!(removed, "all transactions deleted");
        self.publish(StoreEvent::TransactionsChanged);
        Ok(removed)
    }

    /// Lists transactions matching `filter`, most recent first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        filter.validate()?;
        let models = transactions::Entity::find()
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Transactions of `period`, most recent first.
    pub async fn transactions_in(
        &self,
        period: MonthPeriod,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Transaction>> {
        let (from, to) = period.bounds(self.time_zone)?;
        let mut filter = TransactionFilter::all().between(from, to);
        filter.kind = kind;
        self.list_transactions(&filter).await
    }

    /// Stores a fully edited transaction (same id).
    pub async fn replace_transaction(&self, tx: &Transaction) -> ResultEngine<Transaction> {
        let update = TransactionUpdate {
            title: Some(tx.title.clone()),
            amount: Some(tx.amount),
            category: Some(tx.category.clone()),
            kind: Some(tx.kind),
            occurred_at: Some(tx.occurred_at),
            note: Some(tx.note.clone()),
        };
        self.update_transaction(tx.id, update).await
    }
}
