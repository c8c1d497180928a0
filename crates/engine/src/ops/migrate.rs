use serde::Serialize;

use crate::{LegacyStore, ResultEngine};

use super::Engine;

/// Outcome of a legacy migration run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Transactions read from the legacy store.
    pub found: usize,
    pub migrated: usize,
    /// Records that were logged and skipped.
    pub failed: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.found == 0
    }
}

impl Engine {
    /// Moves the transactions of the legacy store into the database, then
    /// clears them from the legacy store.
    ///
    /// A record that cannot be converted or inserted is logged and skipped;
    /// the store is cleared anyway. An empty store is left untouched. Errors
    /// reading or clearing the store are returned.
    pub async fn migrate_legacy(&self, store: &mut LegacyStore) -> ResultEngine<MigrationReport> {
        store.reload()?;
        let legacy = store.transactions();
        tracing::debug!(
            "found {} legacy transactions in {}",
            legacy.len(),
            store.path().display()
        );
        if legacy.is_empty() {
            tracing::debug!("no legacy transactions to migrate");
            return Ok(MigrationReport::default());
        }

        let mut report = MigrationReport {
            found: legacy.len(),
            ..MigrationReport::default()
        };
        for record in &legacy {
            let inserted = match record.to_new_transaction() {
                Ok(new_tx) => self.insert_transaction(new_tx).await,
                Err(err) => Err(err),
            };
            match inserted {
                Ok(tx) => {
                    tracing::debug!(legacy_id = record.id, id = tx.id, "migrated {}", record.title);
                    report.migrated += 1;
                }
                Err(err) => {
                    tracing::warn!(legacy_id = record.id, "failed to migrate {}: {err}", record.title);
                    report.failed += 1;
                }
            }
        }

        store.clear_transactions()?;
        tracing::info!(
            migrated = report.migrated,
            failed = report.failed,
            "legacy transactions migrated"
        );
        Ok(report)
    }
}
