use tokio::sync::broadcast::error::RecvError;

use crate::{StoreEvent, Subscription, Transaction, UserSettings};

use super::{Engine, TransactionFilter};

impl Engine {
    /// Calls `on_change` with the transactions matching `filter` now and
    /// again after every change to the transactions table.
    ///
    /// Failed reads are logged and skipped. Updates stop when the returned
    /// handle is dropped.
    pub fn subscribe_transactions<F>(&self, filter: TransactionFilter, mut on_change: F) -> Subscription
    where
        F: FnMut(Vec<Transaction>) + Send + 'static,
    {
        let engine = self.clone();
        let mut events = self.events.subscribe();
        let task = tokio::spawn(async move {
            let mut refresh = true;
            loop {
                if refresh {
                    match engine.list_transactions(&filter).await {
                        Ok(transactions) => on_change(transactions),
                        Err(err) => tracing::error!("failed to refresh transactions: {err}"),
                    }
                }
                refresh = match events.recv().await {
                    Ok(StoreEvent::TransactionsChanged) => true,
                    Ok(StoreEvent::SettingsChanged) => false,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "transaction subscriber lagged");
                        true
                    }
                    Err(RecvError::Closed) => break,
                };
            }
        });
        Subscription::new(task)
    }

    /// Calls `on_change` with the settings now and after every settings
    /// write.
    pub fn subscribe_settings<F>(&self, mut on_change: F) -> Subscription
    where
        F: FnMut(UserSettings) + Send + 'static,
    {
        let engine = self.clone();
        let mut events = self.events.subscribe();
        let task = tokio::spawn(async move {
            let mut refresh = true;
            loop {
                if refresh {
                    match engine.settings().await {
                        Ok(settings) => on_change(settings),
                        Err(err) => tracing::error!("failed to refresh settings: {err}"),
                    }
                }
                refresh = match events.recv().await {
                    Ok(StoreEvent::SettingsChanged) => true,
                    Ok(StoreEvent::TransactionsChanged) => false,
                    Err(RecvError::Lagged(_)) => true,
                    Err(RecvError::Closed) => break,
                };
            }
        });
        Subscription::new(task)
    }
}
