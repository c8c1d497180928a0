use std::{fmt, sync::Arc};

use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;

use crate::{AlertSink, LogAlertSink, ResultEngine, StoreEvent};

mod analytics;
mod migrate;
mod settings;
mod subscriptions;
mod transactions;

pub use analytics::PeriodTotals;
pub use migrate::MigrationReport;
pub use transactions::TransactionFilter;

const EVENT_CAPACITY: usize = 64;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of the ledger: transactions, settings, aggregations and the
/// legacy migration, on top of one database connection.
///
/// Cloning is cheap; clones share the connection and the change channel.
#[derive(Clone)]
pub struct Engine {
    database: DatabaseConnection,
    events: broadcast::Sender<StoreEvent>,
    time_zone: Tz,
    alert_sink: Arc<dyn AlertSink>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Time zone used for month boundaries and for dates typed by the user.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    fn publish(&self, event: StoreEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    time_zone: Tz,
    alert_sink: Arc<dyn AlertSink>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            time_zone: Tz::UTC,
            alert_sink: Arc::new(LogAlertSink),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Time zone for month boundaries (default UTC).
    pub fn time_zone(mut self, tz: Tz) -> EngineBuilder {
        self.time_zone = tz;
        self
    }

    /// Where budget alerts go (default: the log).
    pub fn alert_sink(mut self, sink: Arc<dyn AlertSink>) -> EngineBuilder {
        self.alert_sink = sink;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Engine {
            database: self.database,
            events,
            time_zone: self.time_zone,
            alert_sink: self.alert_sink,
        })
    }
}
