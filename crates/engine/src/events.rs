use tokio::task::JoinHandle;

/// Published on the engine's broadcast channel after every successful write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    TransactionsChanged,
    SettingsChanged,
}

/// Handle of a running subscription. Dropping it stops the updates.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stops the updates.
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
