use crate::BudgetStatus;

/// Receives budget alerts raised by `Engine::check_budget_alert`.
///
/// Delivering the alert (a notification, an email) is up to the
/// implementation.
pub trait AlertSink: Send + Sync {
    fn budget_alert(&self, status: &BudgetStatus);
}

/// Writes budget alerts to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn budget_alert(&self, status: &BudgetStatus) {
        tracing::warn!(
            usage = %status.usage_label(),
            spent = %status.total_expense,
            budget = %status.monthly_budget,
            "budget alert: you have used {} of your monthly budget",
            status.usage_label()
        );
    }
}
