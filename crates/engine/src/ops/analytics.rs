use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;

use crate::{
    BudgetStatus, CategoryAggregate, MoneyCents, MonthPeriod, MonthlyReport, ResultEngine,
    SpendingOverview, TransactionKind,
    analytics::{category_breakdown, top_categories},
};

use super::Engine;

/// Income and expense sums of a period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

impl PeriodTotals {
    pub fn balance(&self) -> ResultEngine<MoneyCents> {
        self.income.try_sub(self.expense)
    }
}

impl Engine {
    /// Sums income and expense of `period` in the database.
    pub async fn period_totals(&self, period: MonthPeriod) -> ResultEngine<PeriodTotals> {
        let (from, to) = period.bounds(self.time_zone)?;
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT \
             COALESCE(SUM(CASE WHEN type = ? THEN amount_minor ELSE 0 END), 0) AS income, \
             COALESCE(SUM(CASE WHEN type = ? THEN amount_minor ELSE 0 END), 0) AS expense \
             FROM transactions WHERE date >= ? AND date < ?",
            vec![
                TransactionKind::Income.as_str().into(),
                TransactionKind::Expense.as_str().into(),
                from.into(),
                to.into(),
            ],
        );
        let row = self.database.query_one(stmt).await?;
        let (income, expense) = match row {
            Some(row) => (
                row.try_get::<i64>("", "income")?,
                row.try_get::<i64>("", "expense")?,
            ),
            None => (0, 0),
        };
        Ok(PeriodTotals {
            income: MoneyCents::new(income),
            expense: MoneyCents::new(expense),
        })
    }

    /// Income minus expense of `period`.
    pub async fn monthly_balance(&self, period: MonthPeriod) -> ResultEngine<MoneyCents> {
        self.period_totals(period).await?.balance()
    }

    /// Expense of `period` against the configured monthly budget.
    pub async fn budget_status(&self, period: MonthPeriod) -> ResultEngine<BudgetStatus> {
        let settings = self.settings().await?;
        let totals = self.period_totals(period).await?;
        Ok(BudgetStatus::compute(totals.expense, settings.monthly_budget))
    }

    /// Computes the budget status of `period` and hands it to the alert sink
    /// when usage is critical and alerts are enabled.
    pub async fn check_budget_alert(&self, period: MonthPeriod) -> ResultEngine<BudgetStatus> {
        let settings = self.settings().await?;
        let totals = self.period_totals(period).await?;
        let status = BudgetStatus::compute(totals.expense, settings.monthly_budget);
        if status.should_alert(settings.budget_alerts_enabled) {
            self.alert_sink.budget_alert(&status);
        }
        Ok(status)
    }

    /// Salary plus the income of `period`, against its expense.
    pub async fn spending_overview(&self, period: MonthPeriod) -> ResultEngine<SpendingOverview> {
        let settings = self.settings().await?;
        let totals = self.period_totals(period).await?;
        SpendingOverview::compute(settings.monthly_salary, totals.income, totals.expense)
    }

    /// Top five categories of `kind` in `period`, with percentages.
    pub async fn category_breakdown_for(
        &self,
        period: MonthPeriod,
        kind: TransactionKind,
    ) -> ResultEngine<Vec<CategoryAggregate>> {
        let transactions = self.transactions_in(period, Some(kind)).await?;
        category_breakdown(&transactions, kind)
    }

    /// Figures of the monthly report for `period`.
    pub async fn monthly_report(&self, period: MonthPeriod) -> ResultEngine<MonthlyReport> {
        let settings = self.settings().await?;
        let totals = self.period_totals(period).await?;
        let expenses = self
            .transactions_in(period, Some(TransactionKind::Expense))
            .await?;
        Ok(MonthlyReport {
            period,
            currency: settings.currency,
            total_income: totals.income,
            total_expense: totals.expense,
            monthly_budget: settings.monthly_budget,
            top_categories: top_categories(&expenses, TransactionKind::Expense)?,
        })
    }
}
