//! Aggregations over a list of transactions.
//!
//! Everything here is pure: callers load the transactions of a period and
//! pass them in. Totals are exact integer cents and fail with
//! [`crate::EngineError::Overflow`] instead of wrapping; percentages are truncated
//! toward zero and never redistributed, so a breakdown may add up to less
//! than 100.

use std::collections::HashMap;

use serde::Serialize;

use crate::{MoneyCents, ResultEngine, Transaction, TransactionKind};

/// Number of categories shown in breakdowns and reports.
pub const TOP_CATEGORIES: usize = 5;

const CRITICAL_PERCENT: i64 = 90;
const WARNING_PERCENT: i64 = 75;

/// A category total and its share of the grand total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: MoneyCents,
    /// `0..=100`, truncated.
    pub percentage: u8,
}

/// Sum of the amounts of the transactions of `kind`.
pub fn total_for_kind(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> ResultEngine<MoneyCents> {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind)
        .try_fold(MoneyCents::ZERO, |total, tx| total.try_add(tx.amount))
}

/// Per-category totals for `kind`, largest first.
///
/// Categories with equal totals keep the order in which they first appear
/// in `transactions`.
pub fn category_totals(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> ResultEngine<Vec<(String, MoneyCents)>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, MoneyCents)> = Vec::new();
    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        match index.get(tx.category.as_str()) {
            Some(&pos) => totals[pos].1 = totals[pos].1.try_add(tx.amount)?,
            None => {
                index.insert(tx.category.as_str(), totals.len());
                totals.push((tx.category.clone(), tx.amount));
            }
        }
    }
    // `sort_by` is stable.
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(totals)
}

/// The five largest categories for `kind`.
pub fn top_categories(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> ResultEngine<Vec<(String, MoneyCents)>> {
    let mut totals = category_totals(transactions, kind)?;
    totals.truncate(TOP_CATEGORIES);
    Ok(totals)
}

/// `floor(part * 100 / whole)` clamped to `0..=100`; 0 when `whole <= 0`.
pub fn percentage_of(part: MoneyCents, whole: MoneyCents) -> u8 {
    if !whole.is_positive() {
        return 0;
    }
    let pct = (i128::from(part.cents()) * 100).div_euclid(i128::from(whole.cents()));
    pct.clamp(0, 100) as u8
}

/// Top five categories of `kind` with their share of the grand total of
/// that kind.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> ResultEngine<Vec<CategoryAggregate>> {
    let grand_total = total_for_kind(transactions, kind)?;
    Ok(top_categories(transactions, kind)?
        .into_iter()
        .map(|(category, total)| CategoryAggregate {
            percentage: percentage_of(total, grand_total),
            category,
            total,
        })
        .collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Normal,
    Warning,
    Critical,
}

impl BudgetTier {
    fn from_percent(percent: i64) -> Self {
        if percent >= CRITICAL_PERCENT {
            Self::Critical
        } else if percent >= WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Color used to draw the usage bar.
    pub fn color_name(self) -> &'static str {
        match self {
            Self::Normal => "green",
            Self::Warning => "orange",
            Self::Critical => "red",
        }
    }
}

impl core::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Spending measured against the monthly budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub monthly_budget: MoneyCents,
    pub total_expense: MoneyCents,
    /// Truncated usage percentage; `None` when no budget is set.
    pub usage_percent: Option<i64>,
    /// Usage in tenths of a percent, rounded half up; `None` when no budget
    /// is set.
    pub usage_tenths: Option<i64>,
    pub tier: BudgetTier,
    /// Never negative.
    pub remaining: MoneyCents,
}

impl BudgetStatus {
    pub fn compute(total_expense: MoneyCents, monthly_budget: MoneyCents) -> Self {
        let (usage_percent, usage_tenths) = if monthly_budget.is_positive() {
            let expense = i128::from(total_expense.cents());
            let budget = i128::from(monthly_budget.cents());
            let percent = (expense * 100).div_euclid(budget);
            let tenths = (expense * 2000 + budget).div_euclid(budget * 2);
            (Some(saturate(percent)), Some(saturate(tenths)))
        } else {
            (None, None)
        };
        let tier = usage_percent.map_or(BudgetTier::Normal, BudgetTier::from_percent);
        let remaining = MoneyCents::new(saturate(
            (i128::from(monthly_budget.cents()) - i128::from(total_expense.cents())).max(0),
        ));

        Self {
            monthly_budget,
            total_expense,
            usage_percent,
            usage_tenths,
            tier,
            remaining,
        }
    }

    pub fn has_budget(&self) -> bool {
        self.usage_percent.is_some()
    }

    /// Whether the budget alert fires for this status.
    pub fn should_alert(&self, alerts_enabled: bool) -> bool {
        alerts_enabled && self.has_budget() && self.tier == BudgetTier::Critical
    }

    /// Usage with one decimal, e.g. `80.0%`, or `N/A` without a budget.
    pub fn usage_label(&self) -> String {
        match self.usage_tenths {
            Some(tenths) => {
                let sign = if tenths < 0 { "-" } else { "" };
                let abs = tenths.unsigned_abs();
                format!("{sign}{}.{}%", abs / 10, abs % 10)
            }
            None => "N/A".to_string(),
        }
    }
}

/// Money available in a month: the salary plus any extra income, against
/// what has been spent so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SpendingOverview {
    pub monthly_salary: MoneyCents,
    /// Income transactions of the month, on top of the salary.
    pub additional_income: MoneyCents,
    pub total_to_spend: MoneyCents,
    pub current_spending: MoneyCents,
    /// Negative when spending exceeds salary and income.
    pub remaining: MoneyCents,
}

impl SpendingOverview {
    pub fn compute(
        monthly_salary: MoneyCents,
        additional_income: MoneyCents,
        current_spending: MoneyCents,
    ) -> ResultEngine<Self> {
        let total_to_spend = monthly_salary.try_add(additional_income)?;
        let remaining = total_to_spend.try_sub(current_spending)?;
        Ok(Self {
            monthly_salary,
            additional_income,
            total_to_spend,
            current_spending,
            remaining,
        })
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
