//! Monthly report text and its single-page layout.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{BudgetStatus, Currency, MoneyCents, MonthPeriod, ResultEngine};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const LOGO_SIZE: f32 = 120.0;
pub const FOOTER_TEXT: &str = "Generated by Finance Tracker App";

const MARGIN_X: f32 = 50.0;
const LOGO_Y: f32 = 30.0;
const TITLE_Y: f32 = 180.0;
const GENERATED_ON_Y: f32 = 210.0;
const CONTENT_START_Y: f32 = 250.0;
const LINE_HEIGHT: f32 = 20.0;
const SECTION_GAP: f32 = 10.0;
const FOOTER_OFFSET: f32 = 50.0;

/// Figures shown in the monthly report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    #[serde(skip)]
    pub period: MonthPeriod,
    pub currency: Currency,
    pub total_income: MoneyCents,
    pub total_expense: MoneyCents,
    pub monthly_budget: MoneyCents,
    /// Largest expense categories, at most five.
    pub top_categories: Vec<(String, MoneyCents)>,
}

impl MonthlyReport {
    /// Income minus expense; [`crate::EngineError::Overflow`] when the
    /// difference does not fit.
    pub fn balance(&self) -> ResultEngine<MoneyCents> {
        self.total_income.try_sub(self.total_expense)
    }

    pub fn budget_status(&self) -> BudgetStatus {
        BudgetStatus::compute(self.total_expense, self.monthly_budget)
    }

    /// Plain-text report, one `\n`-terminated line per entry.
    pub fn render_text(&self) -> ResultEngine<String> {
        let money = |amount: MoneyCents| amount.format(&self.currency);
        let mut lines = vec![
            format!("Monthly Financial Report - {}", self.period.label()),
            String::new(),
            "Income Summary:".to_string(),
            format!("Total Income: {}", money(self.total_income)),
            String::new(),
            "Expense Summary:".to_string(),
            format!("Total Expenses: {}", money(self.total_expense)),
            format!("Monthly Budget: {}", money(self.monthly_budget)),
            format!("Budget Usage: {}", self.budget_status().usage_label()),
            String::new(),
            "Top Expense Categories:".to_string(),
        ];
        lines.extend(
            self.top_categories
                .iter()
                .map(|(category, total)| format!("{category}: {}", money(*total))),
        );
        lines.push(String::new());
        lines.push(format!("Balance: {}", money(self.balance()?)));
        lines.push(String::new());
        lines.push(FOOTER_TEXT.to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }

    /// Lays the report out on one A4 page.
    pub fn layout(&self, generated_on: NaiveDate) -> ResultEngine<PageLayout> {
        Ok(PageLayout::new(&self.render_text()?, generated_on))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// 24pt bold.
    Header,
    /// 14pt regular.
    Body,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub style: TextStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Positioned content of the exported page, in points.
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub logo: Rect,
    pub title: TextItem,
    pub generated_on: TextItem,
    pub lines: Vec<TextItem>,
    pub footer: TextItem,
}

/// Lines mentioning a total, the budget or the category list are drawn as
/// section headers.
fn is_section_header(line: &str) -> bool {
    line.contains("Total") || line.contains("Budget") || line.contains("Categories")
}

impl PageLayout {
    pub fn new(report_text: &str, generated_on: NaiveDate) -> Self {
        let mut y = CONTENT_START_Y;
        let mut lines = Vec::new();
        for line in report_text.lines() {
            if is_section_header(line) {
                y += SECTION_GAP;
                lines.push(TextItem {
                    text: line.to_string(),
                    x: MARGIN_X,
                    y,
                    style: TextStyle::Header,
                });
                y += LINE_HEIGHT + SECTION_GAP;
            } else {
                lines.push(TextItem {
                    text: line.to_string(),
                    x: MARGIN_X,
                    y,
                    style: TextStyle::Body,
                });
                y += LINE_HEIGHT;
            }
        }

        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            logo: Rect {
                x: (PAGE_WIDTH - LOGO_SIZE) / 2.0,
                y: LOGO_Y,
                width: LOGO_SIZE,
                height: LOGO_SIZE,
            },
            title: TextItem {
                text: "Monthly Financial Report".to_string(),
                x: MARGIN_X,
                y: TITLE_Y,
                style: TextStyle::Header,
            },
            generated_on: TextItem {
                text: format!("Generated on: {}", generated_on.format("%d %b %Y")),
                x: MARGIN_X,
                y: GENERATED_ON_Y,
                style: TextStyle::Body,
            },
            lines,
            footer: TextItem {
                text: FOOTER_TEXT.to_string(),
                x: MARGIN_X,
                y: PAGE_HEIGHT - FOOTER_OFFSET,
                style: TextStyle::Body,
            },
        }
    }

    /// `false` when the report runs into the footer. Nothing is paginated.
    pub fn fits_on_page(&self) -> bool {
        self.lines.last().is_none_or(|last| last.y < self.footer.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> MonthlyReport {
        MonthlyReport {
            period: MonthPeriod::new(2026, 10).unwrap(),
            currency: Currency::try_from("LKR").unwrap(),
            total_income: MoneyCents::units(5000),
            total_expense: MoneyCents::units(3200),
            monthly_budget: MoneyCents::units(4000),
            top_categories: vec![
                ("Rent".to_string(), MoneyCents::units(2000)),
                ("Food".to_string(), MoneyCents::units(1200)),
            ],
        }
    }

    #[test]
    fn text_has_fixed_structure() {
        let expected = "\
Monthly Financial Report - October 2026

Income Summary:
Total Income: LKR 5000.00

Expense Summary:
Total Expenses: LKR 3200.00
Monthly Budget: LKR 4000.00
Budget Usage: 80.0%

Top Expense Categories:
Rent: LKR 2000.00
Food: LKR 1200.00

Balance: LKR 1800.00

Generated by Finance Tracker App
";
        assert_eq!(report().render_text().unwrap(), expected);
    }

    #[test]
    fn usage_is_na_without_budget() {
        let mut report = report();
        report.monthly_budget = MoneyCents::ZERO;
        assert!(report.render_text().unwrap().contains("Budget Usage: N/A\n"));
    }

    #[test]
    fn negative_balance_keeps_sign() {
        let mut report = report();
        report.total_expense = MoneyCents::new(500_050);
        assert!(report.render_text().unwrap().contains("Balance: LKR -0.50\n"));
    }

    #[test]
    fn unrepresentable_balance_is_an_error() {
        let mut report = report();
        report.total_income = MoneyCents::new(i64::MAX);
        report.total_expense = MoneyCents::units(-1);
        assert!(matches!(
            report.render_text(),
            Err(crate::EngineError::Overflow(_))
        ));
    }

    #[test]
    fn section_headers_get_extra_spacing() {
        let layout = report()
            .layout(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
            .unwrap();
        assert_eq!(layout.logo.x, 237.5);
        assert_eq!(layout.generated_on.text, "Generated on: 18 Oct 2026");

        let first = &layout.lines[0];
        assert_eq!(first.y, 250.0);
        assert_eq!(first.style, TextStyle::Body);

        let total_income = layout
            .lines
            .iter()
            .find(|l| l.text.starts_with("Total Income"))
            .unwrap();
        assert_eq!(total_income.style, TextStyle::Header);
        assert_eq!(total_income.y, 320.0);

        let categories = layout
            .lines
            .iter()
            .find(|l| l.text == "Top Expense Categories:")
            .unwrap();
        assert_eq!(categories.y, 540.0);
        assert_eq!(layout.footer.y, 792.0);
        assert!(layout.fits_on_page());
    }

    #[test]
    fn long_reports_overflow_the_footer() {
        let text = "line\n".repeat(40);
        let layout = PageLayout::new(&text, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert!(!layout.fits_on_page());
    }
}
