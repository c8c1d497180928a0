//! Command structs for engine operations.
//!
//! `TransactionInput` carries raw user input (as typed in a form or on the
//! command line) and turns it into a validated `NewTransaction`.
//! `TransactionUpdate` groups the optional field changes of an update.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{
    EngineError, MoneyCents, NewTransaction, ResultEngine, TransactionKind,
    util::{local_midnight_utc, normalize_optional, normalize_required},
};

/// Parses a `YYYY-MM-DD` date as local midnight in `tz`.
pub fn parse_local_date(raw: &str, tz: Tz) -> ResultEngine<DateTime<Utc>> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| EngineError::Validation(format!("Please enter a valid date: {raw}")))?;
    local_midnight_utc(date, tz)
}

/// Raw, unvalidated input for a new transaction.
#[derive(Clone, Debug)]
pub struct TransactionInput {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub kind: TransactionKind,
    /// `YYYY-MM-DD`; blank means "now".
    pub date: Option<String>,
    pub note: Option<String>,
}

impl TransactionInput {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            category: category.into(),
            kind,
            date: None,
            note: None,
        }
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Validates the input in form order: title, amount, category, date.
    ///
    /// The amount sign is not checked. A date is read as local midnight in
    /// `tz`; without a date the transaction happens at `now`.
    pub fn validate(self, now: DateTime<Utc>, tz: Tz) -> ResultEngine<NewTransaction> {
        let title = normalize_required(&self.title, "Please enter a title")?;
        let amount: MoneyCents = self.amount.parse()?;
        let category = normalize_required(&self.category, "Please select a category")?;
        let occurred_at = match self.date.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(raw) => parse_local_date(raw, tz)?,
        };

        Ok(NewTransaction {
            title,
            amount,
            category,
            kind: self.kind,
            occurred_at,
            note: normalize_optional(self.note.as_deref()),
        })
    }
}

/// Field changes applied by `Engine::update_transaction`.
///
/// `None` keeps the stored value. `note: Some(None)` clears the note.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdate {
    pub title: Option<String>,
    pub amount: Option<MoneyCents>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub note: Option<Option<String>>,
}

impl TransactionUpdate {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = Some(note);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.kind.is_none()
            && self.occurred_at.is_none()
            && self.note.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_input_is_normalized() {
        let tx = TransactionInput::new(" Lunch ", "12,50", " Food ", TransactionKind::Expense)
            .note("  ")
            .validate(now(), Tz::UTC)
            .unwrap();
        assert_eq!(tx.title, "Lunch");
        assert_eq!(tx.amount, MoneyCents::new(1250));
        assert_eq!(tx.category, "Food");
        assert_eq!(tx.occurred_at, now());
        assert_eq!(tx.note, None);
    }

    #[test]
    fn missing_fields_are_reported_in_form_order() {
        let err = TransactionInput::new("", "abc", "", TransactionKind::Expense)
            .validate(now(), Tz::UTC)
            .unwrap_err();
        assert_eq!(err, EngineError::Validation("Please enter a title".into()));

        let err = TransactionInput::new("Bus", "abc", "", TransactionKind::Expense)
            .validate(now(), Tz::UTC)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("Please enter a valid amount".into())
        );

        let err = TransactionInput::new("Bus", "2", " ", TransactionKind::Expense)
            .validate(now(), Tz::UTC)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("Please select a category".into())
        );
    }

    #[test]
    fn explicit_date_is_local_midnight() {
        let tx = TransactionInput::new("Salary", "5000", "Salary", TransactionKind::Income)
            .date("2026-10-01")
            .validate(now(), Tz::UTC)
            .unwrap();
        assert_eq!(
            tx.occurred_at,
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
        );

        assert!(
            TransactionInput::new("Salary", "5000", "Salary", TransactionKind::Income)
                .date("01/10/2026")
                .validate(now(), Tz::UTC)
                .is_err()
        );
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(TransactionUpdate::default().is_empty());
        assert!(!TransactionUpdate::default().note(None).is_empty());
    }
}
