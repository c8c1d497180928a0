//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! trimming and Unicode normalization so titles and categories compare the
//! same way everywhere.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a required text field.
///
/// `message` is the user-facing error returned when the field is blank.
pub(crate) fn normalize_required(value: &str, message: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(message.to_string()));
    }
    Ok(trimmed.nfc().collect())
}

/// Trim and NFC-normalize an optional text field; blank becomes `None`.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

/// Local midnight of `date` in `tz`, as UTC.
///
/// On a DST gap at midnight the earliest valid instant of the day is used.
pub(crate) fn local_midnight_utc(date: NaiveDate, tz: Tz) -> ResultEngine<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidPeriod(format!("invalid date {date}")))?;
    if let Some(local) = tz.from_local_datetime(&midnight).earliest() {
        return Ok(local.with_timezone(&Utc));
    }
    // Midnight skipped by a DST jump: walk forward to the first valid hour.
    for hour in 1..=3 {
        let candidate = date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| EngineError::InvalidPeriod(format!("invalid date {date}")))?;
        if let Some(local) = tz.from_local_datetime(&candidate).earliest() {
            return Ok(local.with_timezone(&Utc));
        }
    }
    Err(EngineError::InvalidPeriod(format!(
        "no valid local time on {date} in {tz}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_is_trimmed_and_composed() {
        // "e" + combining acute accent composes to a single code point.
        let value = normalize_required("  Cafe\u{301} ", "title").unwrap();
        assert_eq!(value, "Caf\u{e9}");
        assert_eq!(
            normalize_required("   ", "Please enter a title"),
            Err(EngineError::Validation("Please enter a title".to_string()))
        );
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some(" x ")), Some("x".to_string()));
    }

    #[test]
    fn midnight_respects_time_zone() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let utc = local_midnight_utc(date, chrono_tz::Asia::Colombo).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-01-14T18:30:00+00:00");
    }
}
