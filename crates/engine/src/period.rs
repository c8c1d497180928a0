use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{EngineError, ResultEngine, util::local_midnight_utc};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, interpreted in a given time zone.
///
/// Budget usage, category analysis and the monthly report all look at one
/// month of transactions. The bounds are half-open: `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidPeriod(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `instant` as seen from `tz`.
    pub fn containing(instant: DateTime<Utc>, tz: Tz) -> Self {
        let local = instant.with_timezone(&tz);
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The following month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// UTC bounds `[start, end)` of the month in `tz`.
    pub fn bounds(self, tz: Tz) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
        let start = local_midnight_utc(self.first_day()?, tz)?;
        let end = local_midnight_utc(self.next().first_day()?, tz)?;
        Ok((start, end))
    }

    /// Display label, e.g. `October 2026`.
    pub fn label(self) -> String {
        let name = MONTH_NAMES[(self.month - 1) as usize];
        format!("{name} {}", self.year)
    }

    /// File name stamp, e.g. `202610`.
    pub fn stamp(self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    fn first_day(self) -> ResultEngine<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| EngineError::InvalidPeriod(self.stamp()))
    }
}

impl std::str::FromStr for MonthPeriod {
    type Err = EngineError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriod(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn december_rolls_over_to_january() {
        let period = MonthPeriod::new(2026, 12).unwrap();
        assert_eq!(period.next(), MonthPeriod::new(2027, 1).unwrap());
        let (start, end) = period.bounds(Tz::UTC).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn bounds_follow_the_time_zone() {
        let period = MonthPeriod::new(2026, 10).unwrap();
        let (start, _) = period.bounds(chrono_tz::Asia::Colombo).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 9, 30, 18, 30, 0).unwrap());
    }

    #[test]
    fn containing_uses_local_calendar() {
        // 20:00 UTC on Oct 31 is already Nov 1 in Colombo.
        let instant = Utc.with_ymd_and_hms(2026, 10, 31, 20, 0, 0).unwrap();
        assert_eq!(
            MonthPeriod::containing(instant, chrono_tz::Asia::Colombo),
            MonthPeriod::new(2026, 11).unwrap()
        );
        assert_eq!(
            MonthPeriod::containing(instant, Tz::UTC),
            MonthPeriod::new(2026, 10).unwrap()
        );
    }

    #[test]
    fn label_and_stamp() {
        let period: MonthPeriod = "2026-10".parse().unwrap();
        assert_eq!(period.label(), "October 2026");
        assert_eq!(period.stamp(), "202610");
        assert!("2026-13".parse::<MonthPeriod>().is_err());
        assert!("october".parse::<MonthPeriod>().is_err());
    }
}
