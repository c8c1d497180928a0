use std::{
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, salary, budget, totals) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Largest magnitude accepted for a single amount: one trillion units.
    ///
    /// Sums of up to ~90 000 such amounts still fit in an `i64`.
    pub const MAX_AMOUNT: MoneyCents = MoneyCents(100_000_000_000_000);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole units (e.g. `MoneyCents::units(5)` is
    /// `5.00`).
    #[must_use]
    pub const fn units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// `self + rhs`, failing with [`EngineError::Overflow`].
    pub fn try_add(self, rhs: MoneyCents) -> Result<MoneyCents, EngineError> {
        self.checked_add(rhs)
            .ok_or_else(|| EngineError::Overflow(format!("{self} + {rhs}")))
    }

    /// `self - rhs`, failing with [`EngineError::Overflow`].
    pub fn try_sub(self, rhs: MoneyCents) -> Result<MoneyCents, EngineError> {
        self.checked_sub(rhs)
            .ok_or_else(|| EngineError::Overflow(format!("{self} - {rhs}")))
    }

    /// Rejects amounts whose magnitude exceeds [`MoneyCents::MAX_AMOUNT`].
    pub fn ensure_accepted(self) -> Result<Self, EngineError> {
        if self.0.unsigned_abs() > Self::MAX_AMOUNT.0.unsigned_abs() {
            return Err(EngineError::Validation("amount too large".to_string()));
        }
        Ok(self)
    }

    /// Converts a floating amount in major units, as written by the legacy
    /// store, rounding to the nearest cent.
    pub fn from_major_f64(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::Validation(format!(
                "amount is not a finite number: {value}"
            )));
        }
        let cents = (value * 100.0).round();
        if cents.abs() > Self::MAX_AMOUNT.0 as f64 {
            return Err(EngineError::Validation("amount too large".to_string()));
        }
        Ok(Self(cents as i64))
    }

    /// Formats the amount prefixed by the currency code, e.g. `USD 12.34`.
    #[must_use]
    pub fn format(self, currency: &Currency) -> String {
        format!("{} {self}", currency.code())
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    /// - rejects magnitudes above [`MoneyCents::MAX_AMOUNT`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::Validation("Please enter an amount".to_string());
        let invalid = || EngineError::Validation("Please enter a valid amount".to_string());
        let overflow = || EngineError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::Validation(
                            "amount has too many decimals".to_string(),
                        ));
                    }
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        MoneyCents(signed).ensure_accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn format_prefixes_currency_code() {
        let currency = Currency::try_from("lkr").unwrap();
        assert_eq!(MoneyCents::units(1800).format(&currency), "LKR 1800.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<MoneyCents>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("abc".parse::<MoneyCents>().is_err());
        assert!("1.2.3".parse::<MoneyCents>().is_err());
        assert!("".parse::<MoneyCents>().is_err());
        assert!("-".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn legacy_doubles_round_to_nearest_cent() {
        assert_eq!(MoneyCents::from_major_f64(19.99).unwrap().cents(), 1999);
        assert_eq!(MoneyCents::from_major_f64(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(MoneyCents::from_major_f64(-4.5).unwrap().cents(), -450);
        assert!(MoneyCents::from_major_f64(f64::NAN).is_err());
        assert!(MoneyCents::from_major_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn parse_rejects_amounts_above_the_cap() {
        assert_eq!(
            "1000000000000".parse::<MoneyCents>().unwrap(),
            MoneyCents::MAX_AMOUNT
        );
        assert_eq!(
            "-1000000000000".parse::<MoneyCents>().unwrap().cents(),
            -MoneyCents::MAX_AMOUNT.cents()
        );
        for raw in ["1000000000000.01", "90000000000000000", "-90000000000000000"] {
            assert_eq!(
                raw.parse::<MoneyCents>().unwrap_err(),
                EngineError::Validation("amount too large".to_string())
            );
        }
        assert!(MoneyCents::from_major_f64(9.0e16).is_err());
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let big = MoneyCents::new(i64::MAX - 1);
        assert_eq!(big.checked_add(MoneyCents::new(1)), Some(MoneyCents::new(i64::MAX)));
        assert!(big.checked_add(MoneyCents::new(2)).is_none());
        assert!(matches!(
            MoneyCents::new(i64::MIN).try_sub(MoneyCents::new(1)),
            Err(EngineError::Overflow(_))
        ));
        assert_eq!(
            MoneyCents::units(5).try_sub(MoneyCents::units(7)).unwrap(),
            MoneyCents::units(-2)
        );
    }
}
