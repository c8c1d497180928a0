use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code attached to the user settings.
///
/// The ledger is mono-currency: every amount is shown with the code stored
/// in the settings row. Codes are three ASCII letters, kept upper-case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::Validation(format!(
                "unsupported currency: {value}"
            )));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for Currency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_uppercased() {
        assert_eq!(Currency::try_from(" lkr ").unwrap().code(), "LKR");
    }

    #[test]
    fn rejects_symbols_and_bad_lengths() {
        assert!(Currency::try_from("$").is_err());
        assert!(Currency::try_from("EURO").is_err());
        assert!(Currency::try_from("U5D").is_err());
    }
}
