//! # Country Codes
//!
//! ISO 3166-1 alpha-2 country codes, normalized to upper case at
//! construction so `"fr"` and `"FR"` compare equal everywhere downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShipmentError;

/// A two-letter, upper-case country code.
///
/// Validation is structural only (two ASCII letters). Whether a code is
/// assigned by ISO is not checked; unknown codes are legal and fall into
/// whatever default a zone table defines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Validate and normalize a country code.
    ///
    /// # Errors
    ///
    /// Returns [`ShipmentError::InvalidCountryCode`] unless the trimmed
    /// input is exactly two ASCII letters.
    pub fn new(code: &str) -> Result<Self, ShipmentError> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ShipmentError::InvalidCountryCode(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The upper-case code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = ShipmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ShipmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for CountryCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CountryCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_upper_case() {
        let code = CountryCode::new("fr").unwrap();
        assert_eq!(code.as_str(), "FR");
        assert_eq!(code, "FR");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(CountryCode::new(" de ").unwrap().as_str(), "DE");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(CountryCode::new("FRA").is_err());
        assert!(CountryCode::new("F").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn rejects_non_letters() {
        assert!(CountryCode::new("F1").is_err());
        assert!(CountryCode::new("é1").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let code = CountryCode::new("us").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"US\"");
        let back: CountryCode = serde_json::from_str("\"gb\"").unwrap();
        assert_eq!(back.as_str(), "GB");
        assert!(serde_json::from_str::<CountryCode>("\"GBR\"").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any two ASCII letters form a code, and normalizing twice is a no-op.
            #[test]
            fn two_letters_always_accepted(raw in "[a-zA-Z]{2}") {
                let code = CountryCode::new(&raw).unwrap();
                prop_assert_eq!(code.as_str(), raw.to_ascii_uppercase());
                let again = CountryCode::new(code.as_str()).unwrap();
                prop_assert_eq!(again, code);
            }
        }
    }
}
