//! Currency pair identifiers ("Brazil-Real", "United Kingdom-Pound").

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Characters that are never accepted in a currency pair.
const PROHIBITED: [char; 3] = ['<', '>', '"'];

/// Country/currency combination used to look up an exchange rate.
///
/// The upstream rate provider names currencies as `<Country>-<Currency>`;
/// both halves must be non-empty and may contain spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair(String);

impl CurrencyPair {
    /// Parses and validates a currency pair.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.contains(PROHIBITED) {
            return Err(DomainError::InvalidCurrency(raw.to_string()));
        }

        // Any hyphen with something on both sides will do: "Euro Zone-Euro".
        let has_separator = raw
            .char_indices()
            .any(|(i, c)| c == '-' && i > 0 && i + 1 < raw.len());
        if !has_separator {
            return Err(DomainError::InvalidCurrency(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyPair {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pair() {
        let pair = CurrencyPair::parse("Brazil-Real").unwrap();
        assert_eq!(pair.as_str(), "Brazil-Real");
    }

    #[test]
    fn test_parse_pair_with_spaces() {
        let pair: CurrencyPair = "United Kingdom-Pound".parse().unwrap();
        assert_eq!(pair.to_string(), "United Kingdom-Pound");
    }

    #[test]
    fn test_parse_rejects_prohibited_characters() {
        let result = CurrencyPair::parse("Brazil-</Real>");
        assert!(matches!(result, Err(DomainError::InvalidCurrency(_))));
    }

    #[test]
    fn test_parse_requires_both_halves() {
        assert!(CurrencyPair::parse("Real").is_err());
        assert!(CurrencyPair::parse("-Real").is_err());
        assert!(CurrencyPair::parse("Brazil-").is_err());
        assert!(CurrencyPair::parse("").is_err());
    }
}
