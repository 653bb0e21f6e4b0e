//! In-process rate table for development and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use transactions_types::{CurrencyPair, ExchangeError, ExchangeRateProvider, ExchangeRateQuote};

/// Serves the same rate for a currency on every date.
///
/// Unknown currencies yield [`ExchangeError::NoRate`], which exercises the
/// same "rate unavailable" path as the Treasury adapter.
#[derive(Debug, Clone)]
pub struct FixedRateProvider {
    rates: HashMap<String, Decimal>,
}

impl FixedRateProvider {
    /// An empty table: every lookup fails.
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: &str, rate: Decimal) -> Self {
        self.rates.insert(currency.to_string(), rate);
        self
    }

    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}

/// Approximate USD rates, good enough for local runs.
impl Default for FixedRateProvider {
    fn default() -> Self {
        Self::empty()
            .with_rate("Brazil-Real", Decimal::new(5434, 3))
            .with_rate("Canada-Dollar", Decimal::new(1367, 3))
            .with_rate("Euro Zone-Euro", Decimal::new(926, 3))
            .with_rate("Japan-Yen", Decimal::new(1464, 1))
            .with_rate("Mexico-Peso", Decimal::new(1835, 2))
            .with_rate("United Kingdom-Pound", Decimal::new(787, 3))
    }
}

#[async_trait]
impl ExchangeRateProvider for FixedRateProvider {
    async fn get_rate(
        &self,
        currency: &CurrencyPair,
        date: NaiveDate,
    ) -> Result<ExchangeRateQuote, ExchangeError> {
        self.rates
            .get(currency.as_str())
            .map(|rate| ExchangeRateQuote::new(currency.clone(), date, date, *rate))
            .ok_or_else(|| ExchangeError::NoRate {
                currency: currency.to_string(),
                date,
            })
    }

    async fn health(&self) -> Result<(), ExchangeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_known_currency() {
        let provider = FixedRateProvider::empty().with_rate("Brazil-Real", dec!(5.5));
        let quote = provider
            .get_rate(&CurrencyPair::parse("Brazil-Real").unwrap(), date())
            .await
            .unwrap();

        assert_eq!(quote.rate, dec!(5.5));
        assert_eq!(quote.record_date, date());
    }

    #[tokio::test]
    async fn test_unknown_currency() {
        let provider = FixedRateProvider::empty();
        let result = provider
            .get_rate(&CurrencyPair::parse("Atlantis-Shell").unwrap(), date())
            .await;

        assert!(matches!(result, Err(ExchangeError::NoRate { .. })));
    }

    #[test]
    fn test_default_covers_pairs_with_spaces() {
        let provider = FixedRateProvider::default();
        assert!(provider.currencies().any(|c| c == "United Kingdom-Pound"));
    }
}
