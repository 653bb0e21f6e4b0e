//! Historical Exchange Rates
//!
//! Adapters implementing the [`ExchangeRateProvider`] port:
//!
//! - [`TreasuryRateProvider`] queries the U.S. Treasury "Rates of Exchange"
//!   dataset and caches every answer in a [`RateCache`].
//! - [`FixedRateProvider`] serves an in-process table, for development and tests.
//! - [`RateProvider`] wraps either one so the binary can choose at runtime.
//!
//! # Example
//! ```ignore
//! use exchange_rates::{RateProvider, TreasuryConfig};
//!
//! let provider = RateProvider::treasury(TreasuryConfig::default())?;
//! let quote = provider.get_rate(&"Brazil-Real".parse()?, date).await?;
//! println!("{} per USD on {}", quote.rate, quote.record_date);
//! ```

mod cache;
mod fixed;
mod treasury;

use async_trait::async_trait;
use chrono::NaiveDate;

use transactions_types::{CurrencyPair, ExchangeError, ExchangeRateProvider, ExchangeRateQuote};

pub use cache::{CachedRate, RateCache, cache_key};
pub use fixed::FixedRateProvider;
pub use treasury::{
    DEFAULT_TREASURY_BASE_URL, RATES_OF_EXCHANGE_PATH, TreasuryClient, TreasuryConfig,
    TreasuryRate, TreasuryRateProvider, TreasuryRatesResponse,
};

/// Runtime-selected exchange rate provider.
pub enum RateProvider {
    Treasury(TreasuryRateProvider),
    Fixed(FixedRateProvider),
}

impl RateProvider {
    /// Builds a Treasury-backed provider with an empty cache.
    pub fn treasury(config: TreasuryConfig) -> Result<Self, ExchangeError> {
        Ok(Self::Treasury(TreasuryRateProvider::new(TreasuryClient::new(
            config,
        )?)))
    }

    /// Builds a provider serving the built-in development rates.
    pub fn fixed() -> Self {
        Self::Fixed(FixedRateProvider::default())
    }

    /// Short name used in logs and health reports.
    pub fn name(&self) -> &'static str {
        match self {
            RateProvider::Treasury(_) => "treasuryApi",
            RateProvider::Fixed(_) => "fixedRates",
        }
    }
}

#[async_trait]
impl ExchangeRateProvider for RateProvider {
    async fn get_rate(
        &self,
        currency: &CurrencyPair,
        date: NaiveDate,
    ) -> Result<ExchangeRateQuote, ExchangeError> {
        match self {
            RateProvider::Treasury(p) => p.get_rate(currency, date).await,
            RateProvider::Fixed(p) => p.get_rate(currency, date).await,
        }
    }

    async fn health(&self) -> Result<(), ExchangeError> {
        match self {
            RateProvider::Treasury(p) => p.health().await,
            RateProvider::Fixed(p) => p.health().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_provider_dispatch() {
        let provider = RateProvider::fixed();
        let quote = provider
            .get_rate(
                &CurrencyPair::parse("Brazil-Real").unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(quote.currency.as_str(), "Brazil-Real");
        assert_eq!(provider.name(), "fixedRates");
        assert!(provider.health().await.is_ok());
    }

    #[test]
    fn test_treasury_provider_builds() {
        let provider = RateProvider::treasury(TreasuryConfig::default()).unwrap();
        assert_eq!(provider.name(), "treasuryApi");
    }
}
