//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, caches, fixed tables, etc.

use chrono::NaiveDate;

use crate::domain::{CurrencyPair, ExchangeRateQuote};
use crate::error::ExchangeError;

/// Port trait for historical exchange rate providers.
#[async_trait::async_trait]
pub trait ExchangeRateProvider: Send + Sync + 'static {
    /// Gets the USD -> `currency` rate applicable on `date`.
    ///
    /// Implementations must return within a bounded time; a timeout is
    /// reported as [`ExchangeError::Timeout`].
    async fn get_rate(
        &self,
        currency: &CurrencyPair,
        date: NaiveDate,
    ) -> Result<ExchangeRateQuote, ExchangeError>;

    /// Checks that the provider can currently answer requests.
    async fn health(&self) -> Result<(), ExchangeError>;
}
