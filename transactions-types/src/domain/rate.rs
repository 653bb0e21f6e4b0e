//! Exchange rate quotes returned by rate providers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::currency::CurrencyPair;

/// A historical exchange rate, valid for `requested_date`.
///
/// Transient: fetched per request (or served from a cache), never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRateQuote {
    /// Currency the rate converts USD into
    pub currency: CurrencyPair,
    /// Date the caller asked about (the transaction date)
    pub requested_date: NaiveDate,
    /// Date the rate was published; on or before `requested_date`
    pub record_date: NaiveDate,
    /// Units of `currency` per USD
    pub rate: Decimal,
    /// When the rate was obtained
    pub retrieved_at: DateTime<Utc>,
}

impl ExchangeRateQuote {
    pub fn new(
        currency: CurrencyPair,
        requested_date: NaiveDate,
        record_date: NaiveDate,
        rate: Decimal,
    ) -> Self {
        Self {
            currency,
            requested_date,
            record_date,
            rate,
            retrieved_at: Utc::now(),
        }
    }
}
