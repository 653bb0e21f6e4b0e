//! Per-day exchange rate cache.

use std::fmt::Display;

use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use transactions_types::CurrencyPair;

/// A cached rate and the day it was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedRate {
    pub rate: Decimal,
    pub record_date: NaiveDate,
}

/// Joins key parts with `::`, e.g. `Brazil-Real::2024-08-20`.
pub fn cache_key(parts: &[&dyn Display]) -> String {
    parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Concurrent cache of historical rates keyed by currency and day.
///
/// Historical rates never change, so entries do not expire.
#[derive(Default)]
pub struct RateCache {
    entries: DashMap<String, CachedRate>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, currency: &CurrencyPair, date: NaiveDate) -> Option<CachedRate> {
        self.entries
            .get(&cache_key(&[currency, &date]))
            .map(|entry| *entry.value())
    }

    /// Caches `rate` for every day from `record_date` through `transaction_date`.
    ///
    /// The upstream answers each of those days with the same record, so one
    /// lookup fills the whole range. Existing entries are left untouched.
    pub fn warm(
        &self,
        currency: &CurrencyPair,
        transaction_date: NaiveDate,
        record_date: NaiveDate,
        rate: Decimal,
    ) {
        debug!("Starting cache warming for currency '{}'", currency);
        let value = CachedRate { rate, record_date };
        for day in record_date.iter_days().take_while(|d| *d <= transaction_date) {
            self.entries
                .entry(cache_key(&[currency, &day]))
                .or_insert(value);
        }
        debug!("Finished cache warming for currency '{}'", currency);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
