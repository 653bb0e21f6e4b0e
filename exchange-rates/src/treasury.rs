//! U.S. Treasury Fiscal Data "Rates of Exchange" adapter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use transactions_types::{CurrencyPair, ExchangeError, ExchangeRateProvider, ExchangeRateQuote};

use crate::cache::RateCache;

pub const DEFAULT_TREASURY_BASE_URL: &str =
    "https://api.fiscaldata.treasury.gov/services/api/fiscal_service";

pub const RATES_OF_EXCHANGE_PATH: &str = "/v1/accounting/od/rates_of_exchange";

/// How far back a published rate may be used for a purchase date.
const LOOKBACK_MONTHS: u32 = 6;

/// Connection settings for the Treasury API.
#[derive(Debug, Clone)]
pub struct TreasuryConfig {
    pub base_url: String,
    /// Applied to connecting and to the whole request.
    pub timeout: Duration,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TREASURY_BASE_URL.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// One row of the `rates_of_exchange` dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreasuryRate {
    /// Published as a JSON string ("5.434"), numbers are accepted too.
    pub exchange_rate: Decimal,
    pub record_date: NaiveDate,
}

/// Envelope of a `rates_of_exchange` response; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreasuryRatesResponse {
    #[serde(default)]
    pub data: Option<Vec<TreasuryRate>>,
}

/// Thin HTTP client for the Treasury API.
pub struct TreasuryClient {
    http: reqwest::Client,
    base_url: String,
}

impl TreasuryClient {
    pub fn new(config: TreasuryConfig) -> Result<Self, ExchangeError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExchangeError::Upstream(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, RATES_OF_EXCHANGE_PATH)
    }

    /// Fetches the most recent rate for `currency` published within `[start, end]`.
    ///
    /// Returns `Ok(None)` when the upstream answered but has no matching row.
    pub async fn latest_rate(
        &self,
        currency: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<TreasuryRate>, ExchangeError> {
        info!(
            "Calling Treasury API for currency '{}' on interval from {} to {}",
            currency, start, end
        );

        let filter = format!(
            "country_currency_desc:eq:{},record_date:gte:{},record_date:lte:{}",
            currency, start, end
        );

        let response = self
            .http
            .get(self.endpoint())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("fields", "exchange_rate,record_date"),
                ("filter", filter.as_str()),
                ("sort", "-record_date"),
                ("page[size]", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error calling Treasury API for currency {}: {}", currency, e);
                map_transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "Treasury API answered {} for currency {}",
                status, currency
            );
            return Err(ExchangeError::Upstream(format!(
                "Treasury API returned {}",
                status
            )));
        }

        let body: TreasuryRatesResponse = response.json().await.map_err(|e| {
            error!("Could not decode Treasury API response for {}: {}", currency, e);
            if e.is_timeout() {
                ExchangeError::Timeout
            } else {
                ExchangeError::Decode(e.to_string())
            }
        })?;

        info!(
            "Successfully received the response from the Treasury API for currency '{}'",
            currency
        );
        Ok(body.data.and_then(|rows| rows.into_iter().next()))
    }

    /// Requests a single row; any 2xx answer counts as healthy.
    pub async fn ping(&self) -> Result<(), ExchangeError> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("page[size]", "1")])
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ExchangeError::Upstream(format!(
                "Treasury API returned {}",
                response.status()
            )))
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> ExchangeError {
    if e.is_timeout() {
        ExchangeError::Timeout
    } else {
        ExchangeError::Upstream(e.to_string())
    }
}

/// Treasury-backed provider with a per-day rate cache.
pub struct TreasuryRateProvider {
    client: TreasuryClient,
    cache: RateCache,
}

impl TreasuryRateProvider {
    pub fn new(client: TreasuryClient) -> Self {
        Self::with_cache(client, RateCache::new())
    }

    pub fn with_cache(client: TreasuryClient, cache: RateCache) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }
}

#[async_trait]
impl ExchangeRateProvider for TreasuryRateProvider {
    async fn get_rate(
        &self,
        currency: &CurrencyPair,
        date: NaiveDate,
    ) -> Result<ExchangeRateQuote, ExchangeError> {
        debug!("Starting fetch for exchange rate");

        if let Some(cached) = self.cache.get(currency, date) {
            debug!("Exchange rate for {} on {} served from cache", currency, date);
            return Ok(ExchangeRateQuote::new(
                currency.clone(),
                date,
                cached.record_date,
                cached.rate,
            ));
        }

        let start = date
            .checked_sub_months(Months::new(LOOKBACK_MONTHS))
            .unwrap_or(NaiveDate::MIN);

        let Some(row) = self.client.latest_rate(currency, start, date).await? else {
            warn!("No exchange rate for {} between {} and {}", currency, start, date);
            return Err(ExchangeError::NoRate {
                currency: currency.to_string(),
                date,
            });
        };

        info!(
            "Using exchange rate {} from {}",
            row.exchange_rate, row.record_date
        );
        self.cache
            .warm(currency, date, row.record_date, row.exchange_rate);

        Ok(ExchangeRateQuote::new(
            currency.clone(),
            date,
            row.record_date,
            row.exchange_rate,
        ))
    }

    async fn health(&self) -> Result<(), ExchangeError> {
        self.client.ping().await
    }
}
