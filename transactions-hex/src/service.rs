//! Transaction Application Service
//!
//! Orchestrates the store and the exchange rate gateway.
//! Contains NO infrastructure logic - pure business orchestration.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use transactions_types::{
    AppError, ConvertedTransactionResponse, CreateTransactionRequest, CreateTransactionResponse,
    CurrencyPair, ExchangeRateProvider, HealthResponse, HealthStatus, TransactionId,
    TransactionRepository, ValidationPolicy, round_money,
};

/// Health component name of the transaction store.
pub const STORE_COMPONENT: &str = "store";
/// Health component name of the exchange rate gateway.
pub const RATES_COMPONENT: &str = "exchangeRates";

/// Application service for transaction operations.
///
/// Generic over the store and the rate gateway; both are injected at
/// compile time, so tests can swap in mocks.
pub struct TransactionService<R: TransactionRepository, X: ExchangeRateProvider> {
    repo: R,
    rates: X,
    retention_days: Option<u32>,
}

impl<R: TransactionRepository, X: ExchangeRateProvider> TransactionService<R, X> {
    /// Creates a new service over the given store and rate gateway.
    pub fn new(repo: R, rates: X) -> Self {
        Self {
            repo,
            rates,
            retention_days: None,
        }
    }

    /// Rejects transactions dated more than `days` before today.
    pub fn with_retention_days(mut self, days: Option<u32>) -> Self {
        self.retention_days = days;
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the rate gateway.
    pub fn rates(&self) -> &X {
        &self.rates
    }

    fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::current(self.retention_days)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates and stores a purchase transaction.
    pub async fn store_transaction(
        &self,
        req: CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, AppError> {
        let new = req.validate(&self.policy())?;
        let transaction = self.repo.create(new).await?;

        info!(
            "Stored transaction {} dated {}",
            transaction.id, transaction.transaction_date
        );
        Ok(CreateTransactionResponse { id: transaction.id })
    }

    /// Loads a transaction and converts its amount into `currency`.
    ///
    /// A blank or absent currency returns the USD amount unchanged with a
    /// rate of 1 and does not contact the gateway.
    pub async fn get_converted_transaction(
        &self,
        id: TransactionId,
        currency: Option<&str>,
    ) -> Result<ConvertedTransactionResponse, AppError> {
        let currency = currency
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(CurrencyPair::parse)
            .transpose()?;

        let transaction = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction not found with id: {}", id)))?;

        let Some(currency) = currency else {
            debug!("No currency requested for {}, returning USD amount", id);
            let amount = transaction.purchase_amount;
            return Ok(ConvertedTransactionResponse::new(
                transaction,
                Decimal::ONE,
                amount,
            ));
        };

        let quote = self
            .rates
            .get_rate(&currency, transaction.transaction_date)
            .await
            .map_err(|e| {
                warn!(
                    "Exchange rate for {} on {} unavailable: {}",
                    currency, transaction.transaction_date, e
                );
                AppError::RateUnavailable {
                    currency: currency.to_string(),
                }
            })?;

        let converted = transaction
            .purchase_amount
            .checked_mul(quote.rate)
            .map(round_money)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Overflow converting {} at rate {}",
                    transaction.purchase_amount, quote.rate
                ))
            })?;

        debug!(
            "Converted {} USD to {} {} using rate {} from {}",
            transaction.purchase_amount, converted, currency, quote.rate, quote.record_date
        );
        Ok(ConvertedTransactionResponse::new(
            transaction,
            quote.rate,
            converted,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────────

    /// Probes the store and the rate gateway concurrently.
    pub async fn health(&self) -> HealthResponse {
        let (store, rates) = tokio::join!(self.repo.ping(), self.rates.health());

        let mut components = BTreeMap::new();
        components.insert(
            STORE_COMPONENT.to_string(),
            match store {
                Ok(()) => HealthStatus::Up,
                Err(e) => {
                    warn!("Store health check failed: {}", e);
                    HealthStatus::Down
                }
            },
        );
        components.insert(
            RATES_COMPONENT.to_string(),
            match rates {
                Ok(()) => HealthStatus::Up,
                Err(e) => {
                    warn!("Exchange rate health check failed: {}", e);
                    HealthStatus::Down
                }
            },
        );

        HealthResponse::from_components(components)
    }
}
