//! Error types for the transaction service.

use chrono::NaiveDate;

use crate::domain::FieldErrors;

/// Message prefix clients match on to tell a missing rate from a missing transaction.
pub const RATE_UNAVAILABLE_MESSAGE: &str = "Could not retrieve exchange rates";

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Currency format is invalid or contains prohibited characters.")]
    InvalidCurrency(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Exchange rate provider errors.
///
/// All of these are expected conditions (weekends, unknown currencies,
/// upstream outages) rather than faults of this service.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("No exchange rate for {currency} on or before {date}")]
    NoRate { currency: String, date: NaiveDate },

    #[error("Exchange rate request timed out")]
    Timeout,

    #[error("Exchange rate provider unavailable: {0}")]
    Upstream(String),

    #[error("Unexpected exchange rate response: {0}")]
    Decode(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Could not retrieve exchange rates for {currency}")]
    RateUnavailable { currency: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => AppError::Validation(errors),
            e @ DomainError::InvalidCurrency(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Internal(err.to_string())
    }
}
