//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::{MSG_BLANK, MSG_DATE_FORMAT, MSG_NULL, parse_iso_date};
use crate::domain::{FieldErrors, NewTransaction, Transaction, TransactionId, ValidationPolicy};
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Transaction DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to store a new purchase transaction.
///
/// Fields are optional at the wire level so that missing values are
/// reported as field errors instead of a generic decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Brief description of the transaction, max 50 characters
    #[schema(example = "New keyboard for home office")]
    #[serde(default)]
    pub description: Option<String>,
    /// Date of the transaction in YYYY-MM-DD format
    #[schema(example = "2025-08-20")]
    #[serde(default)]
    pub transaction_date: Option<String>,
    /// Purchase amount in USD, must be positive
    #[schema(value_type = Option<f64>, example = 150.75)]
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub purchase_amount: Option<Decimal>,
}

impl CreateTransactionRequest {
    pub fn new(
        description: impl Into<String>,
        transaction_date: NaiveDate,
        purchase_amount: Decimal,
    ) -> Self {
        Self {
            description: Some(description.into()),
            transaction_date: Some(transaction_date.format("%Y-%m-%d").to_string()),
            purchase_amount: Some(purchase_amount),
        }
    }

    /// Checks presence and format of every field, then applies the domain rules.
    pub fn validate(self, policy: &ValidationPolicy) -> Result<NewTransaction, DomainError> {
        let mut errors = FieldErrors::new();

        let description = self.description.unwrap_or_default();
        if description.trim().is_empty() {
            errors.add("description", MSG_BLANK);
        }

        let date = match self.transaction_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("transactionDate", MSG_NULL);
                None
            }
            Some(raw) => match parse_iso_date(raw) {
                Some(date) => Some(date),
                None => {
                    errors.add("transactionDate", MSG_DATE_FORMAT);
                    None
                }
            },
        };

        if self.purchase_amount.is_none() {
            errors.add("purchaseAmount", MSG_NULL);
        }

        match (date, self.purchase_amount) {
            (Some(date), Some(amount)) if errors.is_empty() => {
                NewTransaction::new(description, date, amount, policy)
            }
            (date, amount) => {
                // Collect rule violations on the fields that did parse.
                let fallback_date = date.unwrap_or(policy.today);
                let fallback_amount = amount.unwrap_or(Decimal::ONE);
                let fallback_description = if description.trim().is_empty() {
                    "-".to_string()
                } else {
                    description
                };
                if let Err(DomainError::Validation(rule_errors)) = NewTransaction::new(
                    fallback_description,
                    fallback_date,
                    fallback_amount,
                    policy,
                ) {
                    for (field, message) in rule_errors.into_map() {
                        errors.add(&field, message);
                    }
                }
                Err(DomainError::Validation(errors))
            }
        }
    }
}

/// Response after storing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateTransactionResponse {
    /// Unique identifier of the transaction (UUID)
    pub id: TransactionId,
}

/// A stored transaction with its purchase amount converted to another currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedTransactionResponse {
    /// Unique identifier of the transaction (UUID)
    pub id: TransactionId,
    /// Brief description of the transaction
    #[schema(example = "New keyboard for home office")]
    pub description: String,
    /// Date of the transaction
    #[schema(value_type = String, example = "2025-08-20")]
    pub transaction_date: NaiveDate,
    /// Original purchase amount in US Dollars
    #[schema(value_type = f64, example = 150.75)]
    #[serde(with = "rust_decimal::serde::float")]
    pub original_purchase_amount: Decimal,
    /// Exchange rate used for the conversion on the transaction date
    #[schema(value_type = f64, example = 5.123)]
    #[serde(with = "rust_decimal::serde::float")]
    pub exchange_rate: Decimal,
    /// Purchase amount in the target currency, rounded to 2 places
    #[schema(value_type = f64, example = 772.29)]
    #[serde(with = "rust_decimal::serde::float")]
    pub converted_amount: Decimal,
}

impl ConvertedTransactionResponse {
    pub fn new(transaction: Transaction, exchange_rate: Decimal, converted_amount: Decimal) -> Self {
        Self {
            id: transaction.id,
            description: transaction.description,
            transaction_date: transaction.transaction_date,
            original_purchase_amount: transaction.purchase_amount,
            exchange_rate,
            converted_amount,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error & Health DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// When the error occurred
    pub timestamp: DateTime<Utc>,
    /// HTTP status code
    #[schema(example = 404)]
    pub status: u16,
    /// Error reason phrase
    #[schema(example = "Resource Not Found")]
    pub error: String,
    /// Detailed messages, keyed by field or error kind
    #[schema(example = json!({"resourceNotFound": "Could not retrieve exchange rates for Brazil-Real"}))]
    pub messages: BTreeMap<String, String>,
    /// Request path that produced the error
    #[schema(example = "/transaction/a1b2c3d4-e5f6-7890-1234-567890abcdef")]
    pub path: String,
}

/// Status of the service or one of its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Health report with one entry per dependency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub components: BTreeMap<String, HealthStatus>,
}

impl HealthResponse {
    /// Overall status is UP only when every component is UP.
    pub fn from_components(components: BTreeMap<String, HealthStatus>) -> Self {
        let status = if components.values().all(|s| *s == HealthStatus::Up) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };
        Self { status, components }
    }
}
