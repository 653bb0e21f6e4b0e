//! Transaction domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::round_money;
use super::validation::{FieldErrors, ValidationPolicy};
use crate::error::DomainError;

/// Unique identifier for a Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TransactionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A validated transaction that has not been stored yet.
///
/// Only constructible through [`NewTransaction::new`], so a store never
/// receives a non-positive amount or a date outside the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    description: String,
    transaction_date: NaiveDate,
    purchase_amount: Decimal,
}

impl NewTransaction {
    /// Validates the fields and rounds the amount to cents.
    pub fn new(
        description: impl Into<String>,
        transaction_date: NaiveDate,
        purchase_amount: Decimal,
        policy: &ValidationPolicy,
    ) -> Result<Self, DomainError> {
        let description = description.into();
        let purchase_amount = round_money(purchase_amount);

        let mut errors = FieldErrors::new();
        policy.check_description(&description, &mut errors);
        policy.check_date(transaction_date, &mut errors);
        policy.check_amount(purchase_amount, &mut errors);

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(Self {
            description,
            transaction_date,
            purchase_amount,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn transaction_date(&self) -> NaiveDate {
        self.transaction_date
    }

    pub fn purchase_amount(&self) -> Decimal {
        self.purchase_amount
    }

    /// Assigns an identifier, producing the stored record.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            description: self.description,
            transaction_date: self.transaction_date,
            purchase_amount: self.purchase_amount,
        }
    }
}

/// A recorded purchase transaction.
///
/// Transactions are immutable once created; the amount is in USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Short description, at most 50 characters
    pub description: String,
    /// Day the purchase happened
    pub transaction_date: NaiveDate,
    /// Purchase amount in USD, two decimal places
    pub purchase_amount: Decimal,
}

impl Transaction {
    /// Reconstructs a transaction from database fields.
    pub fn from_parts(
        id: TransactionId,
        description: String,
        transaction_date: NaiveDate,
        purchase_amount: Decimal,
    ) -> Self {
        Self {
            id,
            description,
            transaction_date,
            purchase_amount,
        }
    }
}
