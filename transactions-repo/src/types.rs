//! Database row structs and their conversion to the domain model.

use sqlx::FromRow;

use transactions_types::{RepoError, Transaction, TransactionId};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

/// Transaction row as stored by SQLite: UUID and amount are TEXT.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteTransactionRow {
    pub id: String,
    pub description: String,
    pub transaction_date: chrono::NaiveDate,
    pub purchase_amount: String,
}

#[cfg(feature = "sqlite")]
impl SqliteTransactionRow {
    pub fn into_domain(self) -> Result<Transaction, RepoError> {
        let id = uuid::Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;
        let amount: rust_decimal::Decimal = self
            .purchase_amount
            .parse()
            .map_err(|e: rust_decimal::Error| RepoError::Database(e.to_string()))?;

        Ok(Transaction::from_parts(
            TransactionId::from_uuid(id),
            self.description,
            self.transaction_date,
            amount,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgTransactionRow {
    pub id: uuid::Uuid,
    pub description: String,
    pub transaction_date: chrono::NaiveDate,
    pub purchase_amount: rust_decimal::Decimal,
}

#[cfg(feature = "postgres")]
impl PgTransactionRow {
    pub fn into_domain(self) -> Transaction {
        Transaction::from_parts(
            TransactionId::from_uuid(self.id),
            self.description,
            self.transaction_date,
            self.purchase_amount,
        )
    }
}

/// Maps a driver error, keeping unique-key violations distinguishable.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => RepoError::Conflict(db.message().to_string()),
        _ => RepoError::Database(err.to_string()),
    }
}
