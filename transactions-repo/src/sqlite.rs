//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use transactions_types::{
    NewTransaction, RepoError, Transaction, TransactionId, TransactionRepository,
};

use crate::types::{SqliteTransactionRow, map_sqlx_error};

const SCHEMA: &str = include_str!("../migrations/sqlite/0001_create_transactions.sql");

/// Attempts before giving up on a colliding identifier.
const MAX_ID_ATTEMPTS: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Ensure on-disk SQLite target directory exists.
        if !in_memory {
            if let Some(path) = database_url
                .strip_prefix("sqlite://")
                .or_else(|| database_url.strip_prefix("sqlite:"))
            {
                let path = path.split('?').next().unwrap_or(path);
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to `:memory:` opens its own database, so keep
        // exactly one and never recycle it.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        debug!("SQLite store ready at {}", database_url);
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionRepository for SqliteRepo {
    async fn create(&self, new: NewTransaction) -> Result<Transaction, RepoError> {
        let created_at = chrono::Utc::now().to_rfc3339();
        let amount = new.purchase_amount().to_string();

        let mut attempt = 0;
        loop {
            attempt += 1;
            let id = TransactionId::new();

            let result = sqlx::query(
                r#"INSERT INTO transactions (id, description, transaction_date, purchase_amount, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(id.to_string())
            .bind(new.description())
            .bind(new.transaction_date())
            .bind(&amount)
            .bind(&created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error);

            match result {
                Ok(_) => return Ok(new.into_transaction(id)),
                Err(RepoError::Conflict(_)) if attempt < MAX_ID_ATTEMPTS => continue,
                Err(e) => return Err(e),
            }
        }
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepoError> {
        let row: Option<SqliteTransactionRow> = sqlx::query_as(
            r#"SELECT id, description, transaction_date, purchase_amount
               FROM transactions WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(SqliteTransactionRow::into_domain).transpose()
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
