//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use transactions_types::{
    NewTransaction, RepoError, Transaction, TransactionId, TransactionRepository,
};

use crate::types::{PgTransactionRow, map_sqlx_error};

const SCHEMA: &str = include_str!("../migrations/postgres/0001_create_transactions.sql");

/// Attempts before giving up on a colliding identifier.
const MAX_ID_ATTEMPTS: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        SCHEMA,
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        debug!("PostgreSQL store ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionRepository for PostgresRepo {
    async fn create(&self, new: NewTransaction) -> Result<Transaction, RepoError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let id = TransactionId::new();

            let result = sqlx::query(
                r#"INSERT INTO transactions (id, description, transaction_date, purchase_amount)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(id.into_uuid())
            .bind(new.description())
            .bind(new.transaction_date())
            .bind(new.purchase_amount())
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
        let row: Option<PgTransactionRow> = sqlx::query_as(
            r#"SELECT id, description, transaction_date, purchase_amount
               FROM transactions WHERE id = $1"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PgTransactionRow::into_domain))
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::SCHEMA;

    /// Reads `(precision, scale)` from the `purchase_amount` column definition.
    fn amount_column_numeric() -> (usize, usize) {
        let line = SCHEMA
            .lines()
            .find(|l| l.trim_start().starts_with("purchase_amount"))
            .unwrap();
        let args = line.split("NUMERIC(").nth(1).unwrap();
        let args = &args[..args.find(')').unwrap()];
        let mut parts = args.split(',').map(|p| p.trim().parse::<usize>().unwrap());
        (parts.next().unwrap(), parts.next().unwrap())
    }

    #[test]
    fn test_amount_column_holds_every_decimal_amount() {
        let (precision, scale) = amount_column_numeric();
        let integer_digits = Decimal::MAX.trunc().to_string().len();

        assert_eq!(scale, 2);
        assert!(precision - scale >= integer_digits);
    }
}
