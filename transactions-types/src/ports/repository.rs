//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (InMemory, SQLite, Postgres) implement this trait.

use crate::domain::{NewTransaction, Transaction, TransactionId};
use crate::error::RepoError;

/// The transaction store.
///
/// Records are write-once: there is no update or delete. Identifiers are
/// generated by the store and must be unique even under concurrent writes.
#[async_trait::async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    /// Assigns a fresh identifier and persists the transaction.
    async fn create(&self, new: NewTransaction) -> Result<Transaction, RepoError>;

    /// Gets a transaction by ID.
    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepoError>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> Result<(), RepoError>;
}
