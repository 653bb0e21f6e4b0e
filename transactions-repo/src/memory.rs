//! In-memory repository adapter.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use transactions_types::{
    NewTransaction, RepoError, Transaction, TransactionId, TransactionRepository,
};

/// Process-local store backed by a concurrent map.
///
/// Contents are lost on restart. Safe to share across request handlers
/// without additional locking.
#[derive(Default)]
pub struct InMemoryRepo {
    transactions: DashMap<TransactionId, Transaction>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryRepo {
    async fn create(&self, new: NewTransaction) -> Result<Transaction, RepoError> {
        // Claim the slot atomically; an existing record is never overwritten.
        loop {
            let id = TransactionId::new();
            if let Entry::Vacant(slot) = self.transactions.entry(id) {
                let transaction = new.into_transaction(id);
                slot.insert(transaction.clone());
                return Ok(transaction);
            }
        }
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepoError> {
        Ok(self.transactions.get(&id).map(|entry| entry.value().clone()))
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
