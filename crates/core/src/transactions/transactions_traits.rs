use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction};
use crate::errors::Result;

/// Persistence contract for the append-only ledger.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// All rows for a user ordered by `transaction_date`, then insertion order.
    fn get_transactions_by_user(&self, user_id: &str) -> Result<Vec<Transaction>>;

    async fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn append_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;

    fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;
}
