use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tallyfolio_market_data::MarketDataProvider;
use uuid::Uuid;

use super::transactions_model::{NewTransaction, Transaction, TransactionType};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::config::NegativeCashPolicy;
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::holdings::HoldingsCalculator;
use crate::users::UserRepositoryTrait;
use crate::utils::Clock;

/// Write boundary of the ledger: validates and normalizes before appending.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    negative_cash_policy: NegativeCashPolicy,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        negative_cash_policy: NegativeCashPolicy,
    ) -> Self {
        Self {
            repository,
            user_repository,
            provider,
            clock,
            negative_cash_policy,
        }
    }

    /// Unknown symbols are rejected; an unreachable directory lets the row through.
    async fn check_symbol(&self, symbol: &str) -> Result<()> {
        match self.provider.lookup_symbol(symbol).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ValidationError::UnknownSymbol(symbol.to_string()).into()),
            Err(e) => {
                warn!(
                    "Ticker directory unavailable, accepting {} unverified: {}",
                    symbol, e
                );
                Ok(())
            }
        }
    }

    fn check_cash_available(&self, user_id: &str, new_transaction: &NewTransaction) -> Result<()> {
        if self.negative_cash_policy == NegativeCashPolicy::Allow
            || new_transaction.transaction_type != TransactionType::Withdrawal
        {
            return Ok(());
        }

        let existing = self.repository.get_transactions_by_user(user_id)?;
        let balance = HoldingsCalculator::calculate(&existing)
            .cash_balances
            .get(&new_transaction.currency)
            .copied()
            .unwrap_or(Decimal::ZERO);

        if balance < new_transaction.quantity {
            return Err(ValidationError::InvalidInput(format!(
                "Withdrawal of {} {} exceeds available cash {}",
                new_transaction.quantity, new_transaction.currency, balance
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn append_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        let (symbol, price) = new_transaction.normalized()?;

        if self.user_repository.get_user(user_id)?.is_none() {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }

        if !new_transaction.transaction_type.is_cash_movement() {
            self.check_symbol(&symbol).await?;
        }
        self.check_cash_available(user_id, &new_transaction)?;

        let transaction = Transaction {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            symbol,
            transaction_type: new_transaction.transaction_type,
            quantity: new_transaction.quantity,
            price,
            currency: new_transaction.currency,
            transaction_date: new_transaction.transaction_date,
            created_at: self.clock.now(),
        };

        let inserted = self.repository.insert_transaction(transaction).await?;
        debug!(
            "Appended {} {} {} for user {}",
            inserted.transaction_type, inserted.quantity, inserted.symbol, inserted.user_id
        );
        Ok(inserted)
    }

    fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.repository.get_transactions_by_user(user_id)
    }
}
