use async_trait::async_trait;

use super::valuation_model::PortfolioValuation;
use crate::errors::Result;
use crate::fx::Currency;
use crate::transactions::Transaction;

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Values an in-memory ledger. External unavailability degrades the
    /// result instead of failing it.
    async fn value_transactions(
        &self,
        transactions: &[Transaction],
        target_currency: Currency,
    ) -> Result<PortfolioValuation>;

    /// Loads the user's ledger and values it. Only ledger read errors propagate.
    async fn get_portfolio_valuation(
        &self,
        user_id: &str,
        target_currency: Currency,
    ) -> Result<PortfolioValuation>;
}
