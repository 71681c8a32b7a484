use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::positions_model::{HoldingsCalculationResult, HoldingsCalculationWarning, Position};
use crate::fx::Currency;
use crate::transactions::{Transaction, TransactionType};

/// Replays a ledger into positions and cash balances.
///
/// The fold is pure and total: rows that cannot be applied are reported as
/// warnings and skipped. Replay cost is linear in ledger length and the
/// ledger is replayed on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingsCalculator;

impl HoldingsCalculator {
    pub fn calculate(transactions: &[Transaction]) -> HoldingsCalculationResult {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        // Stable, so same-day rows keep ledger order.
        ordered.sort_by_key(|t| t.transaction_date);

        let mut positions: BTreeMap<(String, Currency), Position> = BTreeMap::new();
        let mut cash_balances: BTreeMap<Currency, Decimal> = BTreeMap::new();
        let mut warnings = Vec::new();

        for transaction in ordered {
            if let Err(message) = Self::apply(transaction, &mut positions, &mut cash_balances) {
                warn!("Skipping transaction {}: {}", transaction.id, message);
                warnings.push(HoldingsCalculationWarning {
                    transaction_id: transaction.id.clone(),
                    message,
                });
            }
        }

        let mut result: Vec<Position> = positions
            .into_values()
            .filter(|p| p.quantity > Decimal::ZERO)
            .collect();

        result.extend(
            cash_balances
                .iter()
                .filter(|(_, balance)| **balance > Decimal::ZERO)
                .map(|(currency, balance)| Position::cash(*currency, *balance)),
        );

        debug!(
            "Replayed {} transactions into {} positions",
            transactions.len(),
            result.len()
        );

        HoldingsCalculationResult {
            positions: result,
            cash_balances,
            warnings,
        }
    }

    fn apply(
        transaction: &Transaction,
        positions: &mut BTreeMap<(String, Currency), Position>,
        cash_balances: &mut BTreeMap<Currency, Decimal>,
    ) -> Result<(), String> {
        if transaction.quantity <= Decimal::ZERO {
            return Err(format!("non-positive quantity {}", transaction.quantity));
        }

        match transaction.transaction_type {
            TransactionType::Deposit | TransactionType::Withdrawal => {
                let amount = transaction
                    .amount()
                    .ok_or_else(|| format!("amount overflow for {}", transaction.quantity))?;
                let balance = cash_balances.entry(transaction.currency).or_default();
                let updated = if transaction.transaction_type == TransactionType::Deposit {
                    balance.checked_add(amount)
                } else {
                    balance.checked_sub(amount)
                };
                *balance = updated.ok_or_else(|| {
                    format!("{} cash balance overflow", transaction.currency)
                })?;
            }
            TransactionType::Buy | TransactionType::Sell if transaction.is_cash() => {
                return Err(format!(
                    "{} recorded against the cash symbol",
                    transaction.transaction_type
                ));
            }
            TransactionType::Buy => {
                positions
                    .entry((transaction.symbol.clone(), transaction.currency))
                    .or_insert_with(|| {
                        Position::new(transaction.symbol.clone(), transaction.currency)
                    })
                    .apply_buy(transaction.quantity, transaction.price)?;
            }
            TransactionType::Sell => {
                positions
                    .entry((transaction.symbol.clone(), transaction.currency))
                    .or_insert_with(|| {
                        Position::new(transaction.symbol.clone(), transaction.currency)
                    })
                    .apply_sell(transaction.quantity);
            }
        }
        Ok(())
    }
}
