use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fx::Currency;

/// Quantity and cost basis for one `(symbol, currency)` after ledger replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub currency: Currency,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub total_cost: Decimal,
    pub is_cash: bool,
}

impl Position {
    pub fn new(symbol: impl Into<String>, currency: Currency) -> Self {
        Self {
            symbol: symbol.into(),
            currency,
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            is_cash: false,
        }
    }

    pub fn cash(currency: Currency, balance: Decimal) -> Self {
        Self {
            symbol: crate::constants::CASH_SYMBOL.to_string(),
            currency,
            quantity: balance,
            average_cost: Decimal::ONE,
            total_cost: balance,
            is_cash: true,
        }
    }

    fn reset(&mut self) {
        self.quantity = Decimal::ZERO;
        self.average_cost = Decimal::ZERO;
        self.total_cost = Decimal::ZERO;
    }

    /// Weighted-average cost update for a purchase.
    ///
    /// Fails without touching the position when the new basis does not fit
    /// in a `Decimal`.
    pub fn apply_buy(&mut self, quantity: Decimal, price: Decimal) -> Result<(), String> {
        let new_quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| format!("quantity overflow adding {}", quantity))?;
        let new_total_cost = quantity
            .checked_mul(price)
            .and_then(|cost| self.total_cost.checked_add(cost))
            .ok_or_else(|| format!("cost overflow for {} at {}", quantity, price))?;
        if new_quantity <= Decimal::ZERO {
            self.reset();
            return Ok(());
        }
        self.quantity = new_quantity;
        self.total_cost = new_total_cost;
        self.average_cost = new_total_cost / new_quantity;
        Ok(())
    }

    /// Removes cost at the running average; the sale price does not affect basis.
    pub fn apply_sell(&mut self, quantity: Decimal) {
        if quantity >= self.quantity {
            self.reset();
            return;
        }
        // Sold quantity is below the held quantity, so the product stays under total cost.
        self.quantity -= quantity;
        self.total_cost -= quantity * self.average_cost;
    }
}

/// A ledger row the calculator could not replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsCalculationWarning {
    pub transaction_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsCalculationResult {
    /// Open security positions followed by positive cash balances.
    pub positions: Vec<Position>,
    /// Net cash per currency, negative balances included.
    pub cash_balances: BTreeMap<Currency, Decimal>,
    pub warnings: Vec<HoldingsCalculationWarning>,
}

impl HoldingsCalculationResult {
    pub fn security_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| !p.is_cash)
    }

    pub fn cash_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| p.is_cash)
    }
}
