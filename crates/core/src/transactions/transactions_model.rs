//! Ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{CASH_SYMBOL, MAX_LEDGER_MAGNITUDE};
use crate::errors::ValidationError;
use crate::fx::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
        }
    }

    /// Deposits and withdrawals move cash and never touch a security position.
    pub fn is_cash_movement(&self) -> bool {
        matches!(self, TransactionType::Deposit | TransactionType::Withdrawal)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// A single immutable ledger row.
///
/// For cash movements `symbol` is always `CASH`, `price` is 1 and `quantity`
/// carries the amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub price: Decimal,
    pub currency: Currency,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// `quantity × price`, or `None` when the product overflows.
    pub fn amount(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.price)
    }

    pub fn is_cash(&self) -> bool {
        self.symbol == CASH_SYMBOL
    }
}

/// Input for appending to the ledger.
///
/// `symbol` and `price` may be omitted for deposits and withdrawals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub symbol: Option<String>,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub currency: Currency,
    pub transaction_date: NaiveDate,
}

impl NewTransaction {
    /// Checks field-level rules and returns the canonical `(symbol, price)`.
    pub fn normalized(&self) -> Result<(String, Decimal), ValidationError> {
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.quantity > MAX_LEDGER_MAGNITUDE {
            return Err(ValidationError::InvalidInput(format!(
                "quantity must not exceed {}, got {}",
                MAX_LEDGER_MAGNITUDE, self.quantity
            )));
        }

        if self.transaction_type.is_cash_movement() {
            return Ok((CASH_SYMBOL.to_string(), Decimal::ONE));
        }

        let symbol = self
            .symbol
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::MissingField("symbol".to_string()))?;

        if symbol == CASH_SYMBOL {
            return Err(ValidationError::InvalidInput(format!(
                "{} cannot be traded; use DEPOSIT or WITHDRAWAL",
                CASH_SYMBOL
            )));
        }

        let price = self
            .price
            .ok_or_else(|| ValidationError::MissingField("price".to_string()))?;
        if price <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "price must be positive, got {}",
                price
            )));
        }
        if price > MAX_LEDGER_MAGNITUDE {
            return Err(ValidationError::InvalidInput(format!(
                "price must not exceed {}, got {}",
                MAX_LEDGER_MAGNITUDE, price
            )));
        }

        Ok((symbol, price))
    }
}
