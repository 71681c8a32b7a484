use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::Currency;

/// A priced position.
///
/// `total_value`, `total_cost` and `gain_loss` are in the holding's own
/// currency; the `*_converted` fields are in the valuation's target currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub currency: Currency,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
    pub is_cash: bool,
    /// False when no price could be found and the holding is valued at cost.
    pub price_available: bool,
    pub price_as_of: Option<DateTime<Utc>>,
    pub fx_rate: Decimal,
    pub total_value_converted: Decimal,
    pub total_cost_converted: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub holdings_count: usize,
    pub currency: Currency,
}

impl PortfolioSummary {
    pub fn empty(currency: Currency) -> Self {
        Self {
            total_value: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            total_gain_loss: Decimal::ZERO,
            total_gain_loss_percent: Decimal::ZERO,
            holdings_count: 0,
            currency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub holdings: Vec<Holding>,
    pub summary: PortfolioSummary,
    /// Degradations applied while valuing: missing prices, fallback FX rates,
    /// skipped ledger rows.
    pub warnings: Vec<String>,
    pub valued_at: DateTime<Utc>,
}

/// `gain / cost * 100`, or zero when there is no cost basis.
pub fn gain_loss_percent(gain: Decimal, cost: Decimal) -> Decimal {
    if cost.is_zero() {
        Decimal::ZERO
    } else {
        gain / cost * Decimal::ONE_HUNDRED
    }
}
