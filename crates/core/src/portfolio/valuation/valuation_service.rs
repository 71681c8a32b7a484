use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::valuation_model::{gain_loss_percent, Holding, PortfolioSummary, PortfolioValuation};
use super::valuation_traits::ValuationServiceTrait;
use crate::errors::Result;
use crate::fx::{fallback_rate, Currency, FxServiceTrait};
use crate::portfolio::holdings::{HoldingsCalculator, Position};
use crate::quotes::{AssetPrice, QuoteServiceTrait};
use crate::transactions::{Transaction, TransactionRepositoryTrait};
use crate::utils::Clock;

/// Values positions at current prices and aggregates them in one currency.
///
/// Each holding is converted into the target currency before it is summed.
pub struct ValuationService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    clock: Arc<dyn Clock>,
}

/// Rates resolved during one valuation run, so each pair is asked for once.
struct RateBook<'a> {
    fx_service: &'a dyn FxServiceTrait,
    rates: HashMap<(Currency, Currency), Decimal>,
    warnings: Vec<String>,
}

impl<'a> RateBook<'a> {
    fn new(fx_service: &'a dyn FxServiceTrait) -> Self {
        Self {
            fx_service,
            rates: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    async fn rate(&mut self, from: Currency, to: Currency) -> Decimal {
        if from == to {
            return Decimal::ONE;
        }
        if let Some(rate) = self.rates.get(&(from, to)) {
            return *rate;
        }

        let rate = match self.fx_service.get_rate(from, to).await {
            Ok(rate) => rate,
            Err(e) => {
                let fallback = fallback_rate(from, to).unwrap_or(Decimal::ONE);
                warn!(
                    "No {}/{} rate ({}); using fallback {}",
                    from, to, e, fallback
                );
                self.warnings.push(format!(
                    "Exchange rate {}/{} unavailable, used fallback rate {}",
                    from, to, fallback
                ));
                fallback
            }
        };
        self.rates.insert((from, to), rate);
        rate
    }
}

impl ValuationService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transaction_repository,
            quote_service,
            fx_service,
            clock,
        }
    }

    async fn price_holding(
        position: &Position,
        price: Option<&AssetPrice>,
        rates: &mut RateBook<'_>,
        warnings: &mut Vec<String>,
    ) -> (Decimal, Decimal, bool, Option<DateTime<Utc>>) {
        if position.is_cash {
            return (Decimal::ONE, position.quantity, true, None);
        }

        let priced = match price {
            Some(price) => {
                // A quote in another currency is brought into the position's currency.
                let unit_price = if price.currency == position.currency {
                    Some(price.price)
                } else {
                    price
                        .price
                        .checked_mul(rates.rate(price.currency, position.currency).await)
                };
                unit_price.and_then(|unit| {
                    position
                        .quantity
                        .checked_mul(unit)
                        .map(|value| (unit, value, price.timestamp))
                })
            }
            None => None,
        };

        match priced {
            Some((unit_price, total_value, as_of)) => (unit_price, total_value, true, Some(as_of)),
            None => {
                warnings.push(format!(
                    "No usable price for {}, valued at cost",
                    position.symbol
                ));
                (position.average_cost, position.total_cost, false, None)
            }
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn value_transactions(
        &self,
        transactions: &[Transaction],
        target_currency: Currency,
    ) -> Result<PortfolioValuation> {
        let calculation = HoldingsCalculator::calculate(transactions);
        let mut warnings: Vec<String> = calculation
            .warnings
            .iter()
            .map(|w| format!("Skipped transaction {}: {}", w.transaction_id, w.message))
            .collect();

        let symbols: Vec<String> = calculation
            .security_positions()
            .map(|p| p.symbol.clone())
            .collect();
        let prices = self.quote_service.current_prices(&symbols).await;

        let mut rates = RateBook::new(self.fx_service.as_ref());
        let mut holdings = Vec::with_capacity(calculation.positions.len());

        for position in &calculation.positions {
            let (current_price, total_value, price_available, price_as_of) = Self::price_holding(
                position,
                prices.get(&position.symbol),
                &mut rates,
                &mut warnings,
            )
            .await;

            let gain_loss = if price_available {
                total_value - position.total_cost
            } else {
                Decimal::ZERO
            };
            let fx_rate = rates.rate(position.currency, target_currency).await;

            holdings.push(Holding {
                symbol: position.symbol.clone(),
                currency: position.currency,
                quantity: position.quantity,
                average_cost: position.average_cost,
                current_price,
                total_value,
                total_cost: position.total_cost,
                gain_loss,
                gain_loss_percent: gain_loss_percent(gain_loss, position.total_cost),
                is_cash: position.is_cash,
                price_available,
                price_as_of,
                fx_rate,
                total_value_converted: total_value * fx_rate,
                total_cost_converted: position.total_cost * fx_rate,
            });
        }

        warnings.extend(rates.warnings);

        let mut summary = PortfolioSummary::empty(target_currency);
        for holding in &holdings {
            summary.total_value += holding.total_value_converted;
            summary.total_cost += holding.total_cost_converted;
        }
        summary.total_gain_loss = summary.total_value - summary.total_cost;
        summary.total_gain_loss_percent =
            gain_loss_percent(summary.total_gain_loss, summary.total_cost);
        summary.holdings_count = holdings.len();

        debug!(
            "Valued {} holdings in {}: total {}",
            summary.holdings_count, target_currency, summary.total_value
        );

        Ok(PortfolioValuation {
            holdings,
            summary,
            warnings,
            valued_at: self.clock.now(),
        })
    }

    async fn get_portfolio_valuation(
        &self,
        user_id: &str,
        target_currency: Currency,
    ) -> Result<PortfolioValuation> {
        let transactions = self.transaction_repository.get_transactions_by_user(user_id)?;
        self.value_transactions(&transactions, target_currency).await
    }
}
