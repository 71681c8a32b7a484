use super::*;
use crate::constants::CASH_SYMBOL;
use crate::fx::Currency;
use crate::transactions::{Transaction, TransactionType};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn tx(
    id: &str,
    symbol: &str,
    transaction_type: TransactionType,
    quantity: Decimal,
    price: Decimal,
    currency: Currency,
    day: u32,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        symbol: symbol.to_string(),
        transaction_type,
        quantity,
        price,
        currency,
        transaction_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
    }
}

fn buy(id: &str, symbol: &str, qty: Decimal, price: Decimal, day: u32) -> Transaction {
    tx(id, symbol, TransactionType::Buy, qty, price, Currency::Usd, day)
}

fn sell(id: &str, symbol: &str, qty: Decimal, price: Decimal, day: u32) -> Transaction {
    tx(id, symbol, TransactionType::Sell, qty, price, Currency::Usd, day)
}

fn position<'a>(result: &'a HoldingsCalculationResult, symbol: &str) -> Option<&'a Position> {
    result.positions.iter().find(|p| p.symbol == symbol)
}

#[test]
fn test_two_buys_use_weighted_average() {
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "AAPL", dec!(10), dec!(100), 1),
        buy("t2", "AAPL", dec!(10), dec!(200), 2),
    ]);

    let aapl = position(&result, "AAPL").unwrap();
    assert_eq!(aapl.quantity, dec!(20));
    assert_eq!(aapl.average_cost, dec!(150));
    assert_eq!(aapl.total_cost, dec!(3000));
    assert!(!aapl.is_cash);
}

#[test]
fn test_sell_removes_cost_at_average_not_sale_price() {
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "AAPL", dec!(10), dec!(100), 1),
        buy("t2", "AAPL", dec!(10), dec!(200), 2),
        sell("t3", "AAPL", dec!(5), dec!(999), 3),
    ]);

    let aapl = position(&result, "AAPL").unwrap();
    assert_eq!(aapl.quantity, dec!(15));
    assert_eq!(aapl.average_cost, dec!(150));
    assert_eq!(aapl.total_cost, dec!(2250));
}

#[test]
fn test_selling_everything_drops_the_position() {
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "SHOP.TO", dec!(4), dec!(80), 1),
        sell("t2", "SHOP.TO", dec!(4), dec!(90), 2),
    ]);
    assert!(position(&result, "SHOP.TO").is_none());
    assert!(result.positions.is_empty());
}

#[test]
fn test_oversell_resets_then_rebuy_starts_fresh() {
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "MSFT", dec!(2), dec!(300), 1),
        sell("t2", "MSFT", dec!(5), dec!(310), 2),
        buy("t3", "MSFT", dec!(1), dec!(400), 3),
    ]);
    let msft = position(&result, "MSFT").unwrap();
    assert_eq!(msft.quantity, dec!(1));
    assert_eq!(msft.average_cost, dec!(400));
    assert_eq!(msft.total_cost, dec!(400));
}

#[test]
fn test_replay_orders_by_date_not_input_order() {
    // The sell is dated after both buys even though it appears first.
    let result = HoldingsCalculator::calculate(&[
        sell("t3", "AAPL", dec!(5), dec!(999), 3),
        buy("t2", "AAPL", dec!(10), dec!(200), 2),
        buy("t1", "AAPL", dec!(10), dec!(100), 1),
    ]);
    let aapl = position(&result, "AAPL").unwrap();
    assert_eq!(aapl.quantity, dec!(15));
    assert_eq!(aapl.total_cost, dec!(2250));
}

#[test]
fn test_same_day_rows_keep_ledger_order() {
    // Buy then sell on the same day: the sell applies to the bought shares.
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "AAPL", dec!(10), dec!(100), 5),
        sell("t2", "AAPL", dec!(4), dec!(120), 5),
    ]);
    assert_eq!(position(&result, "AAPL").unwrap().quantity, dec!(6));

    // Sell first on the same day resets an empty position; the buy survives.
    let reversed = HoldingsCalculator::calculate(&[
        sell("t2", "AAPL", dec!(4), dec!(120), 5),
        buy("t1", "AAPL", dec!(10), dec!(100), 5),
    ]);
    assert_eq!(position(&reversed, "AAPL").unwrap().quantity, dec!(10));
}

#[test]
fn test_cash_becomes_synthetic_holdings_per_currency() {
    let result = HoldingsCalculator::calculate(&[
        tx("d1", CASH_SYMBOL, TransactionType::Deposit, dec!(1000), Decimal::ONE, Currency::Usd, 1),
        tx("d2", CASH_SYMBOL, TransactionType::Deposit, dec!(500), Decimal::ONE, Currency::Cad, 1),
        tx("w1", CASH_SYMBOL, TransactionType::Withdrawal, dec!(200), Decimal::ONE, Currency::Usd, 2),
    ]);

    let cash: Vec<_> = result.cash_positions().collect();
    assert_eq!(cash.len(), 2);
    let usd = cash.iter().find(|p| p.currency == Currency::Usd).unwrap();
    assert_eq!(usd.quantity, dec!(800));
    assert_eq!(usd.average_cost, Decimal::ONE);
    assert_eq!(usd.total_cost, dec!(800));
    assert!(usd.is_cash);
    assert_eq!(result.cash_balances[&Currency::Cad], dec!(500));
}

#[test]
fn test_negative_cash_is_not_a_holding_but_is_reported() {
    let result = HoldingsCalculator::calculate(&[
        tx("d1", CASH_SYMBOL, TransactionType::Deposit, dec!(100), Decimal::ONE, Currency::Cad, 1),
        tx("w1", CASH_SYMBOL, TransactionType::Withdrawal, dec!(150), Decimal::ONE, Currency::Cad, 2),
    ]);
    assert_eq!(result.cash_positions().count(), 0);
    assert_eq!(result.cash_balances[&Currency::Cad], dec!(-50));
}

#[test]
fn test_trades_do_not_move_cash() {
    let result = HoldingsCalculator::calculate(&[
        tx("d1", CASH_SYMBOL, TransactionType::Deposit, dec!(1000), Decimal::ONE, Currency::Usd, 1),
        buy("t1", "AAPL", dec!(2), dec!(100), 2),
    ]);
    assert_eq!(result.cash_balances[&Currency::Usd], dec!(1000));
    assert_eq!(result.security_positions().count(), 1);
}

#[test]
fn test_same_symbol_in_two_currencies_is_two_positions() {
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "BTC-USD", dec!(1), dec!(30000), 1),
        tx("t2", "BTC-USD", TransactionType::Buy, dec!(1), dec!(40000), Currency::Cad, 2),
    ]);
    assert_eq!(result.security_positions().count(), 2);
}

#[test]
fn test_unreplayable_rows_become_warnings() {
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "AAPL", dec!(0), dec!(100), 1),
        tx("t2", CASH_SYMBOL, TransactionType::Buy, dec!(5), Decimal::ONE, Currency::Usd, 1),
        buy("t3", "AAPL", dec!(1), dec!(100), 2),
    ]);
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0].transaction_id, "t1");
    assert_eq!(result.warnings[1].transaction_id, "t2");
    assert_eq!(position(&result, "AAPL").unwrap().quantity, dec!(1));
}

#[test]
fn test_overflowing_rows_are_skipped_not_fatal() {
    let huge = dec!(100_000_000_000_000_000_000);
    let result = HoldingsCalculator::calculate(&[
        buy("t1", "AAPL", dec!(2), dec!(100), 1),
        buy("t2", "AAPL", huge, dec!(10_000_000_000), 2),
        buy("t3", "MSFT", huge, dec!(10_000_000_000), 2),
        tx("d1", CASH_SYMBOL, TransactionType::Deposit, dec!(50), Decimal::ONE, Currency::Usd, 3),
        tx("d2", CASH_SYMBOL, TransactionType::Deposit, Decimal::MAX, dec!(2), Currency::Usd, 3),
        tx("d3", CASH_SYMBOL, TransactionType::Deposit, Decimal::MAX, Decimal::ONE, Currency::Usd, 4),
    ]);

    let skipped: Vec<_> = result.warnings.iter().map(|w| w.transaction_id.as_str()).collect();
    assert_eq!(skipped, vec!["t2", "t3", "d2", "d3"]);

    let aapl = position(&result, "AAPL").unwrap();
    assert_eq!(aapl.quantity, dec!(2));
    assert_eq!(aapl.total_cost, dec!(200));
    assert!(position(&result, "MSFT").is_none());
    assert_eq!(result.cash_balances[&Currency::Usd], dec!(50));
}

#[test]
fn test_empty_ledger() {
    let result = HoldingsCalculator::calculate(&[]);
    assert!(result.positions.is_empty());
    assert!(result.cash_balances.is_empty());
    assert!(result.warnings.is_empty());
}
