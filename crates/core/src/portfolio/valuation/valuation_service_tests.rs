use super::*;
use crate::config::EngineConfig;
use crate::constants::CASH_SYMBOL;
use crate::fx::{Currency, FxService};
use crate::quotes::{PriceCache, QuoteService};
use crate::test_support::{
    date, transaction, ts, MockFxRepository, MockPriceStore, MockProvider,
    MockTransactionRepository,
};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::FixedClock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration as StdDuration;

struct Fixture {
    provider: Arc<MockProvider>,
    ledger: Arc<MockTransactionRepository>,
    service: ValuationService,
}

fn fixture(rows: Vec<Transaction>) -> Fixture {
    let config = EngineConfig::default().with_price_batch_pause(StdDuration::ZERO);
    let provider = Arc::new(MockProvider::new());
    let clock = Arc::new(FixedClock::new(ts(2024, 6, 12, 18, 0)));
    let quotes = Arc::new(QuoteService::new(
        Arc::new(MockPriceStore::new()),
        provider.clone(),
        Arc::new(PriceCache::new(config.memory_price_ttl)),
        clock.clone(),
        &config,
    ));
    let fx = Arc::new(FxService::new(
        Arc::new(MockFxRepository::new()),
        provider.clone(),
        clock.clone(),
    ));
    let ledger = Arc::new(MockTransactionRepository::with_transactions(rows));
    let service = ValuationService::new(ledger.clone(), quotes, fx, clock);
    Fixture {
        provider,
        ledger,
        service,
    }
}

fn deposit(id: &str, amount: Decimal, currency: Currency) -> Transaction {
    transaction(
        id,
        "u1",
        CASH_SYMBOL,
        TransactionType::Deposit,
        amount,
        Decimal::ONE,
        currency,
        date(2024, 6, 1),
    )
}

fn buy(id: &str, symbol: &str, qty: Decimal, price: Decimal, currency: Currency) -> Transaction {
    transaction(
        id,
        "u1",
        symbol,
        TransactionType::Buy,
        qty,
        price,
        currency,
        date(2024, 6, 2),
    )
}

fn holding<'a>(valuation: &'a PortfolioValuation, symbol: &str) -> &'a Holding {
    valuation
        .holdings
        .iter()
        .find(|h| h.symbol == symbol)
        .unwrap()
}

#[tokio::test]
async fn test_deposit_buy_and_price_move_end_to_end() {
    let f = fixture(vec![
        deposit("d1", dec!(1000), Currency::Cad),
        buy("b1", "X", dec!(10), dec!(100), Currency::Usd),
    ]);
    f.provider.set_quote("X", dec!(110), "USD");
    f.provider.set_rate(Currency::Usd, Currency::Cad, dec!(1.35));

    let valuation = f
        .service
        .get_portfolio_valuation("u1", Currency::Usd)
        .await
        .unwrap();

    let x = holding(&valuation, "X");
    assert_eq!(x.quantity, dec!(10));
    assert_eq!(x.average_cost, dec!(100));
    assert_eq!(x.current_price, dec!(110));
    assert_eq!(x.total_value, dec!(1100));
    assert_eq!(x.gain_loss, dec!(100));
    assert_eq!(x.gain_loss_percent, dec!(10));
    assert!(x.price_available);

    let cash = holding(&valuation, CASH_SYMBOL);
    assert!(cash.is_cash);
    assert_eq!(cash.currency, Currency::Cad);
    assert_eq!(cash.quantity, dec!(1000));
    assert_eq!(cash.total_value, dec!(1000));
    assert_eq!(cash.gain_loss, Decimal::ZERO);

    assert_eq!(valuation.summary.holdings_count, 2);
    assert!(valuation.warnings.is_empty());
}

#[tokio::test]
async fn test_sums_are_taken_after_conversion() {
    let f = fixture(vec![
        deposit("d1", dec!(1350), Currency::Cad),
        buy("b1", "X", dec!(10), dec!(100), Currency::Usd),
    ]);
    f.provider.set_quote("X", dec!(110), "USD");
    f.provider.set_rate(Currency::Usd, Currency::Cad, dec!(1.35));

    let valuation = f
        .service
        .value_transactions(&f.ledger_rows(), Currency::Cad)
        .await
        .unwrap();

    // 1100 USD * 1.35 + 1350 CAD, not 1100 + 1350.
    assert_eq!(valuation.summary.total_value, dec!(2835));
    assert_eq!(valuation.summary.total_cost, dec!(2700));
    assert_eq!(valuation.summary.total_gain_loss, dec!(135));
    assert_eq!(valuation.summary.total_gain_loss_percent, dec!(5));
    assert_eq!(valuation.summary.currency, Currency::Cad);

    let x = holding(&valuation, "X");
    assert_eq!(x.fx_rate, dec!(1.35));
    assert_eq!(x.total_value_converted, dec!(1485));
}

#[tokio::test]
async fn test_missing_price_values_at_cost() {
    let f = fixture(vec![buy("b1", "DELISTED", dec!(4), dec!(25), Currency::Usd)]);

    let valuation = f
        .service
        .get_portfolio_valuation("u1", Currency::Usd)
        .await
        .unwrap();
    let h = holding(&valuation, "DELISTED");
    assert!(!h.price_available);
    assert_eq!(h.current_price, dec!(25));
    assert_eq!(h.total_value, dec!(100));
    assert_eq!(h.gain_loss, Decimal::ZERO);
    assert_eq!(h.gain_loss_percent, Decimal::ZERO);
    assert_eq!(valuation.summary.total_value, dec!(100));
    assert_eq!(valuation.warnings.len(), 1);
}

#[tokio::test]
async fn test_missing_rate_uses_fallback_and_warns() {
    let f = fixture(vec![deposit("d1", dec!(100), Currency::Usd)]);

    let valuation = f
        .service
        .get_portfolio_valuation("u1", Currency::Cad)
        .await
        .unwrap();
    assert_eq!(valuation.summary.total_value, dec!(135));
    assert_eq!(valuation.warnings.len(), 1);
    assert!(valuation.warnings[0].contains("USD/CAD"));
}

#[tokio::test]
async fn test_price_quoted_in_other_currency_is_converted() {
    // Bought in CAD, but the provider quotes the symbol in USD.
    let f = fixture(vec![buy("b1", "Y", dec!(2), dec!(130), Currency::Cad)]);
    f.provider.set_quote("Y", dec!(100), "USD");
    f.provider.set_rate(Currency::Usd, Currency::Cad, dec!(1.4));

    let valuation = f
        .service
        .get_portfolio_valuation("u1", Currency::Cad)
        .await
        .unwrap();
    let y = holding(&valuation, "Y");
    assert_eq!(y.current_price, dec!(140));
    assert_eq!(y.total_value, dec!(280));
    assert_eq!(y.gain_loss, dec!(20));
}

#[tokio::test]
async fn test_empty_ledger_is_a_zero_valuation() {
    let f = fixture(vec![]);
    let valuation = f
        .service
        .get_portfolio_valuation("u1", Currency::Cad)
        .await
        .unwrap();
    assert!(valuation.holdings.is_empty());
    assert_eq!(valuation.summary.total_value, Decimal::ZERO);
    assert_eq!(valuation.summary.total_gain_loss_percent, Decimal::ZERO);
}

#[tokio::test]
async fn test_ledger_read_failure_propagates() {
    let f = fixture(vec![deposit("d1", dec!(100), Currency::Usd)]);
    f.ledger.set_fail_reads(true);
    assert!(f
        .service
        .get_portfolio_valuation("u1", Currency::Usd)
        .await
        .is_err());
}

impl Fixture {
    fn ledger_rows(&self) -> Vec<Transaction> {
        use crate::transactions::TransactionRepositoryTrait;
        self.ledger.get_transactions_by_user("u1").unwrap()
    }
}
