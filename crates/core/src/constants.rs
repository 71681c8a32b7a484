use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sentinel symbol for cash ledger entries and synthetic cash holdings
pub const CASH_SYMBOL: &str = "CASH";

/// Decimal precision for persisted asset prices
pub const PRICE_DECIMAL_PRECISION: u32 = 4;

/// Decimal precision for persisted snapshot totals
pub const SNAPSHOT_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for persisted exchange rates
pub const FX_DECIMAL_PRECISION: u32 = 6;

/// Hour of day (local time) treated as market close
pub const MARKET_CLOSE_HOUR: u32 = 16;

/// Symbols fetched concurrently per price batch chunk
pub const PRICE_BATCH_SIZE: usize = 5;

/// Upper bound on a ledger row's quantity and price, so every
/// `quantity × price` stays well inside `Decimal`'s range.
pub const MAX_LEDGER_MAGNITUDE: Decimal = dec!(1_000_000_000_000);
