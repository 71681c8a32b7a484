//! The closed set of settlement currencies.
//!
//! Everything that enumerates currencies or currency pairs goes through
//! [`Currency::ALL`]; supporting another currency means adding a variant,
//! extending `ALL`, and (optionally) a row in `FALLBACK_RATES`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fx_errors::FxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cad,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Cad, Currency::Usd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Cad => "CAD",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| FxError::UnsupportedCurrency(code.to_string()))
    }
}

/// Every ordered pair of distinct supported currencies.
pub fn currency_pairs() -> impl Iterator<Item = (Currency, Currency)> {
    Currency::ALL.into_iter().flat_map(|from| {
        Currency::ALL
            .into_iter()
            .filter(move |to| *to != from)
            .map(move |to| (from, to))
    })
}

/// Last-resort conversion constants, used only when no observed rate exists.
const FALLBACK_RATES: &[(Currency, Currency, Decimal)] =
    &[(Currency::Usd, Currency::Cad, dec!(1.35))];

/// Degraded-default rate for a pair, derived from `FALLBACK_RATES` (direct or inverted).
pub fn fallback_rate(from: Currency, to: Currency) -> Option<Decimal> {
    if from == to {
        return Some(Decimal::ONE);
    }
    FALLBACK_RATES.iter().find_map(|(f, t, rate)| {
        if *f == from && *t == to {
            Some(*rate)
        } else if *f == to && *t == from && !rate.is_zero() {
            Some(Decimal::ONE / *rate)
        } else {
            None
        }
    })
}
