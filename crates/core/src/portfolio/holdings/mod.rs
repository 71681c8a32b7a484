//! Ledger replay into positions.

mod holdings_calculator;
mod positions_model;

pub use holdings_calculator::HoldingsCalculator;
pub use positions_model::*;

#[cfg(test)]
mod holdings_calculator_tests;
