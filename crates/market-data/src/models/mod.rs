//! Data models returned by market data providers.

mod quote;

pub use quote::{FxQuote, Quote};

/// Provider identifier (e.g., "YAHOO")
pub type ProviderId = &'static str;
