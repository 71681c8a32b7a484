//! FX (Foreign Exchange) module - supported currencies and rate resolution.

pub mod currency;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use currency::{currency_pairs, fallback_rate, Currency};
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, NewExchangeRate, IDENTITY_SOURCE};
pub use fx_service::FxService;
pub use fx_traits::{FxRepositoryTrait, FxServiceTrait};
