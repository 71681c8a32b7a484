//! Current-price valuation of a user's holdings.

mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_model::*;
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;

#[cfg(test)]
mod valuation_service_tests;
