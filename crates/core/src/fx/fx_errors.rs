use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("No exchange rate available for {from}/{to}")]
    RateUnavailable { from: String, to: String },

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Failed to fetch exchange rate: {0}")]
    FetchError(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}
