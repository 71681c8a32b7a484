use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tallyfolio_core::errors::Error as CoreError;
use tallyfolio_core::quotes::{AssetPrice, PriceBatch};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct BatchQuery {
    /// Comma-separated symbols.
    symbols: String,
}

async fn get_price(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AssetPrice>> {
    let price = state
        .quote_service
        .current_price(&symbol)
        .await
        .ok_or_else(|| CoreError::NotFound(format!("no price available for {}", symbol)))?;
    Ok(Json(price))
}

async fn get_prices(
    State(state): State<Arc<AppState>>,
    Query(q): Query<BatchQuery>,
) -> ApiResult<Json<PriceBatch>> {
    let symbols: Vec<String> = q
        .symbols
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(Json(state.quote_service.current_prices(&symbols).await))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prices", get(get_prices))
        .route("/prices/{symbol}", get(get_price))
}
