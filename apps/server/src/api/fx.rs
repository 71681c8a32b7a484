use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallyfolio_core::errors::Error as CoreError;
use tallyfolio_core::fx::{Currency, ExchangeRate};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct PairQuery {
    from: String,
    to: String,
}

#[derive(Deserialize)]
struct ConvertQuery {
    amount: Decimal,
    from: String,
    to: String,
}

#[derive(Deserialize)]
struct HistoryQuery {
    from: String,
    to: String,
    days: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionResponse {
    amount: Decimal,
    from: Currency,
    to: Currency,
    converted: Decimal,
}

fn parse_pair(from: &str, to: &str) -> ApiResult<(Currency, Currency)> {
    let from = Currency::from_str(from).map_err(CoreError::from)?;
    let to = Currency::from_str(to).map_err(CoreError::from)?;
    Ok((from, to))
}

/// Resolved rate including its source and observation time.
async fn get_rate(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PairQuery>,
) -> ApiResult<Json<ExchangeRate>> {
    let (from, to) = parse_pair(&q.from, &q.to)?;
    Ok(Json(state.fx_service.resolve_rate(from, to).await?))
}

async fn convert(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ConvertQuery>,
) -> ApiResult<Json<ConversionResponse>> {
    let (from, to) = parse_pair(&q.from, &q.to)?;
    let converted = state.fx_service.convert(q.amount, from, to).await?;
    Ok(Json(ConversionResponse {
        amount: q.amount,
        from,
        to,
        converted,
    }))
}

async fn get_latest_rates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ExchangeRate>>> {
    Ok(Json(state.fx_service.get_latest_rates().await?))
}

async fn get_rate_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<ExchangeRate>>> {
    let (from, to) = parse_pair(&q.from, &q.to)?;
    let days = q.days.unwrap_or(30);
    if days > 3650 {
        return Err(ApiError::BadRequest("days must be at most 3650".to_string()));
    }
    Ok(Json(state.fx_service.get_rate_history(from, to, days)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fx/rate", get(get_rate))
        .route("/fx/convert", get(convert))
        .route("/fx/latest", get(get_latest_rates))
        .route("/fx/history", get(get_rate_history))
}
