use std::sync::Arc;
use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tallyfolio_core::errors::Error as CoreError;
use tallyfolio_core::fx::Currency;
use tallyfolio_core::portfolio::{
    snapshot::{PortfolioSeries, PortfolioSnapshot, SeriesRange, SnapshotRunReport},
    valuation::PortfolioValuation,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct HoldingsQuery {
    currency: Option<String>,
}

#[derive(Deserialize)]
struct HistoryQuery {
    range: Option<String>,
}

#[derive(Deserialize)]
struct SnapshotsQuery {
    start: String,
    end: String,
}

fn parse_date(field: &str, value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("{} must be a YYYY-MM-DD date", field)))
}

async fn get_holdings(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<HoldingsQuery>,
) -> ApiResult<Json<PortfolioValuation>> {
    let user = state.user_service.get_user(&user_id)?;
    let currency = match q.currency.as_deref() {
        Some(code) => Currency::from_str(code).map_err(CoreError::from)?,
        None => user.default_currency,
    };
    let valuation = state
        .valuation_service
        .get_portfolio_valuation(&user.id, currency)
        .await?;
    Ok(Json(valuation))
}

async fn get_history(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<PortfolioSeries>> {
    let range = match q.range.as_deref() {
        Some(r) => SeriesRange::from_str(r).map_err(CoreError::from)?,
        None => SeriesRange::default(),
    };
    let series = state.snapshot_service.get_series(&user_id, range).await?;
    Ok(Json(series))
}

async fn record_snapshot(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSnapshot>> {
    let snapshot = state.snapshot_service.record_snapshot(&user_id).await?;
    Ok(Json(snapshot))
}

async fn get_snapshots(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotsQuery>,
) -> ApiResult<Json<Vec<PortfolioSnapshot>>> {
    let start = parse_date("start", &q.start)?;
    let end = parse_date("end", &q.end)?;
    if start > end {
        return Err(ApiError::BadRequest("start must not be after end".to_string()));
    }
    Ok(Json(state.snapshot_service.get_snapshots(&user_id, start, end)?))
}

/// Gated run; `null` when the market-close gate is still closed.
async fn run_snapshots(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Option<SnapshotRunReport>>> {
    Ok(Json(state.snapshot_scheduler.run_if_due().await?))
}

async fn force_run_snapshots(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SnapshotRunReport>> {
    Ok(Json(state.snapshot_scheduler.run_now().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{id}/holdings", get(get_holdings))
        .route("/users/{id}/history", get(get_history))
        .route(
            "/users/{id}/snapshots",
            get(get_snapshots).post(record_snapshot),
        )
        .route("/snapshots/run", post(run_snapshots))
        .route("/snapshots/run/force", post(force_run_snapshots))
}
