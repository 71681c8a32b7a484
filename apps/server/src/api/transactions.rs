use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tallyfolio_core::transactions::{NewTransaction, Transaction};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_transactions(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    // 404 for unknown users rather than an empty ledger.
    state.user_service.get_user(&user_id)?;
    Ok(Json(state.transaction_service.get_transactions(&user_id)?))
}

async fn append_transaction(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(new_transaction): Json<NewTransaction>,
) -> ApiResult<Json<Transaction>> {
    let transaction = state
        .transaction_service
        .append_transaction(&user_id, new_transaction)
        .await?;
    Ok(Json(transaction))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users/{id}/transactions",
        get(list_transactions).post(append_transaction),
    )
}
