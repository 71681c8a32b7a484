use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tallyfolio_core::fx::Currency;
use tallyfolio_core::users::{NewUser, User};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserUpdate {
    default_currency: Currency,
}

async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_service.list_users()?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.create_user(new_user).await?;
    Ok(Json(user))
}

async fn get_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&id)?))
}

async fn update_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    let user = state
        .user_service
        .update_default_currency(&id, update.default_currency)
        .await?;
    Ok(Json(user))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user))
}
