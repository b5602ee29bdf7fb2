use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};

use forkful_core::{Delivery, Role, User};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::delivery::{
    AvailabilityRequest, AvailableDeliveries, DeliveryStatusRequest, PageQuery,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/available-deliveries", get(available_deliveries))
        .route("/availability", put(set_availability))
        .route("/{id}/accept", put(accept))
        .route("/{id}/status", put(update_status))
}

async fn available_deliveries(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<AvailableDeliveries>> {
    user.require(Role::DeliveryPersonnel)?;
    let Query(query) = query?;
    Ok(Json(state.deliveries().available_deliveries(&user.id, query).await?))
}

async fn accept(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Delivery>> {
    user.require(Role::DeliveryPersonnel)?;
    Ok(Json(state.deliveries().accept(&user.id, &id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<DeliveryStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Delivery>> {
    user.require(Role::DeliveryPersonnel)?;
    let Json(request) = body?;
    Ok(Json(state.deliveries().update_status(&user.id, &id, request).await?))
}

async fn set_availability(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    user.require(Role::DeliveryPersonnel)?;
    let Json(request) = body?;
    Ok(Json(state.deliveries().set_availability(&user.id, request.available).await?))
}
