use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use forkful_core::report::{ActivitySnapshot, PopularRestaurant};
use forkful_core::{Order, OrderView, Role, User};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::identity::{RegisterRequest, UpdateUserRequest};
use crate::services::order::ManageOrderRequest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", put(update_user).delete(deactivate_user))
        .route("/orders", get(all_orders))
        .route("/orders/{id}", put(manage_order))
        .route("/reports/popular-restaurants", get(popular_restaurants))
        .route("/activity", get(activity))
}

async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    user.require(Role::Administrator)?;
    let Json(request) = body?;
    let created = state.identity().create_user(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    user.require(Role::Administrator)?;
    let Json(request) = body?;
    Ok(Json(state.identity().update_user(&id, request).await?))
}

async fn deactivate_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    user.require(Role::Administrator)?;
    state.identity().deactivate_user(&id).await?;
    Ok(Json(json!({ "message": "User deactivated", "id": id })))
}

async fn all_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<OrderView>>> {
    user.require(Role::Administrator)?;
    Ok(Json(state.orders().all_orders().await?))
}

async fn manage_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<ManageOrderRequest>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    user.require(Role::Administrator)?;
    let Json(request) = body?;
    Ok(Json(state.orders().manage_order(&id, request).await?))
}

async fn popular_restaurants(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<PopularRestaurant>>> {
    user.require(Role::Administrator)?;
    Ok(Json(state.reports().popular_restaurants().await?))
}

async fn activity(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ActivitySnapshot>> {
    user.require(Role::Administrator)?;
    Ok(Json(state.reports().activity().await?))
}
