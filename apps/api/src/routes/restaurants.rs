use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use forkful_core::{MenuItem, Order, OrderView, Restaurant, Role};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::catalog::{MenuRequest, RestaurantRequest};
use crate::services::order::OrderStatusRequest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_restaurant))
        .route("/details", put(update_details))
        .route("/menus", post(manage_menu))
        .route("/menus/{id}", delete(remove_menu_item))
        .route("/orders", get(restaurant_orders))
        .route("/orders/status", put(update_order_status))
}

async fn add_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<RestaurantRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Restaurant>)> {
    user.require(Role::RestaurantOwner)?;
    let Json(request) = body?;
    let restaurant = state.catalog().save_restaurant(&user.id, request).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

async fn update_details(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<RestaurantRequest>, JsonRejection>,
) -> ApiResult<Json<Restaurant>> {
    user.require(Role::RestaurantOwner)?;
    let Json(request) = body?;
    Ok(Json(state.catalog().update_restaurant_details(&user.id, request).await?))
}

async fn manage_menu(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<MenuRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MenuItem>)> {
    user.require(Role::RestaurantOwner)?;
    let Json(request) = body?;
    let item = state.catalog().manage_menu(&user.id, request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    user.require(Role::RestaurantOwner)?;
    state.catalog().remove_menu_item(&user.id, &id).await?;
    Ok(Json(json!({ "message": "Menu item removed", "id": id })))
}

async fn restaurant_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<OrderView>>> {
    user.require(Role::RestaurantOwner)?;
    Ok(Json(state.orders().restaurant_orders(&user.id).await?))
}

async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<OrderStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    user.require(Role::RestaurantOwner)?;
    let Json(request) = body?;
    Ok(Json(state.orders().update_order_status(&user.id, request).await?))
}
