use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use forkful_core::{MenuItem, OrderView, PlacedOrder, Restaurant, Role};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::order::PlaceOrderRequest;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(browse_restaurants))
        .route("/menus", get(search_menus))
        .route("/orders", post(place_order))
        .route("/orders/{id}", get(track_order))
        .route("/order-history", get(order_history))
}

async fn browse_restaurants(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Restaurant>>> {
    user.require(Role::Customer)?;
    Ok(Json(state.catalog().browse_restaurants().await?))
}

async fn search_menus(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MenuItem>>> {
    user.require(Role::Customer)?;
    let Query(query) = query?;
    Ok(Json(state.catalog().search_menus(query.search.as_deref()).await?))
}

async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PlacedOrder>)> {
    user.require(Role::Customer)?;
    let Json(request) = body?;
    let placed = state.orders().place_order(&user.id, request).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

async fn track_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderView>> {
    user.require(Role::Customer)?;
    Ok(Json(state.orders().track_order(&user.id, &id).await?))
}

async fn order_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<OrderView>>> {
    user.require(Role::Customer)?;
    Ok(Json(state.orders().order_history(&user.id).await?))
}
