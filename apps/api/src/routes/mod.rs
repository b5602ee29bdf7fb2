//! # HTTP Routes
//!
//! Every route group, mounted under `/api` by [`crate::build_router`].
//!
//! ```text
//! /api
//! ├── /auth          register, login                      (public)
//! ├── /customers     browse, search, orders               (Customer)
//! ├── /restaurants   restaurant, menu, order status       (RestaurantOwner)
//! ├── /deliveries    pool, accept, status, availability   (DeliveryPersonnel)
//! └── /admin         users, orders, reports               (Administrator)
//! ```
//!
//! Handlers extract, gate on role, call one service method and wrap the
//! result. Creates answer 201, everything else 200.

use axum::Router;

use crate::state::AppState;

mod admin;
mod auth;
mod customers;
mod deliveries;
mod restaurants;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/customers", customers::router())
        .nest("/restaurants", restaurants::router())
        .nest("/deliveries", deliveries::router())
        .nest("/admin", admin::router())
}
