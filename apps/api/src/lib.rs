//! # forkful-api: HTTP Service for Forkful
//!
//! Thin orchestration layer over `forkful-core` and `forkful-db`.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Lifecycle                              │
//! │                                                                         │
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer (span per request)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Handler ── AuthUser (JWT) ── require(Role) ── Json / Path / Query      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Service (identity, catalog, order, delivery, report)                   │
//! │       │                                                                 │
//! │       ├── forkful-core: validation, pricing, lifecycle, ranking         │
//! │       └── forkful-db:   repositories, transactions                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Json<T>  or  ApiError { code, message } with mapped status             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "database unavailable" })),
        )
    }
}

// =============================================================================
// Router Tests
// =============================================================================
