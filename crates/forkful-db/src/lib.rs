//! # forkful-db: Database Layer for Forkful
//!
//! Database access for the Forkful platform: SQLite through sqlx, one
//! repository per collection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Forkful Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /api/customers/orders)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderService::place_order  (apps/api)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     forkful-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ UserRepo       │    │ 001_initial_ │ │   │
//! │  │   │ SqlitePool    │◄───│ RestaurantRepo │    │  schema.sql  │ │   │
//! │  │   │               │    │ MenuRepo       │    │              │ │   │
//! │  │   │               │    │ OrderRepo      │    │              │ │   │
//! │  │   │               │    │ DeliveryRepo   │    │              │ │   │
//! │  │   │               │    │ ReportRepo     │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (forkful.db, WAL)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forkful_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("forkful.db")).await?;
//!
//! let restaurant = db.restaurants().find_by_name("Good Eats").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::delivery::DeliveryRepository;
pub use repository::menu::MenuRepository;
pub use repository::order::{NewOrder, OrderRepository};
pub use repository::report::ReportRepository;
pub use repository::restaurant::RestaurantRepository;
pub use repository::user::UserRepository;
