//! # forkful-core: Pure Business Logic for Forkful
//!
//! This crate is the **heart** of Forkful. It holds the domain types and every
//! rule that decides what may happen to an order, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Forkful Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │   auth ─► customers ─► restaurants ─► deliveries ─► admin       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ forkful-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ lifecycle │  │  report   │  │   │
//! │  │   │  Order    │  │   Money   │  │  Order +  │  │ popular   │  │   │
//! │  │   │ Delivery  │  │  pricing  │  │ Delivery  │  │ ranking   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    forkful-db (SQLite)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Restaurant, MenuItem, Order, Delivery, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input validation
//! - [`lifecycle`] - Order and delivery status state machines
//! - [`pricing`] - Cart resolution against a restaurant menu
//! - [`report`] - Popularity ranking over order volume
//!
//! ## Example Usage
//!
//! ```rust
//! use forkful_core::money::Money;
//!
//! let pasta = Money::parse_decimal("12.99").unwrap();
//! let salad = Money::parse_decimal("8.99").unwrap();
//!
//! let total = pasta
//!     .checked_multiply_quantity(2)
//!     .and_then(|lines| lines.checked_add(salad))
//!     .unwrap();
//! assert_eq!(total.to_string(), "34.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single order line.
///
/// Guards against typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum menu price in cents (100,000.00).
///
/// Keeps every line price and order total far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Maximum number of lines in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Estimated delivery time assigned to a fresh delivery, in minutes.
pub const DEFAULT_DELIVERY_MINUTES: i64 = 30;

/// Number of entries in the popular restaurants report.
pub const POPULAR_REPORT_LIMIT: usize = 10;

/// Display label used when a report references a deleted restaurant or dish.
pub const UNKNOWN_LABEL: &str = "Unknown";
