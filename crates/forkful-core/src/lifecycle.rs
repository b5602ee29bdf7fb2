//! # Lifecycle Module
//!
//! Status state machines for orders, order items and deliveries, and the
//! rules coupling the three.
//!
//! ## Delivery State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──accept──► picked-up ──────► en-route ──────► delivered     │
//! │      │                    │                 │            (terminal)     │
//! │      └────────────────────┴─────────────────┘                           │
//! │                           │ admin                                       │
//! │                           ▼                                             │
//! │              cancelled (terminal) / rescheduled                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coupling
//! ```text
//! Delivery en-route   ──► Order out-for-delivery
//! Delivery delivered  ──► Order delivered
//! Owner    preparing  ──► Order preparing,  items preparing
//! Owner    ready      ──► Order ready,      items completed
//! Admin    cancel     ──► Order cancelled,  items cancelled,   Delivery cancelled
//! Admin    reschedule ──► Order rescheduled, items rescheduled, Delivery rescheduled
//! Owner    resumes    ──► Order preparing (from rescheduled), Delivery pending, courier cleared
//! ```
//!
//! Everything here is pure. The database layer applies the outcome of these
//! decisions inside a single transaction.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{DeliveryStatus, OrderItemStatus, OrderStatus};

// =============================================================================
// Delivery
// =============================================================================

impl DeliveryStatus {
    /// The only status a courier may move this delivery to, if any.
    pub const fn successor(&self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Pending => Some(DeliveryStatus::PickedUp),
            DeliveryStatus::PickedUp => Some(DeliveryStatus::EnRoute),
            DeliveryStatus::EnRoute => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered
            | DeliveryStatus::Rescheduled
            | DeliveryStatus::Cancelled => None,
        }
    }

    /// Terminal states accept no further change, administrative or not.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// Order status implied by a courier-driven delivery change.
    pub const fn implied_order_status(&self) -> Option<OrderStatus> {
        match self {
            DeliveryStatus::EnRoute => Some(OrderStatus::OutForDelivery),
            DeliveryStatus::Delivered => Some(OrderStatus::Delivered),
            DeliveryStatus::Pending
            | DeliveryStatus::PickedUp
            | DeliveryStatus::Rescheduled
            | DeliveryStatus::Cancelled => None,
        }
    }
}

/// Checks a courier-driven delivery status change against the transition table.
///
/// ## Example
/// ```rust
/// use forkful_core::lifecycle::check_delivery_transition;
/// use forkful_core::DeliveryStatus;
///
/// assert!(check_delivery_transition(DeliveryStatus::PickedUp, DeliveryStatus::EnRoute).is_ok());
///
/// let err = check_delivery_transition(DeliveryStatus::Pending, DeliveryStatus::Delivered)
///     .unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Invalid delivery status transition from pending to delivered"
/// );
/// ```
pub fn check_delivery_transition(from: DeliveryStatus, to: DeliveryStatus) -> CoreResult<()> {
    if from.successor() == Some(to) {
        Ok(())
    } else {
        Err(CoreError::invalid_transition("delivery", from, to))
    }
}

// =============================================================================
// Order (restaurant owner)
// =============================================================================

/// Checks an owner-driven order status change.
///
/// Owners move their orders forward only:
/// `placed | rescheduled → preparing → ready`. Everything after `ready` is
/// driven by the delivery.
///
/// ## Returns
/// The status the order's items move to.
pub fn check_owner_transition(from: OrderStatus, to: OrderStatus) -> CoreResult<OrderItemStatus> {
    match (from, to) {
        (OrderStatus::Placed | OrderStatus::Rescheduled, OrderStatus::Preparing) => {
            Ok(OrderItemStatus::Preparing)
        }
        (OrderStatus::Preparing, OrderStatus::Ready) => Ok(OrderItemStatus::Completed),
        _ => Err(CoreError::invalid_transition("order", from, to)),
    }
}

/// Whether an owner move puts a rescheduled delivery back into the pending pool.
///
/// A rescheduled delivery has no courier successor, so it only becomes
/// deliverable again once the restaurant resumes work on the order.
pub const fn reopens_delivery(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (OrderStatus::Rescheduled, OrderStatus::Preparing)
    )
}

// =============================================================================
// Order (administrator override)
// =============================================================================

/// An administrative override of an order's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOverride {
    /// Force the order (and its items and delivery) to `cancelled`.
    Cancel,
    /// Move the order to `rescheduled` at the given time.
    Reschedule(DateTime<Utc>),
}

impl OrderOverride {
    /// Interprets an admin request body.
    ///
    /// ## Rules
    /// - `status == "cancelled"` wins, whatever else is present
    /// - any other status value is rejected
    /// - otherwise `scheduledTime` must be present
    ///
    /// ## Example
    /// ```rust
    /// use forkful_core::lifecycle::OrderOverride;
    /// use chrono::Utc;
    ///
    /// let at = Utc::now();
    /// assert_eq!(
    ///     OrderOverride::from_request(Some("cancelled"), Some(at)).unwrap(),
    ///     OrderOverride::Cancel
    /// );
    /// assert_eq!(
    ///     OrderOverride::from_request(None, Some(at)).unwrap(),
    ///     OrderOverride::Reschedule(at)
    /// );
    /// assert!(OrderOverride::from_request(None, None).is_err());
    /// ```
    pub fn from_request(
        status: Option<&str>,
        scheduled_time: Option<DateTime<Utc>>,
    ) -> Result<OrderOverride, ValidationError> {
        match (status.map(str::trim), scheduled_time) {
            (Some("cancelled"), _) => Ok(OrderOverride::Cancel),
            (Some(_), _) => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["cancelled".to_string()],
            }),
            (None, Some(at)) => Ok(OrderOverride::Reschedule(at)),
            (None, None) => Err(ValidationError::required("status or scheduledTime")),
        }
    }

    pub const fn order_status(&self) -> OrderStatus {
        match self {
            OrderOverride::Cancel => OrderStatus::Cancelled,
            OrderOverride::Reschedule(_) => OrderStatus::Rescheduled,
        }
    }

    pub const fn item_status(&self) -> OrderItemStatus {
        match self {
            OrderOverride::Cancel => OrderItemStatus::Cancelled,
            OrderOverride::Reschedule(_) => OrderItemStatus::Rescheduled,
        }
    }

    pub const fn delivery_status(&self) -> DeliveryStatus {
        match self {
            OrderOverride::Cancel => DeliveryStatus::Cancelled,
            OrderOverride::Reschedule(_) => DeliveryStatus::Rescheduled,
        }
    }

    /// `scheduledTime` stored on the order. Cancelling clears it.
    pub fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        match self {
            OrderOverride::Cancel => None,
            OrderOverride::Reschedule(at) => Some(*at),
        }
    }

    /// Whether the override also rewrites a delivery currently in `current`.
    pub const fn touches_delivery(&self, current: DeliveryStatus) -> bool {
        !current.is_terminal()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
