//! # Domain Types
//!
//! Core domain types used throughout Forkful.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │   Restaurant    │   │    MenuItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  owner_id       │◄──│  restaurant_id  │       │
//! │  │  email (unique) │   │  name           │   │  name (unique   │       │
//! │  │  profile (enum) │   │  menu_item_ids  │   │   per rest.)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Order      │   │   OrderItem     │   │    Delivery     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer_id    │──►│  order_id       │   │  order_id (1:1) │       │
//! │  │  restaurant_id  │   │  menu_id        │   │  personnel_id?  │       │
//! │  │  status         │   │  price (frozen) │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderItem.price` and `OrderItem.menu_name` are copied from the menu at the
//! moment the order is placed. Later menu edits never touch placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// The closed set of platform roles.
///
/// Every role-gated operation matches on this enum exhaustively, so adding a
/// role is a compile error everywhere a decision must be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
#[ts(export)]
pub enum Role {
    Customer,
    #[serde(alias = "Restaurant Owner")]
    RestaurantOwner,
    #[serde(alias = "Delivery Personnel")]
    DeliveryPersonnel,
    Administrator,
}

impl Role {
    /// All roles, in reporting order.
    pub const ALL: [Role; 4] = [
        Role::Customer,
        Role::RestaurantOwner,
        Role::DeliveryPersonnel,
        Role::Administrator,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::RestaurantOwner => "RestaurantOwner",
            Role::DeliveryPersonnel => "DeliveryPersonnel",
            Role::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Customer" => Ok(Role::Customer),
            "RestaurantOwner" | "Restaurant Owner" => Ok(Role::RestaurantOwner),
            "DeliveryPersonnel" | "Delivery Personnel" => Ok(Role::DeliveryPersonnel),
            "Administrator" => Ok(Role::Administrator),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Profile (role-dependent)
// =============================================================================

/// Profile of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct CustomerProfile {
    pub name: String,
    #[serde(default)]
    pub contact_details: Option<String>,
    /// Default delivery address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Profile of a restaurant owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct OwnerProfile {
    pub name: String,
    #[serde(default)]
    pub contact_details: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Profile of a courier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct CourierProfile {
    pub name: String,
    #[serde(default)]
    pub contact_details: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    /// Whether the courier is currently offered pending deliveries.
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Profile of an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct AdminProfile {
    pub name: String,
    #[serde(default)]
    pub contact_details: Option<String>,
}

/// Role-keyed profile.
///
/// The variant *is* the role: a customer profile cannot carry a vehicle type
/// and a courier profile cannot be attached to an administrator.
///
/// Serialized without a tag (the owning [`User`] carries `role`); parsed with
/// [`Profile::from_json`], which needs the role to pick the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Profile {
    Customer(CustomerProfile),
    RestaurantOwner(OwnerProfile),
    DeliveryPersonnel(CourierProfile),
    Administrator(AdminProfile),
}

impl Profile {
    /// Parses a profile JSON object as the variant belonging to `role`.
    ///
    /// Unknown fields are rejected, so `vehicleType` on a customer fails here.
    pub fn from_json(role: Role, value: serde_json::Value) -> Result<Profile, ValidationError> {
        let invalid = |e: serde_json::Error| ValidationError::invalid_format("profile", e.to_string());

        let profile = match role {
            Role::Customer => Profile::Customer(serde_json::from_value(value).map_err(invalid)?),
            Role::RestaurantOwner => {
                Profile::RestaurantOwner(serde_json::from_value(value).map_err(invalid)?)
            }
            Role::DeliveryPersonnel => {
                Profile::DeliveryPersonnel(serde_json::from_value(value).map_err(invalid)?)
            }
            Role::Administrator => {
                Profile::Administrator(serde_json::from_value(value).map_err(invalid)?)
            }
        };

        if profile.name().trim().is_empty() {
            return Err(ValidationError::required("profile.name"));
        }

        Ok(profile)
    }

    /// The role this profile belongs to.
    pub const fn role(&self) -> Role {
        match self {
            Profile::Customer(_) => Role::Customer,
            Profile::RestaurantOwner(_) => Role::RestaurantOwner,
            Profile::DeliveryPersonnel(_) => Role::DeliveryPersonnel,
            Profile::Administrator(_) => Role::Administrator,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::Customer(p) => &p.name,
            Profile::RestaurantOwner(p) => &p.name,
            Profile::DeliveryPersonnel(p) => &p.name,
            Profile::Administrator(p) => &p.name,
        }
    }

    /// Courier availability. `None` for every other role.
    pub fn courier_available(&self) -> Option<bool> {
        match self {
            Profile::DeliveryPersonnel(p) => Some(p.available),
            Profile::Customer(_) | Profile::RestaurantOwner(_) | Profile::Administrator(_) => None,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A platform account. Never hard-deleted; deactivation flips `is_active`.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub profile: Profile,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user (registration or admin creation).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
}

/// Partial update applied by an administrator.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub profile: Option<Profile>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Restaurant & Menu
// =============================================================================

/// A restaurant, owned by exactly one restaurant owner.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Restaurant {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub hours_of_operation: String,
    /// Menu ids in insertion order.
    pub menu_item_ids: Vec<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Editable restaurant fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantDetails {
    pub name: String,
    pub address: String,
    #[serde(alias = "hours_of_operation")]
    pub hours_of_operation: String,
}

/// A sellable dish belonging to one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub availability: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for the menu upsert keyed by (restaurant, name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemInput {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub availability: bool,
}

// =============================================================================
// Order Status
// =============================================================================

/// Status of an order.
///
/// ```text
/// placed ──► preparing ──► ready ──► out-for-delivery ──► delivered
///    │            ▲
///    └─► rescheduled        (cancelled / rescheduled: admin overrides)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum OrderStatus {
    Placed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
    Rescheduled,
}

impl OrderStatus {
    /// Statuses counted as "active" on the activity dashboard.
    pub const ACTIVE: [OrderStatus; 3] = [
        OrderStatus::Placed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rescheduled => "rescheduled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Placed
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim() {
            "placed" => OrderStatus::Placed,
            "preparing" => OrderStatus::Preparing,
            "ready" => OrderStatus::Ready,
            "out-for-delivery" => OrderStatus::OutForDelivery,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            "rescheduled" => OrderStatus::Rescheduled,
            _ => {
                return Err(ValidationError::NotAllowed {
                    field: "status".to_string(),
                    allowed: [
                        "placed",
                        "preparing",
                        "ready",
                        "out-for-delivery",
                        "delivered",
                        "cancelled",
                        "rescheduled",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                })
            }
        };
        Ok(status)
    }
}

/// Status of a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderItemStatus {
    Ordered,
    Preparing,
    Completed,
    Cancelled,
    Rescheduled,
}

impl Default for OrderItemStatus {
    fn default() -> Self {
        OrderItemStatus::Ordered
    }
}

// =============================================================================
// Delivery Status
// =============================================================================

/// Status of a delivery.
///
/// Personnel drive `pending → picked-up → en-route → delivered`; the two
/// side exits are administrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum DeliveryStatus {
    Pending,
    #[serde(alias = "picked up")]
    PickedUp,
    #[serde(alias = "en route")]
    EnRoute,
    Delivered,
    Rescheduled,
    Cancelled,
}

impl DeliveryStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::PickedUp => "picked-up",
            DeliveryStatus::EnRoute => "en-route",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Rescheduled => "rescheduled",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Pending
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = ValidationError;

    /// Accepts the canonical kebab-case names and the spaced legacy spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim() {
            "pending" => DeliveryStatus::Pending,
            "picked-up" | "picked up" => DeliveryStatus::PickedUp,
            "en-route" | "en route" => DeliveryStatus::EnRoute,
            "delivered" => DeliveryStatus::Delivered,
            "rescheduled" => DeliveryStatus::Rescheduled,
            "cancelled" => DeliveryStatus::Cancelled,
            _ => {
                return Err(ValidationError::NotAllowed {
                    field: "status".to_string(),
                    allowed: [
                        "pending",
                        "picked-up",
                        "en-route",
                        "delivered",
                        "rescheduled",
                        "cancelled",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                })
            }
        };
        Ok(status)
    }
}

// =============================================================================
// Order, OrderItem, Delivery
// =============================================================================

/// A customer's order from one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    /// Order item ids in line order.
    pub order_item_ids: Vec<String>,
    pub status: OrderStatus,
    /// Set only while `status == Rescheduled`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One line of an order with its frozen price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub menu_id: String,
    /// Menu name at time of order (frozen).
    pub menu_name: String,
    pub quantity: i64,
    /// Unit price × quantity at time of order (frozen).
    pub price: Money,
    pub status: OrderItemStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Fulfillment record of an order (1:1).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Delivery {
    pub id: String,
    pub order_id: String,
    /// `None` until a courier accepts the delivery.
    pub delivery_personnel_id: Option<String>,
    pub status: DeliveryStatus,
    /// Estimated delivery time in minutes.
    pub delivery_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub rescheduled_time: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One requested line of a cart: a menu item name and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineRequest {
    #[serde(alias = "menu_name")]
    pub menu_name: String,
    pub quantity: i64,
}

// =============================================================================
// Read Models
// =============================================================================

/// Restaurant fields shown next to an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantSummary {
    pub id: String,
    pub name: String,
    pub address: String,
}

/// One line of an order view with its computed total.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineView {
    pub order_item_id: String,
    pub menu_id: String,
    pub menu_name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: Money,
    pub status: OrderItemStatus,
}

/// Delivery fields shown next to an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliverySummary {
    pub id: String,
    pub status: DeliveryStatus,
    pub delivery_personnel_id: Option<String>,
    pub estimated_minutes: i64,
}

/// A fully populated order (restaurant, lines, delivery).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderView {
    pub order_id: String,
    pub customer_id: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// `None` if the restaurant record no longer resolves.
    pub restaurant: Option<RestaurantSummary>,
    pub items: Vec<OrderLineView>,
    pub total_price: Money,
    pub delivery: Option<DeliverySummary>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Result of placing an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlacedOrder {
    pub order_id: String,
    pub delivery_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderLineView>,
    pub total_price: Money,
}

/// A pending delivery as offered to couriers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AvailableDelivery {
    pub delivery_id: String,
    pub order_id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub restaurant_name: Option<String>,
    pub restaurant_address: Option<String>,
    pub estimated_minutes: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
