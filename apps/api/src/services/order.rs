//! Order service: placement and tracking for customers, status handling for
//! owners, overrides for administrators.
//!
//! ## Placement
//! ```text
//! placeOrder(customer, "Good Eats", [Pasta Primavera ×2, Caesar Salad ×1])
//!      │
//!      ├── restaurant by name ────────── none ──► NotFound
//!      ├── price_lines(menu) ─────── unmatched ──► InvalidItems
//!      │
//!      ▼
//! db.orders().place   ── one transaction ──
//!      │   orders       (placed)
//!      │   order_items  (ordered, frozen prices)
//!      │   deliveries   (pending, no courier)
//!      ▼
//! PlacedOrder { orderId, deliveryId, items, totalPrice = 34.97 }
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use forkful_core::lifecycle::{check_owner_transition, OrderOverride};
use forkful_core::pricing::{order_total, price_lines};
use forkful_core::validation::{validate_id, validate_name};
use forkful_core::{CoreError, Order, OrderLineRequest, OrderStatus, OrderView, PlacedOrder};
use forkful_db::{Database, NewOrder};

use crate::error::{ApiError, ApiResult};
use crate::services::catalog::CatalogService;

/// Body of `POST /customers/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default, alias = "restaurant_name")]
    pub restaurant_name: String,
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

/// Body of `PUT /restaurants/orders/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusRequest {
    #[serde(alias = "order_id")]
    pub order_id: String,
    pub status: OrderStatus,
}

/// Body of `PUT /admin/orders/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageOrderRequest {
    pub status: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

pub struct OrderService {
    db: Database,
    delivery_minutes: i64,
}

impl OrderService {
    pub fn new(db: Database, delivery_minutes: i64) -> Self {
        OrderService {
            db,
            delivery_minutes,
        }
    }

    // =========================================================================
    // Customer
    // =========================================================================

    pub async fn place_order(
        &self,
        customer_id: &str,
        request: PlaceOrderRequest,
    ) -> ApiResult<PlacedOrder> {
        let restaurant_name = validate_name("restaurantName", &request.restaurant_name)?;
        let restaurant = self
            .db
            .restaurants()
            .find_by_name(&restaurant_name)
            .await?
            .ok_or_else(|| ApiError::not_found("Restaurant", &restaurant_name))?;

        let menu = self.db.menus().list_for_restaurant(&restaurant.id).await?;
        let lines = price_lines(&request.items, &menu).map_err(|e| {
            if let CoreError::InvalidItems { names } = &e {
                warn!(restaurant_id = %restaurant.id, ?names, "Order rejected: invalid items");
            }
            e
        })?;
        let total_price = order_total(&lines)?;

        let records = self
            .db
            .orders()
            .place(&NewOrder {
                customer_id: customer_id.to_string(),
                restaurant_id: restaurant.id.clone(),
                lines,
                delivery_minutes: self.delivery_minutes,
            })
            .await?;

        let view = self.db.orders().view(&records.order).await?;

        info!(
            order_id = %records.order.id,
            delivery_id = %records.delivery.id,
            total = %total_price,
            "Order placed"
        );

        Ok(PlacedOrder {
            order_id: records.order.id,
            delivery_id: records.delivery.id,
            status: records.order.status,
            items: view.items,
            total_price,
        })
    }

    /// One of the customer's own orders. Malformed, missing and foreign ids
    /// all read as NotFound.
    pub async fn track_order(&self, customer_id: &str, order_id: &str) -> ApiResult<OrderView> {
        let not_found = || ApiError::not_found("Order", order_id);

        validate_id(order_id).map_err(|_| not_found())?;
        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .filter(|order| order.customer_id == customer_id)
            .ok_or_else(not_found)?;

        Ok(self.db.orders().view(&order).await?)
    }

    /// Every order of the customer, in placement order.
    pub async fn order_history(&self, customer_id: &str) -> ApiResult<Vec<OrderView>> {
        let orders = self.db.orders().list_for_customer(customer_id).await?;
        Ok(self.db.orders().views(&orders).await?)
    }

    // =========================================================================
    // Restaurant owner
    // =========================================================================

    pub async fn restaurant_orders(&self, owner_id: &str) -> ApiResult<Vec<OrderView>> {
        let restaurant = CatalogService::new(self.db.clone()).owned_restaurant(owner_id).await?;
        let orders = self.db.orders().list_for_restaurant(&restaurant.id).await?;
        Ok(self.db.orders().views(&orders).await?)
    }

    /// Moves one of the owner's orders forward (`preparing`, then `ready`).
    pub async fn update_order_status(
        &self,
        owner_id: &str,
        request: OrderStatusRequest,
    ) -> ApiResult<Order> {
        validate_id(&request.order_id)?;
        let restaurant = CatalogService::new(self.db.clone()).owned_restaurant(owner_id).await?;

        let order = self
            .db
            .orders()
            .get_by_id(&request.order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", &request.order_id))?;

        if order.restaurant_id != restaurant.id {
            warn!(order_id = %order.id, owner_id = %owner_id, "Owner touched a foreign order");
            return Err(CoreError::Forbidden("order belongs to another restaurant".to_string()).into());
        }

        let item_status = check_owner_transition(order.status, request.status)?;

        Ok(self
            .db
            .orders()
            .update_status(&order.id, order.status, request.status, item_status)
            .await?)
    }

    // =========================================================================
    // Administrator
    // =========================================================================

    pub async fn all_orders(&self) -> ApiResult<Vec<OrderView>> {
        let orders = self.db.orders().list_all().await?;
        Ok(self.db.orders().views(&orders).await?)
    }

    /// Cancels or reschedules an order. `status: "cancelled"` wins over a
    /// scheduled time sent alongside it.
    pub async fn manage_order(&self, order_id: &str, request: ManageOrderRequest) -> ApiResult<Order> {
        let order_id = order_id.trim();
        validate_id(order_id)?;
        let action = OrderOverride::from_request(request.status.as_deref(), request.scheduled_time)?;

        let order = self.db.orders().apply_override(order_id, action).await?;
        info!(order_id = %order_id, status = %order.status, "Order overridden by administrator");
        Ok(order)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::testing::{good_eats, test_state, user};
    use crate::state::AppState;
    use forkful_core::{DeliveryStatus, OrderItemStatus, Role, User};

    fn line(name: &str, quantity: i64) -> OrderLineRequest {
        OrderLineRequest {
            menu_name: name.to_string(),
            quantity,
        }
    }

    async fn setup() -> (AppState, User, User) {
        let state = test_state().await;
        let owner = good_eats(&state).await;
        let customer = user(&state, "k@example.com", Role::Customer).await;
        (state, owner, customer)
    }

    async fn place(state: &AppState, customer: &User) -> PlacedOrder {
        state
            .orders()
            .place_order(
                &customer.id,
                PlaceOrderRequest {
                    restaurant_name: "Good Eats".to_string(),
                    items: vec![line("Pasta Primavera", 2), line("Caesar Salad", 1)],
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_place_order_prices_and_creates_delivery() {
        let (state, _, customer) = setup().await;
        let placed = place(&state, &customer).await;

        assert_eq!(placed.status, OrderStatus::Placed);
        assert_eq!(placed.total_price.to_string(), "34.97");
        let prices: Vec<String> = placed.items.iter().map(|i| i.price.to_string()).collect();
        assert_eq!(prices, vec!["25.98", "8.99"]);

        let delivery = state.db.deliveries().get_by_order(&placed.order_id).await.unwrap().unwrap();
        assert_eq!(delivery.id, placed.delivery_id);
        assert_eq!(delivery.status, DeliveryStatus::Pending);
        assert!(delivery.delivery_personnel_id.is_none());
        assert_eq!(delivery.delivery_time, 30);
    }

    #[tokio::test]
    async fn test_place_order_rejections() {
        let (state, _, customer) = setup().await;
        let orders = state.orders();

        let err = orders
            .place_order(
                &customer.id,
                PlaceOrderRequest {
                    restaurant_name: "Bad Eats".to_string(),
                    items: vec![line("Pasta Primavera", 1)],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = orders
            .place_order(
                &customer.id,
                PlaceOrderRequest {
                    restaurant_name: "Good Eats".to_string(),
                    items: vec![line("Pasta Primavera", 1), line("Tiramisu", 1)],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidItems);
        assert!(err.message.contains("Tiramisu"));

        assert!(orders.order_history(&customer.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_most_expensive_cart_is_priced_exactly() {
        let (state, owner, customer) = setup().await;
        state
            .catalog()
            .manage_menu(
                &owner.id,
                crate::services::catalog::MenuRequest {
                    name: "Gold Leaf Platter".to_string(),
                    description: None,
                    price: serde_json::json!("100000.00"),
                    availability: serde_json::json!(true),
                },
            )
            .await
            .unwrap();

        let placed = state
            .orders()
            .place_order(
                &customer.id,
                PlaceOrderRequest {
                    restaurant_name: "Good Eats".to_string(),
                    items: vec![line("Gold Leaf Platter", 999), line("Gold Leaf Platter", 999)],
                },
            )
            .await
            .unwrap();
        assert_eq!(placed.total_price.to_string(), "199800000.00");
        assert_eq!(placed.items[0].price.cents(), 9_990_000_000);
    }

    #[tokio::test]
    async fn test_track_order_matches_placement() {
        let (state, _, customer) = setup().await;
        let placed = place(&state, &customer).await;
        let orders = state.orders();

        let view = orders.track_order(&customer.id, &placed.order_id).await.unwrap();
        assert_eq!(view.status, OrderStatus::Placed);
        assert!(view.scheduled_time.is_none());
        assert_eq!(view.total_price, placed.total_price);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].price, placed.items[0].price);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("scheduledTime").is_none());

        let err = orders.track_order(&customer.id, "garbage").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let stranger = user(&state, "s@example.com", Role::Customer).await;
        let err = orders.track_order(&stranger.id, &placed.order_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_owner_moves_order_forward_only() {
        let (state, owner, customer) = setup().await;
        let placed = place(&state, &customer).await;
        let orders = state.orders();
        let request = |status| OrderStatusRequest {
            order_id: placed.order_id.clone(),
            status,
        };

        let err = orders
            .update_order_status(&owner.id, request(OrderStatus::Ready))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        orders
            .update_order_status(&owner.id, request(OrderStatus::Preparing))
            .await
            .unwrap();
        let order = orders
            .update_order_status(&owner.id, request(OrderStatus::Ready))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Ready);

        let items = state.db.orders().items(&order.id).await.unwrap();
        assert!(items.iter().all(|i| i.status == OrderItemStatus::Completed));

        let listed = orders.restaurant_orders(&owner.id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_owner_cannot_touch_foreign_order() {
        let (state, _, customer) = setup().await;
        let placed = place(&state, &customer).await;

        let rival = user(&state, "rival@example.com", Role::RestaurantOwner).await;
        state
            .catalog()
            .save_restaurant(
                &rival.id,
                crate::services::catalog::RestaurantRequest {
                    name: "Rival".to_string(),
                    address: "2 Side St".to_string(),
                    hours_of_operation: "24/7".to_string(),
                },
            )
            .await
            .unwrap();

        let err = state
            .orders()
            .update_order_status(
                &rival.id,
                OrderStatusRequest {
                    order_id: placed.order_id,
                    status: OrderStatus::Preparing,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_manage_order_cancel_wins() {
        let (state, _, customer) = setup().await;
        let placed = place(&state, &customer).await;
        let orders = state.orders();

        let order = orders
            .manage_order(
                &placed.order_id,
                ManageOrderRequest {
                    status: Some("cancelled".to_string()),
                    scheduled_time: Some(Utc::now()),
                },
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.scheduled_time.is_none());

        let delivery = state.db.deliveries().get_by_id(&placed.delivery_id).await.unwrap().unwrap();
        assert_eq!(delivery.status, DeliveryStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_manage_order_reschedule_and_errors() {
        let (state, _, customer) = setup().await;
        let placed = place(&state, &customer).await;
        let orders = state.orders();
        let at = Utc::now() + chrono::Duration::hours(2);

        let order = orders
            .manage_order(
                &placed.order_id,
                ManageOrderRequest {
                    status: None,
                    scheduled_time: Some(at),
                },
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Rescheduled);
        assert!(order.scheduled_time.is_some());

        let err = orders
            .manage_order(&placed.order_id, ManageOrderRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = orders
            .manage_order("not-a-uuid", ManageOrderRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidId);

        assert_eq!(orders.all_orders().await.unwrap().len(), 1);
    }
}
