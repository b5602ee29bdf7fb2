//! Delivery service: the courier side of the delivery state machine.
//!
//! ```text
//! pending ──accept──► picked-up ──► en-route ──► delivered
//!                                     │             │
//!                                     ▼             ▼
//!                             order out-for-delivery  order delivered
//! ```
//!
//! Deliveries are pulled by couriers, never pushed: there is no assignment
//! algorithm, only the pending pool and a first-wins accept.

use serde::{Deserialize, Serialize};
use tracing::info;

use forkful_core::lifecycle::check_delivery_transition;
use forkful_core::validation::{validate_id, Page};
use forkful_core::{AvailableDelivery, CoreError, Delivery, DeliveryStatus, User};
use forkful_db::Database;

use crate::error::{ApiError, ApiResult};

/// Query of `GET /deliveries/available-deliveries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDeliveries {
    pub page: u32,
    pub limit: u32,
    pub deliveries: Vec<AvailableDelivery>,
}

/// Body of `PUT /deliveries/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Body of `PUT /deliveries/availability`.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

pub struct DeliveryService {
    db: Database,
}

impl DeliveryService {
    pub fn new(db: Database) -> Self {
        DeliveryService { db }
    }

    /// Pending deliveries offered to the courier. An unavailable courier is
    /// offered nothing.
    pub async fn available_deliveries(
        &self,
        personnel_id: &str,
        query: PageQuery,
    ) -> ApiResult<AvailableDeliveries> {
        let page = Page::new(query.page, query.limit)?;
        let courier = self.courier(personnel_id).await?;

        let deliveries = if courier.profile.courier_available() == Some(true) {
            self.db.deliveries().list_pending(page).await?
        } else {
            Vec::new()
        };

        Ok(AvailableDeliveries {
            page: page.page,
            limit: page.limit,
            deliveries,
        })
    }

    /// First courier wins; everyone after gets Conflict. A courier who has
    /// marked themselves unavailable cannot take new work.
    pub async fn accept(&self, personnel_id: &str, delivery_id: &str) -> ApiResult<Delivery> {
        validate_id(delivery_id)?;

        let courier = self.courier(personnel_id).await?;
        if courier.profile.courier_available() == Some(false) {
            return Err(CoreError::Forbidden("courier is not available for deliveries".to_string()).into());
        }

        Ok(self.db.deliveries().accept(delivery_id, personnel_id).await?)
    }

    /// trackDeliveryStatus: moves the courier's delivery to the table-allowed
    /// successor of its current status.
    ///
    /// `pending → picked-up` is an acceptance and goes through the same
    /// conditional write as [`DeliveryService::accept`].
    pub async fn update_status(
        &self,
        personnel_id: &str,
        delivery_id: &str,
        request: DeliveryStatusRequest,
    ) -> ApiResult<Delivery> {
        validate_id(delivery_id)?;
        let target: DeliveryStatus = request.status.parse()?;

        let delivery = self
            .db
            .deliveries()
            .get_by_id(delivery_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Delivery", delivery_id))?;

        check_delivery_transition(delivery.status, target)?;

        if delivery.status == DeliveryStatus::Pending {
            return self.accept(personnel_id, delivery_id).await;
        }

        if delivery.delivery_personnel_id.as_deref() != Some(personnel_id) {
            return Err(CoreError::Forbidden("delivery is assigned to another courier".to_string()).into());
        }

        Ok(self
            .db
            .deliveries()
            .advance(delivery_id, personnel_id, delivery.status, target)
            .await?)
    }

    /// Flips the courier's availability flag and returns the updated account.
    pub async fn set_availability(&self, personnel_id: &str, available: bool) -> ApiResult<User> {
        self.db
            .users()
            .set_courier_availability(personnel_id, available)
            .await?;
        info!(personnel_id = %personnel_id, available, "Courier availability changed");
        self.courier(personnel_id).await
    }

    async fn courier(&self, personnel_id: &str) -> ApiResult<User> {
        self.db
            .users()
            .get_by_id(personnel_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Delivery personnel", personnel_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::order::{ManageOrderRequest, OrderStatusRequest, PlaceOrderRequest};
    use crate::services::testing::{good_eats, test_state, user};
    use crate::state::AppState;
    use forkful_core::{OrderLineRequest, OrderStatus, PlacedOrder, Role};

    async fn placed(state: &AppState) -> PlacedOrder {
        good_eats(state).await;
        let customer = user(state, "k@example.com", Role::Customer).await;
        state
            .orders()
            .place_order(
                &customer.id,
                PlaceOrderRequest {
                    restaurant_name: "Good Eats".to_string(),
                    items: vec![OrderLineRequest {
                        menu_name: "Caesar Salad".to_string(),
                        quantity: 1,
                    }],
                },
            )
            .await
            .unwrap()
    }

    fn status(value: &str) -> DeliveryStatusRequest {
        DeliveryStatusRequest {
            status: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_delivery_run_updates_order() {
        let state = test_state().await;
        let order = placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;
        let deliveries = state.deliveries();

        let accepted = deliveries.accept(&dana.id, &order.delivery_id).await.unwrap();
        assert_eq!(accepted.status, DeliveryStatus::PickedUp);
        assert_eq!(accepted.delivery_personnel_id.as_deref(), Some(dana.id.as_str()));

        deliveries
            .update_status(&dana.id, &order.delivery_id, status("en-route"))
            .await
            .unwrap();
        let row = state.db.orders().get_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(row.status, OrderStatus::OutForDelivery);

        let done = deliveries
            .update_status(&dana.id, &order.delivery_id, status("delivered"))
            .await
            .unwrap();
        assert_eq!(done.status, DeliveryStatus::Delivered);
        let row = state.db.orders().get_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(row.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_skipping_a_state_names_both() {
        let state = test_state().await;
        let order = placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;

        let err = state
            .deliveries()
            .update_status(&dana.id, &order.delivery_id, status("delivered"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert!(err.message.contains("pending"));
        assert!(err.message.contains("delivered"));
    }

    #[tokio::test]
    async fn test_second_accept_conflicts() {
        let state = test_state().await;
        let order = placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;
        let eli = user(&state, "eli@example.com", Role::DeliveryPersonnel).await;
        let deliveries = state.deliveries();

        deliveries.accept(&dana.id, &order.delivery_id).await.unwrap();
        let err = deliveries.accept(&eli.id, &order.delivery_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = deliveries
            .update_status(&eli.id, &order.delivery_id, status("en-route"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = deliveries
            .accept(&dana.id, "6f1c2b1e-0000-4000-8000-000000000000")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_status_route_accepts_pending() {
        let state = test_state().await;
        let order = placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;

        let delivery = state
            .deliveries()
            .update_status(&dana.id, &order.delivery_id, status("picked up"))
            .await
            .unwrap();
        assert_eq!(delivery.status, DeliveryStatus::PickedUp);
        assert_eq!(delivery.delivery_personnel_id.as_deref(), Some(dana.id.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_status_is_invalid_input() {
        let state = test_state().await;
        let order = placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;

        let err = state
            .deliveries()
            .update_status(&dana.id, &order.delivery_id, status("teleported"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_unavailable_courier_sees_nothing() {
        let state = test_state().await;
        placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;
        let deliveries = state.deliveries();

        let offered = deliveries
            .available_deliveries(&dana.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(offered.deliveries.len(), 1);
        assert_eq!(offered.limit, 10);
        assert_eq!(offered.deliveries[0].restaurant_name.as_deref(), Some("Good Eats"));

        let updated = deliveries.set_availability(&dana.id, false).await.unwrap();
        assert_eq!(updated.profile.courier_available(), Some(false));

        let offered = deliveries
            .available_deliveries(&dana.id, PageQuery::default())
            .await
            .unwrap();
        assert!(offered.deliveries.is_empty());

        let err = deliveries
            .available_deliveries(
                &dana.id,
                PageQuery {
                    page: Some(1),
                    limit: Some(500),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_unavailable_courier_cannot_accept() {
        let state = test_state().await;
        let order = placed(&state).await;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;
        let deliveries = state.deliveries();

        deliveries.set_availability(&dana.id, false).await.unwrap();

        let err = deliveries.accept(&dana.id, &order.delivery_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        let err = deliveries
            .update_status(&dana.id, &order.delivery_id, status("picked-up"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let row = state.db.deliveries().get_by_id(&order.delivery_id).await.unwrap().unwrap();
        assert_eq!(row.status, DeliveryStatus::Pending);

        deliveries.set_availability(&dana.id, true).await.unwrap();
        let accepted = deliveries.accept(&dana.id, &order.delivery_id).await.unwrap();
        assert_eq!(accepted.status, DeliveryStatus::PickedUp);
    }

    #[tokio::test]
    async fn test_rescheduled_order_is_delivered_after_restaurant_resumes() {
        let state = test_state().await;
        let order = placed(&state).await;
        let owner_id = state
            .db
            .users()
            .get_by_email("owner@example.com")
            .await
            .unwrap()
            .unwrap()
            .id;
        let dana = user(&state, "dana@example.com", Role::DeliveryPersonnel).await;
        let deliveries = state.deliveries();
        let orders = state.orders();

        // Picked up, then pulled back by an administrator
        deliveries.accept(&dana.id, &order.delivery_id).await.unwrap();
        orders
            .manage_order(
                &order.order_id,
                ManageOrderRequest {
                    status: None,
                    scheduled_time: Some(chrono::Utc::now() + chrono::Duration::hours(2)),
                },
            )
            .await
            .unwrap();
        let row = state.db.deliveries().get_by_id(&order.delivery_id).await.unwrap().unwrap();
        assert_eq!(row.status, DeliveryStatus::Rescheduled);
        assert!(deliveries
            .available_deliveries(&dana.id, PageQuery::default())
            .await
            .unwrap()
            .deliveries
            .is_empty());

        for next in [OrderStatus::Preparing, OrderStatus::Ready] {
            orders
                .update_order_status(
                    &owner_id,
                    OrderStatusRequest {
                        order_id: order.order_id.clone(),
                        status: next,
                    },
                )
                .await
                .unwrap();
        }

        let row = state.db.deliveries().get_by_id(&order.delivery_id).await.unwrap().unwrap();
        assert_eq!(row.status, DeliveryStatus::Pending);
        assert!(row.delivery_personnel_id.is_none());

        let offered = deliveries
            .available_deliveries(&dana.id, PageQuery::default())
            .await
            .unwrap();
        assert_eq!(offered.deliveries.len(), 1);

        deliveries.accept(&dana.id, &order.delivery_id).await.unwrap();
        deliveries
            .update_status(&dana.id, &order.delivery_id, status("en-route"))
            .await
            .unwrap();
        let done = deliveries
            .update_status(&dana.id, &order.delivery_id, status("delivered"))
            .await
            .unwrap();
        assert_eq!(done.status, DeliveryStatus::Delivered);

        let row = state.db.orders().get_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(row.status, OrderStatus::Delivered);
    }
}
