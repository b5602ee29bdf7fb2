//! Report service: admin dashboard aggregates.

use tracing::debug;

use forkful_core::report::{rank_restaurants, ActivitySnapshot, PopularRestaurant};
use forkful_core::{POPULAR_REPORT_LIMIT, UNKNOWN_LABEL};
use forkful_db::Database;

use crate::error::ApiResult;

pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Top restaurants by ordered quantity, each with its best-selling dish.
    ///
    /// Names are resolved against the current catalog; a restaurant or dish
    /// that no longer exists shows as "Unknown".
    pub async fn popular_restaurants(&self) -> ApiResult<Vec<PopularRestaurant>> {
        let reports = self.db.reports();
        let volumes = reports.dish_volumes().await?;
        let ranked = rank_restaurants(&volumes, POPULAR_REPORT_LIMIT);

        debug!(dishes = volumes.len(), ranked = ranked.len(), "Ranked restaurants");

        let mut entries = Vec::with_capacity(ranked.len());
        for entry in ranked {
            let restaurant_name = reports
                .restaurant_name(&entry.restaurant_id)
                .await?
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            let top_dish = reports
                .menu_name(&entry.top_menu_id)
                .await?
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

            entries.push(PopularRestaurant {
                restaurant_id: entry.restaurant_id,
                restaurant_name,
                top_dish,
                top_dish_quantity: entry.top_menu_quantity,
                total_quantity: entry.total_quantity,
            });
        }

        Ok(entries)
    }

    pub async fn activity(&self) -> ApiResult<ActivitySnapshot> {
        let reports = self.db.reports();
        Ok(ActivitySnapshot {
            active_users: reports.active_users_by_role().await?,
            total_restaurants: reports.restaurant_count().await?,
            active_orders: reports.active_order_count().await?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::order::PlaceOrderRequest;
    use crate::services::testing::{good_eats, test_state, user};
    use forkful_core::{OrderLineRequest, Role};

    #[tokio::test]
    async fn test_popular_report_resolves_names() {
        let state = test_state().await;
        let owner = good_eats(&state).await;
        let customer = user(&state, "k@example.com", Role::Customer).await;

        for (dish, quantity) in [("Pasta Primavera", 2), ("Caesar Salad", 3), ("Pasta Primavera", 2)] {
            state
                .orders()
                .place_order(
                    &customer.id,
                    PlaceOrderRequest {
                        restaurant_name: "Good Eats".to_string(),
                        items: vec![OrderLineRequest {
                            menu_name: dish.to_string(),
                            quantity,
                        }],
                    },
                )
                .await
                .unwrap();
        }

        let report = state.reports().popular_restaurants().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].restaurant_name, "Good Eats");
        assert_eq!(report[0].top_dish, "Pasta Primavera");
        assert_eq!(report[0].top_dish_quantity, 4);
        assert_eq!(report[0].total_quantity, 7);

        // A removed dish degrades to the sentinel instead of failing the report.
        let restaurant = state.catalog().owned_restaurant(&owner.id).await.unwrap();
        state
            .catalog()
            .remove_menu_item(&owner.id, &restaurant.menu_item_ids[0])
            .await
            .unwrap();

        let report = state.reports().popular_restaurants().await.unwrap();
        assert_eq!(report[0].top_dish, UNKNOWN_LABEL);
    }

    #[tokio::test]
    async fn test_activity_snapshot() {
        let state = test_state().await;
        good_eats(&state).await;
        user(&state, "k@example.com", Role::Customer).await;

        let snapshot = state.reports().activity().await.unwrap();
        assert_eq!(snapshot.total_restaurants, 1);
        assert_eq!(snapshot.active_orders, 0);
        let owners = snapshot
            .active_users
            .iter()
            .find(|c| c.role == Role::RestaurantOwner)
            .unwrap();
        assert_eq!(owners.count, 1);
    }
}
