//! # Report Repository
//!
//! Read-only aggregates for the admin dashboard. Nothing here writes.

use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use forkful_core::report::{DishVolume, RoleCount};
use forkful_core::{OrderStatus, Role};

#[derive(Debug, FromRow)]
struct DishVolumeRow {
    restaurant_id: String,
    menu_id: String,
    quantity: i64,
}

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Ordered quantity per (restaurant, menu item) across all orders.
    pub async fn dish_volumes(&self) -> DbResult<Vec<DishVolume>> {
        let rows: Vec<DishVolumeRow> = sqlx::query_as(
            r#"
            SELECT restaurant_id, menu_id, SUM(quantity) AS quantity
            FROM order_items
            GROUP BY restaurant_id, menu_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(groups = rows.len(), "Aggregated dish volumes");

        Ok(rows
            .into_iter()
            .map(|row| DishVolume {
                restaurant_id: row.restaurant_id,
                menu_id: row.menu_id,
                quantity: row.quantity,
            })
            .collect())
    }

    /// Current restaurant name, if the restaurant still exists.
    pub async fn restaurant_name(&self, id: &str) -> DbResult<Option<String>> {
        let name = sqlx::query_scalar("SELECT name FROM restaurants WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }

    /// Current menu item name, if the item still exists.
    pub async fn menu_name(&self, id: &str) -> DbResult<Option<String>> {
        let name = sqlx::query_scalar("SELECT name FROM menus WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }

    /// Active users per role, one entry for every role (zero included).
    pub async fn active_users_by_role(&self) -> DbResult<Vec<RoleCount>> {
        let rows: Vec<(Role, i64)> = sqlx::query_as(
            "SELECT role, COUNT(*) FROM users WHERE is_active = 1 GROUP BY role",
        )
        .fetch_all(&self.pool)
        .await?;

        let counts: HashMap<Role, i64> = rows.into_iter().collect();

        Ok(Role::ALL
            .iter()
            .map(|role| RoleCount {
                role: *role,
                count: counts.get(role).copied().unwrap_or(0),
            })
            .collect())
    }

    pub async fn restaurant_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Orders currently placed, preparing or out for delivery.
    pub async fn active_order_count(&self) -> DbResult<i64> {
        let [a, b, c] = OrderStatus::ACTIVE;
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status IN (?1, ?2, ?3)")
            .bind(a)
            .bind(b)
            .bind(c)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{courier, customer, good_eats, place, test_db};
    use forkful_core::lifecycle::OrderOverride;

    #[tokio::test]
    async fn test_dish_volumes_group_by_dish() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        place(&db, &khyati.id, &restaurant.id, &[("Pasta Primavera", 2), ("Caesar Salad", 1)]).await;
        place(&db, &khyati.id, &restaurant.id, &[("Pasta Primavera", 3)]).await;

        let mut volumes = db.reports().dish_volumes().await.unwrap();
        volumes.sort_by(|a, b| b.quantity.cmp(&a.quantity));

        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].quantity, 5);
        assert_eq!(
            db.reports().menu_name(&volumes[0].menu_id).await.unwrap().as_deref(),
            Some("Pasta Primavera")
        );
    }

    #[tokio::test]
    async fn test_activity_counts() {
        let db = test_db().await;
        let (owner, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        courier(&db, "dana@example.com").await;
        db.users().deactivate(&owner.id).await.unwrap();

        let first = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;
        place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;
        db.orders()
            .apply_override(&first.order.id, OrderOverride::Cancel)
            .await
            .unwrap();

        let users = db.reports().active_users_by_role().await.unwrap();
        let count = |role: Role| users.iter().find(|c| c.role == role).unwrap().count;
        assert_eq!(users.len(), 4);
        assert_eq!(count(Role::Customer), 1);
        assert_eq!(count(Role::RestaurantOwner), 0);
        assert_eq!(count(Role::DeliveryPersonnel), 1);
        assert_eq!(count(Role::Administrator), 0);

        assert_eq!(db.reports().restaurant_count().await.unwrap(), 1);
        assert_eq!(db.reports().active_order_count().await.unwrap(), 1);
    }
}
