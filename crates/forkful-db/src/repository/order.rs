//! # Order Repository
//!
//! Orders, their items, and every write that must keep Order, OrderItem and
//! Delivery consistent.
//!
//! ## Order Placement (one transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   ├── INSERT orders        (status = placed, scheduled_time = NULL)     │
//! │   ├── INSERT order_items   (one per priced line, price frozen)          │
//! │   └── INSERT deliveries    (status = pending, personnel = NULL)         │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls back all three: an order never exists without its    │
//! │  items or its delivery.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Writes
//! - Owner updates are compare-and-set on the status the caller observed.
//! - Admin overrides rewrite order, items and (unless finished) the delivery
//!   together.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::delivery::{DeliveryRow, SELECT_DELIVERY};
use forkful_core::lifecycle::{reopens_delivery, OrderOverride};
use forkful_core::pricing::PricedLine;
use forkful_core::{
    Delivery, DeliveryStatus, DeliverySummary, Money, Order, OrderItem, OrderItemStatus,
    OrderLineView, OrderStatus, OrderView, RestaurantSummary,
};

// =============================================================================
// Inputs & Outputs
// =============================================================================

/// Everything needed to place an order. Lines are already priced.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub restaurant_id: String,
    pub lines: Vec<PricedLine>,
    /// Estimated delivery time for the new delivery, in minutes.
    pub delivery_minutes: i64,
}

/// Records written by [`OrderRepository::place`].
#[derive(Debug, Clone)]
pub struct PlacedRecords {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub delivery: Delivery,
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    customer_id: String,
    restaurant_id: String,
    status: OrderStatus,
    scheduled_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, order_item_ids: Vec<String>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            restaurant_id: self.restaurant_id,
            order_item_ids,
            status: self.status,
            scheduled_time: self.scheduled_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    customer_id: String,
    restaurant_id: String,
    menu_id: String,
    menu_name: String,
    quantity: i64,
    price_cents: i64,
    status: OrderItemStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            customer_id: row.customer_id,
            restaurant_id: row.restaurant_id,
            menu_id: row.menu_id,
            menu_name: row.menu_name,
            quantity: row.quantity,
            price: Money::from_cents(row.price_cents),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One line of an order joined with the live menu (if it still exists).
#[derive(Debug, FromRow)]
struct OrderLineRow {
    id: String,
    menu_id: String,
    menu_name: String,
    description: Option<String>,
    quantity: i64,
    price_cents: i64,
    status: OrderItemStatus,
}

impl From<OrderLineRow> for OrderLineView {
    fn from(row: OrderLineRow) -> Self {
        OrderLineView {
            order_item_id: row.id,
            menu_id: row.menu_id,
            menu_name: row.menu_name,
            description: row.description,
            quantity: row.quantity,
            price: Money::from_cents(row.price_cents),
            status: row.status,
        }
    }
}

#[derive(Debug, FromRow)]
struct DeliverySummaryRow {
    id: String,
    status: DeliveryStatus,
    delivery_personnel_id: Option<String>,
    delivery_time: i64,
}

const SELECT_ORDER: &str = r#"
    SELECT id, customer_id, restaurant_id, status, scheduled_time, created_at, updated_at
    FROM orders
"#;

const SELECT_ORDER_ITEM: &str = r#"
    SELECT id, order_id, customer_id, restaurant_id, menu_id, menu_name,
           quantity, price_cents, status, created_at, updated_at
    FROM order_items
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Writes an order, its items and its pending delivery in one transaction.
    pub async fn place(&self, new_order: &NewOrder) -> DbResult<PlacedRecords> {
        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();

        debug!(
            order_id = %order_id,
            restaurant_id = %new_order.restaurant_id,
            lines = new_order.lines.len(),
            "Placing order"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, restaurant_id, status, scheduled_time, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?5)
            "#,
        )
        .bind(&order_id)
        .bind(&new_order.customer_id)
        .bind(&new_order.restaurant_id)
        .bind(OrderStatus::Placed)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_order.lines.len());
        for (position, line) in new_order.lines.iter().enumerate() {
            let item = OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                customer_id: new_order.customer_id.clone(),
                restaurant_id: new_order.restaurant_id.clone(),
                menu_id: line.menu_id.clone(),
                menu_name: line.menu_name.clone(),
                quantity: line.quantity,
                price: line.price,
                status: OrderItemStatus::Ordered,
                created_at: now,
                updated_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, customer_id, restaurant_id, menu_id, menu_name,
                    position, quantity, price_cents, status, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.customer_id)
            .bind(&item.restaurant_id)
            .bind(&item.menu_id)
            .bind(&item.menu_name)
            .bind(position as i64)
            .bind(item.quantity)
            .bind(item.price.cents())
            .bind(item.status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        let delivery = Delivery {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.clone(),
            delivery_personnel_id: None,
            status: DeliveryStatus::Pending,
            delivery_time: new_order.delivery_minutes,
            rescheduled_time: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO deliveries (
                id, order_id, delivery_personnel_id, status, delivery_time,
                rescheduled_time, created_at, updated_at
            ) VALUES (?1, ?2, NULL, ?3, ?4, NULL, ?5, ?5)
            "#,
        )
        .bind(&delivery.id)
        .bind(&delivery.order_id)
        .bind(delivery.status)
        .bind(delivery.delivery_time)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let order = Order {
            id: order_id,
            customer_id: new_order.customer_id.clone(),
            restaurant_id: new_order.restaurant_id.clone(),
            order_item_ids: items.iter().map(|item| item.id.clone()).collect(),
            status: OrderStatus::Placed,
            scheduled_time: None,
            created_at: now,
            updated_at: now,
        };

        info!(
            order_id = %order.id,
            delivery_id = %delivery.id,
            items = items.len(),
            "Order placed"
        );

        Ok(PlacedRecords {
            order,
            items,
            delivery,
        })
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let ids = self.item_ids(&row.id).await?;
                Ok(Some(row.into_order(ids)))
            }
            None => Ok(None),
        }
    }

    /// Items of one order, in line order.
    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER_ITEM} WHERE order_id = ?1 ORDER BY position"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Orders of one customer, oldest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        self.list(&format!("{SELECT_ORDER} WHERE customer_id = ?1 ORDER BY rowid"), Some(customer_id))
            .await
    }

    /// Orders placed at one restaurant, oldest first.
    pub async fn list_for_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<Order>> {
        self.list(
            &format!("{SELECT_ORDER} WHERE restaurant_id = ?1 ORDER BY rowid"),
            Some(restaurant_id),
        )
        .await
    }

    /// Every order on the platform, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        self.list(&format!("{SELECT_ORDER} ORDER BY rowid"), None).await
    }

    async fn list(&self, sql: &str, param: Option<&str>) -> DbResult<Vec<Order>> {
        let mut query = sqlx::query_as::<_, OrderRow>(sql);
        if let Some(param) = param {
            query = query.bind(param.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let ids = self.item_ids(&row.id).await?;
            orders.push(row.into_order(ids));
        }
        Ok(orders)
    }

    async fn item_ids(&self, order_id: &str) -> DbResult<Vec<String>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM order_items WHERE order_id = ?1 ORDER BY position")
                .bind(order_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Populates an order with its restaurant, lines and delivery.
    ///
    /// Lines show the live menu name when the dish still exists and fall back
    /// to the name frozen at order time otherwise.
    pub async fn view(&self, order: &Order) -> DbResult<OrderView> {
        let restaurant: Option<(String, String, String)> =
            sqlx::query_as("SELECT id, name, address FROM restaurants WHERE id = ?1")
                .bind(&order.restaurant_id)
                .fetch_optional(&self.pool)
                .await?;

        let lines: Vec<OrderLineRow> = sqlx::query_as(
            r#"
            SELECT oi.id, oi.menu_id,
                   COALESCE(m.name, oi.menu_name) AS menu_name,
                   m.description AS description,
                   oi.quantity, oi.price_cents, oi.status
            FROM order_items oi
            LEFT JOIN menus m ON m.id = oi.menu_id
            WHERE oi.order_id = ?1
            ORDER BY oi.position
            "#,
        )
        .bind(&order.id)
        .fetch_all(&self.pool)
        .await?;

        let delivery: Option<DeliverySummaryRow> = sqlx::query_as(
            r#"
            SELECT id, status, delivery_personnel_id, delivery_time
            FROM deliveries
            WHERE order_id = ?1
            "#,
        )
        .bind(&order.id)
        .fetch_optional(&self.pool)
        .await?;

        let items: Vec<OrderLineView> = lines.into_iter().map(OrderLineView::from).collect();
        let total_price = items
            .iter()
            .try_fold(Money::zero(), |total, line| total.checked_add(line.price))
            .ok_or_else(|| DbError::Corrupt {
                entity: "order".to_string(),
                id: order.id.clone(),
                reason: "line prices overflow the total".to_string(),
            })?;

        Ok(OrderView {
            order_id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            status: order.status,
            scheduled_time: order.scheduled_time,
            restaurant: restaurant.map(|(id, name, address)| RestaurantSummary { id, name, address }),
            items,
            total_price,
            delivery: delivery.map(|d| DeliverySummary {
                id: d.id,
                status: d.status,
                delivery_personnel_id: d.delivery_personnel_id,
                estimated_minutes: d.delivery_time,
            }),
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    /// [`view`](Self::view) over a list, preserving its order.
    pub async fn views(&self, orders: &[Order]) -> DbResult<Vec<OrderView>> {
        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.view(order).await?);
        }
        Ok(views)
    }

    // =========================================================================
    // Status Writes
    // =========================================================================

    /// Moves an order from `from` to `to` and its items to `item_status`.
    ///
    /// The order write is conditional on `from`; if the order moved on in the
    /// meantime nothing is written and `Conflict` is returned. Resuming a
    /// rescheduled order puts its rescheduled delivery back into the pending
    /// pool with no courier, in the same transaction.
    pub async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        item_status: OrderItemStatus,
    ) -> DbResult<Order> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?3, scheduled_time = NULL, updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(order_id)
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Conflict(format!(
                "order {order_id} is no longer {from}"
            )));
        }

        sqlx::query("UPDATE order_items SET status = ?2, updated_at = ?3 WHERE order_id = ?1")
            .bind(order_id)
            .bind(item_status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if reopens_delivery(from, to) {
            let reopened = sqlx::query(
                r#"
                UPDATE deliveries
                SET status = ?2, delivery_personnel_id = NULL, updated_at = ?4
                WHERE order_id = ?1 AND status = ?3
                "#,
            )
            .bind(order_id)
            .bind(DeliveryStatus::Pending)
            .bind(DeliveryStatus::Rescheduled)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if reopened.rows_affected() > 0 {
                debug!(order_id = %order_id, "Rescheduled delivery returned to pending");
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_id = %order_id, from = %from, to = %to, "Order status updated");

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Applies an administrative cancel or reschedule.
    ///
    /// ```text
    /// orders       status, scheduled_time
    /// order_items  status
    /// deliveries   status, rescheduled_time   (skipped once delivered/cancelled)
    /// ```
    pub async fn apply_override(&self, order_id: &str, action: OrderOverride) -> DbResult<Order> {
        let now = Utc::now();
        let scheduled_time = action.scheduled_time();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE orders SET status = ?2, scheduled_time = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(order_id)
        .bind(action.order_status())
        .bind(scheduled_time)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        sqlx::query("UPDATE order_items SET status = ?2, updated_at = ?3 WHERE order_id = ?1")
            .bind(order_id)
            .bind(action.item_status())
            .bind(now)
            .execute(&mut *tx)
            .await?;

        let delivery: Option<DeliveryRow> =
            sqlx::query_as(&format!("{SELECT_DELIVERY} WHERE order_id = ?1"))
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        if let Some(delivery) = delivery {
            if action.touches_delivery(delivery.status) {
                sqlx::query(
                    r#"
                    UPDATE deliveries
                    SET status = ?2, rescheduled_time = ?3, updated_at = ?4
                    WHERE id = ?1
                    "#,
                )
                .bind(&delivery.id)
                .bind(action.delivery_status())
                .bind(scheduled_time)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = %order_id,
            status = %action.order_status(),
            "Order overridden by administrator"
        );

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{customer, good_eats, place, test_db};

    #[tokio::test]
    async fn test_place_writes_order_items_and_pending_delivery() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;

        let placed = place(
            &db,
            &khyati.id,
            &restaurant.id,
            &[("Pasta Primavera", 2), ("Caesar Salad", 1)],
        )
        .await;

        assert_eq!(placed.order.status, OrderStatus::Placed);
        assert_eq!(placed.items.len(), 2);
        assert_eq!(placed.items[0].price.cents(), 2598);
        assert_eq!(placed.items[1].price.cents(), 899);
        assert_eq!(placed.delivery.status, DeliveryStatus::Pending);
        assert!(placed.delivery.delivery_personnel_id.is_none());

        let stored = db.orders().get_by_id(&placed.order.id).await.unwrap().unwrap();
        assert_eq!(stored.order_item_ids, placed.order.order_item_ids);

        let delivery = db.deliveries().get_by_order(&placed.order.id).await.unwrap().unwrap();
        assert_eq!(delivery.id, placed.delivery.id);
    }

    #[tokio::test]
    async fn test_failed_placement_leaves_nothing_behind() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let menu = db.menus().list_for_restaurant(&restaurant.id).await.unwrap();

        // unknown customer id violates the orders foreign key
        let result = db
            .orders()
            .place(&NewOrder {
                customer_id: "ghost".to_string(),
                restaurant_id: restaurant.id.clone(),
                lines: vec![PricedLine {
                    menu_id: menu[0].id.clone(),
                    menu_name: menu[0].name.clone(),
                    quantity: 1,
                    unit_price: menu[0].price,
                    price: menu[0].price,
                }],
                delivery_minutes: 30,
            })
            .await;
        assert!(result.is_err());

        let counts: (i64, i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM orders), (SELECT COUNT(*) FROM order_items), (SELECT COUNT(*) FROM deliveries)",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(counts, (0, 0, 0));
    }

    #[tokio::test]
    async fn test_view_totals_and_menu_fallback() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let placed = place(
            &db,
            &khyati.id,
            &restaurant.id,
            &[("Pasta Primavera", 2), ("Caesar Salad", 1)],
        )
        .await;

        // dish removed after ordering; the frozen name still shows
        db.menus()
            .delete(&restaurant.id, &placed.items[1].menu_id)
            .await
            .unwrap();

        let view = db.orders().view(&placed.order).await.unwrap();
        assert_eq!(view.total_price.to_string(), "34.97");
        assert_eq!(view.items[1].menu_name, "Caesar Salad");
        assert!(view.items[1].description.is_none());
        assert_eq!(view.restaurant.unwrap().name, "Good Eats");
        assert_eq!(view.delivery.unwrap().estimated_minutes, 30);
    }

    #[tokio::test]
    async fn test_update_status_is_conditional() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;

        let order = db
            .orders()
            .update_status(
                &placed.order.id,
                OrderStatus::Placed,
                OrderStatus::Preparing,
                OrderItemStatus::Preparing,
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(
            db.orders().items(&order.id).await.unwrap()[0].status,
            OrderItemStatus::Preparing
        );

        let stale = db
            .orders()
            .update_status(
                &placed.order.id,
                OrderStatus::Placed,
                OrderStatus::Preparing,
                OrderItemStatus::Preparing,
            )
            .await
            .unwrap_err();
        assert!(matches!(stale, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_cancel_cascades_to_items_and_delivery() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;

        let order = db
            .orders()
            .apply_override(&placed.order.id, OrderOverride::Cancel)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.scheduled_time.is_none());
        assert_eq!(
            db.orders().items(&order.id).await.unwrap()[0].status,
            OrderItemStatus::Cancelled
        );
        let delivery = db.deliveries().get_by_order(&order.id).await.unwrap().unwrap();
        assert_eq!(delivery.status, DeliveryStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_reschedule_sets_times() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;
        let at = Utc::now() + chrono::Duration::hours(3);

        let order = db
            .orders()
            .apply_override(&placed.order.id, OrderOverride::Reschedule(at))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Rescheduled);
        assert_eq!(order.scheduled_time.map(|t| t.timestamp()), Some(at.timestamp()));
        let delivery = db.deliveries().get_by_order(&order.id).await.unwrap().unwrap();
        assert_eq!(delivery.status, DeliveryStatus::Rescheduled);
        assert!(delivery.rescheduled_time.is_some());
    }

    #[tokio::test]
    async fn test_override_missing_order() {
        let db = test_db().await;
        let err = db
            .orders()
            .apply_override("missing", OrderOverride::Cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
