//! # Delivery Repository
//!
//! Delivery pool and the state machine writes.
//!
//! ## Acceptance Race
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Courier A ──┐                                                          │
//! │              ├──► UPDATE deliveries                                     │
//! │  Courier B ──┘        SET status = 'picked-up', delivery_personnel_id   │
//! │                       WHERE id = ? AND status = 'pending'               │
//! │                                                                         │
//! │  SQLite serializes the two writes. The first matches one row; the       │
//! │  second matches zero because status is no longer 'pending'.             │
//! │                                                                         │
//! │  rows = 1 → accepted                                                    │
//! │  rows = 0 → row exists? Conflict : NotFound                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is never a read between deciding and writing.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use forkful_core::validation::Page;
use forkful_core::{AvailableDelivery, Delivery, DeliveryStatus};

#[derive(Debug, FromRow)]
pub(crate) struct DeliveryRow {
    pub(crate) id: String,
    pub(crate) order_id: String,
    pub(crate) delivery_personnel_id: Option<String>,
    pub(crate) status: DeliveryStatus,
    pub(crate) delivery_time: i64,
    pub(crate) rescheduled_time: Option<DateTime<Utc>>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        Delivery {
            id: row.id,
            order_id: row.order_id,
            delivery_personnel_id: row.delivery_personnel_id,
            status: row.status,
            delivery_time: row.delivery_time,
            rescheduled_time: row.rescheduled_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) const SELECT_DELIVERY: &str = r#"
    SELECT id, order_id, delivery_personnel_id, status, delivery_time,
           rescheduled_time, created_at, updated_at
    FROM deliveries
"#;

#[derive(Debug, FromRow)]
struct AvailableRow {
    delivery_id: String,
    order_id: String,
    customer_id: String,
    restaurant_id: String,
    restaurant_name: Option<String>,
    restaurant_address: Option<String>,
    estimated_minutes: i64,
    created_at: DateTime<Utc>,
}

/// Repository for delivery database operations.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Delivery>> {
        let row: Option<DeliveryRow> = sqlx::query_as(&format!("{SELECT_DELIVERY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Delivery::from))
    }

    pub async fn get_by_order(&self, order_id: &str) -> DbResult<Option<Delivery>> {
        let row: Option<DeliveryRow> =
            sqlx::query_as(&format!("{SELECT_DELIVERY} WHERE order_id = ?1"))
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Delivery::from))
    }

    /// Pending deliveries, oldest first, one page at a time.
    pub async fn list_pending(&self, page: Page) -> DbResult<Vec<AvailableDelivery>> {
        let rows: Vec<AvailableRow> = sqlx::query_as(
            r#"
            SELECT d.id AS delivery_id,
                   d.order_id,
                   o.customer_id,
                   o.restaurant_id,
                   r.name AS restaurant_name,
                   r.address AS restaurant_address,
                   d.delivery_time AS estimated_minutes,
                   d.created_at
            FROM deliveries d
            JOIN orders o ON o.id = d.order_id
            LEFT JOIN restaurants r ON r.id = o.restaurant_id
            WHERE d.status = ?1
            ORDER BY d.rowid
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(DeliveryStatus::Pending)
        .bind(page.limit as i64)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        debug!(page = page.page, results = rows.len(), "Listed pending deliveries");

        Ok(rows
            .into_iter()
            .map(|row| AvailableDelivery {
                delivery_id: row.delivery_id,
                order_id: row.order_id,
                customer_id: row.customer_id,
                restaurant_id: row.restaurant_id,
                restaurant_name: row.restaurant_name,
                restaurant_address: row.restaurant_address,
                estimated_minutes: row.estimated_minutes,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Assigns a pending delivery to a courier and moves it to `picked-up`.
    ///
    /// ## Errors
    /// - `NotFound` if the delivery doesn't exist
    /// - `Conflict` if it is no longer pending (someone else won)
    pub async fn accept(&self, id: &str, personnel_id: &str) -> DbResult<Delivery> {
        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET delivery_personnel_id = ?2, status = ?3, updated_at = ?4
            WHERE id = ?1 AND status = ?5
            "#,
        )
        .bind(id)
        .bind(personnel_id)
        .bind(DeliveryStatus::PickedUp)
        .bind(Utc::now())
        .bind(DeliveryStatus::Pending)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                Some(current) => {
                    warn!(
                        delivery_id = %id,
                        status = %current.status,
                        "Delivery acceptance lost"
                    );
                    Err(DbError::Conflict(format!(
                        "delivery {id} is already {}",
                        current.status
                    )))
                }
                None => Err(DbError::not_found("Delivery", id)),
            };
        }

        info!(delivery_id = %id, personnel_id = %personnel_id, "Delivery accepted");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Delivery", id))
    }

    /// Moves a courier's delivery from `from` to `to`, and the order along
    /// with it when the new status implies one.
    ///
    /// The write is conditional on both the observed status and the assigned
    /// courier; if either changed, nothing is written and `Conflict` is
    /// returned.
    pub async fn advance(
        &self,
        id: &str,
        personnel_id: &str,
        from: DeliveryStatus,
        to: DeliveryStatus,
    ) -> DbResult<Delivery> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET status = ?4, updated_at = ?5
            WHERE id = ?1 AND delivery_personnel_id = ?2 AND status = ?3
            "#,
        )
        .bind(id)
        .bind(personnel_id)
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Conflict(format!(
                "delivery {id} is no longer {from}"
            )));
        }

        let row: DeliveryRow = sqlx::query_as(&format!("{SELECT_DELIVERY} WHERE id = ?1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(order_status) = to.implied_order_status() {
            sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(&row.order_id)
                .bind(order_status)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(delivery_id = %id, from = %from, to = %to, "Delivery status updated");
        Ok(row.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{courier, customer, good_eats, place, test_db};
    use forkful_core::OrderStatus;

    #[tokio::test]
    async fn test_accept_assigns_courier() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let dana = courier(&db, "dana@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;

        let delivery = db.deliveries().accept(&placed.delivery.id, &dana.id).await.unwrap();
        assert_eq!(delivery.status, DeliveryStatus::PickedUp);
        assert_eq!(delivery.delivery_personnel_id.as_deref(), Some(dana.id.as_str()));
    }

    #[tokio::test]
    async fn test_concurrent_accepts_have_one_winner() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let dana = courier(&db, "dana@example.com").await;
        let eli = courier(&db, "eli@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;

        let repo_a = db.deliveries();
        let repo_b = db.deliveries();
        let id_a = placed.delivery.id.clone();
        let id_b = placed.delivery.id.clone();

        let a = tokio::spawn(async move { repo_a.accept(&id_a, &dana.id).await });
        let b = tokio::spawn(async move { repo_b.accept(&id_b, &eli.id).await });
        let results = [a.await.unwrap(), b.await.unwrap()];

        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DbError::Conflict(_))))
            .count();
        assert_eq!((wins, conflicts), (1, 1));
    }

    #[tokio::test]
    async fn test_accept_missing_delivery() {
        let db = test_db().await;
        let dana = courier(&db, "dana@example.com").await;

        let err = db.deliveries().accept("missing", &dana.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_advance_couples_order_status() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let dana = courier(&db, "dana@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;
        let id = placed.delivery.id.as_str();

        db.deliveries().accept(id, &dana.id).await.unwrap();
        db.deliveries()
            .advance(id, &dana.id, DeliveryStatus::PickedUp, DeliveryStatus::EnRoute)
            .await
            .unwrap();
        let order = db.orders().get_by_id(&placed.order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::OutForDelivery);

        db.deliveries()
            .advance(id, &dana.id, DeliveryStatus::EnRoute, DeliveryStatus::Delivered)
            .await
            .unwrap();
        let order = db.orders().get_by_id(&placed.order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_advance_with_stale_status_conflicts() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let dana = courier(&db, "dana@example.com").await;
        let placed = place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await;

        db.deliveries().accept(&placed.delivery.id, &dana.id).await.unwrap();
        let err = db
            .deliveries()
            .advance(
                &placed.delivery.id,
                &dana.id,
                DeliveryStatus::EnRoute,
                DeliveryStatus::Delivered,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_pending_pages_oldest_first() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;
        let khyati = customer(&db, "k@example.com").await;
        let dana = courier(&db, "dana@example.com").await;

        let mut placed = Vec::new();
        for _ in 0..3 {
            placed.push(place(&db, &khyati.id, &restaurant.id, &[("Caesar Salad", 1)]).await);
        }
        db.deliveries().accept(&placed[0].delivery.id, &dana.id).await.unwrap();

        let first = db
            .deliveries()
            .list_pending(Page::new(Some(1), Some(1)).unwrap())
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].delivery_id, placed[1].delivery.id);
        assert_eq!(first[0].restaurant_name.as_deref(), Some("Good Eats"));

        let second = db
            .deliveries()
            .list_pending(Page::new(Some(2), Some(1)).unwrap())
            .await
            .unwrap();
        assert_eq!(second[0].delivery_id, placed[2].delivery.id);
    }
}
