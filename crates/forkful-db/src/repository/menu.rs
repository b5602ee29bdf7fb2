//! # Menu Repository
//!
//! Menu items keyed by `(restaurant_id, name)`.
//!
//! ## Upsert
//! ```text
//! manageMenu("Caesar Salad", 9.49)
//!      │
//!      ▼
//! INSERT ... ON CONFLICT (restaurant_id, name) DO UPDATE
//!      │
//!      ├── new name       → new row, appended to the menu order
//!      └── existing name  → same id, same position, new fields
//! ```
//!
//! Prices already copied into `order_items` are never touched.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forkful_core::{MenuItem, MenuItemInput, Money};

#[derive(Debug, FromRow)]
struct MenuRow {
    id: String,
    restaurant_id: String,
    name: String,
    description: String,
    price_cents: i64,
    availability: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MenuRow> for MenuItem {
    fn from(row: MenuRow) -> Self {
        MenuItem {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            availability: row.availability,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_MENU: &str = r#"
    SELECT id, restaurant_id, name, description, price_cents, availability, created_at, updated_at
    FROM menus
"#;

/// Repository for menu database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Creates or updates the restaurant's menu item with `input.name`.
    pub async fn upsert(&self, restaurant_id: &str, input: &MenuItemInput) -> DbResult<MenuItem> {
        let now = Utc::now();

        debug!(restaurant_id = %restaurant_id, name = %input.name, "Upserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menus (id, restaurant_id, name, description, price_cents, availability, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT (restaurant_id, name) DO UPDATE SET
                description = excluded.description,
                price_cents = excluded.price_cents,
                availability = excluded.availability,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(restaurant_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.cents())
        .bind(input.availability)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let row: MenuRow =
            sqlx::query_as(&format!("{SELECT_MENU} WHERE restaurant_id = ?1 AND name = ?2"))
                .bind(restaurant_id)
                .bind(&input.name)
                .fetch_one(&self.pool)
                .await?;

        info!(id = %row.id, price = %input.price, "Menu item saved");
        Ok(row.into())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let row: Option<MenuRow> = sqlx::query_as(&format!("{SELECT_MENU} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MenuItem::from))
    }

    /// Every menu item of one restaurant, in insertion order.
    pub async fn list_for_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<MenuItem>> {
        let rows: Vec<MenuRow> =
            sqlx::query_as(&format!("{SELECT_MENU} WHERE restaurant_id = ?1 ORDER BY rowid"))
                .bind(restaurant_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Case-insensitive substring search on menu names across restaurants.
    ///
    /// An empty query returns every menu item.
    pub async fn search(&self, query: &str) -> DbResult<Vec<MenuItem>> {
        let pattern = format!("%{}%", escape_like(query));

        let rows: Vec<MenuRow> = sqlx::query_as(&format!(
            "{SELECT_MENU} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY rowid"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(query = %query, results = rows.len(), "Menu search");
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Hard-deletes a menu item of the given restaurant.
    ///
    /// ## Errors
    /// `NotFound` if no such item exists in that restaurant.
    pub async fn delete(&self, restaurant_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM menus WHERE id = ?1 AND restaurant_id = ?2")
            .bind(id)
            .bind(restaurant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        info!(id = %id, restaurant_id = %restaurant_id, "Menu item removed");
        Ok(())
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
