//! # Restaurant Repository
//!
//! Owner-scoped restaurant records. An owner has at most one restaurant
//! (`restaurants.owner_id` is UNIQUE), so "the owner's restaurant" is a
//! lookup, not a search.
//!
//! `menu_item_ids` is not stored on the row: it is read back from `menus`
//! in insertion order, so it can never drift from the menu table.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forkful_core::{Restaurant, RestaurantDetails};

#[derive(Debug, FromRow)]
struct RestaurantRow {
    id: String,
    owner_id: String,
    name: String,
    address: String,
    hours_of_operation: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RestaurantRow {
    fn into_restaurant(self, menu_item_ids: Vec<String>) -> Restaurant {
        Restaurant {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            address: self.address,
            hours_of_operation: self.hours_of_operation,
            menu_item_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_RESTAURANT: &str = r#"
    SELECT id, owner_id, name, address, hours_of_operation, created_at, updated_at
    FROM restaurants
"#;

/// Repository for restaurant database operations.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RestaurantRepository { pool }
    }

    /// Creates the owner's restaurant, or overwrites its details if it exists.
    pub async fn upsert_for_owner(
        &self,
        owner_id: &str,
        details: &RestaurantDetails,
    ) -> DbResult<Restaurant> {
        let now = Utc::now();

        debug!(owner_id = %owner_id, name = %details.name, "Upserting restaurant");

        sqlx::query(
            r#"
            INSERT INTO restaurants (id, owner_id, name, address, hours_of_operation, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (owner_id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                hours_of_operation = excluded.hours_of_operation,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(owner_id)
        .bind(&details.name)
        .bind(&details.address)
        .bind(&details.hours_of_operation)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let restaurant = self
            .get_by_owner(owner_id)
            .await?
            .ok_or_else(|| DbError::not_found("Restaurant", owner_id))?;

        info!(id = %restaurant.id, owner_id = %owner_id, "Restaurant saved");
        Ok(restaurant)
    }

    /// Updates the details of the owner's existing restaurant.
    ///
    /// ## Errors
    /// `NotFound` if the owner has no restaurant yet.
    pub async fn update_for_owner(
        &self,
        owner_id: &str,
        details: &RestaurantDetails,
    ) -> DbResult<Restaurant> {
        let result = sqlx::query(
            r#"
            UPDATE restaurants
            SET name = ?2, address = ?3, hours_of_operation = ?4, updated_at = ?5
            WHERE owner_id = ?1
            "#,
        )
        .bind(owner_id)
        .bind(&details.name)
        .bind(&details.address)
        .bind(&details.hours_of_operation)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Restaurant for owner", owner_id));
        }

        self.get_by_owner(owner_id)
            .await?
            .ok_or_else(|| DbError::not_found("Restaurant for owner", owner_id))
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> =
            sqlx::query_as(&format!("{SELECT_RESTAURANT} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        self.with_menu_ids(row).await
    }

    pub async fn get_by_owner(&self, owner_id: &str) -> DbResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> =
            sqlx::query_as(&format!("{SELECT_RESTAURANT} WHERE owner_id = ?1"))
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?;

        self.with_menu_ids(row).await
    }

    /// Resolves a restaurant by exact name. The earliest created match wins.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            "{SELECT_RESTAURANT} WHERE name = ?1 ORDER BY rowid LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        self.with_menu_ids(row).await
    }

    /// Lists every restaurant with its ordered menu ids.
    pub async fn list_all(&self) -> DbResult<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> =
            sqlx::query_as(&format!("{SELECT_RESTAURANT} ORDER BY rowid"))
                .fetch_all(&self.pool)
                .await?;

        let menu_rows: Vec<(String, String)> =
            sqlx::query_as("SELECT restaurant_id, id FROM menus ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        let mut menus: HashMap<String, Vec<String>> = HashMap::new();
        for (restaurant_id, menu_id) in menu_rows {
            menus.entry(restaurant_id).or_default().push(menu_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let ids = menus.remove(&row.id).unwrap_or_default();
                row.into_restaurant(ids)
            })
            .collect())
    }

    async fn with_menu_ids(&self, row: Option<RestaurantRow>) -> DbResult<Option<Restaurant>> {
        match row {
            Some(row) => {
                let ids: Vec<String> = sqlx::query_scalar(
                    "SELECT id FROM menus WHERE restaurant_id = ?1 ORDER BY rowid",
                )
                .bind(&row.id)
                .fetch_all(&self.pool)
                .await?;
                Ok(Some(row.into_restaurant(ids)))
            }
            None => Ok(None),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{good_eats, owner, test_db};

    fn details(name: &str) -> RestaurantDetails {
        RestaurantDetails {
            name: name.to_string(),
            address: "1 Main St".to_string(),
            hours_of_operation: "9-5".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_restaurant_per_owner() {
        let db = test_db().await;
        let olive = owner(&db, "olive@example.com").await;

        let first = db.restaurants().upsert_for_owner(&olive.id, &details("Old Name")).await.unwrap();
        let second = db.restaurants().upsert_for_owner(&olive.id, &details("New Name")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "New Name");
        assert_eq!(db.restaurants().list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_requires_existing_restaurant() {
        let db = test_db().await;
        let olive = owner(&db, "olive@example.com").await;

        let err = db
            .restaurants()
            .update_for_owner(&olive.id, &details("Nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_menu_ids_follow_insertion_order() {
        let db = test_db().await;
        let (_, restaurant) = good_eats(&db).await;

        let found = db.restaurants().find_by_name("Good Eats").await.unwrap().unwrap();
        assert_eq!(found.id, restaurant.id);
        assert_eq!(found.menu_item_ids.len(), 2);

        let menu = db.menus().list_for_restaurant(&restaurant.id).await.unwrap();
        let names: Vec<&str> = menu.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Pasta Primavera", "Caesar Salad"]);
        assert_eq!(found.menu_item_ids[0], menu[0].id);

        let listed = db.restaurants().list_all().await.unwrap();
        assert_eq!(listed[0].menu_item_ids, found.menu_item_ids);
    }

    #[tokio::test]
    async fn test_find_by_name_misses() {
        let db = test_db().await;
        assert!(db.restaurants().find_by_name("Bad Eats").await.unwrap().is_none());
    }
}
