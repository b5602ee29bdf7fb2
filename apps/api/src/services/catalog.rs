//! Catalog service: browsing for customers, restaurant and menu management
//! for owners.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use forkful_core::validation::{
    parse_availability, parse_price, validate_id, validate_name, validate_search_query,
};
use forkful_core::{MenuItem, MenuItemInput, Restaurant, RestaurantDetails};
use forkful_db::Database;

use crate::error::{ApiError, ApiResult};

/// Body of `POST /restaurants` and `PUT /restaurants/details`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, alias = "hours_of_operation")]
    pub hours_of_operation: String,
}

impl RestaurantRequest {
    fn validate(self) -> ApiResult<RestaurantDetails> {
        Ok(RestaurantDetails {
            name: validate_name("name", &self.name)?,
            address: validate_name("address", &self.address)?,
            hours_of_operation: validate_name("hoursOfOperation", &self.hours_of_operation)?,
        })
    }
}

/// Body of `POST /restaurants/menus`.
///
/// `price` and `availability` stay raw JSON so a string price or a
/// non-boolean flag is reported as a field error, not a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub availability: Value,
}

impl MenuRequest {
    fn validate(self) -> ApiResult<MenuItemInput> {
        Ok(MenuItemInput {
            name: validate_name("name", &self.name)?,
            description: self.description.unwrap_or_default().trim().to_string(),
            price: parse_price(&self.price)?,
            availability: parse_availability(&self.availability)?,
        })
    }
}

pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Every restaurant with its ordered menu ids.
    pub async fn browse_restaurants(&self) -> ApiResult<Vec<Restaurant>> {
        Ok(self.db.restaurants().list_all().await?)
    }

    /// Case-insensitive substring search over menu names. Empty matches all.
    pub async fn search_menus(&self, search: Option<&str>) -> ApiResult<Vec<MenuItem>> {
        let query = validate_search_query(search.unwrap_or_default())?;
        Ok(self.db.menus().search(&query).await?)
    }

    /// addRestaurant: creates the owner's restaurant or overwrites its details.
    pub async fn save_restaurant(
        &self,
        owner_id: &str,
        request: RestaurantRequest,
    ) -> ApiResult<Restaurant> {
        let details = request.validate()?;
        Ok(self.db.restaurants().upsert_for_owner(owner_id, &details).await?)
    }

    /// updateRestaurantDetails: the owner must already have a restaurant.
    pub async fn update_restaurant_details(
        &self,
        owner_id: &str,
        request: RestaurantRequest,
    ) -> ApiResult<Restaurant> {
        let details = request.validate()?;
        Ok(self.db.restaurants().update_for_owner(owner_id, &details).await?)
    }

    /// Creates or updates the menu item named `request.name` in the owner's
    /// restaurant.
    pub async fn manage_menu(&self, owner_id: &str, request: MenuRequest) -> ApiResult<MenuItem> {
        let input = request.validate()?;
        let restaurant = self.owned_restaurant(owner_id).await?;
        Ok(self.db.menus().upsert(&restaurant.id, &input).await?)
    }

    /// Hard-deletes one of the owner's menu items.
    pub async fn remove_menu_item(&self, owner_id: &str, menu_id: &str) -> ApiResult<()> {
        validate_id(menu_id)?;
        let restaurant = self.owned_restaurant(owner_id).await?;
        self.db.menus().delete(&restaurant.id, menu_id).await?;
        info!(menu_id = %menu_id, owner_id = %owner_id, "Menu item removed by owner");
        Ok(())
    }

    pub(crate) async fn owned_restaurant(&self, owner_id: &str) -> ApiResult<Restaurant> {
        self.db
            .restaurants()
            .get_by_owner(owner_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Restaurant for owner", owner_id))
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
    use forkful_core::Role;
    use serde_json::json;

    fn menu(name: &str, price: Value, availability: Value) -> MenuRequest {
        MenuRequest {
            name: name.to_string(),
            description: Some("house special".to_string()),
            price,
            availability,
        }
    }

    #[tokio::test]
    async fn test_manage_menu_upserts_by_name() {
        let state = test_state().await;
        let owner = good_eats(&state).await;
        let catalog = state.catalog();

        let updated = catalog
            .manage_menu(&owner.id, menu("Caesar Salad", json!(9.49), json!(false)))
            .await
            .unwrap();
        assert_eq!(updated.price.cents(), 949);
        assert!(!updated.availability);

        let restaurant = catalog.owned_restaurant(&owner.id).await.unwrap();
        assert_eq!(restaurant.menu_item_ids.len(), 2);
        assert_eq!(restaurant.menu_item_ids[1], updated.id);
    }

    #[tokio::test]
    async fn test_manage_menu_validates_price_and_availability() {
        let state = test_state().await;
        let owner = good_eats(&state).await;
        let catalog = state.catalog();

        for request in [
            menu("Soup", json!("cheap"), json!(true)),
            menu("Soup", json!(-1), json!(true)),
            menu("Soup", json!(4.5), json!("yes")),
            menu("Soup", Value::Null, json!(true)),
            menu("Soup", json!(100000.01), json!(true)),
            menu("Soup", json!(90000000000000000u64), json!(true)),
        ] {
            let err = catalog.manage_menu(&owner.id, request).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput);
        }
    }

    #[tokio::test]
    async fn test_manage_menu_without_restaurant() {
        let state = test_state().await;
        let owner = user(&state, "olive@example.com", Role::RestaurantOwner).await;

        let err = state
            .catalog()
            .manage_menu(&owner.id, menu("Soup", json!(4), json!(true)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_search_and_browse() {
        let state = test_state().await;
        good_eats(&state).await;
        let catalog = state.catalog();

        let hits = catalog.search_menus(Some("SALAD")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Caesar Salad");
        assert_eq!(catalog.search_menus(None).await.unwrap().len(), 2);

        let restaurants = catalog.browse_restaurants().await.unwrap();
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].menu_item_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_menu_item() {
        let state = test_state().await;
        let owner = good_eats(&state).await;
        let catalog = state.catalog();
        let restaurant = catalog.owned_restaurant(&owner.id).await.unwrap();

        catalog
            .remove_menu_item(&owner.id, &restaurant.menu_item_ids[0])
            .await
            .unwrap();

        let err = catalog
            .remove_menu_item(&owner.id, &restaurant.menu_item_ids[0])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = catalog.remove_menu_item(&owner.id, "42").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidId);
    }

    #[tokio::test]
    async fn test_update_details_requires_restaurant() {
        let state = test_state().await;
        let owner = user(&state, "olive@example.com", Role::RestaurantOwner).await;

        let err = state
            .catalog()
            .update_restaurant_details(
                &owner.id,
                RestaurantRequest {
                    name: "Good Eats".to_string(),
                    address: "1 Main St".to_string(),
                    hours_of_operation: "9-5".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
