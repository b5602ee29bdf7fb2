//! # Repository Module
//!
//! Database repository implementations for Forkful.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service (apps/api)                                                    │
//! │       │                                                                 │
//! │       │  db.deliveries().accept(delivery_id, courier_id)               │
//! │       ▼                                                                 │
//! │  DeliveryRepository                                                    │
//! │  ├── list_pending(&self, page)                                         │
//! │  ├── accept(&self, id, courier)      ← single conditional UPDATE       │
//! │  └── advance(&self, id, from, to)    ← delivery + order in one tx      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts, profiles, courier availability
//! - [`RestaurantRepository`](restaurant::RestaurantRepository) - Owner-scoped restaurants
//! - [`MenuRepository`](menu::MenuRepository) - Menu upsert, search, removal
//! - [`OrderRepository`](order::OrderRepository) - Order placement, views, status changes
//! - [`DeliveryRepository`](delivery::DeliveryRepository) - Delivery pool and state machine writes
//! - [`ReportRepository`](report::ReportRepository) - Read-only aggregates

pub mod delivery;
pub mod menu;
pub mod order;
pub mod report;
pub mod restaurant;
pub mod user;

/// Shared fixtures for repository tests.
#[cfg(test)]
pub(crate) mod testing {
    use forkful_core::{
        CourierProfile, CustomerProfile, MenuItemInput, Money, NewUser, OrderLineRequest,
        OwnerProfile, Profile, RestaurantDetails, User, DEFAULT_DELIVERY_MINUTES,
    };

    use crate::pool::{Database, DbConfig};
    use crate::repository::order::{NewOrder, PlacedRecords};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn customer(db: &Database, email: &str) -> User {
        db.users()
            .insert(&NewUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                profile: Profile::Customer(CustomerProfile {
                    name: "Khyati".to_string(),
                    contact_details: None,
                    address: Some("12 Elm Street".to_string()),
                }),
            })
            .await
            .unwrap()
    }

    pub async fn owner(db: &Database, email: &str) -> User {
        db.users()
            .insert(&NewUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                profile: Profile::RestaurantOwner(OwnerProfile {
                    name: "Olive".to_string(),
                    contact_details: None,
                    address: None,
                }),
            })
            .await
            .unwrap()
    }

    pub async fn courier(db: &Database, email: &str) -> User {
        db.users()
            .insert(&NewUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                profile: Profile::DeliveryPersonnel(CourierProfile {
                    name: "Dana".to_string(),
                    contact_details: None,
                    address: None,
                    vehicle_type: Some("Bike".to_string()),
                    available: true,
                }),
            })
            .await
            .unwrap()
    }

    /// Owner + "Good Eats" with Pasta Primavera (12.99) and Caesar Salad (8.99).
    pub async fn good_eats(db: &Database) -> (User, forkful_core::Restaurant) {
        let owner = owner(db, "owner@example.com").await;
        let restaurant = db
            .restaurants()
            .upsert_for_owner(
                &owner.id,
                &RestaurantDetails {
                    name: "Good Eats".to_string(),
                    address: "456 Foodie Lane".to_string(),
                    hours_of_operation: "10:00 AM - 10:00 PM".to_string(),
                },
            )
            .await
            .unwrap();

        for (name, cents) in [("Pasta Primavera", 1299), ("Caesar Salad", 899)] {
            db.menus()
                .upsert(
                    &restaurant.id,
                    &MenuItemInput {
                        name: name.to_string(),
                        description: String::new(),
                        price: Money::from_cents(cents),
                        availability: true,
                    },
                )
                .await
                .unwrap();
        }

        (owner, restaurant)
    }

    /// Places `lines` at `restaurant_id` for `customer_id`, pricing from the menu.
    pub async fn place(
        db: &Database,
        customer_id: &str,
        restaurant_id: &str,
        lines: &[(&str, i64)],
    ) -> PlacedRecords {
        let menu = db.menus().list_for_restaurant(restaurant_id).await.unwrap();
        let requests: Vec<OrderLineRequest> = lines
            .iter()
            .map(|(name, quantity)| OrderLineRequest {
                menu_name: name.to_string(),
                quantity: *quantity,
            })
            .collect();
        let priced = forkful_core::pricing::price_lines(&requests, &menu).unwrap();

        db.orders()
            .place(&NewOrder {
                customer_id: customer_id.to_string(),
                restaurant_id: restaurant_id.to_string(),
                lines: priced,
                delivery_minutes: DEFAULT_DELIVERY_MINUTES,
            })
            .await
            .unwrap()
    }
}
