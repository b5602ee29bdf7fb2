//! # Engine Services
//!
//! One service per engine. Each owns a clone of the database handle, runs the
//! domain rules from `forkful-core` and persists through `forkful-db`.
//!
//! ```text
//! routes ──► AppState::orders() ──► OrderService::place_order
//!                                        │
//!                                        ├── forkful_core::pricing
//!                                        └── db.orders().place (one tx)
//! ```
//!
//! Services never see HTTP types; role gating happens in the routes.

pub mod catalog;
pub mod delivery;
pub mod identity;
pub mod order;
pub mod report;

/// Shared fixtures for service tests.
#[cfg(test)]
pub(crate) mod testing {
    use forkful_core::{Role, User};
    use serde_json::json;

    use crate::config::ApiConfig;
    use crate::services::catalog::{MenuRequest, RestaurantRequest};
    use crate::services::identity::RegisterRequest;
    use crate::state::AppState;
    use forkful_db::{Database, DbConfig};

    pub async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, ApiConfig::for_tests())
    }

    pub fn register_request(email: &str, role: Role) -> RegisterRequest {
        let profile = match role {
            Role::DeliveryPersonnel => json!({ "name": "Dana", "vehicleType": "Bike" }),
            Role::RestaurantOwner => json!({ "name": "Olive" }),
            Role::Customer => json!({ "name": "Khyati", "address": "12 Elm Street" }),
            Role::Administrator => json!({ "name": "Ada" }),
        };
        RegisterRequest {
            email: email.to_string(),
            password: "securePassword123".to_string(),
            role: Some(role),
            profile,
        }
    }

    /// Creates a user of any role (administrators through the admin path).
    pub async fn user(state: &AppState, email: &str, role: Role) -> User {
        state
            .identity()
            .create_user(register_request(email, role))
            .await
            .unwrap()
    }

    /// An owner with "Good Eats" serving Pasta Primavera 12.99 and Caesar Salad 8.99.
    pub async fn good_eats(state: &AppState) -> User {
        let owner = user(state, "owner@example.com", Role::RestaurantOwner).await;
        let catalog = state.catalog();

        catalog
            .save_restaurant(
                &owner.id,
                RestaurantRequest {
                    name: "Good Eats".to_string(),
                    address: "1 Main St".to_string(),
                    hours_of_operation: "9am-9pm".to_string(),
                },
            )
            .await
            .unwrap();

        for (name, price) in [("Pasta Primavera", "12.99"), ("Caesar Salad", "8.99")] {
            catalog
                .manage_menu(
                    &owner.id,
                    MenuRequest {
                        name: name.to_string(),
                        description: None,
                        price: json!(price),
                        availability: json!(true),
                    },
                )
                .await
                .unwrap();
        }

        owner
    }
}
