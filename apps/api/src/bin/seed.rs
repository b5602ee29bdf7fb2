//! # Demo Data Seeder
//!
//! Fills the configured database with one user per role, the "Good Eats"
//! restaurant and a placed order.
//!
//! ```bash
//! cargo run -p forkful-api --bin seed
//! ```
//!
//! Every account uses the password `securePassword123`. Running the seeder
//! against an already seeded database changes nothing.

use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use forkful_api::services::catalog::{MenuRequest, RestaurantRequest};
use forkful_api::services::identity::RegisterRequest;
use forkful_api::services::order::PlaceOrderRequest;
use forkful_api::{ApiConfig, AppState, ErrorCode};
use forkful_core::{OrderLineRequest, Role};
use forkful_db::{Database, DbConfig};

const PASSWORD: &str = "securePassword123";

fn account(email: &str, role: Role, profile: Value) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        role: Some(role),
        profile,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = ApiConfig::load()?;
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let state = AppState::new(db.clone(), config);
    let identity = state.identity();

    let admin = account(
        "admin@example.com",
        Role::Administrator,
        json!({ "name": "Admin", "contactDetails": "admin@example.com" }),
    );
    match identity.create_user(admin).await {
        Ok(user) => info!(user_id = %user.id, "Seeded administrator"),
        Err(e) if e.code == ErrorCode::Conflict => {
            info!("Database already seeded, nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let owner = identity
        .create_user(account(
            "owner@example.com",
            Role::RestaurantOwner,
            json!({ "name": "Olive Owner", "contactDetails": "555-0100", "address": "1 Main St" }),
        ))
        .await?;

    identity
        .create_user(account(
            "delivery@example.com",
            Role::DeliveryPersonnel,
            json!({ "name": "Dana Driver", "contactDetails": "555-0101", "vehicleType": "Bike" }),
        ))
        .await?;

    let customer = identity
        .create_user(account(
            "customer@example.com",
            Role::Customer,
            json!({ "name": "Khyati", "contactDetails": "555-0102", "address": "12 Elm Street" }),
        ))
        .await?;

    let catalog = state.catalog();
    let restaurant = catalog
        .save_restaurant(
            &owner.id,
            RestaurantRequest {
                name: "Good Eats".to_string(),
                address: "1 Main St".to_string(),
                hours_of_operation: "9am - 9pm".to_string(),
            },
        )
        .await?;

    for (name, description, price) in [
        ("Pasta Primavera", "Seasonal vegetables, garlic, olive oil", "12.99"),
        ("Caesar Salad", "Romaine, parmesan, croutons", "8.99"),
    ] {
        catalog
            .manage_menu(
                &owner.id,
                MenuRequest {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    price: json!(price),
                    availability: json!(true),
                },
            )
            .await?;
    }
    info!(restaurant_id = %restaurant.id, "Seeded restaurant and menu");

    let placed = state
        .orders()
        .place_order(
            &customer.id,
            PlaceOrderRequest {
                restaurant_name: "Good Eats".to_string(),
                items: vec![
                    OrderLineRequest {
                        menu_name: "Pasta Primavera".to_string(),
                        quantity: 2,
                    },
                    OrderLineRequest {
                        menu_name: "Caesar Salad".to_string(),
                        quantity: 1,
                    },
                ],
            },
        )
        .await?;
    info!(order_id = %placed.order_id, total = %placed.total_price, "Seeded order");

    db.close().await;
    Ok(())
}
