//! # Report Module
//!
//! Popularity ranking over ordered quantities, plus the report row types the
//! admin dashboard returns.
//!
//! ## Ranking Pipeline
//! ```text
//! order_items (restaurant_id, menu_id, quantity)
//!      │
//!      ▼  group by (restaurant, menu), sum quantity
//! DishVolume[]
//!      │
//!      ▼  per restaurant: total = Σ quantity, best dish = max quantity
//! RestaurantVolume[]
//!      │
//!      ▼  sort total desc, restaurant_id asc; take limit
//! ranking
//! ```
//!
//! Name resolution happens afterwards in the service layer, so a deleted
//! restaurant or dish only degrades its own label.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::types::Role;

/// Ordered quantity of one dish at one restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishVolume {
    pub restaurant_id: String,
    pub menu_id: String,
    pub quantity: i64,
}

/// Aggregated volume of one restaurant with its best-selling dish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantVolume {
    pub restaurant_id: String,
    pub total_quantity: i64,
    pub top_menu_id: String,
    pub top_menu_quantity: i64,
}

/// Ranks restaurants by total ordered quantity.
///
/// Rows for the same (restaurant, menu) pair are summed first, so callers may
/// pass raw order lines or pre-grouped rows.
///
/// ## Determinism
/// - Restaurants: total descending, then restaurant id ascending
/// - Best dish: quantity descending, then menu id ascending
///
/// ## Example
/// ```rust
/// use forkful_core::report::{rank_restaurants, DishVolume};
///
/// let rows = vec![
///     DishVolume { restaurant_id: "a".into(), menu_id: "pasta".into(), quantity: 2 },
///     DishVolume { restaurant_id: "b".into(), menu_id: "soup".into(), quantity: 5 },
///     DishVolume { restaurant_id: "a".into(), menu_id: "salad".into(), quantity: 1 },
/// ];
///
/// let ranking = rank_restaurants(&rows, 10);
/// assert_eq!(ranking[0].restaurant_id, "b");
/// assert_eq!(ranking[1].total_quantity, 3);
/// assert_eq!(ranking[1].top_menu_id, "pasta");
/// ```
pub fn rank_restaurants(rows: &[DishVolume], limit: usize) -> Vec<RestaurantVolume> {
    // restaurant -> menu -> quantity
    let mut grouped: BTreeMap<&str, BTreeMap<&str, i64>> = BTreeMap::new();
    for row in rows {
        *grouped
            .entry(row.restaurant_id.as_str())
            .or_default()
            .entry(row.menu_id.as_str())
            .or_insert(0) += row.quantity;
    }

    let mut ranking: Vec<RestaurantVolume> = grouped
        .into_iter()
        .filter_map(|(restaurant_id, dishes)| {
            let total_quantity: i64 = dishes.values().sum();
            // BTreeMap iterates menu ids ascending; keep the first maximum
            let (top_menu_id, top_menu_quantity) =
                dishes.iter().fold(None, |best: Option<(&str, i64)>, (menu, qty)| match best {
                    Some((_, best_qty)) if best_qty >= *qty => best,
                    _ => Some((*menu, *qty)),
                })?;

            Some(RestaurantVolume {
                restaurant_id: restaurant_id.to_string(),
                total_quantity,
                top_menu_id: top_menu_id.to_string(),
                top_menu_quantity,
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
    });
    ranking.truncate(limit);
    ranking
}

// =============================================================================
// Report Rows
// =============================================================================

/// One entry of the popular restaurants report.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PopularRestaurant {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub top_dish: String,
    pub top_dish_quantity: i64,
    pub total_quantity: i64,
}

/// Active user count for one role.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoleCount {
    pub role: Role,
    pub count: i64,
}

/// Snapshot of platform activity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ActivitySnapshot {
    /// One entry per role, zero counts included.
    pub active_users: Vec<RoleCount>,
    pub total_restaurants: i64,
    /// Orders in placed, preparing or out-for-delivery.
    pub active_orders: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
