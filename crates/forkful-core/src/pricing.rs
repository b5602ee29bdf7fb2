//! # Pricing Module
//!
//! Turns a cart (menu names + quantities) into priced order lines against one
//! restaurant's menu.
//!
//! ## Flow
//! ```text
//! [{menuName: "Pasta Primavera", quantity: 2}, {menuName: "Caesar Salad", quantity: 1}]
//!      │
//!      ▼  exact name match within the restaurant, available only
//! PricedLine { menu_id, menu_name, quantity: 2, unit_price: 12.99, price: 25.98 }
//! PricedLine { menu_id, menu_name, quantity: 1, unit_price:  8.99, price:  8.99 }
//!      │
//!      ▼
//! total = 34.97
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{MenuItem, OrderLineRequest};
use crate::validation::validate_order_lines;

/// One order line with its price frozen from the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub menu_id: String,
    pub menu_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub price: Money,
}

/// Prices every requested line against `menu`.
///
/// ## Errors
/// - `InvalidInput` if the cart itself is malformed (empty, bad quantity)
///   or a line price does not fit
/// - `InvalidItems` listing every name that is unknown or unavailable
///
/// Lines keep the order they were requested in. Repeated names stay separate
/// lines.
pub fn price_lines(lines: &[OrderLineRequest], menu: &[MenuItem]) -> CoreResult<Vec<PricedLine>> {
    validate_order_lines(lines)?;

    let by_name: HashMap<&str, &MenuItem> = menu
        .iter()
        .filter(|item| item.availability)
        .map(|item| (item.name.as_str(), item))
        .collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut unmatched: Vec<String> = Vec::new();

    for line in lines {
        let name = line.menu_name.trim();
        match by_name.get(name) {
            Some(item) => priced.push(PricedLine {
                menu_id: item.id.clone(),
                menu_name: item.name.clone(),
                quantity: line.quantity,
                unit_price: item.price,
                price: item
                    .price
                    .checked_multiply_quantity(line.quantity)
                    .ok_or_else(too_large)?,
            }),
            None => {
                if !unmatched.iter().any(|n| n == name) {
                    unmatched.push(name.to_string());
                }
            }
        }
    }

    if !unmatched.is_empty() {
        return Err(CoreError::InvalidItems { names: unmatched });
    }

    Ok(priced)
}

/// Sum of the line prices.
///
/// ## Errors
/// - `InvalidInput` if the total does not fit
pub fn order_total(lines: &[PricedLine]) -> CoreResult<Money> {
    lines
        .iter()
        .try_fold(Money::zero(), |total, line| total.checked_add(line.price))
        .ok_or_else(too_large)
}

fn too_large() -> CoreError {
    ValidationError::invalid_format("price", "order total is too large").into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn menu_item(id: &str, name: &str, cents: i64, availability: bool) -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: id.to_string(),
            restaurant_id: "r1".to_string(),
            name: name.to_string(),
            description: String::new(),
            price: Money::from_cents(cents),
            availability,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(name: &str, quantity: i64) -> OrderLineRequest {
        OrderLineRequest {
            menu_name: name.to_string(),
            quantity,
        }
    }

    fn good_eats() -> Vec<MenuItem> {
        vec![
            menu_item("m1", "Pasta Primavera", 1299, true),
            menu_item("m2", "Caesar Salad", 899, true),
            menu_item("m3", "Tiramisu", 650, false),
        ]
    }

    #[test]
    fn test_prices_good_eats_order() {
        let lines = price_lines(
            &[line("Pasta Primavera", 2), line("Caesar Salad", 1)],
            &good_eats(),
        )
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].price.cents(), 2598);
        assert_eq!(lines[1].price.cents(), 899);
        assert_eq!(order_total(&lines).unwrap().to_string(), "34.97");
    }

    #[test]
    fn test_unknown_and_unavailable_names_are_reported_together() {
        let err = price_lines(
            &[line("Pasta Primavera", 1), line("Tiramisu", 1), line("Soup", 2)],
            &good_eats(),
        )
        .unwrap_err();

        match err {
            CoreError::InvalidItems { names } => assert_eq!(names, vec!["Tiramisu", "Soup"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_name_match_is_exact() {
        assert!(price_lines(&[line("pasta primavera", 1)], &good_eats()).is_err());
    }

    #[test]
    fn test_malformed_cart_is_invalid_input() {
        let err = price_lines(&[line("Caesar Salad", 0)], &good_eats()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_line_price_overflow_is_invalid_input() {
        let menu = vec![menu_item("m1", "Gold Leaf Platter", i64::MAX / 2 + 1, true)];
        let err = price_lines(&[line("Gold Leaf Platter", 2)], &menu).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_total_overflow_is_invalid_input() {
        let menu = vec![menu_item("m1", "Gold Leaf Platter", i64::MAX / 4, true)];
        let lines = price_lines(
            &[line("Gold Leaf Platter", 3), line("Gold Leaf Platter", 3)],
            &menu,
        )
        .unwrap();
        let err = order_total(&lines).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
