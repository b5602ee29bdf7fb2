//! # Validation Module
//!
//! Input validation for Forkful requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum extractors                                              │
//! │  ├── JSON shape (serde deserialization)                                │
//! │  └── Rejections mapped to InvalidInput                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service call                                                 │
//! │  └── THIS MODULE: field rules (email, price, quantity, ids)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (users.email, menus(restaurant_id, name))                  │
//! │  └── CHECK (quantity > 0, price >= 0)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forkful_core::validation::{validate_email, validate_quantity};
//!
//! assert_eq!(validate_email(" Khyati@Example.com ").unwrap(), "khyati@example.com");
//! assert!(validate_quantity(0).is_err());
//! ```

use serde_json::Value;
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::OrderLineRequest;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default and maximum page sizes for paginated listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates and normalizes an email address.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - Exactly one `@`, non-empty local part, domain containing a `.`
/// - No whitespace
///
/// ## Returns
/// The trimmed, lowercased address (emails are unique case-insensitively).
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(
            "email",
            "must be a valid email address",
        ));
    }

    Ok(email.to_lowercase())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a display name (restaurant, menu item, address, ...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Returns
/// The trimmed value.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(value.to_string())
}

/// Validates a menu search query.
///
/// ## Rules
/// - Can be empty (returns all menus)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Checks that an identifier is a well-formed UUID.
///
/// Malformed ids never reach the store; they fail as [`CoreError::InvalidId`].
pub fn validate_id(id: &str) -> Result<(), CoreError> {
    Uuid::parse_str(id.trim())
        .map(|_| ())
        .map_err(|_| CoreError::InvalidId(id.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of one order line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the lines of a cart before any menu lookup runs.
///
/// ## Rules
/// - At least one line, at most MAX_ORDER_LINES
/// - Every line names a menu item and has a valid quantity
pub fn validate_order_lines(lines: &[OrderLineRequest]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if lines.len() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    for line in lines {
        if line.menu_name.trim().is_empty() {
            return Err(ValidationError::required("menuName"));
        }
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

/// Parses a menu price from a JSON value.
///
/// Accepts a JSON number (`12.99`) or a numeric string (`"12.99"`). The
/// number's textual form is parsed digit by digit, so no rounding happens.
///
/// ## Rules
/// - Must be numeric, at most two decimal places
/// - Must be ≥ 0 and at most MAX_PRICE_CENTS (100,000.00)
///
/// ## Example
/// ```rust
/// use forkful_core::validation::parse_price;
/// use serde_json::json;
///
/// assert_eq!(parse_price(&json!(12.99)).unwrap().cents(), 1299);
/// assert_eq!(parse_price(&json!("8.99")).unwrap().cents(), 899);
/// assert!(parse_price(&json!("cheap")).is_err());
/// assert!(parse_price(&json!(-1)).is_err());
/// ```
pub fn parse_price(value: &Value) -> ValidationResult<Money> {
    let price = match value {
        Value::Number(n) => Money::parse_decimal(&n.to_string())?,
        Value::String(s) => Money::parse_decimal(s)?,
        Value::Null => return Err(ValidationError::required("price")),
        _ => {
            return Err(ValidationError::invalid_format(
                "price",
                "must be a number",
            ))
        }
    };

    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS / 100,
        });
    }

    Ok(price)
}

/// Parses a menu availability flag. Only a JSON boolean is accepted.
pub fn parse_availability(value: &Value) -> ValidationResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Err(ValidationError::required("availability")),
        _ => Err(ValidationError::invalid_format(
            "availability",
            "must be a boolean",
        )),
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// A validated page request (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Builds a page from optional query parameters.
    ///
    /// Missing values default to page 1 and DEFAULT_PAGE_SIZE.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> ValidationResult<Page> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE as i64);

        if page < 1 || page > u32::MAX as i64 {
            return Err(ValidationError::MustBePositive {
                field: "page".to_string(),
            });
        }

        if limit < 1 || limit > MAX_PAGE_SIZE as i64 {
            return Err(ValidationError::OutOfRange {
                field: "limit".to_string(),
                min: 1,
                max: MAX_PAGE_SIZE as i64,
            });
        }

        Ok(Page {
            page: page as u32,
            limit: limit as u32,
        })
    }

    /// Row offset of the first entry on this page.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
