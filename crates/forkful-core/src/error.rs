//! # Error Types
//!
//! Domain error taxonomy for forkful-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forkful-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  forkful-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see ({code, message})        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP status            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Each variant maps to exactly one class of HTTP response at the API
/// boundary, so the variant set is the platform's error taxonomy.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing input (wraps ValidationError).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// An id or name could not be resolved.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Some requested menu items do not exist or are unavailable.
    ///
    /// ## User Workflow
    /// ```text
    /// placeOrder("Good Eats", [Pasta Primavera ×2, Tiramisu ×1])
    ///      │
    ///      ▼
    /// Menu lookup: "Tiramisu" unmatched
    ///      │
    ///      ▼
    /// InvalidItems { names: ["Tiramisu"] }
    /// ```
    #[error("Some menu items are invalid or not available in this restaurant: {}", names.join(", "))]
    InvalidItems { names: Vec<String> },

    /// Caller is authenticated but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The target changed underneath the caller (lost race, duplicate key).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Illegal status change. The message names both states.
    #[error("Invalid {entity} status transition from {from} to {to}")]
    InvalidTransition {
        entity: String,
        from: String,
        to: String,
    },

    /// Identifier is not well formed.
    #[error("Invalid id format: {0}")]
    InvalidId(String),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidTransition error.
    pub fn invalid_transition(
        entity: impl Into<String>,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        CoreError::InvalidTransition {
            entity: entity.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic or storage access runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid email, non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
