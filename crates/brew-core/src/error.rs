//! # Error Types
//!
//! Domain-specific error types for brew-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brew-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  brew-store errors (separate crate)                                    │
//! │  └── StoreError       - File read/write failures                       │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → stderr    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is local and reported straight back to the caller. There are
//! no retries and no fatal/recoverable split.

use thiserror::Error;

use crate::types::{CustomerId, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Customer id is not in the ledger.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Checkout was attempted on a cart with no line items.
    #[error("Order has no items")]
    EmptyOrder,

    /// Redemption request below the program minimum.
    ///
    /// ## User Workflow
    /// ```text
    /// Cashier enters: redeem 5 points
    ///      │
    ///      ▼
    /// can_redeem(5, balance) → false (minimum is 10)
    ///      │
    ///      ▼
    /// UI shows: "At least 10 points must be redeemed, requested 5"
    /// ```
    #[error("At least {min} points must be redeemed, requested {requested}")]
    BelowMinimumRedemption { requested: i64, min: i64 },

    /// Redemption request larger than the customer's balance.
    #[error("Customer {customer_id} has {available} points, requested {requested}")]
    InsufficientPoints {
        customer_id: CustomerId,
        available: i64,
        requested: i64,
    },

    /// Points were requested on an order with no customer attached.
    #[error("Guest orders cannot redeem loyalty points")]
    GuestCannotRedeem,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state changes, so a rejected call never leaves a
/// half-applied mutation behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unparsable amount, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Text contains a character reserved by the record format.
    #[error("{field} must not contain '{character}'")]
    InvalidCharacter { field: String, character: char },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPoints {
            customer_id: 3,
            available: 100,
            requested: 200,
        };
        assert_eq!(err.to_string(), "Customer 3 has 100 points, requested 200");

        let err = CoreError::BelowMinimumRedemption {
            requested: 5,
            min: 10,
        };
        assert_eq!(
            err.to_string(),
            "At least 10 points must be redeemed, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidCharacter {
            field: "name".to_string(),
            character: '|',
        };
        assert_eq!(err.to_string(), "name must not contain '|'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
