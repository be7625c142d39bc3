//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Brew POS                               │
//! │                                                                         │
//! │  brew sale checkout --customer 3 --item 1x2 --redeem 5                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── StoreError::Io(..) ────────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule violated? ─── CoreError::BelowMinimum.. ── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─────────────────────────── JSON on stdout ───────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code": "LOYALTY_ERROR", "message": "At least 10 points ..."} │
//! │  exit status 1                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brew_core::CoreError;
use brew_store::StoreError;
use serde::Serialize;

/// API error returned from commands.
///
/// ## Serialization
/// This is what the operator sees when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: 12"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, customer or order does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Reading or writing the data files failed
    StorageError,

    /// Cart operation failed
    CartError,

    /// Points redemption refused
    LoyaltyError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Creates a loyalty error.
    pub fn loyalty(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::LoyaltyError, message)
    }

    /// JSON form printed on stderr.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::CustomerNotFound(id) => ApiError::not_found("Customer", id),
            CoreError::EmptyOrder => ApiError::cart("Cart is empty"),
            err @ (CoreError::BelowMinimumRedemption { .. }
            | CoreError::InsufficientPoints { .. }
            | CoreError::GuestCannotRedeem) => ApiError::loyalty(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            StoreError::Duplicate { entity, id } => {
                ApiError::validation(format!("{} {} already exists", entity, id))
            }
            StoreError::InvalidRecord { entity, reason } => {
                ApiError::validation(format!("Invalid {}: {}", entity, reason))
            }
            err @ StoreError::Malformed { .. } => {
                ApiError::new(ErrorCode::StorageError, err.to_string())
            }
            StoreError::Io(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Data file I/O failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Data file operation failed")
            }
            StoreError::Csv(e) => {
                tracing::error!("Record I/O failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Data file operation failed")
            }
            StoreError::Core(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::ValidationError;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::EmptyOrder.into();
        assert_eq!(err.code, ErrorCode::CartError);

        let err: ApiError = CoreError::BelowMinimumRedemption {
            requested: 5,
            min: 10,
        }
        .into();
        assert_eq!(err.code, ErrorCode::LoyaltyError);
        assert_eq!(err.message, "At least 10 points must be redeemed, requested 5");

        let err: ApiError = CoreError::ProductNotFound(7).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 7");
    }

    #[test]
    fn test_store_errors_map_to_codes() {
        let err: ApiError = StoreError::not_found("Customer", 12).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = StoreError::from(ValidationError::Required {
            field: "name".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ApiError = StoreError::Io(io).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(err.message, "Data file operation failed");
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = ApiError::loyalty("nope").to_json();
        assert!(json.contains("\"code\": \"LOYALTY_ERROR\""));
        assert!(json.contains("\"message\": \"nope\""));
    }
}
