//! # Validation Module
//!
//! Input validation for values that end up in the data files.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  ├── Type parsing (ids, quantities, amounts)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required / length checks                                          │
//! │  └── Reserved delimiter characters                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order / Customer invariants                                  │
//! │  └── quantity > 0, price ≥ 0, points ≥ 0                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The record files are `|` separated and order items are `id:qty` pairs
//! joined by `,`, so text fields must not carry those characters or line
//! breaks.

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Characters that would corrupt a record line.
pub const RESERVED_CHARS: &[char] = &['|', ',', ':', '\n', '\r'];

/// Maximum length for names and free-text fields.
pub const MAX_TEXT_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, required: bool) -> ValidationResult<()> {
    let value = value.trim();

    if required && value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    if let Some(character) = value.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(ValidationError::InvalidCharacter {
            field: field.to_string(),
            character,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use brew_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Iced Latte").is_ok());
/// assert!(validate_product_name("").is_err());
/// assert!(validate_product_name("Latte|Large").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, true)
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, true)
}

/// Validates a shot size or snack category. Empty means "use the default".
pub fn validate_extra_field(value: &str) -> ValidationResult<()> {
    validate_text("extra field", value, false)
}

/// Validates a phone number.
///
/// ## Rules
/// - May be empty (walk-in members without a phone)
/// - Digits plus `+`, `-`, spaces and parentheses only
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    validate_text("phone", phone, false)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+', '-', '(' and ')'".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity (> 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use brew_core::money::Money;
/// use brew_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_major(15000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_minor(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a points amount (≥ 0).
pub fn validate_points(points: i64) -> ValidationResult<()> {
    if points < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "points".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
