//! # Domain Types
//!
//! Catalog and customer types used throughout Brew POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   ProductKind   │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Coffee         │   │  id             │       │
//! │  │  name           │──►│   shot_size     │   │  name           │       │
//! │  │  price (Money)  │   │  Snack          │   │  phone          │       │
//! │  │  kind           │   │   category      │   │  loyalty_points │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Orders and line items live in [`crate::order`].                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::loyalty::LoyaltyPolicy;
use crate::money::Money;

/// Product identifier. Positive for stored products.
pub type ProductId = u32;

/// Customer identifier. Zero is reserved for guests in the record format.
pub type CustomerId = u32;

/// Order identifier. Assigned on completion.
pub type OrderId = u32;

/// Shot size used when none is given.
pub const DEFAULT_SHOT_SIZE: &str = "single";

/// Snack category used when none is given.
pub const DEFAULT_SNACK_CATEGORY: &str = "other";

// =============================================================================
// Product Type
// =============================================================================

/// The discriminant of a [`ProductKind`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Coffee,
    Snack,
}

impl ProductType {
    /// The tag written to the `type` column of `products.txt`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductType::Coffee => "coffee",
            ProductType::Snack => "snack",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coffee" => Ok(ProductType::Coffee),
            "snack" => Ok(ProductType::Snack),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["coffee".to_string(), "snack".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Subtype payload of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductKind {
    /// Espresso-based drink; `shot_size` is free text such as `single`.
    Coffee { shot_size: String },
    /// Packaged or bakery item grouped by `category`.
    Snack { category: String },
}

impl ProductKind {
    /// Builds a kind from its type tag and the extra field.
    ///
    /// An empty extra field falls back to the subtype default.
    pub fn from_parts(product_type: ProductType, extra_field: &str) -> Self {
        let extra = extra_field.trim();
        match product_type {
            ProductType::Coffee => ProductKind::Coffee {
                shot_size: if extra.is_empty() {
                    DEFAULT_SHOT_SIZE.to_string()
                } else {
                    extra.to_string()
                },
            },
            ProductType::Snack => ProductKind::Snack {
                category: if extra.is_empty() {
                    DEFAULT_SNACK_CATEGORY.to_string()
                } else {
                    extra.to_string()
                },
            },
        }
    }

    pub fn product_type(&self) -> ProductType {
        match self {
            ProductKind::Coffee { .. } => ProductType::Coffee,
            ProductKind::Snack { .. } => ProductType::Snack,
        }
    }

    /// Shot size for coffee, category for snacks.
    pub fn extra_field(&self) -> &str {
        match self {
            ProductKind::Coffee { shot_size } => shot_size,
            ProductKind::Snack { category } => category,
        }
    }
}

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit price.
    pub price: Money,

    #[serde(flatten)]
    pub kind: ProductKind,
}

impl Product {
    pub fn coffee(id: ProductId, name: impl Into<String>, price: Money, shot_size: &str) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            kind: ProductKind::from_parts(ProductType::Coffee, shot_size),
        }
    }

    pub fn snack(id: ProductId, name: impl Into<String>, price: Money, category: &str) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            kind: ProductKind::from_parts(ProductType::Snack, category),
        }
    }

    #[inline]
    pub fn product_type(&self) -> ProductType {
        self.kind.product_type()
    }

    /// Menu-board description.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::{Money, Product};
    ///
    /// let latte = Product::coffee(1, "Latte", Money::from_major(25000), "double");
    /// assert_eq!(latte.description(), "Latte (double shot)");
    ///
    /// let cookie = Product::snack(2, "Cookie", Money::from_major(12000), "bakery");
    /// assert_eq!(cookie.description(), "Cookie [bakery]");
    /// ```
    pub fn description(&self) -> String {
        match &self.kind {
            ProductKind::Coffee { shot_size } => format!("{} ({} shot)", self.name, shot_size),
            ProductKind::Snack { category } => format!("{} [{}]", self.name, category),
        }
    }

    /// A product can be stored when it has an id, a name and a sane price.
    pub fn is_valid(&self) -> bool {
        self.id > 0 && !self.name.trim().is_empty() && !self.price.is_negative()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A loyalty-program member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    /// Points balance; never negative.
    loyalty_points: i64,
}

impl Customer {
    /// Creates a customer. A negative opening balance is clamped to zero.
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        phone: impl Into<String>,
        loyalty_points: i64,
    ) -> Self {
        Customer {
            id,
            name: name.into(),
            phone: phone.into(),
            loyalty_points: loyalty_points.max(0),
        }
    }

    #[inline]
    pub fn loyalty_points(&self) -> i64 {
        self.loyalty_points
    }

    /// Overwrites the balance. Negative values are ignored.
    pub fn set_loyalty_points(&mut self, points: i64) {
        if points >= 0 {
            self.loyalty_points = points;
        }
    }

    /// Adds earned points.
    ///
    /// ## Returns
    /// `false` when nothing changed: `points` is not positive or the
    /// balance would overflow.
    pub fn add_points(&mut self, points: i64) -> bool {
        if points <= 0 {
            return false;
        }
        match self.loyalty_points.checked_add(points) {
            Some(balance) => {
                self.loyalty_points = balance;
                true
            }
            None => false,
        }
    }

    pub fn can_redeem(&self, points: i64, policy: &LoyaltyPolicy) -> bool {
        policy.can_redeem(points, self.loyalty_points)
    }

    /// Deducts redeemed points if the request is eligible.
    ///
    /// ## Returns
    /// * `true` - balance decreased by `points`
    /// * `false` - below the minimum or above the balance; nothing changed
    pub fn redeem_points(&mut self, points: i64, policy: &LoyaltyPolicy) -> bool {
        if !self.can_redeem(points, policy) {
            return false;
        }
        self.loyalty_points -= points;
        true
    }

    pub fn is_valid(&self) -> bool {
        self.id > 0 && !self.name.trim().is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_kind_defaults() {
        let coffee = Product::coffee(1, "Espresso", Money::from_major(18000), "");
        assert_eq!(coffee.kind.extra_field(), DEFAULT_SHOT_SIZE);

        let snack = Product::snack(2, "Croissant", Money::from_major(15000), "  ");
        assert_eq!(snack.kind.extra_field(), DEFAULT_SNACK_CATEGORY);
        assert_eq!(snack.product_type(), ProductType::Snack);
    }

    #[test]
    fn test_product_type_parse() {
        assert_eq!("coffee".parse::<ProductType>().unwrap(), ProductType::Coffee);
        assert_eq!(" Snack ".parse::<ProductType>().unwrap(), ProductType::Snack);
        assert!("tea".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_product_validity() {
        assert!(Product::coffee(1, "Latte", Money::zero(), "single").is_valid());
        assert!(!Product::coffee(0, "Latte", Money::zero(), "single").is_valid());
        assert!(!Product::coffee(1, " ", Money::zero(), "single").is_valid());
        assert!(!Product::coffee(1, "Latte", Money::from_minor(-1), "single").is_valid());
    }

    #[test]
    fn test_customer_points() {
        let policy = LoyaltyPolicy::default();
        let mut c = Customer::new(1, "Ayu", "0812", 100);

        assert!(!c.add_points(-5));
        assert_eq!(c.loyalty_points(), 100);

        let mut rich = Customer::new(2, "Budi", "0813", i64::MAX - 1);
        assert!(!rich.add_points(2));
        assert_eq!(rich.loyalty_points(), i64::MAX - 1);
        assert!(rich.add_points(1));

        assert!(!c.redeem_points(5, &policy));
        assert!(!c.redeem_points(200, &policy));
        assert_eq!(c.loyalty_points(), 100);

        assert!(c.redeem_points(40, &policy));
        assert_eq!(c.loyalty_points(), 60);

        c.set_loyalty_points(-1);
        assert_eq!(c.loyalty_points(), 60);
    }

    #[test]
    fn test_customer_negative_opening_balance_clamped() {
        let c = Customer::new(1, "Budi", "", -20);
        assert_eq!(c.loyalty_points(), 0);
    }

    #[test]
    fn test_product_json_shape() {
        let p = Product::coffee(7, "Latte", Money::from_major(25000), "double");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "coffee");
        assert_eq!(json["shot_size"], "double");
    }
}
