//! # Record Codecs
//!
//! Maps each persisted entity to and from one `|` separated line.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ products.txt     │ id|name|price|type|extraField                        │
//! │ customers.txt    │ id|name|phone|loyaltyPoints                          │
//! │ transactions.txt │ id|customerId|dateTime|total|earned|used|items       │
//! │                  │ customerId 0 = guest, items = pid:qty,pid:qty        │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding is strict about shape and numbers and lenient about text: a
//! record that decodes but fails [`Record::is_valid`] is still rejected by
//! the loader.

use std::fmt;
use std::str::FromStr;

use brew_core::{
    Customer, LineItem, LoyaltyPolicy, Money, Order, OrderSnapshot, Product, ProductKind,
    ProductType,
};
use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::error::DecodeError;

/// Timestamp layout in transactions.txt (local time, second precision).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Customer id written for guest orders.
pub const GUEST_CUSTOMER_ID: u32 = 0;

/// An entity stored one-per-line in its own file.
pub trait Record: Sized + Clone {
    /// Extra input needed to rebuild a record (the loyalty policy for orders).
    type Context: Clone + fmt::Debug;

    const FILE_NAME: &'static str;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    fn id(&self) -> u32;

    fn is_valid(&self) -> bool;

    fn to_fields(&self) -> Vec<String>;

    fn from_fields(fields: &StringRecord, context: &Self::Context) -> Result<Self, DecodeError>;
}

// =============================================================================
// Field Helpers
// =============================================================================

fn require_len(fields: &StringRecord, min: usize) -> Result<(), DecodeError> {
    if fields.len() < min {
        return Err(DecodeError::new(format!(
            "expected {min} fields, found {}",
            fields.len()
        )));
    }
    Ok(())
}

fn text(fields: &StringRecord, index: usize) -> &str {
    fields.get(index).unwrap_or_default()
}

fn parse<T: FromStr>(fields: &StringRecord, index: usize, name: &str) -> Result<T, DecodeError> {
    let raw = text(fields, index);
    raw.parse()
        .map_err(|_| DecodeError::new(format!("invalid {name}: {raw:?}")))
}

// =============================================================================
// Product
// =============================================================================

impl Record for Product {
    type Context = ();

    const FILE_NAME: &'static str = "products.txt";
    const ENTITY: &'static str = "Product";

    fn id(&self) -> u32 {
        self.id
    }

    fn is_valid(&self) -> bool {
        Product::is_valid(self)
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.price.to_string(),
            self.product_type().to_string(),
            self.kind.extra_field().to_string(),
        ]
    }

    fn from_fields(fields: &StringRecord, _: &()) -> Result<Self, DecodeError> {
        require_len(fields, 5)?;
        let product_type: ProductType = parse(fields, 3, "product type")?;

        Ok(Product {
            id: parse(fields, 0, "id")?,
            name: text(fields, 1).to_string(),
            price: parse::<Money>(fields, 2, "price")?,
            kind: ProductKind::from_parts(product_type, text(fields, 4)),
        })
    }
}

// =============================================================================
// Customer
// =============================================================================

impl Record for Customer {
    type Context = ();

    const FILE_NAME: &'static str = "customers.txt";
    const ENTITY: &'static str = "Customer";

    fn id(&self) -> u32 {
        self.id
    }

    fn is_valid(&self) -> bool {
        Customer::is_valid(self)
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.phone.clone(),
            self.loyalty_points().to_string(),
        ]
    }

    fn from_fields(fields: &StringRecord, _: &()) -> Result<Self, DecodeError> {
        require_len(fields, 4)?;
        Ok(Customer::new(
            parse(fields, 0, "id")?,
            text(fields, 1),
            text(fields, 2),
            parse(fields, 3, "loyalty points")?,
        ))
    }
}

// =============================================================================
// Order
// =============================================================================

/// Encodes items as `pid:qty` pairs joined by `,`.
pub fn encode_items(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}:{}", item.product_id, item.quantity))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes `pid:qty,pid:qty`.
///
/// Names and prices are left empty; the order repository fills them from
/// the catalog. Pairs with product id 0 or a non-positive quantity are
/// dropped, anything non-numeric fails the whole record.
pub fn decode_items(raw: &str) -> Result<Vec<LineItem>, DecodeError> {
    let mut items = Vec::new();

    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (pid, qty) = pair
            .split_once(':')
            .ok_or_else(|| DecodeError::new(format!("invalid item {pair:?}")))?;
        let product_id: u32 = pid
            .trim()
            .parse()
            .map_err(|_| DecodeError::new(format!("invalid item product id {pid:?}")))?;
        let quantity: i64 = qty
            .trim()
            .parse()
            .map_err(|_| DecodeError::new(format!("invalid item quantity {qty:?}")))?;

        if product_id == 0 || quantity <= 0 {
            continue;
        }
        items.push(LineItem::new(product_id, "", Money::zero(), quantity));
    }

    Ok(items)
}

impl Record for Order {
    type Context = LoyaltyPolicy;

    const FILE_NAME: &'static str = "transactions.txt";
    const ENTITY: &'static str = "Transaction";

    fn id(&self) -> u32 {
        Order::id(self).unwrap_or_default()
    }

    fn is_valid(&self) -> bool {
        Order::id(self).is_some_and(|id| id > 0) && self.has_items()
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            Record::id(self).to_string(),
            self.customer_id().unwrap_or(GUEST_CUSTOMER_ID).to_string(),
            self.completed_at()
                .map(|at| at.format(DATE_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            self.total().to_string(),
            self.points_earned().to_string(),
            self.points_used().to_string(),
            encode_items(self.items()),
        ]
    }

    fn from_fields(fields: &StringRecord, policy: &LoyaltyPolicy) -> Result<Self, DecodeError> {
        require_len(fields, 7)?;

        let customer_id: u32 = parse(fields, 1, "customer id")?;
        let raw_date = text(fields, 2);
        let completed_at = NaiveDateTime::parse_from_str(raw_date, DATE_TIME_FORMAT)
            .map_err(|_| DecodeError::new(format!("invalid date time: {raw_date:?}")))?;

        let snapshot = OrderSnapshot {
            id: parse(fields, 0, "id")?,
            customer_id: (customer_id != GUEST_CUSTOMER_ID).then_some(customer_id),
            completed_at,
            total: parse(fields, 3, "total")?,
            points_earned: parse(fields, 4, "points earned")?,
            points_used: parse(fields, 5, "points used")?,
            items: decode_items(text(fields, 6))?,
        };

        Ok(Order::restore(snapshot, *policy))
    }
}
