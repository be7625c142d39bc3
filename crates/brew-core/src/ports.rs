//! # Collaborator Ports
//!
//! The two lookups the order calculator needs from the outside world.
//!
//! ```text
//! ┌──────────────┐   lookup(id)    ┌──────────────────────────┐
//! │    Order     │ ──────────────► │ Catalog                  │
//! │  (cart ops)  │                 │  brew-store: products    │
//! └──────┬───────┘                 └──────────────────────────┘
//!        │ complete_order
//!        ▼
//! ┌──────────────┐  balance/credit/debit  ┌───────────────────────┐
//! │   checkout   │ ─────────────────────► │ CustomerLedger        │
//! └──────────────┘                        │  brew-store: customers │
//!                                         └───────────────────────┘
//! ```
//!
//! Plain in-memory collections implement both traits, which keeps the
//! calculator testable without touching the file system.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::loyalty::LoyaltyPolicy;
use crate::money::Money;
use crate::types::{Customer, CustomerId, Product, ProductId};

/// What the catalog knows about a product at the time of sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub unit_price: Money,
}

/// Read-only product lookup.
pub trait Catalog {
    fn lookup(&self, product_id: ProductId) -> Option<CatalogEntry>;
}

/// Customer points balances.
pub trait CustomerLedger {
    /// Current balance, `None` for an unknown customer.
    fn balance(&self, customer_id: CustomerId) -> Option<i64>;

    /// Adds points. Fails only for an unknown customer or non-positive input.
    fn credit(&mut self, customer_id: CustomerId, points: i64) -> CoreResult<()>;

    /// Removes points if `policy` allows redeeming them against the balance.
    fn debit(
        &mut self,
        customer_id: CustomerId,
        points: i64,
        policy: &LoyaltyPolicy,
    ) -> CoreResult<()>;
}

// =============================================================================
// In-memory implementations
// =============================================================================

impl Catalog for HashMap<ProductId, CatalogEntry> {
    fn lookup(&self, product_id: ProductId) -> Option<CatalogEntry> {
        self.get(&product_id).cloned()
    }
}

impl Catalog for [Product] {
    fn lookup(&self, product_id: ProductId) -> Option<CatalogEntry> {
        self.iter()
            .find(|p| p.id == product_id)
            .map(|p| CatalogEntry {
                name: p.name.clone(),
                unit_price: p.price,
            })
    }
}

impl CustomerLedger for Vec<Customer> {
    fn balance(&self, customer_id: CustomerId) -> Option<i64> {
        self.iter()
            .find(|c| c.id == customer_id)
            .map(Customer::loyalty_points)
    }

    fn credit(&mut self, customer_id: CustomerId, points: i64) -> CoreResult<()> {
        if points <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "points".to_string(),
            }
            .into());
        }
        let customer = self
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or(CoreError::CustomerNotFound(customer_id))?;
        if !customer.add_points(points) {
            return Err(ValidationError::OutOfRange {
                field: "loyalty points".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        Ok(())
    }

    fn debit(
        &mut self,
        customer_id: CustomerId,
        points: i64,
        policy: &LoyaltyPolicy,
    ) -> CoreResult<()> {
        let customer = self
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or(CoreError::CustomerNotFound(customer_id))?;
        policy.check_redeem(customer_id, points, customer.loyalty_points())?;
        customer.redeem_points(points, policy);
        Ok(())
    }
}
