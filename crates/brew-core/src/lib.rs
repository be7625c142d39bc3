//! # brew-core: Pure Business Logic for Brew POS
//!
//! This crate is the **heart** of Brew POS. It holds the order calculator,
//! the loyalty program rules and the domain types, as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brew POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`brew`)                            │   │
//! │  │    product ──► customer ──► sale checkout ──► sale history      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brew-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │  loyalty  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Order   │  │  Policy   │  │   │
//! │  │   │ Customer  │  │           │  │ LineItem  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ checkout  │  │   ports   │  │    ids    │  │validation │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CLOCK • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 brew-store (Flat-file Layer)                    │   │
//! │  │          products.txt, customers.txt, transactions.txt          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product (coffee / snack) and Customer
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - Cart / transaction with its totals and loyalty math
//! - [`loyalty`] - Program constants and point conversions
//! - [`checkout`] - Completing an order against the customer ledger
//! - [`ports`] - Catalog and CustomerLedger collaborator traits
//! - [`ids`] - Per-repository sequence counters
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use brew_core::{LoyaltyPolicy, Money, Order};
//!
//! let policy = LoyaltyPolicy::default();
//! assert!(!policy.can_redeem(5, 100));
//!
//! let mut order = Order::new(policy);
//! order.add_item(7, "Flat White", Money::from_major(28000), 1).unwrap();
//! order.add_item(7, "Flat White", Money::from_major(28000), 1).unwrap();
//! assert_eq!(order.items().len(), 1);
//! assert_eq!(order.points_earned(), 56);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod ids;
pub mod loyalty;
pub mod money;
pub mod order;
pub mod ports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::complete_order;
pub use error::{CoreError, CoreResult, ValidationError};
pub use ids::IdSequence;
pub use loyalty::LoyaltyPolicy;
pub use money::Money;
pub use order::{LineItem, Order, OrderSnapshot};
pub use ports::{Catalog, CatalogEntry, CustomerLedger};
pub use types::*;
