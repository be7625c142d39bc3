//! # Register State
//!
//! The open store plus the cart being rung up.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Customer │────►│Completed │       │
//! │  │  (guest) │     │          │     │ + points │     │  Order   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │                   add / remove                      saved, cart         │
//! │                   set quantity                      back to empty       │
//! │                        │                                                │
//! │                   cancel ─────► empty guest cart, no ledger effects     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All catalog and ledger checks happen here so the cart never holds an
//! unknown product or an ineligible redemption.

use brew_core::{CustomerId, CustomerLedger, Order, ProductId};
use brew_store::Store;
use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::state::ConfigState;

/// Store plus current cart.
#[derive(Debug)]
pub struct RegisterState {
    store: Store,
    cart: Order,
}

impl RegisterState {
    /// Opens the configured data directory with an empty guest cart.
    pub fn open(config: &ConfigState) -> Result<Self, ApiError> {
        let store = Store::open(config.store_config())?;
        Ok(RegisterState::new(store))
    }

    pub fn new(store: Store) -> Self {
        let cart = store.new_cart();
        RegisterState { store, cart }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn cart(&self) -> &Order {
        &self.cart
    }

    /// Adds `quantity` of a catalog product at its current price.
    pub fn add_to_cart(&mut self, product_id: ProductId, quantity: i64) -> Result<(), ApiError> {
        self.cart
            .add_from_catalog(&self.store.products, product_id, quantity)?;
        debug!(product_id, quantity, "Added to cart");
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), ApiError> {
        if !self.cart.remove_item(product_id) {
            return Err(ApiError::cart(format!("Product {} is not in the cart", product_id)));
        }
        Ok(())
    }

    /// Overwrites a line's quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), ApiError> {
        if !self.cart.try_set_item_quantity(product_id, quantity)? {
            return Err(ApiError::cart(format!("Product {} is not in the cart", product_id)));
        }
        Ok(())
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear_items();
    }

    /// Attaches a member to the cart (`None` for guest). Redemption resets.
    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) -> Result<(), ApiError> {
        if let Some(id) = customer_id {
            if self.store.customers.get(id).is_none() {
                return Err(ApiError::not_found("Customer", id));
            }
        }
        self.cart.set_customer(customer_id);
        Ok(())
    }

    /// Sets the points to redeem after checking them against the balance.
    ///
    /// `0` clears a previous redemption.
    pub fn set_points_to_use(&mut self, points: i64) -> Result<(), ApiError> {
        if points == 0 {
            self.cart.set_points_used(0)?;
            return Ok(());
        }

        let customer_id = self
            .cart
            .customer_id()
            .ok_or_else(|| ApiError::loyalty("Attach a customer before redeeming points"))?;
        let balance = self
            .store
            .customers
            .balance(customer_id)
            .ok_or_else(|| ApiError::not_found("Customer", customer_id))?;

        self.store
            .policy()
            .check_redeem(customer_id, points, balance)?;
        self.cart.set_points_used(points)?;
        Ok(())
    }

    /// Completes the cart at the current local time and saves every file.
    pub fn complete(&mut self) -> Result<Order, ApiError> {
        self.complete_at(Local::now().naive_local())
    }

    /// Completes the cart at `now` and saves every file.
    ///
    /// A failed save does not undo the sale: the order stays in history and
    /// is written by the next successful save. The error names its id.
    pub fn complete_at(&mut self, now: NaiveDateTime) -> Result<Order, ApiError> {
        let order = self.store.complete_order(&mut self.cart, now)?;
        if let Err(err) = self.store.save_all() {
            let order_id = order.id().unwrap_or_default();
            error!(order_id, error = %err, "Order completed but data files were not saved");
            let cause = ApiError::from(err);
            return Err(ApiError::new(
                cause.code,
                format!("Order {} completed but not saved: {}", order_id, cause.message),
            ));
        }
        Ok(order)
    }

    /// Drops the cart without touching the ledger.
    pub fn cancel(&mut self) {
        if self.cart.has_items() {
            info!(items = self.cart.item_count(), "Cart cancelled");
        }
        self.cart = self.store.new_cart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use brew_core::Money;
    use brew_store::StoreConfig;
    use tempfile::TempDir;

    fn register() -> (RegisterState, TempDir) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut store = Store::open(StoreConfig::new(temp.path())).unwrap();
        store
            .products
            .create_coffee("Latte", Money::from_major(15000), "double")
            .unwrap();
        store
            .products
            .create_snack("Donut", Money::from_major(9000), "pastry")
            .unwrap();
        let ayu = store.customers.create_customer("Ayu", "0812").unwrap();
        store.customers.credit(ayu.id, 100).unwrap();
        (RegisterState::new(store), temp)
    }

    #[test]
    fn test_add_same_product_twice_merges() {
        let (mut reg, _temp) = register();
        reg.add_to_cart(1, 1).unwrap();
        reg.add_to_cart(1, 1).unwrap();

        assert_eq!(reg.cart().items().len(), 1);
        assert_eq!(reg.cart().items()[0].quantity, 2);
        assert_eq!(reg.cart().subtotal(), Money::from_major(30000));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let (mut reg, _temp) = register();
        let err = reg.add_to_cart(99, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(!reg.cart().has_items());
    }

    #[test]
    fn test_redemption_checked_against_balance() {
        let (mut reg, _temp) = register();
        reg.add_to_cart(1, 2).unwrap();

        assert_eq!(reg.set_points_to_use(20).unwrap_err().code, ErrorCode::LoyaltyError);

        reg.set_customer(Some(1)).unwrap();
        assert_eq!(reg.set_points_to_use(5).unwrap_err().code, ErrorCode::LoyaltyError);
        assert_eq!(reg.set_points_to_use(200).unwrap_err().code, ErrorCode::LoyaltyError);
        assert_eq!(reg.cart().points_used(), 0);

        reg.set_points_to_use(50).unwrap();
        assert_eq!(reg.cart().total(), Money::from_major(25000));

        reg.set_customer(None).unwrap();
        assert_eq!(reg.cart().points_used(), 0);
    }

    #[test]
    fn test_complete_saves_and_resets() {
        let (mut reg, temp) = register();
        reg.set_customer(Some(1)).unwrap();
        reg.add_to_cart(1, 2).unwrap();
        reg.set_points_to_use(50).unwrap();

        let order = reg.complete().unwrap();

        assert_eq!(order.id(), Some(1));
        assert_eq!(order.points_earned(), 25);
        assert!(reg.cart().is_guest());
        assert!(!reg.cart().has_items());

        let reopened = Store::open(StoreConfig::new(temp.path())).unwrap();
        assert_eq!(reopened.customers.balance(1), Some(75));
        assert_eq!(reopened.orders.count(), 1);
    }

    #[test]
    fn test_cart_edits_and_cancel() {
        let (mut reg, _temp) = register();
        reg.add_to_cart(1, 1).unwrap();
        reg.add_to_cart(2, 3).unwrap();

        reg.update_quantity(2, 1).unwrap();
        assert_eq!(reg.cart().item_count(), 2);
        assert!(reg.remove_from_cart(5).is_err());
        reg.update_quantity(1, 0).unwrap();
        assert_eq!(reg.cart().items().len(), 1);

        reg.set_customer(Some(1)).unwrap();
        reg.cancel();
        assert!(!reg.cart().has_items());
        assert!(reg.cart().is_guest());
        assert_eq!(reg.store().customers.balance(1), Some(100));
        assert_eq!(reg.complete().unwrap_err().code, ErrorCode::CartError);
    }

    #[test]
    fn test_huge_quantity_is_a_validation_error() {
        let (mut reg, _temp) = register();
        let err = reg.add_to_cart(1, 10_000_000_000_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!reg.cart().has_items());

        reg.add_to_cart(1, 2).unwrap();
        let err = reg.update_quantity(1, i64::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(reg.cart().items()[0].quantity, 2);
        assert_eq!(reg.update_quantity(2, 4).unwrap_err().code, ErrorCode::CartError);
    }

    #[test]
    fn test_failed_save_reports_completed_order() {
        let (mut reg, temp) = register();
        reg.set_customer(Some(1)).unwrap();
        reg.add_to_cart(1, 2).unwrap();

        // A plain file where the data directory should be.
        std::fs::remove_dir_all(temp.path()).unwrap();
        std::fs::write(temp.path(), b"").unwrap();

        let err = reg.complete().unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(err.message.starts_with("Order 1 completed but not saved"), "{}", err.message);

        assert_eq!(reg.store().orders.count(), 1);
        assert_eq!(reg.store().customers.balance(1), Some(130));
        assert!(!reg.cart().has_items());

        std::fs::remove_file(temp.path()).unwrap();
    }
}
