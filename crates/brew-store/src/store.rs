//! # Store
//!
//! Opens the data directory and holds the three repositories together.
//!
//! ## Open Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store::open(config)                                                    │
//! │    1. create data directory if missing                                  │
//! │    2. products.load()                                                   │
//! │    3. customers.load()                                                  │
//! │    4. orders.load_with(&products)   ← needs the catalog for item names  │
//! │                                                                         │
//! │  Store::complete_order(cart, now)                                       │
//! │    checkout against customers + order id sequence, then append          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use brew_core::{LoyaltyPolicy, Order};
use chrono::NaiveDateTime;
use tracing::info;

use crate::data_dir::DataDir;
use crate::error::StoreResult;
use crate::repository::{CustomerRepository, OrderRepository, ProductRepository};

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding products.txt, customers.txt and transactions.txt.
    pub data_dir: PathBuf,

    /// Loyalty rules used to rebuild history and to price new orders.
    pub policy: LoyaltyPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            policy: LoyaltyPolicy::default(),
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: LoyaltyPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Everything persisted by the shop.
#[derive(Debug)]
pub struct Store {
    dir: DataDir,
    policy: LoyaltyPolicy,
    pub products: ProductRepository,
    pub customers: CustomerRepository,
    pub orders: OrderRepository,
}

impl Store {
    /// Opens the data directory and loads every file.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let dir = DataDir::create(&config.data_dir)?;

        let mut products = ProductRepository::new(dir.clone());
        let mut customers = CustomerRepository::new(dir.clone());
        let mut orders = OrderRepository::new(dir.clone(), config.policy);

        products.load()?;
        customers.load()?;
        orders.load_with(&products)?;

        info!(
            path = %dir.root().display(),
            products = products.count(),
            customers = customers.count(),
            orders = orders.count(),
            "Store opened"
        );

        Ok(Store {
            dir,
            policy: config.policy,
            products,
            customers,
            orders,
        })
    }

    pub fn data_dir(&self) -> &DataDir {
        &self.dir
    }

    pub fn policy(&self) -> &LoyaltyPolicy {
        &self.policy
    }

    /// An empty guest cart priced with this store's policy.
    pub fn new_cart(&self) -> Order {
        Order::new(self.policy)
    }

    /// Completes `cart`, records it in history and returns it.
    ///
    /// The cart is replaced with an empty guest order on success and left
    /// untouched on failure. Nothing is written to disk; call
    /// [`save_all`](Self::save_all) afterwards.
    pub fn complete_order(&mut self, cart: &mut Order, now: NaiveDateTime) -> StoreResult<Order> {
        let completed =
            brew_core::complete_order(cart, &mut self.customers, self.orders.ids_mut(), now)?;
        self.orders.append(completed.clone())?;
        Ok(completed)
    }

    /// Rewrites all three data files.
    pub fn save_all(&self) -> StoreResult<()> {
        self.products.save()?;
        self.customers.save()?;
        self.orders.save()?;
        info!(path = %self.dir.root().display(), "Store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::{CustomerLedger, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, 26)
            .unwrap()
    }

    fn open(temp: &TempDir) -> Store {
        Store::open(StoreConfig::new(temp.path().join("data"))).unwrap()
    }

    #[test]
    fn test_open_empty_directory() {
        let temp = TempDir::new().unwrap();
        let store = open(&temp);

        assert!(store.data_dir().root().is_dir());
        assert_eq!(store.products.count(), 0);
        assert_eq!(store.customers.count(), 0);
        assert_eq!(store.orders.count(), 0);
    }

    #[test]
    fn test_checkout_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);

        let latte = store
            .products
            .create_coffee("Latte", Money::from_major(15000), "double")
            .unwrap();
        let ayu = store.customers.create_customer("Ayu", "0812").unwrap();
        store.customers.credit(ayu.id, 100).unwrap();

        let mut cart = store.new_cart();
        cart.set_customer(Some(ayu.id));
        cart.add_from_catalog(&store.products, latte.id, 2).unwrap();
        cart.set_points_used(50).unwrap();

        let done = store.complete_order(&mut cart, now()).unwrap();
        assert_eq!(done.total(), Money::from_major(25000));
        assert!(!cart.has_items());
        store.save_all().unwrap();

        let reopened = open(&temp);
        assert_eq!(reopened.customers.balance(ayu.id), Some(75));
        let order = reopened.orders.get(1).unwrap();
        assert_eq!(order.items()[0].product_name, "Latte");
        assert_eq!(order.discount(), Money::from_major(5000));
        assert_eq!(order.subtotal(), Money::from_major(30000));
        assert_eq!(reopened.orders.total_revenue(), Money::from_major(25000));
    }

    #[test]
    fn test_failed_checkout_records_nothing() {
        let temp = TempDir::new().unwrap();
        let mut store = open(&temp);
        let mut cart = store.new_cart();

        assert!(store.complete_order(&mut cart, now()).is_err());
        assert_eq!(store.orders.count(), 0);
    }
}
