//! # Customer Repository
//!
//! Loyalty members persisted in `customers.txt`, plus the points ledger
//! checkout debits and credits.
//!
//! ## Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  balance(id)          → Some(points) / None for unknown id              │
//! │  credit(id, points)   → points > 0, customer must exist                 │
//! │  debit(id, points)    → points ≥ minimum AND points ≤ balance           │
//! │                                                                         │
//! │  Balances never go negative. Changes are in memory until save().       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brew_core::validation::{validate_customer_name, validate_phone, validate_search_query};
use brew_core::{CoreResult, Customer, CustomerId, CustomerLedger, LoyaltyPolicy};
use tracing::{debug, info};

use super::{LoadSummary, Repository};
use crate::data_dir::DataDir;
use crate::error::{StoreError, StoreResult};

/// Repository for loyalty members.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    inner: Repository<Customer>,
}

impl CustomerRepository {
    pub fn new(dir: DataDir) -> Self {
        CustomerRepository {
            inner: Repository::new(dir, ()),
        }
    }

    pub fn all(&self) -> &[Customer] {
        self.inner.all()
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.inner.get(id)
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// First customer whose phone matches exactly (after trimming).
    pub fn get_by_phone(&self, phone: &str) -> Option<&Customer> {
        let phone = phone.trim();
        if phone.is_empty() {
            return None;
        }
        self.all().iter().find(|c| c.phone == phone)
    }

    /// Case-insensitive substring search on the name.
    ///
    /// An empty query matches everyone.
    pub fn search_by_name(&self, query: &str) -> StoreResult<Vec<&Customer>> {
        let needle = validate_search_query(query)?.to_lowercase();
        debug!(query = %needle, "Searching customers");

        Ok(self
            .all()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Validates, assigns the next id and inserts a member with 0 points.
    pub fn create_customer(&mut self, name: &str, phone: &str) -> StoreResult<Customer> {
        validate_customer_name(name)?;
        validate_phone(phone)?;

        let customer = Customer::new(self.inner.next_id(), name.trim(), phone.trim(), 0);
        self.inner.add(customer.clone())?;

        info!(id = customer.id, name = %customer.name, "Customer created");
        Ok(customer)
    }

    /// Inserts a customer that already carries its id.
    pub fn add(&mut self, customer: Customer) -> StoreResult<()> {
        validate_customer_name(&customer.name)?;
        validate_phone(&customer.phone)?;
        self.inner.add(customer)
    }

    /// Replaces the customer with the same id, balance included.
    pub fn update(&mut self, customer: Customer) -> StoreResult<()> {
        validate_customer_name(&customer.name)?;
        validate_phone(&customer.phone)?;
        self.inner.update(customer)
    }

    /// Updates name and phone, keeping the points balance.
    pub fn update_details(
        &mut self,
        id: CustomerId,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> StoreResult<Customer> {
        let mut customer = self
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        if let Some(name) = name {
            customer.name = name.trim().to_string();
        }
        if let Some(phone) = phone {
            customer.phone = phone.trim().to_string();
        }

        self.update(customer.clone())?;
        Ok(customer)
    }

    pub fn remove(&mut self, id: CustomerId) -> bool {
        self.inner.remove(id)
    }

    pub fn save(&self) -> StoreResult<usize> {
        self.inner.save()
    }

    pub fn load(&mut self) -> StoreResult<LoadSummary> {
        self.inner.load()
    }
}

// Balances live on the records themselves, so the ledger is the same code
// as the plain in-memory `Vec<Customer>` ledger.
impl CustomerLedger for CustomerRepository {
    fn balance(&self, customer_id: CustomerId) -> Option<i64> {
        self.get(customer_id).map(Customer::loyalty_points)
    }

    fn credit(&mut self, customer_id: CustomerId, points: i64) -> CoreResult<()> {
        self.inner.records_mut().credit(customer_id, points)?;
        debug!(customer_id, points, "Credited loyalty points");
        Ok(())
    }

    fn debit(
        &mut self,
        customer_id: CustomerId,
        points: i64,
        policy: &LoyaltyPolicy,
    ) -> CoreResult<()> {
        self.inner.records_mut().debit(customer_id, points, policy)?;
        debug!(customer_id, points, "Redeemed loyalty points");
        Ok(())
    }
}
